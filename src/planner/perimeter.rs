//! Per-room perimeter planning against a fixed bar length.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::instruction::{group_instructions, BarUsage, CutInstruction, ReusedPiece};
use super::pool::OffcutPool;
use crate::config::MaterialClass;
use crate::error::Result;
use crate::model::{Room, SolutionKind, StockCatalog};
use crate::solver::SpliceSolver;

/// Baseboard plan for one room, or for a run of loose baseboard pieces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerimeterPlan {
    /// Room identifier.
    pub room_id: String,
    /// Room name, also the origin label of produced offcuts.
    pub room_name: String,
    /// Bar length the plan was made for.
    pub bar_length: f64,
    /// Sum of the wall lengths.
    pub required_length: f64,
    /// New bars bought for this room.
    pub bars_used: u32,
    /// Pieces taken from offcuts of earlier rooms.
    pub reused_pieces: u32,
    /// Length taken from offcuts of earlier rooms.
    pub reused_length: f64,
    /// Splices needed on walls longer than a bar.
    pub splices: u32,
    /// Material of this room's bars not installed in this room.
    pub waste: f64,
    /// `(bar material - waste) / bar material`, in percent.
    pub stock_efficiency: f64,
    /// `required / (bar material + reused material)`, in percent.
    pub material_efficiency: f64,
    /// New bars in purchase order.
    pub bars: Vec<BarUsage>,
    /// Reused offcut pieces in consumption order.
    pub reused: Vec<ReusedPiece>,
    /// Grouped cutting steps.
    pub instructions: Vec<CutInstruction>,
    /// Segments no bar could cover.
    pub unmet: Vec<f64>,
}

/// Plans the four perimeter walls of each room through the shared offcut pool.
#[derive(Debug, Clone)]
pub struct PerimeterCuttingPlanner {
    catalog: StockCatalog,
    solver: SpliceSolver,
}

impl Default for PerimeterCuttingPlanner {
    fn default() -> Self {
        Self {
            catalog: StockCatalog::preset(MaterialClass::Baseboard),
            solver: SpliceSolver::default(),
        }
    }
}

impl PerimeterCuttingPlanner {
    /// Create a planner for bars of `bar_length` meters.
    pub fn new(bar_length: f64, solver: SpliceSolver) -> Result<Self> {
        Ok(Self {
            catalog: StockCatalog::new(MaterialClass::Baseboard, [bar_length])?,
            solver,
        })
    }

    /// Bar length in meters.
    pub fn bar_length(&self) -> f64 {
        self.catalog.max_length()
    }

    /// Split a wall into bar-sized segments.
    ///
    /// Walls longer than a bar become whole-bar segments plus one remainder;
    /// the second value is the splice count for the wall.
    pub fn split_wall(&self, wall: f64) -> (Vec<f64>, u32) {
        if !self.solver.needs_splice(wall, &self.catalog) {
            return (vec![wall], 0);
        }

        let bar = self.bar_length();
        let whole = (wall / bar).floor() as u32;
        let remainder = wall - whole as f64 * bar;

        let mut segments = vec![bar; whole as usize];
        if remainder > self.solver.cutting().tolerance() {
            segments.push(remainder);
        }
        (segments, whole)
    }

    /// Plan the room's perimeter, consuming and producing offcuts in `pool`.
    pub fn plan_room(&self, room: &Room, pool: &mut OffcutPool) -> PerimeterPlan {
        self.plan_run(&room.id, &room.name, room.walls(), pool)
    }

    /// Plan any sequence of baseboard lengths in order.
    ///
    /// Each length is treated like a wall: split at bar length, covered from
    /// the pool first, then from new bars whose offcuts are labelled `name`.
    pub fn plan_run(
        &self,
        id: &str,
        name: &str,
        walls: impl IntoIterator<Item = f64>,
        pool: &mut OffcutPool,
    ) -> PerimeterPlan {
        let bar_length = self.bar_length();
        let mut bars: Vec<BarUsage> = Vec::new();
        let mut reused: Vec<ReusedPiece> = Vec::new();
        let mut unmet: Vec<f64> = Vec::new();
        // Offcut id -> index of the bar in this room it was cut from
        let mut own_offcuts: HashMap<u32, usize> = HashMap::new();
        let mut splices = 0;
        let mut required_length = 0.0;

        for wall in walls {
            required_length += wall;
            let (segments, wall_splices) = self.split_wall(wall);
            splices += wall_splices;

            for segment in segments {
                if let Some(consumption) = pool.try_consume(segment) {
                    let offcut_id = consumption.offcut.id;
                    match own_offcuts.get(&offcut_id).copied() {
                        Some(bar_idx) => {
                            bars[bar_idx].cuts.push(consumption.taken);
                            if consumption.remaining.is_none() {
                                own_offcuts.remove(&offcut_id);
                            }
                        }
                        None => reused.push(ReusedPiece {
                            offcut_id,
                            origin: consumption.offcut.origin.clone(),
                            offcut_length: consumption.offcut.length,
                            cut_length: consumption.taken,
                            wall_length: wall,
                        }),
                    }
                    continue;
                }

                let Some(solution) = self.solver.solve(segment, &self.catalog) else {
                    warn!(room = %name, segment, "No bar covers perimeter segment");
                    unmet.push(segment);
                    continue;
                };

                let whole = solution.kind == SolutionKind::WholePiece;
                let index = bars.len() as u32 + 1;
                let cut = if whole { bar_length } else { segment };
                bars.push(BarUsage {
                    index,
                    wall_length: wall,
                    cuts: vec![cut],
                    whole,
                });

                if !whole {
                    if let Some(offcut_id) = pool.produce(bar_length - segment, name.to_string()) {
                        own_offcuts.insert(offcut_id, bars.len() - 1);
                    }
                }
            }
        }

        let bars_used = bars.len() as u32;
        let stock_length = bars_used as f64 * bar_length;
        let waste: f64 = bars.iter().map(|b| b.leftover(bar_length)).sum();
        let reused_length: f64 = reused.iter().map(|r| r.cut_length).sum();

        let stock_efficiency = if stock_length > 0.0 {
            (stock_length - waste) / stock_length * 100.0
        } else {
            0.0
        };
        let consumed = stock_length + reused_length;
        let material_efficiency = if consumed > 0.0 {
            required_length / consumed * 100.0
        } else {
            0.0
        };

        let instructions = group_instructions(&bars, &reused, bar_length);

        debug!(
            room = %name,
            bars_used,
            reused = reused.len(),
            waste,
            splices,
            "Planned perimeter"
        );

        PerimeterPlan {
            room_id: id.to_string(),
            room_name: name.to_string(),
            bar_length,
            required_length,
            bars_used,
            reused_pieces: reused.len() as u32,
            reused_length,
            splices,
            waste,
            stock_efficiency,
            material_efficiency,
            bars,
            reused,
            instructions,
            unmet,
        }
    }
}
