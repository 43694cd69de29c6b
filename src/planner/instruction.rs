//! Human-readable cut instructions grouped from planner output.

use std::cmp::Reverse;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::TOLERANCE;
use crate::model::StockKey;

/// One purchased bar and the cuts taken from it within a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarUsage {
    /// 1-based bar number within the room.
    pub index: u32,
    /// Wall the bar was bought for.
    pub wall_length: f64,
    /// Pieces cut from the bar, in cutting order.
    pub cuts: Vec<f64>,
    /// Whether the bar is installed uncut.
    pub whole: bool,
}

impl BarUsage {
    /// Total length cut from the bar.
    pub fn used(&self) -> f64 {
        self.cuts.iter().sum()
    }

    /// Material left on the bar after this room's cuts.
    pub fn leftover(&self, bar_length: f64) -> f64 {
        (bar_length - self.used()).max(0.0)
    }

    /// Grouping key: wall, whole flag and the sorted sub-cuts.
    fn pattern(&self) -> (StockKey, bool, Vec<StockKey>) {
        let mut cuts: Vec<StockKey> = self.cuts.iter().map(|&c| StockKey::from_length(c)).collect();
        cuts.sort_by(|a, b| b.cmp(a));
        (StockKey::from_length(self.wall_length), self.whole, cuts)
    }
}

/// Piece taken from an offcut left by an earlier room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReusedPiece {
    /// Offcut id in the project pool.
    pub offcut_id: u32,
    /// Room the offcut came from.
    pub origin: String,
    /// Offcut length before the cut.
    pub offcut_length: f64,
    /// Length cut from the offcut.
    pub cut_length: f64,
    /// Wall the piece is installed on.
    pub wall_length: f64,
}

/// A cutting step shown to the installer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CutInstruction {
    /// Consecutive new bars sharing one cut pattern.
    Bars {
        first_bar: u32,
        last_bar: u32,
        wall_length: f64,
        bar_length: f64,
        cuts: Vec<f64>,
        whole: bool,
    },
    /// A piece cut from an existing offcut.
    Reuse {
        origin: String,
        offcut_length: f64,
        cut_length: f64,
        wall_length: f64,
    },
}

impl CutInstruction {
    /// Number of new bars covered by this instruction.
    pub fn bar_count(&self) -> u32 {
        match self {
            CutInstruction::Bars {
                first_bar,
                last_bar,
                ..
            } => last_bar - first_bar + 1,
            CutInstruction::Reuse { .. } => 0,
        }
    }
}

impl fmt::Display for CutInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CutInstruction::Bars {
                first_bar,
                last_bar,
                wall_length,
                bar_length,
                cuts,
                whole,
            } => {
                if first_bar == last_bar {
                    write!(f, "Bar {}", first_bar)?;
                } else {
                    write!(f, "Bars {}-{}", first_bar, last_bar)?;
                }
                write!(f, " (wall {:.2} m): ", wall_length)?;
                if *whole {
                    return write!(f, "use whole {:.2} m bar", bar_length);
                }
                write!(f, "cut ")?;
                for (i, (length, count)) in count_cuts(cuts).iter().enumerate() {
                    if i > 0 {
                        write!(f, " + ")?;
                    }
                    let noun = if *count == 1 { "piece" } else { "pieces" };
                    write!(f, "{} {} of {:.2} m", count, noun, length)?;
                }
                let leftover = bar_length - cuts.iter().sum::<f64>();
                if leftover > TOLERANCE {
                    write!(f, ", leftover {:.2} m", leftover)?;
                }
                Ok(())
            }
            CutInstruction::Reuse {
                origin,
                offcut_length,
                cut_length,
                wall_length,
            } => write!(
                f,
                "Reuse {:.2} m offcut from {}: cut {:.2} m (wall {:.2} m)",
                offcut_length, origin, cut_length, wall_length
            ),
        }
    }
}

/// Collapse sorted cuts into (length, count) runs.
fn count_cuts(cuts: &[f64]) -> Vec<(f64, u32)> {
    let mut runs: Vec<(f64, u32)> = Vec::new();
    for &cut in cuts {
        match runs.last_mut() {
            Some((length, count)) if StockKey::from_length(*length) == StockKey::from_length(cut) => {
                *count += 1
            }
            _ => runs.push((cut, 1)),
        }
    }
    runs
}

/// Group consecutive bars with identical patterns and order the groups.
///
/// Order: longest wall first, whole-bar patterns before cut patterns, then
/// by first bar number. Reused offcuts follow in consumption order.
pub fn group_instructions(
    bars: &[BarUsage],
    reused: &[ReusedPiece],
    bar_length: f64,
) -> Vec<CutInstruction> {
    let mut groups: Vec<(u32, u32, &BarUsage)> = Vec::new();
    for bar in bars {
        match groups.last_mut() {
            Some((_, last, head)) if head.pattern() == bar.pattern() && *last + 1 == bar.index => {
                *last = bar.index;
            }
            _ => groups.push((bar.index, bar.index, bar)),
        }
    }

    groups.sort_by_key(|(first, _, head)| {
        (
            Reverse(StockKey::from_length(head.wall_length)),
            !head.whole,
            *first,
        )
    });

    let mut instructions: Vec<CutInstruction> = groups
        .into_iter()
        .map(|(first, last, head)| {
            let mut cuts = head.cuts.clone();
            cuts.sort_by(|a, b| b.total_cmp(a));
            CutInstruction::Bars {
                first_bar: first,
                last_bar: last,
                wall_length: head.wall_length,
                bar_length,
                cuts,
                whole: head.whole,
            }
        })
        .collect();

    instructions.extend(reused.iter().map(|piece| CutInstruction::Reuse {
        origin: piece.origin.clone(),
        offcut_length: piece.offcut_length,
        cut_length: piece.cut_length,
        wall_length: piece.wall_length,
    }));

    instructions
}
