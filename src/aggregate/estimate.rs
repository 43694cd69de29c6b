//! Project-level estimation: slats, perimeter and extra pieces.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::bom::{BillOfMaterials, MaterialAggregator};
use crate::config::{EngineConfig, MaterialClass};
use crate::error::{EstimateError, Result};
use crate::model::{Project, Requirement, RequirementPlan, Room, StockCatalog};
use crate::planner::{Offcut, OffcutPool, PerimeterCuttingPlanner, PerimeterPlan};
use crate::solver::{plan_requirement, CuttingSolver, SpliceSolver};
use crate::validation::{validate_extra, validate_room};

/// Estimate for one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomEstimate {
    /// Room identifier.
    pub id: String,
    /// Room name.
    pub name: String,
    /// Slat rows.
    pub rows: u32,
    /// Slat plan, `None` for rooms without a row width.
    pub slats: Option<RequirementPlan>,
    /// Baseboard plan.
    pub perimeter: Option<PerimeterPlan>,
    /// Validation failure, set for excluded rooms.
    pub error: Option<String>,
}

impl RoomEstimate {
    /// Check if the room took part in the estimate.
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Complete result of one calculation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEstimate {
    /// Project name.
    pub project: String,
    /// Rooms in input order, including excluded ones.
    pub rooms: Vec<RoomEstimate>,
    /// Plans for ad-hoc trim and slat requirements.
    pub extras: Vec<RequirementPlan>,
    /// Plans for ad-hoc baseboard pieces, cut through the offcut pool.
    #[serde(default)]
    pub baseboard_extras: Vec<PerimeterPlan>,
    /// Aggregated purchase list.
    pub bill: BillOfMaterials,
    /// Offcuts still in the pool after the last room.
    pub leftover_offcuts: Vec<Offcut>,
}

impl ProjectEstimate {
    /// Valid rooms only.
    pub fn valid_rooms(&self) -> impl Iterator<Item = &RoomEstimate> {
        self.rooms.iter().filter(|r| r.is_valid())
    }

    /// Look up a room by id.
    pub fn room(&self, id: &str) -> Option<&RoomEstimate> {
        self.rooms.iter().find(|r| r.id == id)
    }
}

/// Holds the catalogs and solvers for one configuration.
#[derive(Debug, Clone)]
pub struct Estimator {
    config: EngineConfig,
    solver: SpliceSolver,
    planner: PerimeterCuttingPlanner,
    slats: StockCatalog,
    baseboard: StockCatalog,
    trim: StockCatalog,
}

impl Estimator {
    /// Build catalogs and solvers from `config`.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        let solver = SpliceSolver::new(CuttingSolver::new(config.tolerance, config.max_depth));
        let planner = PerimeterCuttingPlanner::new(config.bar_length, solver)?;

        Ok(Self {
            config: config.clone(),
            solver,
            planner,
            slats: StockCatalog::new(
                MaterialClass::Slat,
                config.lengths_for(MaterialClass::Slat),
            )?,
            baseboard: StockCatalog::new(
                MaterialClass::Baseboard,
                config.lengths_for(MaterialClass::Baseboard),
            )?,
            trim: StockCatalog::new(
                MaterialClass::Trim,
                config.lengths_for(MaterialClass::Trim),
            )?,
        })
    }

    /// Catalog searched for a material class.
    pub fn catalog(&self, class: MaterialClass) -> &StockCatalog {
        match class {
            MaterialClass::Slat => &self.slats,
            MaterialClass::Baseboard => &self.baseboard,
            MaterialClass::Trim => &self.trim,
        }
    }

    /// Estimate a project.
    ///
    /// Rooms are processed strictly in input order through one offcut pool,
    /// so reordering rooms can change reuse and totals.
    pub fn estimate(&self, project: &Project) -> Result<ProjectEstimate> {
        if project.is_empty() {
            return Err(EstimateError::EmptyProject);
        }

        let mut pool = OffcutPool::new(self.config.offcut_threshold, self.config.tolerance);
        let mut aggregator = MaterialAggregator::new(self.config.accessories.clone());
        let mut rooms = Vec::with_capacity(project.rooms.len());

        for room in &project.rooms {
            let id = if room.id.is_empty() {
                room.name.clone()
            } else {
                room.id.clone()
            };

            let validation = validate_room(room);
            for warning in &validation.warnings {
                warn!("{}", warning);
            }
            if !validation.passed {
                let reason = validation.reason();
                warn!(room = %room.name, reason = %reason, "Room excluded");
                aggregator.record_invalid(format!("room '{}'", room.name), reason.clone());
                rooms.push(RoomEstimate {
                    id,
                    name: room.name.clone(),
                    rows: 0,
                    slats: None,
                    perimeter: None,
                    error: Some(reason),
                });
                continue;
            }

            rooms.push(self.estimate_room(id, room, &mut pool, &mut aggregator));
        }

        let mut extras = Vec::with_capacity(project.extra_requirements.len());
        let mut baseboard_extras = Vec::new();
        for extra in &project.extra_requirements {
            let subject = format!("requirement '{}'", extra.name);
            let validation = validate_extra(extra);
            if !validation.passed {
                let reason = validation.reason();
                warn!(requirement = %extra.name, reason = %reason, "Requirement excluded");
                aggregator.record_invalid(subject, reason);
                continue;
            }

            // Loose baseboard shares bars and offcuts with the room perimeters
            if extra.material == MaterialClass::Baseboard {
                let pieces = std::iter::repeat_n(extra.length, extra.quantity as usize);
                let plan = self.planner.plan_run(&extra.name, &extra.name, pieces, &mut pool);
                aggregator.add_perimeter(&plan);
                baseboard_extras.push(plan);
                continue;
            }

            let requirement = Requirement::new(extra.length, extra.name.clone())
                .repeated(extra.quantity);
            match plan_requirement(&self.solver, requirement, self.catalog(extra.material)) {
                Ok(plan) => {
                    aggregator.add_requirement(&plan);
                    extras.push(plan);
                }
                Err(err) => {
                    warn!(requirement = %extra.name, error = %err, "Requirement excluded");
                    aggregator.record_invalid(subject, err.to_string());
                }
            }
        }

        let bill = aggregator.finish();
        info!(
            project = %project.name,
            rooms = rooms.len(),
            excluded = bill.invalid().len(),
            unmet = bill.unmet().len(),
            waste = bill.total_waste(),
            "Estimate complete"
        );

        Ok(ProjectEstimate {
            project: project.name.clone(),
            rooms,
            extras,
            baseboard_extras,
            bill,
            leftover_offcuts: pool.offcuts().to_vec(),
        })
    }

    fn estimate_room(
        &self,
        id: String,
        room: &Room,
        pool: &mut OffcutPool,
        aggregator: &mut MaterialAggregator,
    ) -> RoomEstimate {
        aggregator.add_room(room);

        let rows = room.rows();
        let mut slats = None;
        if rows > 0 {
            let requirement = Requirement::new(room.length, room.name.clone()).repeated(rows);
            match plan_requirement(&self.solver, requirement, &self.slats) {
                Ok(plan) => {
                    aggregator.add_requirement(&plan);
                    slats = Some(plan);
                }
                Err(err) => {
                    warn!(room = %room.name, error = %err, "Slats excluded");
                    aggregator.record_invalid(
                        format!("slats for room '{}'", room.name),
                        err.to_string(),
                    );
                }
            }
        }

        let perimeter = self.planner.plan_room(room, pool);
        aggregator.add_perimeter(&perimeter);

        debug!(
            room = %room.name,
            rows,
            bars = perimeter.bars_used,
            reused = perimeter.reused_pieces,
            "Room estimated"
        );

        RoomEstimate {
            id,
            name: room.name.clone(),
            rows,
            slats,
            perimeter: Some(perimeter),
            error: None,
        }
    }
}

/// Estimate `project` with `config`.
pub fn estimate_project(project: &Project, config: &EngineConfig) -> Result<ProjectEstimate> {
    Estimator::new(config)?.estimate(project)
}
