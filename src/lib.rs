//! stockcut-rs - Linear cutting-stock estimator for ceiling slats, baseboards and trim.
//!
//! Given rooms and ad-hoc linear pieces, the library picks stock lengths to buy,
//! plans baseboard cuts around each room while reusing offcuts across rooms, and
//! aggregates everything into a bill of materials.
//!
//! # Example
//!
//! ```no_run
//! use stockcut_rs::{estimate_project, generate_report, parse_project_file, EngineConfig};
//! use std::path::Path;
//!
//! let project = parse_project_file(Path::new("house.json")).unwrap();
//! let estimate = estimate_project(&project, &EngineConfig::default()).unwrap();
//! println!("{}", generate_report(&estimate));
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod planner;
pub mod solver;
pub mod validation;

// Re-exports for convenience
pub use aggregate::{
    estimate_project, BillOfMaterials, Estimator, MaterialAggregator, ProjectEstimate,
    RoomEstimate,
};
pub use config::{AccessoryBasis, AccessoryRule, EngineConfig, MaterialClass};
pub use error::{ErrorCode, EstimateError, Result};
pub use generator::generate_report;
pub use model::{
    CuttingSolution, ExtraRequirement, PieceUsage, Project, Requirement, RequirementPlan, Room,
    SolutionKind, StockCatalog, StockKey,
};
pub use parser::{parse_project_file, parse_project_str};
pub use planner::{CutInstruction, OffcutPool, PerimeterCuttingPlanner, PerimeterPlan};
pub use solver::{plan_requirement, CuttingSolver, SpliceSolver};
pub use validation::{validate_project, ValidationResult};

/// Estimate a project file.
///
/// Performs the full pipeline:
/// 1. Parse the project file
/// 2. Validate rooms and requirements
/// 3. Estimate with the project's embedded settings, or the defaults
///
/// # Arguments
///
/// * `input_path` - Path to the JSON project file
///
/// # Returns
///
/// The estimate; invalid rooms are flagged in it rather than failing the run.
pub fn estimate_file(input_path: &std::path::Path) -> Result<ProjectEstimate> {
    let project = parse_project_file(input_path)?;

    let validation = validate_project(&project)?;
    for warning in &validation.warnings {
        tracing::warn!("{}", warning);
    }

    let config = project.config.clone().unwrap_or_default();
    estimate_project(&project, &config)
}
