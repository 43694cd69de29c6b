//! Data model types for the cutting-stock engine.

mod catalog;
mod project;
mod solution;

pub use catalog::{StockCatalog, StockKey};
pub use project::{ExtraRequirement, Project, Room};
pub use solution::{CuttingSolution, PieceUsage, Requirement, RequirementPlan, SolutionKind};
