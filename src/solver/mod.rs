//! Cutting-stock solvers.

mod cutting;
mod splice;

pub use cutting::CuttingSolver;
pub use splice::SpliceSolver;

use crate::error::Result;
use crate::model::{Requirement, RequirementPlan, StockCatalog};

/// Solve a repeated requirement and scale the result to its count.
///
/// A missing solution is not an error; it comes back as an unmet plan.
pub fn plan_requirement(
    solver: &SpliceSolver,
    requirement: Requirement,
    catalog: &StockCatalog,
) -> Result<RequirementPlan> {
    let solution = solver.solve_repeated(requirement.length, requirement.count, catalog);
    if solution.is_none() {
        tracing::warn!(
            origin = %requirement.origin,
            length = requirement.length,
            "No cutting combination found"
        );
    }
    RequirementPlan::new(requirement, catalog.class(), solution)
}
