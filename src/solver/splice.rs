//! Splice handling for requirements longer than any stock piece.

use tracing::debug;

use super::CuttingSolver;
use crate::model::{CuttingSolution, PieceUsage, SolutionKind, StockCatalog};

/// Wraps [`CuttingSolver`] to join whole longest pieces with a solved remainder.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpliceSolver {
    cutting: CuttingSolver,
}

impl SpliceSolver {
    /// Create a splice solver around a cutting solver.
    pub fn new(cutting: CuttingSolver) -> Self {
        Self { cutting }
    }

    /// The wrapped cutting solver.
    pub fn cutting(&self) -> &CuttingSolver {
        &self.cutting
    }

    /// Check if `required` is longer than the longest stock length.
    pub fn needs_splice(&self, required: f64, catalog: &StockCatalog) -> bool {
        required > catalog.max_length() + self.cutting.tolerance()
    }

    /// Solve any positive length.
    ///
    /// Lengths that fit in one stock piece go straight to the cutting solver.
    pub fn solve(&self, required: f64, catalog: &StockCatalog) -> Option<CuttingSolution> {
        self.solve_repeated(required, 1, catalog)
    }

    /// Solve one unit of a requirement repeated `count` times.
    pub fn solve_repeated(
        &self,
        required: f64,
        count: u32,
        catalog: &StockCatalog,
    ) -> Option<CuttingSolution> {
        if !self.needs_splice(required, catalog) {
            return self.cutting.solve_repeated(required, count, catalog);
        }

        let max_stock = catalog.max_length();
        let whole_pieces = (required / max_stock).floor() as u32;
        let remainder = required - whole_pieces as f64 * max_stock;

        let mut pieces = vec![PieceUsage::whole(max_stock, whole_pieces)];
        if remainder > self.cutting.tolerance() {
            let rest = self.cutting.solve(remainder, catalog)?;
            pieces.extend(rest.pieces);
        }

        let mut solution = CuttingSolution::new(required, SolutionKind::Splice, pieces);
        solution.spliced = true;
        solution.number_of_splices = whole_pieces;

        debug!(
            required,
            whole_pieces,
            remainder,
            waste = solution.total_waste,
            "Spliced requirement"
        );

        Some(solution)
    }
}
