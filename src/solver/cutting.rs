//! Single-requirement cutting solver.
//!
//! Candidates are generated in a fixed order and the winner is picked by
//! waste, then piece count, then generation order:
//!
//! 1. whole-piece match
//! 2. single cut from each longer stock length
//! 3. equal division of one stock piece into several requirement pieces
//! 4. multi-piece combinations of whole stock pieces (depth bounded)

use tracing::debug;

use crate::config::{float_cmp, MAX_COMBINATION_DEPTH, TOLERANCE};
use crate::model::{CuttingSolution, PieceUsage, SolutionKind, StockCatalog};

/// Finds the least-waste way to assemble one required length.
#[derive(Debug, Clone, Copy)]
pub struct CuttingSolver {
    tolerance: f64,
    max_depth: usize,
}

impl Default for CuttingSolver {
    fn default() -> Self {
        Self::new(TOLERANCE, MAX_COMBINATION_DEPTH)
    }
}

impl CuttingSolver {
    /// Create a solver with an explicit tolerance and combination depth.
    pub fn new(tolerance: f64, max_depth: usize) -> Self {
        Self {
            tolerance,
            max_depth,
        }
    }

    /// Length comparison tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Solve a single piece of `required` meters.
    pub fn solve(&self, required: f64, catalog: &StockCatalog) -> Option<CuttingSolution> {
        self.solve_repeated(required, 1, catalog)
    }

    /// Solve one unit of a requirement that repeats `count` times.
    ///
    /// The count only matters for equal division, where one bar can serve
    /// up to `count` repeats.
    pub fn solve_repeated(
        &self,
        required: f64,
        count: u32,
        catalog: &StockCatalog,
    ) -> Option<CuttingSolution> {
        let candidates = self.candidates(required, count, catalog);
        let best = self.select(&candidates);

        match &best {
            Some(solution) => debug!(
                required,
                candidates = candidates.len(),
                kind = ?solution.kind,
                waste = solution.total_waste,
                pieces = solution.total_piece_count,
                "Solved requirement"
            ),
            None => debug!(required, "No cutting combination found"),
        }

        best
    }

    /// All candidates in generation order.
    pub fn candidates(
        &self,
        required: f64,
        count: u32,
        catalog: &StockCatalog,
    ) -> Vec<CuttingSolution> {
        if !(required.is_finite() && required > self.tolerance) {
            return Vec::new();
        }

        let mut candidates = Vec::new();
        let lengths = catalog.lengths();

        // Whole-piece match
        for &stock in lengths {
            if float_cmp::approx_eq_tol(stock, required, self.tolerance) {
                candidates.push(CuttingSolution::new(
                    required,
                    SolutionKind::WholePiece,
                    vec![PieceUsage::whole(stock, 1)],
                ));
            }
        }

        // Single cut
        for &stock in lengths {
            if stock > required + self.tolerance {
                candidates.push(CuttingSolution::new(
                    required,
                    SolutionKind::SingleCut,
                    vec![PieceUsage::cut(stock, 1, required)],
                ));
            }
        }

        // Equal division
        for &stock in lengths {
            // A bar short of a whole multiple by less than the tolerance still yields it
            let pieces = ((stock + self.tolerance) / required + 1e-9).floor() as u32;
            if pieces > 1 {
                let usable = pieces.min(count.max(1));
                let usage = PieceUsage {
                    yield_per_piece: usable,
                    ..PieceUsage::cut(stock, 1, required)
                };
                candidates.push(CuttingSolution::new(
                    required,
                    SolutionKind::EqualDivision,
                    vec![usage],
                ));
            }
        }

        // Multi-piece combination
        let mut current = Vec::new();
        let mut found = Vec::new();
        self.search_combinations(lengths, 0, required, &mut current, &mut found);
        for combo in found {
            candidates.push(combination_solution(required, lengths, &combo));
        }

        candidates
    }

    /// Depth-first search over multisets of stock indices (non-decreasing).
    fn search_combinations(
        &self,
        lengths: &[f64],
        start: usize,
        remaining: f64,
        current: &mut Vec<usize>,
        found: &mut Vec<Vec<usize>>,
    ) {
        if !current.is_empty() && remaining.abs() <= self.tolerance {
            found.push(current.clone());
            return;
        }
        if remaining < -self.tolerance || current.len() >= self.max_depth {
            return;
        }

        for (idx, &stock) in lengths.iter().enumerate().skip(start) {
            if stock > remaining + self.tolerance {
                break;
            }
            current.push(idx);
            self.search_combinations(lengths, idx, remaining - stock, current, found);
            current.pop();
        }
    }

    /// Pick the least-waste candidate, then the fewest pieces, then the earliest.
    pub fn select(&self, candidates: &[CuttingSolution]) -> Option<CuttingSolution> {
        let mut best: Option<&CuttingSolution> = None;
        for candidate in candidates {
            best = match best {
                None => Some(candidate),
                Some(current) => {
                    let delta = candidate.total_waste - current.total_waste;
                    if delta < -self.tolerance
                        || (delta.abs() <= self.tolerance
                            && candidate.total_piece_count < current.total_piece_count)
                    {
                        Some(candidate)
                    } else {
                        Some(current)
                    }
                }
            };
        }
        best.cloned()
    }
}

/// Group a combination by stock length, longest first.
fn combination_solution(required: f64, lengths: &[f64], combo: &[usize]) -> CuttingSolution {
    let mut counts = vec![0u32; lengths.len()];
    for &idx in combo {
        counts[idx] += 1;
    }
    let pieces = counts
        .iter()
        .enumerate()
        .rev()
        .filter(|&(_, &n)| n > 0)
        .map(|(idx, &n)| PieceUsage::whole(lengths[idx], n))
        .collect();
    CuttingSolution::new(required, SolutionKind::Combination, pieces)
}
