//! Requirements and the cutting solutions produced for them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::StockKey;
use crate::config::MaterialClass;
use crate::error::{EstimateError, Result};

/// A required linear length, optionally repeated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    /// Required length in meters.
    pub length: f64,
    /// How many identical pieces are needed.
    pub count: u32,
    /// Room or piece name the requirement comes from.
    pub origin: String,
}

impl Requirement {
    /// Create a single requirement.
    pub fn new(length: f64, origin: impl Into<String>) -> Self {
        Self {
            length,
            count: 1,
            origin: origin.into(),
        }
    }

    /// Set the repeat count.
    pub fn repeated(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Total required length over all repeats.
    pub fn total_length(&self) -> f64 {
        self.length * self.count as f64
    }
}

/// Candidate family a solution was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionKind {
    /// A stock length equal to the requirement.
    WholePiece,
    /// One longer stock piece cut to length.
    SingleCut,
    /// One stock piece divided into several requirement-length pieces.
    EqualDivision,
    /// Several whole stock pieces joined end to end.
    Combination,
    /// Whole longest pieces plus a solved remainder.
    Splice,
}

/// Usage of one stock length inside a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceUsage {
    /// Stock length bought.
    pub stock_length: f64,
    /// Number of stock pieces of this length.
    pub quantity: u32,
    /// Length taken from each piece toward the requirement.
    pub cut_length: f64,
    /// Whether the piece is installed uncut.
    pub is_whole_piece: bool,
    /// Requirement-length pieces each stock piece yields (1 unless divided).
    pub yield_per_piece: u32,
}

impl PieceUsage {
    /// Whole stock pieces installed uncut.
    pub fn whole(stock_length: f64, quantity: u32) -> Self {
        Self {
            stock_length,
            quantity,
            cut_length: stock_length,
            is_whole_piece: true,
            yield_per_piece: 1,
        }
    }

    /// Stock pieces cut down to `cut_length`.
    pub fn cut(stock_length: f64, quantity: u32, cut_length: f64) -> Self {
        Self {
            stock_length,
            quantity,
            cut_length,
            is_whole_piece: false,
            yield_per_piece: 1,
        }
    }

    /// Waste over all pieces of this usage.
    pub fn waste(&self) -> f64 {
        let per_piece = self.stock_length - self.cut_length * self.yield_per_piece as f64;
        per_piece.max(0.0) * self.quantity as f64
    }
}

/// Best way found to assemble one unit of a requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingSolution {
    /// Length the solution was computed for.
    pub required: f64,
    /// Candidate family.
    pub kind: SolutionKind,
    /// Stock pieces used, in assembly order.
    pub pieces: Vec<PieceUsage>,
    /// Total waste in meters.
    pub total_waste: f64,
    /// Total stock pieces bought.
    pub total_piece_count: u32,
    /// Whether whole longest pieces had to be joined.
    pub spliced: bool,
    /// Number of full-length splices (0 unless spliced).
    pub number_of_splices: u32,
}

impl CuttingSolution {
    /// Build a non-spliced solution, deriving waste and piece count.
    pub fn new(required: f64, kind: SolutionKind, pieces: Vec<PieceUsage>) -> Self {
        let total_waste = pieces.iter().map(PieceUsage::waste).sum();
        let total_piece_count = pieces.iter().map(|p| p.quantity).sum();
        Self {
            required,
            kind,
            pieces,
            total_waste,
            total_piece_count,
            spliced: false,
            number_of_splices: 0,
        }
    }

    /// Length the pieces contribute toward the requirement.
    pub fn covered_length(&self) -> f64 {
        self.pieces
            .iter()
            .map(|p| p.cut_length * p.quantity as f64)
            .sum()
    }

    /// Check if no material is wasted.
    pub fn is_zero_waste(&self) -> bool {
        crate::config::float_cmp::approx_zero(self.total_waste)
    }
}

/// A requirement with its solution scaled to the repeat count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementPlan {
    /// The requirement solved.
    pub requirement: Requirement,
    /// Catalog it was solved against.
    pub material: MaterialClass,
    /// Per-unit solution, `None` when no combination was found.
    pub solution: Option<CuttingSolution>,
    /// Stock pieces to buy for all repeats.
    pub bars: BTreeMap<StockKey, u32>,
    /// Waste over all repeats.
    pub waste: f64,
    /// Splices over all repeats.
    pub splices: u32,
}

impl RequirementPlan {
    /// Scale a per-unit solution to `requirement.count`.
    ///
    /// Divided pieces are shared between repeats: `n` repeats of a usage that
    /// yields `k` pieces per bar need `ceil(n / k)` bars. Counts that do not
    /// fit in a `u32` are rejected as invalid input.
    pub fn new(
        requirement: Requirement,
        material: MaterialClass,
        solution: Option<CuttingSolution>,
    ) -> Result<Self> {
        let mut bars: BTreeMap<StockKey, u32> = BTreeMap::new();
        let mut waste = 0.0;
        let mut splices = 0;

        if let Some(solution) = &solution {
            let count = requirement.count;
            let too_many = || {
                EstimateError::invalid_input(
                    requirement.origin.clone(),
                    format!(
                        "{} x {} m needs more stock pieces than can be counted",
                        count, requirement.length
                    ),
                )
            };

            for usage in &solution.pieces {
                let pieces_needed = usage.quantity.checked_mul(count).ok_or_else(too_many)?;
                let per_bar = usage.yield_per_piece.max(1);
                let bought = pieces_needed.div_ceil(per_bar);
                let entry = bars
                    .entry(StockKey::from_length(usage.stock_length))
                    .or_insert(0);
                *entry = entry.checked_add(bought).ok_or_else(too_many)?;
                waste += (bought as f64 * usage.stock_length
                    - pieces_needed as f64 * usage.cut_length)
                    .max(0.0);
            }
            splices = solution
                .number_of_splices
                .checked_mul(count)
                .ok_or_else(too_many)?;
        }

        Ok(Self {
            requirement,
            material,
            solution,
            bars,
            waste,
            splices,
        })
    }

    /// Check if the requirement could not be met.
    pub fn is_unmet(&self) -> bool {
        self.solution.is_none()
    }

    /// Total stock pieces to buy.
    pub fn bar_count(&self) -> u64 {
        self.bars.values().map(|&n| u64::from(n)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_usage_waste() {
        assert_eq!(PieceUsage::whole(6.0, 2).waste(), 0.0);
        assert!((PieceUsage::cut(6.0, 2, 4.5).waste() - 3.0).abs() < 1e-9);

        let divided = PieceUsage {
            yield_per_piece: 2,
            ..PieceUsage::cut(5.0, 1, 2.4)
        };
        assert!((divided.waste() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_solution_totals() {
        let solution = CuttingSolution::new(
            10.0,
            SolutionKind::Combination,
            vec![PieceUsage::whole(6.0, 1), PieceUsage::whole(4.0, 1)],
        );
        assert_eq!(solution.total_piece_count, 2);
        assert!(solution.is_zero_waste());
        assert!((solution.covered_length() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_plan_scales_single_cut() {
        let solution = CuttingSolution::new(
            3.2,
            SolutionKind::SingleCut,
            vec![PieceUsage::cut(4.0, 1, 3.2)],
        );
        let plan = RequirementPlan::new(
            Requirement::new(3.2, "Hall").repeated(4),
            MaterialClass::Slat,
            Some(solution),
        )
        .unwrap();
        assert_eq!(plan.bars.get(&StockKey(400)), Some(&4));
        assert!((plan.waste - 3.2).abs() < 1e-9);
        assert_eq!(plan.bar_count(), 4);
    }

    #[test]
    fn test_plan_shares_divided_bars() {
        let usage = PieceUsage {
            yield_per_piece: 2,
            ..PieceUsage::cut(5.0, 1, 2.5)
        };
        let solution = CuttingSolution::new(2.5, SolutionKind::EqualDivision, vec![usage]);
        let plan = RequirementPlan::new(
            Requirement::new(2.5, "Hall").repeated(3),
            MaterialClass::Slat,
            Some(solution),
        )
        .unwrap();
        assert_eq!(plan.bars.get(&StockKey(500)), Some(&2));
        assert!((plan.waste - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_unmet_plan() {
        let plan =
            RequirementPlan::new(Requirement::new(1.0, "x"), MaterialClass::Trim, None).unwrap();
        assert!(plan.is_unmet());
        assert_eq!(plan.bar_count(), 0);
        assert_eq!(plan.waste, 0.0);
    }

    #[test]
    fn test_plan_rejects_uncountable_pieces() {
        let solution = CuttingSolution::new(
            1000.0,
            SolutionKind::Splice,
            vec![PieceUsage::whole(0.01, 100_000)],
        );
        let err = RequirementPlan::new(
            Requirement::new(1000.0, "Cornice").repeated(100_000),
            MaterialClass::Trim,
            Some(solution),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EstimateError::InvalidInput { ref subject, .. } if subject == "Cornice"
        ));
    }

    #[test]
    fn test_plan_rejects_uncountable_splices() {
        let mut solution = CuttingSolution::new(
            13.0,
            SolutionKind::Splice,
            vec![PieceUsage::whole(6.0, 2), PieceUsage::cut(4.0, 1, 1.0)],
        );
        solution.number_of_splices = u32::MAX;
        let result = RequirementPlan::new(
            Requirement::new(13.0, "Cornice").repeated(2),
            MaterialClass::Trim,
            Some(solution),
        );
        assert!(result.is_err());
    }
}
