//! Configuration constants and settings for the estimator.

use serde::{Deserialize, Serialize};

use crate::error::{EstimateError, Result};

/// Length comparison tolerance in meters.
pub const TOLERANCE: f64 = 0.01;

/// Offcuts at or below this length are scrap and never enter the pool.
pub const OFFCUT_THRESHOLD: f64 = 0.10;

/// Fixed bar length for baseboard and trim stock.
pub const DEFAULT_BAR_LENGTH: f64 = 6.0;

/// Recursion bound for the multi-piece combination search.
pub const MAX_COMBINATION_DEPTH: usize = 10;

/// Longest room dimension or piece length accepted, in meters.
pub const MAX_DIMENSION: f64 = 1000.0;

/// Largest repeat count (piece quantity or slat rows) accepted per requirement.
pub const MAX_REPEAT: u32 = 100_000;

/// Slat lengths sold by default.
pub const SLAT_PRESET: [f64; 3] = [4.0, 5.0, 6.0];

/// Material class a stock catalog belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MaterialClass {
    /// Ceiling slats, one row per slat width.
    Slat,
    /// Baseboard bars laid around the room perimeter.
    Baseboard,
    /// Profiles and trim pieces not tied to a room.
    #[default]
    Trim,
}

impl MaterialClass {
    /// All classes in report order.
    pub const ALL: [MaterialClass; 3] = [
        MaterialClass::Slat,
        MaterialClass::Baseboard,
        MaterialClass::Trim,
    ];

    /// Default stock lengths for this class.
    pub fn preset(&self) -> Vec<f64> {
        match self {
            MaterialClass::Slat => SLAT_PRESET.to_vec(),
            MaterialClass::Baseboard | MaterialClass::Trim => vec![DEFAULT_BAR_LENGTH],
        }
    }
}

impl std::fmt::Display for MaterialClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialClass::Slat => write!(f, "slat"),
            MaterialClass::Baseboard => write!(f, "baseboard"),
            MaterialClass::Trim => write!(f, "trim"),
        }
    }
}

/// Aggregate quantity an accessory count is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessoryBasis {
    /// Total ceiling area (m²).
    Area,
    /// Total room perimeter (m).
    Perimeter,
    /// Total slat linear meters.
    LinearMeters,
    /// Total number of slat rows.
    RowCount,
}

/// Fixed coverage ratio for a derived accessory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryRule {
    /// Accessory name shown in the bill of materials.
    pub name: String,
    /// Aggregate the count is computed from.
    pub basis: AccessoryBasis,
    /// Amount of basis covered by one accessory unit.
    pub coverage: f64,
}

impl AccessoryRule {
    /// Create a new accessory rule.
    pub fn new(name: impl Into<String>, basis: AccessoryBasis, coverage: f64) -> Self {
        Self {
            name: name.into(),
            basis,
            coverage,
        }
    }

    /// Units needed to cover `total`, rounded up.
    pub fn quantity_for(&self, total: f64) -> u32 {
        if total <= 0.0 {
            return 0;
        }
        float_cmp::ceil_div(total, self.coverage)
    }
}

/// Engine settings for one calculation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Baseboard bar length.
    pub bar_length: f64,
    /// Usability threshold for offcuts.
    pub offcut_threshold: f64,
    /// Length comparison tolerance.
    pub tolerance: f64,
    /// Combination search depth bound.
    pub max_depth: usize,
    /// Slat stock lengths.
    pub slat_lengths: Vec<f64>,
    /// Trim stock lengths.
    pub trim_lengths: Vec<f64>,
    /// Derived accessory rules.
    pub accessories: Vec<AccessoryRule>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bar_length: DEFAULT_BAR_LENGTH,
            offcut_threshold: OFFCUT_THRESHOLD,
            tolerance: TOLERANCE,
            max_depth: MAX_COMBINATION_DEPTH,
            slat_lengths: SLAT_PRESET.to_vec(),
            trim_lengths: vec![DEFAULT_BAR_LENGTH],
            accessories: default_accessories(),
        }
    }
}

impl EngineConfig {
    /// Stock lengths configured for a material class.
    pub fn lengths_for(&self, class: MaterialClass) -> Vec<f64> {
        match class {
            MaterialClass::Slat => self.slat_lengths.clone(),
            MaterialClass::Baseboard => vec![self.bar_length],
            MaterialClass::Trim => self.trim_lengths.clone(),
        }
    }

    /// Check scalar settings and accessory rules.
    pub fn validate(&self) -> Result<()> {
        if !(self.bar_length.is_finite() && self.bar_length > 0.0) {
            return Err(EstimateError::InvalidStockLength {
                length: self.bar_length,
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(EstimateError::invalid_input(
                "config",
                format!("tolerance must be non-negative, got {}", self.tolerance),
            ));
        }
        if !(self.offcut_threshold.is_finite() && self.offcut_threshold >= 0.0) {
            return Err(EstimateError::invalid_input(
                "config",
                format!(
                    "offcut threshold must be non-negative, got {}",
                    self.offcut_threshold
                ),
            ));
        }
        for rule in &self.accessories {
            if !(rule.coverage.is_finite() && rule.coverage > 0.0) {
                return Err(EstimateError::InvalidAccessoryRule {
                    name: rule.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Default accessory coverage ratios.
pub fn default_accessories() -> Vec<AccessoryRule> {
    vec![
        AccessoryRule::new("baseboard fastener", AccessoryBasis::Perimeter, 0.5),
        AccessoryRule::new("slat fastener", AccessoryBasis::LinearMeters, 0.6),
        AccessoryRule::new("support channel", AccessoryBasis::Area, 1.2),
        AccessoryRule::new("end cap", AccessoryBasis::RowCount, 1.0),
    ]
}

/// Utility functions for tolerance-aware length comparisons.
pub mod float_cmp {
    use super::TOLERANCE;

    /// Check if two lengths are equal within the default tolerance.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        approx_eq_tol(a, b, TOLERANCE)
    }

    /// Check if two lengths are equal within `tol`.
    #[inline]
    pub fn approx_eq_tol(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol + f64::EPSILON
    }

    /// Check if a length is negligible.
    #[inline]
    pub fn approx_zero(a: f64) -> bool {
        a.abs() <= TOLERANCE + f64::EPSILON
    }

    /// Round to centimeters.
    #[inline]
    pub fn round2(a: f64) -> f64 {
        (a * 100.0).round() / 100.0
    }

    /// Length in whole centimeters, used as an exact map key.
    #[inline]
    pub fn length_key(a: f64) -> u32 {
        (a * 100.0).round().max(0.0) as u32
    }

    /// `ceil(total / unit)` that ignores floating-point noise below the tolerance.
    #[inline]
    pub fn ceil_div(total: f64, unit: f64) -> u32 {
        let ratio = total / unit;
        let floor = ratio.floor();
        if (total - floor * unit).abs() <= TOLERANCE / 10.0 {
            floor as u32
        } else {
            ratio.ceil() as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.bar_length, 6.0);
        assert_eq!(config.offcut_threshold, 0.10);
        assert_eq!(config.tolerance, 0.01);
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.slat_lengths, vec![4.0, 5.0, 6.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(MaterialClass::Slat.preset(), vec![4.0, 5.0, 6.0]);
        assert_eq!(MaterialClass::Baseboard.preset(), vec![6.0]);
        assert_eq!(MaterialClass::Trim.to_string(), "trim");
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: EngineConfig = serde_json::from_str(r#"{ "bar_length": 3.0 }"#).unwrap();
        assert_eq!(config.bar_length, 3.0);
        assert_eq!(config.lengths_for(MaterialClass::Baseboard), vec![3.0]);
        assert_eq!(config.accessories.len(), 4);
    }

    #[test]
    fn test_invalid_accessory_rule() {
        let config = EngineConfig {
            accessories: vec![AccessoryRule::new("clip", AccessoryBasis::Area, 0.0)],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EstimateError::InvalidAccessoryRule { .. })
        ));
    }

    #[test]
    fn test_accessory_quantity_rounds_up() {
        let rule = AccessoryRule::new("fastener", AccessoryBasis::Perimeter, 0.5);
        assert_eq!(rule.quantity_for(15.4), 31);
        assert_eq!(rule.quantity_for(15.5), 31);
        assert_eq!(rule.quantity_for(0.0), 0);
    }

    #[test]
    fn test_float_helpers() {
        assert!(float_cmp::approx_eq(6.0, 6.009));
        assert!(!float_cmp::approx_eq(6.0, 6.02));
        assert!(float_cmp::approx_zero(0.005));
        assert_eq!(float_cmp::round2(3.14159), 3.14);
        assert_eq!(float_cmp::length_key(4.2), 420);
        assert_eq!(float_cmp::ceil_div(3.0, 0.6), 5);
        assert_eq!(float_cmp::ceil_div(3.1, 0.6), 6);
    }
}
