//! Stock catalog - the purchasable lengths for one material class.

use serde::{Deserialize, Serialize};

use crate::config::{float_cmp, MaterialClass};
use crate::error::{EstimateError, Result};

/// Stock length keyed in whole centimeters.
///
/// Used wherever lengths are summed or grouped by exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockKey(pub u32);

impl StockKey {
    /// Key for a length in meters (rounded to 2 decimals).
    pub fn from_length(length: f64) -> Self {
        StockKey(float_cmp::length_key(length))
    }

    /// Length in meters.
    pub fn meters(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl std::fmt::Display for StockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Set of stock lengths usable for a material class.
///
/// Never empty; lengths are positive and kept in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockCatalog {
    class: MaterialClass,
    lengths: Vec<f64>,
}

impl StockCatalog {
    /// Build a catalog, collapsing duplicate lengths.
    pub fn new(class: MaterialClass, lengths: impl IntoIterator<Item = f64>) -> Result<Self> {
        let mut catalog = Self {
            class,
            lengths: Vec::new(),
        };
        for length in lengths {
            catalog.insert(length)?;
        }
        if catalog.lengths.is_empty() {
            return Err(EstimateError::EmptyCatalog);
        }
        Ok(catalog)
    }

    /// Catalog holding the default lengths for `class`.
    pub fn preset(class: MaterialClass) -> Self {
        let mut lengths = class.preset();
        lengths.sort_by(f64::total_cmp);
        Self { class, lengths }
    }

    /// Material class of this catalog.
    pub fn class(&self) -> MaterialClass {
        self.class
    }

    /// Lengths in ascending order.
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// Longest available length.
    pub fn max_length(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Number of distinct lengths.
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Check if a length is already in the catalog.
    pub fn contains(&self, length: f64) -> bool {
        self.position(length).is_some()
    }

    /// Add a length. Returns false if it was already present.
    pub fn add(&mut self, length: f64) -> Result<bool> {
        self.insert(length)
    }

    /// Remove a length, refusing to empty the catalog.
    pub fn remove(&mut self, length: f64) -> Result<()> {
        let idx = self
            .position(length)
            .ok_or(EstimateError::StockLengthNotFound { length })?;
        if self.lengths.len() == 1 {
            return Err(EstimateError::CatalogExhaustion { length });
        }
        self.lengths.remove(idx);
        Ok(())
    }

    /// Restore the class preset.
    pub fn reset(&mut self) {
        *self = Self::preset(self.class);
    }

    /// Replace all lengths, leaving the catalog untouched on error.
    pub fn reset_to(&mut self, lengths: impl IntoIterator<Item = f64>) -> Result<()> {
        *self = Self::new(self.class, lengths)?;
        Ok(())
    }

    fn position(&self, length: f64) -> Option<usize> {
        let key = StockKey::from_length(length);
        self.lengths
            .iter()
            .position(|&l| StockKey::from_length(l) == key)
    }

    fn insert(&mut self, length: f64) -> Result<bool> {
        if !(length.is_finite() && length > 0.0) || StockKey::from_length(length).0 == 0 {
            return Err(EstimateError::InvalidStockLength { length });
        }
        if self.contains(length) {
            return Ok(false);
        }
        self.lengths.push(length);
        self.lengths.sort_by(f64::total_cmp);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_collapses_duplicates() {
        let catalog = StockCatalog::new(MaterialClass::Slat, [6.0, 4.0, 6.0, 5.0, 4.001]).unwrap();
        assert_eq!(catalog.lengths(), &[4.0, 5.0, 6.0]);
        assert_eq!(catalog.max_length(), 6.0);
    }

    #[test]
    fn test_new_rejects_empty_and_non_positive() {
        assert!(matches!(
            StockCatalog::new(MaterialClass::Slat, Vec::<f64>::new()),
            Err(EstimateError::EmptyCatalog)
        ));
        assert!(matches!(
            StockCatalog::new(MaterialClass::Slat, [4.0, 0.0]),
            Err(EstimateError::InvalidStockLength { .. })
        ));
        assert!(matches!(
            StockCatalog::new(MaterialClass::Slat, [-1.0]),
            Err(EstimateError::InvalidStockLength { .. })
        ));
        assert!(StockCatalog::new(MaterialClass::Slat, [f64::NAN]).is_err());
    }

    #[test]
    fn test_add_and_remove() {
        let mut catalog = StockCatalog::preset(MaterialClass::Slat);
        assert!(catalog.add(3.0).unwrap());
        assert!(!catalog.add(3.0).unwrap());
        assert_eq!(catalog.lengths(), &[3.0, 4.0, 5.0, 6.0]);

        catalog.remove(5.0).unwrap();
        assert_eq!(catalog.lengths(), &[3.0, 4.0, 6.0]);
        assert!(matches!(
            catalog.remove(5.0),
            Err(EstimateError::StockLengthNotFound { .. })
        ));
    }

    #[test]
    fn test_remove_last_length_is_rejected() {
        let mut catalog = StockCatalog::preset(MaterialClass::Baseboard);
        let err = catalog.remove(6.0).unwrap_err();
        assert!(matches!(err, EstimateError::CatalogExhaustion { .. }));
        assert_eq!(catalog.lengths(), &[6.0]);
    }

    #[test]
    fn test_reset_restores_preset() {
        let mut catalog = StockCatalog::preset(MaterialClass::Slat);
        catalog.remove(4.0).unwrap();
        catalog.add(2.5).unwrap();
        catalog.reset();
        assert_eq!(catalog, StockCatalog::preset(MaterialClass::Slat));
    }

    #[test]
    fn test_reset_to_keeps_catalog_on_error() {
        let mut catalog = StockCatalog::preset(MaterialClass::Slat);
        assert!(catalog.reset_to(Vec::<f64>::new()).is_err());
        assert_eq!(catalog.len(), 3);
        catalog.reset_to([3.0]).unwrap();
        assert_eq!(catalog.lengths(), &[3.0]);
    }

    #[test]
    fn test_stock_key_display() {
        assert_eq!(StockKey::from_length(6.0).to_string(), "6.00");
        assert_eq!(StockKey::from_length(4.207).to_string(), "4.21");
        assert_eq!(StockKey::from_length(0.5).meters(), 0.5);
    }
}
