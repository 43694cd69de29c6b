//! Bill of materials and the aggregator that builds it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{AccessoryBasis, AccessoryRule, MaterialClass};
use crate::model::{RequirementPlan, Room, StockKey};
use crate::planner::PerimeterPlan;

/// Derived accessory count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryLine {
    /// Accessory name.
    pub name: String,
    /// Aggregate the count was derived from.
    pub basis: AccessoryBasis,
    /// Units needed.
    pub quantity: u32,
}

/// Requirement no stock combination could satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmetRequirement {
    /// Room or piece name.
    pub origin: String,
    /// Catalog searched.
    pub material: MaterialClass,
    /// Required length.
    pub length: f64,
    /// Repeats left unmet.
    pub count: u32,
}

/// Room or requirement excluded because of invalid input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidEntry {
    /// What was rejected.
    pub subject: String,
    /// Why it was rejected.
    pub reason: String,
}

/// Aggregated purchase list for one project run.
///
/// Built once by [`MaterialAggregator::finish`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillOfMaterials {
    stock: BTreeMap<MaterialClass, BTreeMap<StockKey, u64>>,
    waste: BTreeMap<MaterialClass, f64>,
    splice_count: u64,
    area: f64,
    perimeter: f64,
    linear_meters: f64,
    row_count: u64,
    accessories: Vec<AccessoryLine>,
    unmet: Vec<UnmetRequirement>,
    invalid: Vec<InvalidEntry>,
}

impl BillOfMaterials {
    /// Stock pieces per material class and length.
    pub fn stock(&self) -> &BTreeMap<MaterialClass, BTreeMap<StockKey, u64>> {
        &self.stock
    }

    /// Pieces of `length` to buy for `class`.
    pub fn quantity(&self, class: MaterialClass, length: f64) -> u64 {
        self.stock
            .get(&class)
            .and_then(|lengths| lengths.get(&StockKey::from_length(length)))
            .copied()
            .unwrap_or(0)
    }

    /// Total pieces to buy for `class`.
    pub fn pieces(&self, class: MaterialClass) -> u64 {
        self.stock
            .get(&class)
            .map(|lengths| lengths.values().sum())
            .unwrap_or(0)
    }

    /// Waste in meters for `class`.
    pub fn waste(&self, class: MaterialClass) -> f64 {
        self.waste.get(&class).copied().unwrap_or(0.0)
    }

    /// Waste in meters over all classes.
    pub fn total_waste(&self) -> f64 {
        self.waste.values().sum()
    }

    /// Total splices.
    pub fn splice_count(&self) -> u64 {
        self.splice_count
    }

    /// Ceiling area of valid rooms (m²).
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Perimeter of valid rooms (m).
    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    /// Slat linear meters.
    pub fn linear_meters(&self) -> f64 {
        self.linear_meters
    }

    /// Slat rows.
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Derived accessory counts, in rule order.
    pub fn accessories(&self) -> &[AccessoryLine] {
        &self.accessories
    }

    /// Quantity of a named accessory.
    pub fn accessory(&self, name: &str) -> Option<u32> {
        self.accessories
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.quantity)
    }

    /// Requirements left unmet.
    pub fn unmet(&self) -> &[UnmetRequirement] {
        &self.unmet
    }

    /// Inputs excluded as invalid.
    pub fn invalid(&self) -> &[InvalidEntry] {
        &self.invalid
    }

    /// Check if every input was valid and satisfied.
    pub fn is_complete(&self) -> bool {
        self.unmet.is_empty() && self.invalid.is_empty()
    }
}

/// Folds per-requirement results into a [`BillOfMaterials`].
#[derive(Debug, Default)]
pub struct MaterialAggregator {
    rules: Vec<AccessoryRule>,
    stock: BTreeMap<MaterialClass, BTreeMap<StockKey, u64>>,
    waste: BTreeMap<MaterialClass, f64>,
    splice_count: u64,
    area: f64,
    perimeter: f64,
    linear_meters: f64,
    row_count: u64,
    unmet: Vec<UnmetRequirement>,
    invalid: Vec<InvalidEntry>,
}

impl MaterialAggregator {
    /// Create an aggregator with the given accessory rules.
    pub fn new(rules: Vec<AccessoryRule>) -> Self {
        Self {
            rules,
            ..Default::default()
        }
    }

    fn add_stock(&mut self, class: MaterialClass, key: StockKey, quantity: u64) {
        if quantity == 0 {
            return;
        }
        *self
            .stock
            .entry(class)
            .or_default()
            .entry(key)
            .or_insert(0) += quantity;
    }

    fn add_waste(&mut self, class: MaterialClass, waste: f64) {
        *self.waste.entry(class).or_insert(0.0) += waste;
    }

    /// Count a valid room's area and perimeter.
    pub fn add_room(&mut self, room: &Room) {
        self.area += room.area();
        self.perimeter += room.perimeter();
    }

    /// Add a solved requirement (slat rows, trim pieces).
    pub fn add_requirement(&mut self, plan: &RequirementPlan) {
        if plan.is_unmet() {
            self.unmet.push(UnmetRequirement {
                origin: plan.requirement.origin.clone(),
                material: plan.material,
                length: plan.requirement.length,
                count: plan.requirement.count,
            });
            return;
        }

        for (&key, &quantity) in &plan.bars {
            self.add_stock(plan.material, key, u64::from(quantity));
        }
        self.add_waste(plan.material, plan.waste);
        self.splice_count += u64::from(plan.splices);

        if plan.material == MaterialClass::Slat {
            self.linear_meters += plan.requirement.total_length();
            self.row_count += u64::from(plan.requirement.count);
        }
    }

    /// Add a room's baseboard plan.
    ///
    /// Material this room took from earlier rooms' offcuts was already
    /// counted as those rooms' waste, so it is subtracted here.
    pub fn add_perimeter(&mut self, plan: &PerimeterPlan) {
        self.add_stock(
            MaterialClass::Baseboard,
            StockKey::from_length(plan.bar_length),
            u64::from(plan.bars_used),
        );
        self.add_waste(MaterialClass::Baseboard, plan.waste - plan.reused_length);
        self.splice_count += u64::from(plan.splices);

        for &segment in &plan.unmet {
            self.unmet.push(UnmetRequirement {
                origin: plan.room_name.clone(),
                material: MaterialClass::Baseboard,
                length: segment,
                count: 1,
            });
        }
    }

    /// Record an excluded input.
    pub fn record_invalid(&mut self, subject: impl Into<String>, reason: impl Into<String>) {
        self.invalid.push(InvalidEntry {
            subject: subject.into(),
            reason: reason.into(),
        });
    }

    /// Derive accessory counts and freeze the totals.
    pub fn finish(self) -> BillOfMaterials {
        let accessories = self
            .rules
            .iter()
            .map(|rule| {
                let total = match rule.basis {
                    AccessoryBasis::Area => self.area,
                    AccessoryBasis::Perimeter => self.perimeter,
                    AccessoryBasis::LinearMeters => self.linear_meters,
                    AccessoryBasis::RowCount => self.row_count as f64,
                };
                AccessoryLine {
                    name: rule.name.clone(),
                    basis: rule.basis,
                    quantity: rule.quantity_for(total),
                }
            })
            .collect();

        let waste = self
            .waste
            .into_iter()
            .map(|(class, waste)| (class, waste.max(0.0)))
            .collect();

        BillOfMaterials {
            stock: self.stock,
            waste,
            splice_count: self.splice_count,
            area: self.area,
            perimeter: self.perimeter,
            linear_meters: self.linear_meters,
            row_count: self.row_count,
            accessories,
            unmet: self.unmet,
            invalid: self.invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_accessories;
    use crate::model::{CuttingSolution, PieceUsage, Requirement, SolutionKind};

    fn slat_plan(length: f64, rows: u32, stock: f64) -> RequirementPlan {
        let solution = CuttingSolution::new(
            length,
            SolutionKind::SingleCut,
            vec![PieceUsage::cut(stock, 1, length)],
        );
        RequirementPlan::new(
            Requirement::new(length, "Room").repeated(rows),
            MaterialClass::Slat,
            Some(solution),
        )
        .unwrap()
    }

    #[test]
    fn test_stock_summed_by_key_across_rooms() {
        let mut aggregator = MaterialAggregator::new(Vec::new());
        aggregator.add_requirement(&slat_plan(3.2, 10, 4.0));
        aggregator.add_requirement(&slat_plan(3.5, 5, 4.0));
        aggregator.add_requirement(&slat_plan(4.6, 3, 5.0));
        let bill = aggregator.finish();

        assert_eq!(bill.quantity(MaterialClass::Slat, 4.0), 15);
        assert_eq!(bill.quantity(MaterialClass::Slat, 5.0), 3);
        assert_eq!(bill.pieces(MaterialClass::Slat), 18);
        assert_eq!(bill.row_count(), 18);
        assert!((bill.linear_meters() - (32.0 + 17.5 + 13.8)).abs() < 1e-9);
    }

    #[test]
    fn test_unmet_requirement_is_recorded() {
        let mut aggregator = MaterialAggregator::new(Vec::new());
        aggregator.add_requirement(&RequirementPlan::new(
            Requirement::new(7.3, "Cornice").repeated(2),
            MaterialClass::Trim,
            None,
        )
        .unwrap());
        let bill = aggregator.finish();
        assert!(!bill.is_complete());
        assert_eq!(bill.unmet()[0].origin, "Cornice");
        assert_eq!(bill.unmet()[0].count, 2);
        assert_eq!(bill.pieces(MaterialClass::Trim), 0);
    }

    #[test]
    fn test_accessories_from_aggregates() {
        let mut aggregator = MaterialAggregator::new(default_accessories());
        aggregator.add_room(&Room::new("Kitchen", 3.5, 4.2));
        aggregator.add_requirement(&slat_plan(4.2, 18, 5.0));
        let bill = aggregator.finish();

        // 15.4 m perimeter at one fastener per 0.5 m
        assert_eq!(bill.accessory("baseboard fastener"), Some(31));
        // 75.6 m of slats at one fastener per 0.6 m
        assert_eq!(bill.accessory("slat fastener"), Some(126));
        // 14.7 m² at one channel per 1.2 m²
        assert_eq!(bill.accessory("support channel"), Some(13));
        assert_eq!(bill.accessory("end cap"), Some(18));
        assert_eq!(bill.accessory("unknown"), None);
    }

    #[test]
    fn test_invalid_entries() {
        let mut aggregator = MaterialAggregator::new(Vec::new());
        aggregator.record_invalid("room 'Attic'", "invalid dimensions (0 x 3)");
        let bill = aggregator.finish();
        assert!(!bill.is_complete());
        assert_eq!(bill.invalid()[0].subject, "room 'Attic'");
    }
}
