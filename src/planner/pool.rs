//! Project-scoped pool of reusable offcuts.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{OFFCUT_THRESHOLD, TOLERANCE};

/// Leftover piece of a cut bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offcut {
    /// Pool-assigned identifier, kept while the offcut shrinks.
    pub id: u32,
    /// Current length in meters.
    pub length: f64,
    /// Room or requirement the offcut was cut in.
    pub origin: String,
}

/// Result of taking material from the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Consumption {
    /// The offcut as it was before consumption.
    pub offcut: Offcut,
    /// Length taken.
    pub taken: f64,
    /// Length left in the pool, `None` if the offcut was removed.
    pub remaining: Option<f64>,
    /// Length discarded because it fell below the usability threshold.
    pub scrap: f64,
}

/// Ordered collection of offcuts shared by all rooms of one project.
///
/// Consumption scans in insertion order and takes the first offcut long
/// enough; results depend on the order rooms are processed in.
#[derive(Debug, Clone)]
pub struct OffcutPool {
    offcuts: Vec<Offcut>,
    threshold: f64,
    tolerance: f64,
    next_id: u32,
    produced: f64,
    consumed: f64,
    scrapped: f64,
}

impl Default for OffcutPool {
    fn default() -> Self {
        Self::new(OFFCUT_THRESHOLD, TOLERANCE)
    }
}

impl OffcutPool {
    /// Create an empty pool.
    pub fn new(threshold: f64, tolerance: f64) -> Self {
        Self {
            offcuts: Vec::new(),
            threshold,
            tolerance,
            next_id: 1,
            produced: 0.0,
            consumed: 0.0,
            scrapped: 0.0,
        }
    }

    /// Usability threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Offcuts currently available, in insertion order.
    pub fn offcuts(&self) -> &[Offcut] {
        &self.offcuts
    }

    /// Number of offcuts in the pool.
    pub fn len(&self) -> usize {
        self.offcuts.len()
    }

    /// Check if the pool holds no offcuts.
    pub fn is_empty(&self) -> bool {
        self.offcuts.is_empty()
    }

    /// Sum of all offcut lengths in the pool.
    pub fn total_length(&self) -> f64 {
        self.offcuts.iter().map(|o| o.length).sum()
    }

    /// Total length ever accepted into the pool.
    pub fn total_produced(&self) -> f64 {
        self.produced
    }

    /// Total length taken out of the pool.
    pub fn total_consumed(&self) -> f64 {
        self.consumed
    }

    /// Total length discarded as scrap after consumption.
    pub fn total_scrapped(&self) -> f64 {
        self.scrapped
    }

    /// Add leftover material. Returns the offcut id if it was kept.
    pub fn produce(&mut self, length: f64, origin: impl Into<String>) -> Option<u32> {
        if !(length > self.threshold) {
            debug!(length, "Offcut below threshold discarded");
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        let origin = origin.into();
        debug!(id, length, origin = %origin, "Offcut produced");

        self.offcuts.push(Offcut { id, length, origin });
        self.produced += length;
        Some(id)
    }

    /// Take `required` meters from the first offcut long enough.
    pub fn try_consume(&mut self, required: f64) -> Option<Consumption> {
        if !(required > 0.0) {
            return None;
        }

        let idx = self
            .offcuts
            .iter()
            .position(|o| o.length + self.tolerance >= required)?;

        let before = self.offcuts[idx].clone();
        let taken = required.min(before.length);
        let left = (before.length - taken).max(0.0);
        self.consumed += taken;

        let (remaining, scrap) = if left <= self.threshold {
            self.offcuts.remove(idx);
            self.scrapped += left;
            (None, left)
        } else {
            self.offcuts[idx].length = left;
            (Some(left), 0.0)
        };

        debug!(
            id = before.id,
            required,
            left,
            removed = remaining.is_none(),
            "Offcut consumed"
        );

        Some(Consumption {
            offcut: before,
            taken,
            remaining,
            scrap,
        })
    }
}
