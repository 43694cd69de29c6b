//! Validation of project input before estimation.

use std::collections::HashSet;

use crate::config::{MAX_DIMENSION, MAX_REPEAT};
use crate::error::{EstimateError, Result};
use crate::model::{ExtraRequirement, Project, Room};

/// Validation result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Create a failing result with an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            errors: vec![message.into()],
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        if !other.passed {
            self.passed = false;
        }
    }

    /// All errors joined into one reason string.
    pub fn reason(&self) -> String {
        self.errors.join("; ")
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Validate a whole project.
pub fn validate_project(project: &Project) -> Result<ValidationResult> {
    if project.is_empty() {
        return Err(EstimateError::EmptyProject);
    }

    let mut result = ValidationResult::ok();
    let mut seen_ids = HashSet::new();

    for room in &project.rooms {
        result.merge(validate_room(room));
        if !room.id.is_empty() && !seen_ids.insert(room.id.as_str()) {
            result.add_warning(format!("Room '{}': duplicate id '{}'", room.name, room.id));
        }
    }

    for extra in &project.extra_requirements {
        result.merge(validate_extra(extra));
    }

    Ok(result)
}

/// Validate a single room. Failing rooms are excluded from estimation.
pub fn validate_room(room: &Room) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if !is_positive(room.width) || !is_positive(room.length) {
        result.add_error(format!(
            "Room '{}': invalid dimensions ({} x {})",
            room.name, room.width, room.length
        ));
    } else if room.width > MAX_DIMENSION || room.length > MAX_DIMENSION {
        result.add_error(format!(
            "Room '{}': dimensions {} x {} exceed {} m",
            room.name, room.width, room.length, MAX_DIMENSION
        ));
    }

    if let Some(row_width) = room.row_width {
        if !is_positive(row_width) {
            result.add_error(format!(
                "Room '{}': invalid row width {}",
                room.name, row_width
            ));
        } else if is_positive(room.width) && room.checked_rows().is_none() {
            result.add_error(format!(
                "Room '{}': row width {} gives more than {} slat rows",
                room.name, row_width, MAX_REPEAT
            ));
        } else if is_positive(room.width) && row_width > room.width {
            result.add_warning(format!(
                "Room '{}': row width {} is wider than the room",
                room.name, row_width
            ));
        }
    }

    if room.name.trim().is_empty() {
        result.add_warning(format!("Room '{}': missing name", room.id));
    }

    result
}

/// Validate an ad-hoc requirement.
pub fn validate_extra(extra: &ExtraRequirement) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if !is_positive(extra.length) {
        result.add_error(format!(
            "Requirement '{}': invalid length {}",
            extra.name, extra.length
        ));
    } else if extra.length > MAX_DIMENSION {
        result.add_error(format!(
            "Requirement '{}': length {} exceeds {} m",
            extra.name, extra.length, MAX_DIMENSION
        ));
    }
    if extra.quantity == 0 {
        result.add_error(format!("Requirement '{}': quantity is zero", extra.name));
    } else if extra.quantity > MAX_REPEAT {
        result.add_error(format!(
            "Requirement '{}': quantity {} exceeds {}",
            extra.name, extra.quantity, MAX_REPEAT
        ));
    }

    result
}
