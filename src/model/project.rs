//! Project input: rooms and ad-hoc requirements for one calculation run.

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, MaterialClass, MAX_REPEAT, TOLERANCE};

/// One room to be covered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Caller-assigned identifier.
    #[serde(default)]
    pub id: String,
    /// Display name, also used as offcut origin label.
    pub name: String,
    /// Room width in meters (slat rows run across it).
    pub width: f64,
    /// Room length in meters (length of each slat row).
    pub length: f64,
    /// Slat/board width used to derive the number of rows.
    #[serde(default, alias = "rowRepeatWidth")]
    pub row_width: Option<f64>,
}

impl Room {
    /// Create a room without slat rows.
    pub fn new(name: impl Into<String>, width: f64, length: f64) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            width,
            length,
            row_width: None,
        }
    }

    /// Set the slat row width.
    pub fn with_row_width(mut self, row_width: f64) -> Self {
        self.row_width = Some(row_width);
        self
    }

    /// Number of parallel slat rows, or 0 if the room has no row width.
    ///
    /// `None` when the row count is not finite or exceeds [`MAX_REPEAT`].
    pub fn checked_rows(&self) -> Option<u32> {
        match self.row_width {
            Some(row_width) if row_width > 0.0 => {
                let rows = ((self.width - TOLERANCE) / row_width).ceil().max(1.0);
                (rows.is_finite() && rows <= f64::from(MAX_REPEAT)).then_some(rows as u32)
            }
            _ => Some(0),
        }
    }

    /// Number of parallel slat rows; 0 if the room has no row width or
    /// [`Room::checked_rows`] rejects it.
    pub fn rows(&self) -> u32 {
        self.checked_rows().unwrap_or(0)
    }

    /// Ceiling area in m².
    pub fn area(&self) -> f64 {
        self.width * self.length
    }

    /// Wall perimeter in meters.
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width + self.length)
    }

    /// Perimeter walls in planning order: two widths, then two lengths.
    pub fn walls(&self) -> [f64; 4] {
        [self.width, self.width, self.length, self.length]
    }
}

fn default_quantity() -> u32 {
    1
}

/// Linear piece not tied to a room (profiles, trim).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraRequirement {
    /// Piece name.
    pub name: String,
    /// Required length in meters.
    pub length: f64,
    /// Number of identical pieces.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Catalog the piece is cut from.
    #[serde(default)]
    pub material: MaterialClass,
}

impl ExtraRequirement {
    /// Create a trim requirement.
    pub fn new(name: impl Into<String>, length: f64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            length,
            quantity,
            material: MaterialClass::Trim,
        }
    }

    /// Cut the piece from another catalog.
    pub fn with_material(mut self, material: MaterialClass) -> Self {
        self.material = material;
        self
    }
}

/// Full input of one calculation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project name.
    #[serde(default)]
    pub name: String,
    /// Rooms, processed strictly in this order.
    #[serde(default)]
    pub rooms: Vec<Room>,
    /// Ad-hoc pieces.
    #[serde(default, alias = "extraRequirements")]
    pub extra_requirements: Vec<ExtraRequirement>,
    /// Engine settings embedded in the project file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<EngineConfig>,
}

impl Project {
    /// Create an empty project.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Add an extra requirement.
    pub fn with_extra(mut self, extra: ExtraRequirement) -> Self {
        self.extra_requirements.push(extra);
        self
    }

    /// Check if there is anything to estimate.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty() && self.extra_requirements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_round_up() {
        assert_eq!(Room::new("A", 3.0, 4.0).with_row_width(0.2).rows(), 15);
        assert_eq!(Room::new("A", 3.05, 4.0).with_row_width(0.2).rows(), 16);
        assert_eq!(Room::new("A", 3.0, 4.0).rows(), 0);
    }

    #[test]
    fn test_rows_ignore_sub_tolerance_overhang() {
        // 3.005 m is 3 m within tolerance: no extra row.
        assert_eq!(Room::new("A", 3.005, 4.0).with_row_width(0.25).rows(), 12);
    }

    #[test]
    fn test_rows_out_of_range() {
        let room = Room::new("Hall", 3.0, 4.0).with_row_width(1e-12);
        assert_eq!(room.checked_rows(), None);
        assert_eq!(room.rows(), 0);
        assert_eq!(Room::new("Hall", 3.0, 4.0).checked_rows(), Some(0));
    }

    #[test]
    fn test_walls_order() {
        let room = Room::new("Kitchen", 3.5, 4.2);
        assert_eq!(room.walls(), [3.5, 3.5, 4.2, 4.2]);
        assert!((room.perimeter() - 15.4).abs() < 1e-9);
        assert!((room.area() - 14.7).abs() < 1e-9);
    }

    #[test]
    fn test_project_from_json_with_aliases() {
        let json = r#"{
            "name": "House",
            "rooms": [{ "id": "r1", "name": "Bath", "width": 2.0, "length": 3.0, "rowRepeatWidth": 0.2 }],
            "extraRequirements": [{ "name": "Door trim", "length": 2.1 }]
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.rooms[0].row_width, Some(0.2));
        assert_eq!(project.extra_requirements[0].quantity, 1);
        assert_eq!(project.extra_requirements[0].material, MaterialClass::Trim);
        assert!(project.config.is_none());
    }
}
