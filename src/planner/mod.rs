//! Perimeter planning through the shared offcut pool.

mod instruction;
mod perimeter;
mod pool;

pub use instruction::{group_instructions, BarUsage, CutInstruction, ReusedPiece};
pub use perimeter::{PerimeterCuttingPlanner, PerimeterPlan};
pub use pool::{Consumption, Offcut, OffcutPool};
