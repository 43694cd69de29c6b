//! Project aggregation into a bill of materials.

mod bom;
mod estimate;

pub use bom::*;
pub use estimate::*;
