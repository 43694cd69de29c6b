//! Input validation.

mod validate;

pub use validate::*;
