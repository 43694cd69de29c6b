//! Project file parser module.

mod project;

pub use project::{parse_project_file, parse_project_str};
