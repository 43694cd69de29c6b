//! Plain-text report generator module.

mod report;
mod writer;

pub use report::generate_report;
pub use writer::{format_length, format_percent, ReportWriter};
