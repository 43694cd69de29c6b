//! JSON project file parser.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EstimateError, Result};
use crate::model::Project;

/// Parse a project from JSON text.
pub fn parse_project_str(content: &str) -> Result<Project> {
    let project: Project = serde_json::from_str(content)?;
    debug!(
        project = %project.name,
        rooms = project.rooms.len(),
        extras = project.extra_requirements.len(),
        "Parsed project"
    );
    Ok(project)
}

/// Parse a project file from disk.
pub fn parse_project_file(path: &Path) -> Result<Project> {
    if !path.exists() {
        return Err(EstimateError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(EstimateError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    parse_project_str(&content)
}
