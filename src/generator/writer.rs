//! Line-oriented report writer.

/// Text buffer with section headings and indented items.
pub struct ReportWriter {
    /// Current indentation depth.
    depth: usize,
    /// Spaces per indentation level.
    indent: usize,
    /// Output buffer.
    buffer: String,
}

impl ReportWriter {
    /// Create a new report writer.
    pub fn new() -> Self {
        Self {
            depth: 0,
            indent: 2,
            buffer: String::new(),
        }
    }

    /// Get the generated text.
    pub fn output(&self) -> &str {
        &self.buffer
    }

    /// Take the generated text.
    pub fn take_output(self) -> String {
        self.buffer
    }

    /// Write a line at the current depth.
    pub fn write_line(&mut self, content: &str) {
        for _ in 0..self.depth * self.indent {
            self.buffer.push(' ');
        }
        self.buffer.push_str(content);
        self.buffer.push('\n');
    }

    /// Write an empty line.
    pub fn blank(&mut self) {
        self.buffer.push('\n');
    }

    /// Start a section at depth 0. Sections after the first are separated by a blank line.
    pub fn section(&mut self, title: &str) {
        self.depth = 0;
        if !self.buffer.is_empty() {
            self.blank();
        }
        self.write_line(&format!("== {} ==", title));
    }

    /// Write `key: value`.
    pub fn field(&mut self, key: &str, value: impl std::fmt::Display) {
        self.write_line(&format!("{}: {}", key, value));
    }

    /// Increase indentation.
    pub fn push_indent(&mut self) {
        self.depth += 1;
    }

    /// Decrease indentation.
    pub fn pop_indent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a length in meters with centimeter precision.
pub fn format_length(meters: f64) -> String {
    // Avoid printing "-0.00 m" for float noise around zero
    let meters = if meters.abs() < 0.005 { 0.0 } else { meters };
    format!("{:.2} m", meters)
}

/// Format a percentage with one decimal place.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}
