//! Per-attempt audit trail.

use tracing::info;

/// Ordered, append-only log of one fulfillment attempt.
///
/// Every line is also emitted as a tracing event so it lands in the
/// process log under the attempt's span.
#[derive(Debug, Default)]
pub struct OrderLog {
    lines: Vec<String>,
}

impl OrderLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        info!(target: "glowup::order", "{}", line);
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
