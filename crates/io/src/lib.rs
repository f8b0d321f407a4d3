// File I/O operations

pub mod csv;
pub mod store;
pub mod xlsx;

/// Statistics from one import.
#[derive(Debug, Default)]
pub struct ParseReport {
    /// Sheets that yielded data
    pub sheets_read: usize,
    /// Rows mapped into spend rows
    pub rows_read: usize,
    /// Blank or unmappable rows
    pub rows_skipped: usize,
    /// Actionable warnings (not boilerplate)
    pub warnings: Vec<String>,
    /// Total import duration in milliseconds
    pub duration_ms: u128,
}

impl ParseReport {
    /// Returns a summary message suitable for display
    pub fn summary(&self) -> String {
        format!(
            "{} sheet{} · {} rows · {} skipped",
            self.sheets_read,
            if self.sheets_read == 1 { "" } else { "s" },
            self.rows_read,
            self.rows_skipped
        )
    }

    /// Returns true if there are actionable warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns a single-line warning summary for status display
    pub fn warning_summary(&self) -> Option<String> {
        if self.warnings.is_empty() {
            None
        } else {
            Some(self.warnings.join(", "))
        }
    }
}
