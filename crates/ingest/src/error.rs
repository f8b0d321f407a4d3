use std::fmt;

/// Structural parse failures. Row-level anomalies never surface here;
/// a bad cell coerces to zero/absent and is counted by the caller's report.
#[derive(Debug)]
pub enum ParseError {
    /// Input buffer empty or too short to be a spreadsheet.
    EmptyInput { bytes: usize },
    /// The workbook could not be opened at all.
    Workbook(String),
    /// Requested sheet is not in the workbook.
    MissingSheet { sheet: String, available: Vec<String> },
    /// Sheet exists but holds no usable data rows.
    EmptySheet { sheet: String },
    /// Required column absent from the header row.
    MissingColumn { sheet: String, column: String },
    /// TOML config parse / deserialization error.
    Config(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput { bytes } => {
                write!(f, "input is not a spreadsheet ({bytes} bytes received)")
            }
            Self::Workbook(msg) => write!(f, "workbook error: {msg}"),
            Self::MissingSheet { sheet, available } => {
                write!(f, "sheet '{sheet}' not found (available: {})", available.join(", "))
            }
            Self::EmptySheet { sheet } => write!(f, "sheet '{sheet}' has no usable rows"),
            Self::MissingColumn { sheet, column } => {
                write!(f, "sheet '{sheet}': missing column '{column}'")
            }
            Self::Config(msg) => write!(f, "config parse error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ParseError {}
