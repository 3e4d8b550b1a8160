//! Error taxonomy for loading and aggregating the tracker workbook.
//!
//! Only conditions that leave no usable table are errors. Blank rows and
//! malformed cells are absorbed by the cleaner and never reach this type.

use std::path::PathBuf;

/// Fatal failures surfaced to the caller. No partial result accompanies them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The spreadsheet file does not exist.
    #[error("spreadsheet not found: {}", .path.display())]
    SourceMissing { path: PathBuf },

    /// The file exists but could not be opened or parsed as a workbook.
    #[error("failed to read workbook {}: {source}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// The primary data sheet is not in the workbook.
    #[error("sheet '{sheet}' not found (available: {})", .available.join(", "))]
    SheetMissing {
        sheet: String,
        available: Vec<String>,
    },

    /// A recognized column is absent from the header row.
    #[error("column '{column}' not found in header row")]
    ColumnMissing { column: String },

    /// A severity scheme whose bands do not partition the real line.
    #[error("invalid severity scheme: {0}")]
    InvalidScheme(String),
}

pub type Result<T> = std::result::Result<T, Error>;
