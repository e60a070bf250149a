//! Error types for report generation.
//!
//! Only fatal conditions live here. An empty dataset or an undefined
//! conditional statistic is absorbed where it occurs and never reaches the
//! caller as an error.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    /// A column named by the fault configuration is absent from the dataset.
    #[error("required column '{0}' is missing from the dataset")]
    MissingColumn(String),

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("column '{column}' has {actual} values but the index has {expected} timestamps")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Timestamp at `row` is not strictly after the one before it.
    #[error("timestamps must be strictly increasing (row {row})")]
    NonIncreasingTimestamps { row: usize },

    /// The flag column violates the 0/1 contract of the rule engine.
    #[error("flag column '{column}' holds {value} at row {row}; expected 0 or 1")]
    InvalidFlagValue {
        column: String,
        row: usize,
        value: f64,
    },

    #[error("figure size {width}x{height} is too small to draw on")]
    UnsupportedFigureSize { width: u32, height: u32 },

    #[error("could not parse timestamps in column '{0}'")]
    UnparseableTimestamps(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("data frame error: {0}")]
    Frame(#[from] polars::error::PolarsError),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ReportError>;
