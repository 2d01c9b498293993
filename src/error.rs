//! Error types for dataset loading and view aggregation.
//!
//! Load and schema failures abort the whole render. A view that ends up
//! with no groups only marks that view as unavailable.

use crate::models::ViewKind;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading the order dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file is missing or unreadable.
    #[error("failed to open dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid delimited text.
    #[error("failed to parse dataset {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// One or more required columns are absent from the header row.
    #[error("dataset is missing required column(s): {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// A cell that must hold an integer could not be parsed.
    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Failure of a single view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// The grouping produced zero groups.
    #[error("insufficient data for the {view} view")]
    NoData { view: ViewKind },
}
