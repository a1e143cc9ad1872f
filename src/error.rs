//! Error types shared by every pipeline stage.

use std::path::PathBuf;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The dataset identifier is not in the catalog.
    #[error("unknown dataset '{id}' (available: {})", .known.join(", "))]
    DatasetNotFound { id: String, known: Vec<String> },

    /// A required column is missing from the source header.
    #[error("dataset '{dataset}' is missing required column '{column}'")]
    MissingColumn { dataset: String, column: &'static str },

    /// A cell could not be parsed into the expected type.
    #[error("row {row}: column '{column}' has malformed value '{value}'")]
    MalformedValue {
        row: u64,
        column: &'static str,
        value: String,
    },

    /// A statistic that needs at least one record received none.
    #[error("no trips match the selected filters, cannot compute {statistic}")]
    EmptyDataset { statistic: &'static str },

    /// A month or weekday token outside the accepted vocabulary.
    #[error("invalid {axis} '{value}' (expected one of: {expected})")]
    InvalidFilter {
        axis: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the interactive terminal failed.
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for the errors that mean the source data itself is unusable.
    pub fn is_data_format(&self) -> bool {
        matches!(self, Error::MissingColumn { .. } | Error::MalformedValue { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_not_found_lists_known_ids() {
        let err = Error::DatasetNotFound {
            id: "paris".to_string(),
            known: vec!["chicago".to_string(), "washington".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown dataset 'paris' (available: chicago, washington)"
        );
    }

    #[test]
    fn test_is_data_format() {
        let missing = Error::MissingColumn {
            dataset: "chicago".to_string(),
            column: "Start Time",
        };
        let empty = Error::EmptyDataset { statistic: "mean" };
        assert!(missing.is_data_format());
        assert!(!empty.is_data_format());
    }
}
