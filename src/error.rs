//! Error types for detect-bench operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for detect-bench operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running or scoring a contest.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An image file name could not be parsed as a numeric identifier.
    #[error("Malformed catalog entry: {path}: file name is not a numeric identifier")]
    MalformedCatalogEntry {
        /// Path of the offending image.
        path: PathBuf,
    },

    /// The image directory could not be listed.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Failed to decode an image of the current batch.
    #[error("Image decode failed: {path}: {reason}")]
    ImageDecode {
        /// Path to the image that failed to decode.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// The detector returned a different number of entries than it was given.
    #[error("{provided} images provided, but {returned} object locations returned")]
    ResultCountMismatch {
        /// Number of images in the batch.
        provided: usize,
        /// Number of entries returned by the detector.
        returned: usize,
    },

    /// Accumulated results do not cover the catalog exactly.
    #[error("Result length ({actual}) not equal to number of images ({expected}){}", describe_missing(.missing))]
    IncompleteResults {
        /// Number of images in the catalog.
        expected: usize,
        /// Number of result entries.
        actual: usize,
        /// A few catalog file names without a result entry.
        missing: Vec<String>,
    },

    /// The report document does not exist.
    #[error("Missing results: {0}")]
    MissingReport(PathBuf),

    /// The report document could not be parsed.
    #[error("Corrupt report {path}: {reason}")]
    CorruptReport {
        /// Path to the report.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The teams folder does not exist or is not a directory.
    #[error("Teams folder is not a directory: {0}")]
    MissingTeams(PathBuf),

    /// The label directory does not exist.
    #[error("Missing label directory: {0}")]
    MissingLabels(PathBuf),

    /// A label file could not be parsed.
    #[error("Corrupt label file {path}: {reason}")]
    CorruptLabel {
        /// Path to the label file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The detector callback reported a failure.
    #[error("Detector error: {0}")]
    Detector(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The harness was driven outside its state machine.
    #[error("Harness is {0}, expected idle")]
    HarnessState(&'static str),

    /// Power instrumentation failed.
    #[error("Energy instrumentation error: {0}")]
    Energy(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn describe_missing(missing: &[String]) -> String {
    if missing.is_empty() {
        String::new()
    } else {
        format!(", e.g. missing {}", missing.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_mismatch_message() {
        let err = Error::ResultCountMismatch { provided: 2, returned: 1 };
        assert_eq!(err.to_string(), "2 images provided, but 1 object locations returned");
    }

    #[test]
    fn test_incomplete_results_message() {
        let err = Error::IncompleteResults {
            expected: 3,
            actual: 2,
            missing: vec!["3.jpg".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Result length (2) not equal to number of images (3), e.g. missing 3.jpg"
        );
    }
}
