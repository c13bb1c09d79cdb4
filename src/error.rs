//! Error handling.

use ndarray::ShapeError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{event, Level};

/// Volume explorer error type
///
/// This type encapsulates the structural failures that are surfaced to the caller. Recoverable
/// numeric edge cases (ambiguous orientation, empty selections, all-NaN data) never produce an
/// error; they are absorbed with a logged warning and a safe default.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// Axis index outside the volume's dimensions
    #[error("axis {axis} is out of range for a volume with {ndim} dimensions")]
    AxisOutOfRange { axis: usize, ndim: usize },

    /// The same axis appears more than once in an axis list
    #[error("axis {axis} was given more than once")]
    DuplicateAxis { axis: usize },

    /// Dataset could not be obtained from the loader
    #[error("dataset {dataset} is unavailable")]
    DatasetUnavailable { dataset: String },

    /// Number of indices or ranges does not match the volume's dimensions
    #[error("expected {expected} {what} but got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Session data was requested to be saved with bulk array data
    #[error("array data cannot be included in a session file")]
    DataNotPersistable,

    /// Error reading or writing a file
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error (de)serialising JSON
    #[error("failed to (de)serialise JSON")]
    Json(#[from] serde_json::Error),

    /// Error creating an ndarray view of a different shape
    #[error("failed to create array from shape")]
    ShapeInvalid(#[from] ShapeError),

    /// Named plot does not exist in the session
    #[error("unknown plot {name}")]
    UnknownPlot { name: String },

    /// Volume has an unsupported number of dimensions
    #[error("unsupported volume with {ndim} dimensions")]
    UnsupportedVolume { ndim: usize },

    /// Error validating a plot state
    #[error("plot state is not valid")]
    Validation(#[from] validator::ValidationErrors),
}

impl ExplorerError {
    /// Return an [ExplorerError::Io] for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the process exit code used by the command line interface for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Caller supplied bad input
            Self::AxisOutOfRange { .. }
            | Self::DuplicateAxis { .. }
            | Self::DimensionMismatch { .. }
            | Self::DataNotPersistable
            | Self::Json(_)
            | Self::ShapeInvalid(_)
            | Self::UnknownPlot { .. }
            | Self::UnsupportedVolume { .. }
            | Self::Validation(_) => 2,

            // Environment failure
            Self::DatasetUnavailable { .. } | Self::Io { .. } => 1,
        }
    }
}

/// Report of an error and the chain of errors that caused it
///
/// Implements serde (de)serialise.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct ErrorReport {
    /// Main error message
    pub message: String,

    /// Optional list of causes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caused_by: Option<Vec<String>>,
}

impl ErrorReport {
    /// Return a new ErrorReport
    ///
    /// # Arguments
    ///
    /// * `error`: The error that occurred
    pub fn new<E>(error: &E) -> Self
    where
        E: std::error::Error,
    {
        let message = error.to_string();
        let mut caused_by = None;
        let mut current = error.source();
        while let Some(source) = current {
            let mut causes: Vec<String> = caused_by.unwrap_or_default();
            causes.push(source.to_string());
            caused_by = Some(causes);
            current = source.source();
        }
        // Remove duplicate entries.
        if let Some(caused_by) = caused_by.as_mut() {
            caused_by.dedup()
        }
        ErrorReport { message, caused_by }
    }
}

impl From<&ExplorerError> for ErrorReport {
    /// Convert from an `ExplorerError` into an `ErrorReport`, logging the error chain.
    fn from(error: &ExplorerError) -> Self {
        event!(Level::ERROR, "{}", error.to_string());
        let mut current = error.source();
        while let Some(source) = current {
            event!(Level::ERROR, "Caused by: {}", source.to_string());
            current = source.source();
        }
        ErrorReport::new(error)
    }
}
