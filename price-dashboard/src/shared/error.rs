use std::path::PathBuf;
use thiserror::Error;

/// Alert text when an upload fails without a server message
pub const UPLOAD_FAILED: &str = "Error uploading file. Please try again.";
/// Inline simulator error when a single prediction fails without a server message
pub const PREDICTION_FAILED: &str = "Prediction failed";
/// Alert text for any report generation failure
pub const REPORT_FAILED: &str = "Failed to generate PDF. Please try again.";
/// Alert text for a failed CSV export
pub const CSV_FAILED: &str = "Failed to export CSV. Please try again.";

/// All errors generated in `price-dashboard`.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server error ({status}): {message}")]
    Server {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file type: {0} (expected .csv or .json)")]
    UnsupportedFile(String),

    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("nothing to export: no prediction rows loaded")]
    NothingToExport,

    #[error("report generation failed: {0}")]
    Report(String),
}

impl DashboardError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Message shown to the user: the server's own `error` text when it sent
    /// one, the caller's generic fallback otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            DashboardError::Server { message, .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}
