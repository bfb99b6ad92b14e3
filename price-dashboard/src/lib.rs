/// Price Dashboard - Shared Library
///
/// Terminal front end for a housing price prediction service. The binary
/// uploads a dataset, then explores the returned predictions across
/// overview, table, chart, map, insight and what-if simulator tabs.
///
/// The library includes:
/// - Lenient response types and the bounded JSON-string decoder
/// - An HTTP client behind the `PredictionBackend` trait
/// - Table, chart and map projections of a prediction result
/// - CSV and PDF export
/// - Dashboard state, key handling and ratatui widgets
pub mod shared;

// Re-export commonly used types for convenience
pub use shared::types::{
    FeatureImportance, Insight, ModelInfo, ModelMetrics, PredictionResult, Record, Severity,
    SinglePrediction, SummaryStats, PREDICTION_COLUMN,
};

pub use shared::client::{ApiClient, PredictionBackend, UploadFile};
pub use shared::config::DashboardConfig;
pub use shared::error::DashboardError;

// Dashboard runtime
pub use shared::keys::{handle_key, Command};
pub use shared::state::{AppEvent, BackendStatus, Dashboard, ExportKind, Tab};
pub use shared::widgets::render_dashboard;
