/// HTTP client for the prediction backend
///
/// Every response body passes through [`decode_body`], which undoes any
/// number of extra JSON string encodings up to [`MAX_DECODE_ATTEMPTS`].
use crate::shared::config::DashboardConfig;
use crate::shared::error::DashboardError;
use crate::shared::types::{ModelInfo, PredictionResult, Record, SinglePrediction};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Upper bound on string-to-JSON re-parses applied to a response body
pub const MAX_DECODE_ATTEMPTS: usize = 5;

/// File extensions the upload prompt accepts
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["csv", "json"];

/// Size limit advertised to the user; not enforced client-side
pub const ADVERTISED_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Re-parse a JSON string value until it is no longer a string, the parse
/// fails, or the attempt budget runs out.
pub fn unwrap_json_string(mut value: Value) -> Value {
    for _ in 0..MAX_DECODE_ATTEMPTS {
        let Value::String(text) = &value else {
            break;
        };
        match serde_json::from_str::<Value>(text) {
            Ok(inner) => value = inner,
            Err(_) => break,
        }
    }
    value
}

/// Decode a raw body. Text that is not JSON at all is kept as a JSON string.
pub fn decode_body(text: &str) -> Value {
    let value = serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()));
    unwrap_json_string(value)
}

/// Map a non-success response onto an error, keeping the server's `error` text
pub fn error_from_body(status: StatusCode, body: &Value) -> DashboardError {
    match body.get("error").and_then(Value::as_str) {
        Some(message) => DashboardError::Server {
            status,
            message: message.to_string(),
        },
        None => DashboardError::Status(status),
    }
}

/// True when the path carries one of the accepted upload extensions
pub fn is_accepted_upload(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

/// A dataset file ready to be sent as the `file` multipart field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Read a `.csv` / `.json` file from disk
    pub async fn read(path: &Path) -> Result<Self, DashboardError> {
        if !is_accepted_upload(path) {
            return Err(DashboardError::UnsupportedFile(path.display().to_string()));
        }
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DashboardError::io(path, e))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        Ok(Self { file_name, bytes })
    }
}

/// The four operations the dashboard consumes from the prediction service
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    /// Succeeds on any 2xx from `/health`
    async fn health(&self) -> Result<(), DashboardError>;

    /// Model metadata, most importantly the feature importance weights
    async fn model_info(&self) -> Result<ModelInfo, DashboardError>;

    /// Upload a dataset and receive predictions for every row
    async fn predict_file(&self, upload: UploadFile) -> Result<PredictionResult, DashboardError>;

    /// Predict one hand-edited record
    async fn predict_single(&self, draft: &Record) -> Result<SinglePrediction, DashboardError>;
}

/// `reqwest`-backed implementation of [`PredictionBackend`]
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: DashboardConfig,
}

impl ApiClient {
    pub fn new(config: DashboardConfig) -> Result<Self, DashboardError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    async fn read_body(response: reqwest::Response) -> Result<Value, DashboardError> {
        let status = response.status();
        let text = response.text().await?;
        let body = decode_body(&text);
        if status.is_success() {
            Ok(body)
        } else {
            let preview: String = text.chars().take(200).collect();
            debug!("Backend returned {}: {}", status, preview);
            Err(error_from_body(status, &body))
        }
    }
}

#[async_trait]
impl PredictionBackend for ApiClient {
    async fn health(&self) -> Result<(), DashboardError> {
        self.http
            .get(self.config.endpoint("/health"))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn model_info(&self) -> Result<ModelInfo, DashboardError> {
        let response = self.http.get(self.config.endpoint("/model-info")).send().await?;
        let body = Self::read_body(response).await?;
        serde_json::from_value(body).map_err(|e| DashboardError::Shape(e.to_string()))
    }

    async fn predict_file(&self, upload: UploadFile) -> Result<PredictionResult, DashboardError> {
        debug!("Uploading {} ({} bytes)", upload.file_name, upload.bytes.len());
        let part = Part::bytes(upload.bytes).file_name(upload.file_name);
        let form = Form::new().part("file", part);
        let response = self
            .http
            .post(self.config.endpoint("/predict"))
            .multipart(form)
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        Ok(PredictionResult::from_value(body))
    }

    async fn predict_single(&self, draft: &Record) -> Result<SinglePrediction, DashboardError> {
        let response = self
            .http
            .post(self.config.endpoint("/predict-single"))
            .json(draft)
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        serde_json::from_value(body).map_err(|e| DashboardError::Shape(e.to_string()))
    }
}
