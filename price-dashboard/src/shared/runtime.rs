/// Background tasks feeding the render loop
///
/// Each task owns a handle to the backend and reports its outcome as an
/// [`AppEvent`]. Errors are turned into user-facing text here, so the loop
/// only ever sees plain messages.
use crate::shared::client::{PredictionBackend, UploadFile};
use crate::shared::error::{CSV_FAILED, PREDICTION_FAILED, REPORT_FAILED, UPLOAD_FAILED};
use crate::shared::export::{write_csv, write_report};
use crate::shared::state::{AppEvent, ExportKind};
use crate::shared::types::{PredictionResult, Record};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Check `/health` immediately and then every `interval` until the
/// receiver goes away or the handle is aborted
pub fn spawn_health_poll(
    backend: Arc<dyn PredictionBackend>,
    interval: Duration,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let healthy = match backend.health().await {
                Ok(()) => true,
                Err(e) => {
                    debug!("Health check failed: {}", e);
                    false
                }
            };
            if tx.send(AppEvent::HealthChecked(healthy)).await.is_err() {
                break;
            }
        }
    })
}

/// Fetch model metadata once. Failure is logged and otherwise ignored.
pub fn spawn_model_info_fetch(
    backend: Arc<dyn PredictionBackend>,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match backend.model_info().await {
            Ok(info) => match info.feature_importance {
                Some(importance) if !importance.is_empty() => {
                    let _ = tx.send(AppEvent::ModelInfoLoaded(importance)).await;
                }
                _ => debug!("Model info carried no feature importance"),
            },
            Err(e) => warn!("Failed to fetch model info: {}", e),
        }
    })
}

/// Read and upload `path`, tagging the outcome with `generation`
pub fn spawn_upload(
    backend: Arc<dyn PredictionBackend>,
    path: PathBuf,
    generation: u64,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = match UploadFile::read(&path).await {
            Ok(upload) => backend.predict_file(upload).await,
            Err(e) => Err(e),
        };
        let outcome = outcome.map_err(|e| {
            error!("Upload of {} failed: {}", path.display(), e);
            e.user_message(UPLOAD_FAILED)
        });
        let _ = tx.send(AppEvent::UploadFinished { generation, outcome }).await;
    })
}

pub fn spawn_single_prediction(
    backend: Arc<dyn PredictionBackend>,
    draft: Record,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = backend.predict_single(&draft).await.map_err(|e| {
            error!("Single prediction failed: {}", e);
            e.user_message(PREDICTION_FAILED)
        });
        let _ = tx.send(AppEvent::SinglePredictionFinished(outcome)).await;
    })
}

/// Write an export of `result` into `dir`
pub fn spawn_export(
    kind: ExportKind,
    result: PredictionResult,
    dir: PathBuf,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = match kind {
            ExportKind::Csv => write_csv(&result.rows, &dir).await,
            ExportKind::Report => {
                let generated_at = chrono::Local::now().naive_local();
                write_report(&result, generated_at, &dir).await
            }
        };
        let outcome = outcome.map_err(|e| {
            error!("{} export failed: {}", kind.label(), e);
            match kind {
                ExportKind::Csv => CSV_FAILED.to_string(),
                ExportKind::Report => REPORT_FAILED.to_string(),
            }
        });
        let _ = tx.send(AppEvent::ExportFinished { kind, outcome }).await;
    })
}
