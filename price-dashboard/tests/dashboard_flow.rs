//! End-to-end dashboard flow against a scripted backend.
//!
//! Drives key presses, background tasks and event folding the same way the
//! binary's render loop does, without a network or a real terminal.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use price_dashboard::shared::client::decode_body;
use price_dashboard::shared::runtime::{spawn_export, spawn_health_poll, spawn_upload};
use price_dashboard::shared::table::{format_cell, table_columns};
use price_dashboard::{
    handle_key, render_dashboard, AppEvent, BackendStatus, Command, Dashboard, DashboardError,
    ExportKind, ModelInfo, PredictionBackend, PredictionResult, Record, SinglePrediction, Tab,
    UploadFile, PREDICTION_COLUMN,
};
use ratatui::{backend::TestBackend, Terminal};
use serde_json::{json, Value};
use tempfile::tempdir;
use tokio::sync::mpsc;

/// Backend whose `/predict` answer arrives double-encoded
struct FlakyThenHealthy {
    health_calls: std::sync::atomic::AtomicUsize,
}

#[async_trait]
impl PredictionBackend for FlakyThenHealthy {
    async fn health(&self) -> Result<(), DashboardError> {
        let call = self
            .health_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if call == 0 {
            Err(DashboardError::Status(reqwest::StatusCode::BAD_GATEWAY))
        } else {
            Ok(())
        }
    }

    async fn model_info(&self) -> Result<ModelInfo, DashboardError> {
        Ok(ModelInfo::default())
    }

    async fn predict_file(&self, _upload: UploadFile) -> Result<PredictionResult, DashboardError> {
        let body = json!({
            "data": [
                {"longitude": -122.23, "latitude": 37.88, "median_income": 8.3252, "ocean_proximity": "NEAR BAY", "predicted_price": 452600.0},
                {"longitude": -122.22, "latitude": 37.86, "median_income": 8.3014, "ocean_proximity": "NEAR BAY", "predicted_price": 358500.0},
                {"longitude": -118.24, "latitude": 34.05, "median_income": 2.0804, "ocean_proximity": "<1H OCEAN", "predicted_price": 980000.0}
            ],
            "graphs": {"summary_stats": {"total_properties": 3, "avg_price": 597033.0, "min_price": 358500.0, "max_price": 980000.0}},
            "outlier_indices": [2],
            "confidence_margins": [25000.0, 21000.0, 90000.0],
            "message": "Predictions generated"
        });
        let twice = Value::String(Value::String(body.to_string()).to_string()).to_string();
        Ok(PredictionResult::from_value(decode_body(&twice)))
    }

    async fn predict_single(&self, _draft: &Record) -> Result<SinglePrediction, DashboardError> {
        Err(DashboardError::Status(reqwest::StatusCode::NOT_IMPLEMENTED))
    }
}

fn press(dashboard: &mut Dashboard, code: KeyCode) -> Option<Command> {
    handle_key(dashboard, KeyEvent::new(code, KeyModifiers::NONE))
}

#[tokio::test]
async fn upload_sort_export_flow() {
    let backend: Arc<dyn PredictionBackend> = Arc::new(FlakyThenHealthy {
        health_calls: Default::default(),
    });
    let (tx, mut rx) = mpsc::channel(16);
    let mut dashboard = Dashboard::new();

    // Connectivity: disconnected first, then connected on the next poll
    let health = spawn_health_poll(Arc::clone(&backend), Duration::from_millis(5), tx.clone());
    dashboard.apply(rx.recv().await.unwrap());
    assert_eq!(dashboard.status, BackendStatus::Disconnected);
    dashboard.apply(rx.recv().await.unwrap());
    assert_eq!(dashboard.status, BackendStatus::Connected);
    health.abort();
    while let Ok(event) = rx.try_recv() {
        dashboard.apply(event);
    }

    // Upload through the path prompt
    let scratch = tempdir().unwrap();
    let dir = scratch.path().to_path_buf();
    let dataset = dir.join("housing.csv");
    std::fs::write(&dataset, "longitude,latitude\n-122.23,37.88\n").unwrap();

    press(&mut dashboard, KeyCode::Char('u'));
    for c in dataset.to_string_lossy().chars() {
        press(&mut dashboard, KeyCode::Char(c));
    }
    let Some(Command::Upload { path, generation }) = press(&mut dashboard, KeyCode::Enter) else {
        panic!("expected an upload command");
    };
    assert!(dashboard.busy);

    spawn_upload(Arc::clone(&backend), path, generation, tx.clone())
        .await
        .unwrap();
    dashboard.apply(rx.recv().await.unwrap());

    assert!(!dashboard.busy);
    assert_eq!(dashboard.active_tab, Tab::Overview);
    assert_eq!(dashboard.rows().len(), 3);
    assert_eq!(dashboard.notice.as_deref(), Some("Predictions generated"));

    // Sort by prediction descending; the outlier keeps its flag and margin
    press(&mut dashboard, KeyCode::Char('2'));
    press(&mut dashboard, KeyCode::Char('s'));
    press(&mut dashboard, KeyCode::Char('s'));
    let result = dashboard.result.clone().unwrap();
    assert_eq!(table_columns(&result.rows)[0], PREDICTION_COLUMN);
    let order = dashboard.table.display_order(&result.rows);
    assert_eq!(order, vec![2, 0, 1]);
    assert!(result.is_outlier(order[0]));
    assert_eq!(format_cell(&result, order[0], PREDICTION_COLUMN), "$980,000 ±$90,000");

    // Render every tab without a terminal
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    for tab in Tab::ALL {
        dashboard.active_tab = tab;
        terminal.draw(|f| render_dashboard(f, &dashboard)).unwrap();
    }

    // CSV export keeps the backend's row order and key order
    let Some(Command::Export(kind)) = press(&mut dashboard, KeyCode::Char('e')) else {
        panic!("expected an export command");
    };
    assert_eq!(kind, ExportKind::Csv);
    spawn_export(kind, result, dir.clone(), tx.clone()).await.unwrap();
    let event = rx.recv().await.unwrap();
    assert!(matches!(
        event,
        AppEvent::ExportFinished {
            kind: ExportKind::Csv,
            outcome: Ok(_)
        }
    ));
    dashboard.apply(event);
    assert!(dashboard.notice.as_deref().unwrap().starts_with("Saved CSV"));

    let csv = std::fs::read_to_string(dir.join("house_predictions.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("longitude,latitude,median_income,ocean_proximity,predicted_price")
    );
    assert_eq!(lines.next(), Some("-122.23,37.88,8.3252,NEAR BAY,452600"));
}
