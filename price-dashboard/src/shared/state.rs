/// Dashboard state owned by the render loop
///
/// Background tasks never touch this directly. They report back through
/// [`AppEvent`]s, which the loop folds in with [`Dashboard::apply`].
use crate::shared::table::{table_columns, TableState};
use crate::shared::simulator::SimulatorState;
use crate::shared::types::{FeatureImportance, PredictionResult, Record, SinglePrediction};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Backend reachability as shown in the header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendStatus {
    #[default]
    Checking,
    Connected,
    Disconnected,
}

impl BackendStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BackendStatus::Checking => "Checking...",
            BackendStatus::Connected => "Backend Connected",
            BackendStatus::Disconnected => "Backend Disconnected",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Overview,
    Table,
    Charts,
    Map,
    Insights,
    Simulator,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Overview,
        Tab::Table,
        Tab::Charts,
        Tab::Map,
        Tab::Insights,
        Tab::Simulator,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Table => "Data Table",
            Tab::Charts => "Charts",
            Tab::Map => "Map",
            Tab::Insights => "Insights",
            Tab::Simulator => "Simulator",
        }
    }

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Tab> {
        Tab::ALL.get(index).copied()
    }

    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Csv,
    Report,
}

impl ExportKind {
    pub fn label(&self) -> &'static str {
        match self {
            ExportKind::Csv => "CSV",
            ExportKind::Report => "PDF report",
        }
    }
}

/// Completion messages from background tasks
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    HealthChecked(bool),
    ModelInfoLoaded(FeatureImportance),
    UploadFinished {
        generation: u64,
        outcome: Result<PredictionResult, String>,
    },
    SinglePredictionFinished(Result<SinglePrediction, String>),
    ExportFinished {
        kind: ExportKind,
        outcome: Result<PathBuf, String>,
    },
}

/// The whole UI state: one current result plus view cursors
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub status: BackendStatus,
    pub result: Option<PredictionResult>,
    /// Cached importance figures; outlive individual uploads
    pub feature_importance: Option<FeatureImportance>,
    pub busy: bool,
    pub upload_generation: u64,
    pub active_tab: Tab,
    pub table: TableState,
    pub simulator: SimulatorState,
    /// Modal message, dismissed by any key
    pub alert: Option<String>,
    /// One-line status message
    pub notice: Option<String>,
    /// Path being typed into the upload prompt
    pub path_input: Option<String>,
    pub should_quit: bool,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the current result and enter the busy state. Returns the
    /// generation the finishing event must carry to be accepted.
    pub fn begin_upload(&mut self) -> u64 {
        self.upload_generation += 1;
        self.result = None;
        self.busy = true;
        self.notice = None;
        self.table = TableState::new();
        self.upload_generation
    }

    /// Rows of the current result, empty when nothing is loaded
    pub fn rows(&self) -> &[Record] {
        self.result.as_ref().map(|r| r.rows.as_slice()).unwrap_or(&[])
    }

    pub fn has_rows(&self) -> bool {
        !self.rows().is_empty()
    }

    pub fn column_count(&self) -> usize {
        table_columns(self.rows()).len()
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::HealthChecked(healthy) => {
                let status = if healthy {
                    BackendStatus::Connected
                } else {
                    BackendStatus::Disconnected
                };
                if status != self.status {
                    match status {
                        BackendStatus::Connected => info!("Backend connected"),
                        _ => warn!("Backend disconnected"),
                    }
                }
                self.status = status;
            }
            AppEvent::ModelInfoLoaded(importance) => {
                if !importance.is_empty() {
                    debug!("Loaded importance for {} features", importance.features.len());
                    self.feature_importance = Some(importance);
                }
            }
            AppEvent::UploadFinished {
                generation,
                outcome,
            } => {
                if generation != self.upload_generation {
                    debug!(
                        "Dropping stale upload result {} (current {})",
                        generation, self.upload_generation
                    );
                    return;
                }
                self.busy = false;
                match outcome {
                    Ok(result) => {
                        info!(
                            "Upload {} produced {} rows",
                            generation,
                            result.rows.len()
                        );
                        if let Some(importance) = &result.feature_importance {
                            self.feature_importance = Some(importance.clone());
                        }
                        self.notice = result.message.clone();
                        self.result = Some(result);
                        self.table = TableState::new();
                        self.active_tab = Tab::Overview;
                    }
                    Err(message) => {
                        warn!("Upload {} failed: {}", generation, message);
                        self.alert = Some(message);
                    }
                }
            }
            AppEvent::SinglePredictionFinished(outcome) => {
                if let Err(message) = &outcome {
                    warn!("Single prediction failed: {}", message);
                }
                self.simulator.finish(outcome);
            }
            AppEvent::ExportFinished { kind, outcome } => match outcome {
                Ok(path) => {
                    self.notice = Some(format!("Saved {} to {}", kind.label(), path.display()));
                }
                Err(message) => {
                    warn!("{} export failed: {}", kind.label(), message);
                    self.alert = Some(message);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result_with_rows(n: usize) -> PredictionResult {
        let rows: Vec<_> = (0..n).map(|i| json!({"predicted_price": i as f64})).collect();
        PredictionResult::from_value(json!({ "data": rows }))
    }

    #[test]
    fn test_health_transitions() {
        let mut dashboard = Dashboard::new();
        assert_eq!(dashboard.status.label(), "Checking...");

        dashboard.apply(AppEvent::HealthChecked(false));
        assert_eq!(dashboard.status, BackendStatus::Disconnected);

        dashboard.apply(AppEvent::HealthChecked(true));
        assert_eq!(dashboard.status, BackendStatus::Connected);
        assert_eq!(dashboard.status.label(), "Backend Connected");
    }

    #[test]
    fn test_upload_lifecycle() {
        let mut dashboard = Dashboard::new();
        dashboard.active_tab = Tab::Map;

        let generation = dashboard.begin_upload();
        assert!(dashboard.busy);
        assert!(dashboard.result.is_none());

        dashboard.apply(AppEvent::UploadFinished {
            generation,
            outcome: Ok(result_with_rows(3)),
        });
        assert!(!dashboard.busy);
        assert_eq!(dashboard.rows().len(), 3);
        assert_eq!(dashboard.active_tab, Tab::Overview);

        // A new upload clears the previous result before it finishes
        let generation = dashboard.begin_upload();
        assert!(!dashboard.has_rows());
        dashboard.apply(AppEvent::UploadFinished {
            generation,
            outcome: Err("Missing required columns".to_string()),
        });
        assert!(!dashboard.busy);
        assert!(dashboard.result.is_none());
        assert_eq!(dashboard.alert.as_deref(), Some("Missing required columns"));
    }

    #[test]
    fn test_only_latest_upload_is_shown() {
        let mut dashboard = Dashboard::new();
        let first = dashboard.begin_upload();
        let second = dashboard.begin_upload();

        dashboard.apply(AppEvent::UploadFinished {
            generation: second,
            outcome: Ok(result_with_rows(2)),
        });
        dashboard.apply(AppEvent::UploadFinished {
            generation: first,
            outcome: Ok(result_with_rows(9)),
        });

        assert_eq!(dashboard.rows().len(), 2);
        assert!(!dashboard.busy);
    }

    #[test]
    fn test_stale_upload_keeps_busy_state() {
        let mut dashboard = Dashboard::new();
        let first = dashboard.begin_upload();
        dashboard.begin_upload();

        dashboard.apply(AppEvent::UploadFinished {
            generation: first,
            outcome: Err("late".to_string()),
        });
        assert!(dashboard.busy);
        assert!(dashboard.alert.is_none());
    }

    #[test]
    fn test_feature_importance_carry_over() {
        let fetched = FeatureImportance {
            features: vec!["median_income".into()],
            importance: vec![0.7],
        };
        let mut dashboard = Dashboard::new();
        dashboard.apply(AppEvent::ModelInfoLoaded(fetched.clone()));

        // Response without importance keeps the fetched figures
        let generation = dashboard.begin_upload();
        dashboard.apply(AppEvent::UploadFinished {
            generation,
            outcome: Ok(result_with_rows(1)),
        });
        assert_eq!(dashboard.feature_importance, Some(fetched));

        // Response with importance overwrites them
        let generation = dashboard.begin_upload();
        let result = PredictionResult::from_value(json!({
            "data": [{"predicted_price": 1.0}],
            "feature_importance": {"features": ["latitude"], "importance": [0.4]}
        }));
        dashboard.apply(AppEvent::UploadFinished {
            generation,
            outcome: Ok(result),
        });
        assert_eq!(
            dashboard.feature_importance.as_ref().map(|f| f.features.clone()),
            Some(vec!["latitude".to_string()])
        );
    }

    #[test]
    fn test_export_outcomes() {
        let mut dashboard = Dashboard::new();
        dashboard.apply(AppEvent::ExportFinished {
            kind: ExportKind::Csv,
            outcome: Ok(PathBuf::from("./house_predictions.csv")),
        });
        assert_eq!(
            dashboard.notice.as_deref(),
            Some("Saved CSV to ./house_predictions.csv")
        );

        dashboard.apply(AppEvent::ExportFinished {
            kind: ExportKind::Report,
            outcome: Err("Failed to generate PDF. Please try again.".to_string()),
        });
        assert_eq!(
            dashboard.alert.as_deref(),
            Some("Failed to generate PDF. Please try again.")
        );
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Overview.next(), Tab::Table);
        assert_eq!(Tab::Overview.prev(), Tab::Simulator);
        assert_eq!(Tab::Simulator.next(), Tab::Overview);
        assert_eq!(Tab::from_index(3), Some(Tab::Map));
        assert_eq!(Tab::from_index(6), None);
    }
}
