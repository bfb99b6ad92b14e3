/// Core data types for prediction responses
///
/// These types match the JSON bodies returned by the prediction backend's
/// `/predict`, `/predict-single` and `/model-info` endpoints. Every section
/// is parsed leniently: a malformed section becomes absent instead of
/// failing the whole response.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// One property record: feature name to value, in the backend's key order
pub type Record = Map<String, Value>;

/// Column holding the model's price prediction on every record
pub const PREDICTION_COLUMN: &str = "predicted_price";

/// Aggregate values describing the predicted prices of a result set
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SummaryStats {
    #[serde(default)]
    pub total_properties: Option<u64>,
    #[serde(default)]
    pub avg_price: Option<f64>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub median_price: Option<f64>,
}

/// Price distribution buckets, in the order the backend chose
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Histogram {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Income (x) against predicted price (y), index-aligned
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ScatterSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default)]
    pub x_label: Option<String>,
    #[serde(default)]
    pub y_label: Option<String>,
}

/// Model quality figures from the held-out comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct ModelMetrics {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
}

/// Held-out predictions paired with their true values
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PredictedVsActual {
    pub predicted: Vec<f64>,
    pub actual: Vec<f64>,
}

/// Per-feature importance weights, index-aligned
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FeatureImportance {
    pub features: Vec<String>,
    pub importance: Vec<f64>,
}

impl FeatureImportance {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Severity tag of a narrative insight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Unknown tags fall back to `Info`
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "success" => Severity::Success,
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            _ => Severity::Info,
        }
    }
}

/// Server-generated narrative item
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Insight {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

impl Insight {
    pub fn severity(&self) -> Severity {
        Severity::from_tag(&self.kind)
    }
}

/// Response of `/predict-single`
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct SinglePrediction {
    pub predicted_price: f64,
    #[serde(default)]
    pub confidence_low: Option<f64>,
    #[serde(default)]
    pub confidence_high: Option<f64>,
}

impl SinglePrediction {
    /// Both bounds, or nothing when the backend left either out
    pub fn confidence_range(&self) -> Option<(f64, f64)> {
        Some((self.confidence_low?, self.confidence_high?))
    }
}

/// Response of `/model-info`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub feature_importance: Option<FeatureImportance>,
}

/// Everything a single upload produced, held until the next upload starts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionResult {
    pub rows: Vec<Record>,
    pub summary_stats: Option<SummaryStats>,
    pub histogram: Option<Histogram>,
    pub scatter: Option<ScatterSeries>,
    pub metrics: Option<ModelMetrics>,
    pub predicted_vs_actual: Option<PredictedVsActual>,
    pub feature_importance: Option<FeatureImportance>,
    pub insights: Vec<Insight>,
    pub outlier_indices: BTreeSet<usize>,
    /// Index-aligned with `rows`; `None` where the backend sent no usable bound
    pub confidence_margins: Vec<Option<f64>>,
    pub message: Option<String>,
    /// JSON type of the decoded body, shown in the "no data" state
    pub response_kind: &'static str,
    /// Top-level keys of the decoded body, shown in the "no data" state
    pub response_keys: Vec<String>,
}

impl PredictionResult {
    /// Project a decoded `/predict` body into a result. Never fails: a body
    /// without a usable `data` array yields a result with no rows.
    pub fn from_value(value: Value) -> Self {
        let response_kind = json_kind(&value);
        let Value::Object(body) = value else {
            return Self {
                response_kind,
                ..Default::default()
            };
        };

        let rows = match body.get("data") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect(),
            _ => Vec::new(),
        };

        let graphs = body.get("graphs");
        let graph_section = |key: &str| graphs.and_then(|g| g.get(key));

        let insights = match body.get("insights") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| section::<Insight>(Some(item)))
                .collect(),
            _ => Vec::new(),
        };

        let outlier_indices = match body.get("outlier_indices") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_u64)
                .map(|index| index as usize)
                .collect(),
            _ => BTreeSet::new(),
        };

        let confidence_margins = match body.get("confidence_margins") {
            Some(Value::Array(items)) => items.iter().map(Value::as_f64).collect(),
            _ => Vec::new(),
        };

        Self {
            rows,
            summary_stats: section(graph_section("summary_stats")),
            histogram: section(graph_section("histogram")),
            scatter: section(graph_section("scatter")),
            metrics: section(body.get("metrics")),
            predicted_vs_actual: section(body.get("predicted_vs_actual")),
            feature_importance: section::<FeatureImportance>(body.get("feature_importance"))
                .filter(|importance| !importance.is_empty()),
            insights,
            outlier_indices,
            confidence_margins,
            message: body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            response_kind,
            response_keys: body.keys().cloned().collect(),
        }
    }

    /// True when there is at least one row to present
    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Confidence margin for the row at `index` in original order
    pub fn margin_for(&self, index: usize) -> Option<f64> {
        self.confidence_margins.get(index).copied().flatten()
    }

    /// Outlier membership for the row at `index` in original order
    pub fn is_outlier(&self, index: usize) -> bool {
        self.outlier_indices.contains(&index)
    }

    /// Property count, falling back to the row count when the backend omits it
    pub fn total_properties(&self) -> u64 {
        self.summary_stats
            .as_ref()
            .and_then(|stats| stats.total_properties)
            .unwrap_or(self.rows.len() as u64)
    }
}

/// Deserialize an optional section, treating any shape mismatch as absent
fn section<T: DeserializeOwned>(value: Option<&Value>) -> Option<T> {
    value
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_response_projects_every_section() {
        let body = json!({
            "data": [
                {"median_income": 8.3, "predicted_price": 452600.0},
                {"median_income": 2.1, "predicted_price": 120000.0}
            ],
            "graphs": {
                "summary_stats": {"min_price": 120000.0, "max_price": 452600.0, "avg_price": 286300.0},
                "histogram": {"labels": ["0-100", "100-200"], "values": [3, 4]},
                "scatter": {"x": [8.3, 2.1], "y": [452600.0, 120000.0], "x_label": "Median Income"}
            },
            "metrics": {"mae": 1.5, "rmse": 2.5, "r2": 0.8},
            "predicted_vs_actual": {"predicted": [1.0], "actual": [1.2]},
            "insights": [{"type": "warning", "icon": "!", "title": "T", "text": "body"}],
            "outlier_indices": [1],
            "confidence_margins": [1000.0, null],
            "message": "Prediction successful"
        });

        let result = PredictionResult::from_value(body);

        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.total_properties(), 2);
        assert_eq!(result.histogram.as_ref().map(|h| h.values.len()), Some(2));
        assert_eq!(
            result.scatter.as_ref().and_then(|s| s.x_label.as_deref()),
            Some("Median Income")
        );
        assert_eq!(result.metrics.map(|m| m.r2), Some(0.8));
        assert_eq!(result.insights[0].severity(), Severity::Warning);
        assert!(result.is_outlier(1));
        assert!(!result.is_outlier(0));
        assert_eq!(result.margin_for(0), Some(1000.0));
        assert_eq!(result.margin_for(1), None);
        assert_eq!(result.margin_for(7), None);
        assert_eq!(result.message.as_deref(), Some("Prediction successful"));
        assert_eq!(result.response_kind, "object");
    }

    #[test]
    fn test_missing_data_is_treated_as_no_rows() {
        let result = PredictionResult::from_value(json!({"error_detail": "x", "graphs": {}}));
        assert!(!result.has_rows());
        assert_eq!(result.response_keys, vec!["error_detail", "graphs"]);

        let result = PredictionResult::from_value(json!({"data": "not rows"}));
        assert!(!result.has_rows());

        let result = PredictionResult::from_value(json!("plain text"));
        assert!(!result.has_rows());
        assert_eq!(result.response_kind, "string");
    }

    #[test]
    fn test_malformed_sections_become_absent() {
        let body = json!({
            "data": [{"predicted_price": 1.0}, 42, "skip me"],
            "graphs": {"histogram": {"labels": "oops"}, "scatter": null},
            "metrics": {"mae": "high"},
            "feature_importance": {"features": [], "importance": []},
            "insights": [{"title": "kept"}, 7],
            "outlier_indices": [0, -1, "2", 3]
        });

        let result = PredictionResult::from_value(body);

        assert_eq!(result.rows.len(), 1);
        assert!(result.histogram.is_none());
        assert!(result.scatter.is_none());
        assert!(result.metrics.is_none());
        assert!(result.feature_importance.is_none());
        assert_eq!(result.insights.len(), 1);
        assert_eq!(result.insights[0].severity(), Severity::Info);
        assert_eq!(result.outlier_indices, BTreeSet::from([0, 3]));
    }

    #[test]
    fn test_row_key_order_is_preserved() {
        let result = PredictionResult::from_value(json!({
            "data": [{"zeta": 1, "alpha": 2, "predicted_price": 3}]
        }));
        let keys: Vec<&str> = result.rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "predicted_price"]);
    }

    #[test]
    fn test_single_prediction_confidence_range() {
        struct TestCase {
            body: Value,
            expected: Option<(f64, f64)>,
        }

        let tests = vec![
            TestCase {
                // TC0: both bounds present
                body: json!({"predicted_price": 250000.0, "confidence_low": 220000.0, "confidence_high": 280000.0}),
                expected: Some((220_000.0, 280_000.0)),
            },
            TestCase {
                // TC1: bounds omitted
                body: json!({"predicted_price": 250000.0}),
                expected: None,
            },
            TestCase {
                // TC2: one bound alone is not a range
                body: json!({"predicted_price": 250000.0, "confidence_low": 220000.0}),
                expected: None,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let prediction: SinglePrediction = serde_json::from_value(test.body).unwrap();
            assert_eq!(prediction.confidence_range(), test.expected, "TC{} failed", index);
        }
    }
}
