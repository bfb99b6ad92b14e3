//! Chart-ready projections of a prediction response
//!
//! Each projection returns `None` when its input is absent or malformed
//! (missing arrays, mismatched lengths); the widget then draws nothing.

use crate::shared::calc::{calc_correlation, calc_trend_line, display_feature_name, min_max, TrendLine};
use crate::shared::types::{FeatureImportance, Histogram, ModelMetrics, PredictedVsActual, ScatterSeries};

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBar {
    pub label: String,
    pub count: u64,
}

/// One bar per label/count pair, in backend order
pub fn histogram_bars(histogram: Option<&Histogram>) -> Option<Vec<HistogramBar>> {
    let histogram = histogram?;
    if histogram.labels.is_empty() || histogram.labels.len() != histogram.values.len() {
        return None;
    }
    Some(
        histogram
            .labels
            .iter()
            .zip(&histogram.values)
            .map(|(label, &count)| HistogramBar {
                label: label.clone(),
                count: if count.is_finite() && count > 0.0 {
                    count.round() as u64
                } else {
                    0
                },
            })
            .collect(),
    )
}

/// Income scatter with its least-squares overlay
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeScatterView {
    pub points: Vec<(f64, f64)>,
    pub trend: TrendLine,
    /// Trend evaluated at the smallest and largest income
    pub trend_points: [(f64, f64); 2],
    pub correlation: f64,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: String,
    pub y_label: String,
}

pub fn income_scatter(scatter: Option<&ScatterSeries>) -> Option<IncomeScatterView> {
    let scatter = scatter?;
    if scatter.x.is_empty() || scatter.x.len() != scatter.y.len() {
        return None;
    }

    let trend = calc_trend_line(&scatter.x, &scatter.y);
    let correlation = calc_correlation(&scatter.x, &scatter.y);
    let (min_x, max_x) = min_max(scatter.x.iter().copied())?;
    let trend_points = [(min_x, trend.at(min_x)), (max_x, trend.at(max_x))];
    let (min_y, max_y) = min_max(
        scatter
            .y
            .iter()
            .copied()
            .chain(trend_points.iter().map(|p| p.1)),
    )?;

    Some(IncomeScatterView {
        points: scatter.x.iter().copied().zip(scatter.y.iter().copied()).collect(),
        trend,
        trend_points,
        correlation,
        x_bounds: padded_bounds(min_x, max_x),
        y_bounds: padded_bounds(min_y, max_y),
        x_label: scatter.x_label.clone().unwrap_or_else(|| "Median Income".to_string()),
        y_label: scatter.y_label.clone().unwrap_or_else(|| "Predicted Price".to_string()),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceBar {
    pub name: String,
    pub weight: f64,
}

/// One bar per feature with a cosmetic label; weights are expected in [0, 1]
pub fn importance_bars(importance: Option<&FeatureImportance>) -> Option<Vec<ImportanceBar>> {
    let importance = importance?;
    if importance.features.is_empty() || importance.features.len() != importance.importance.len() {
        return None;
    }
    Some(
        importance
            .features
            .iter()
            .zip(&importance.importance)
            .map(|(name, &weight)| ImportanceBar {
                name: display_feature_name(name),
                weight,
            })
            .collect(),
    )
}

/// Held-out comparison with the y = x reference diagonal
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedVsActualView {
    /// (actual, predicted) pairs: actual on x, predicted on y
    pub points: Vec<(f64, f64)>,
    pub diagonal: [(f64, f64); 2],
    pub bounds: [f64; 2],
    pub metrics: Option<ModelMetrics>,
}

pub fn predicted_vs_actual(
    comparison: Option<&PredictedVsActual>,
    metrics: Option<ModelMetrics>,
) -> Option<PredictedVsActualView> {
    let comparison = comparison?;
    if comparison.predicted.is_empty() || comparison.predicted.len() != comparison.actual.len() {
        return None;
    }
    let (min, max) = min_max(
        comparison
            .predicted
            .iter()
            .chain(&comparison.actual)
            .copied(),
    )?;

    Some(PredictedVsActualView {
        points: comparison
            .actual
            .iter()
            .copied()
            .zip(comparison.predicted.iter().copied())
            .collect(),
        diagonal: [(min, min), (max, max)],
        bounds: padded_bounds(min, max),
        metrics,
    })
}

/// Widen a range by 5% on each side; a degenerate range gets a unit margin
pub fn padded_bounds(min: f64, max: f64) -> [f64; 2] {
    let span = max - min;
    if span <= 0.0 {
        return [min - 1.0, max + 1.0];
    }
    [min - span * 0.05, max + span * 0.05]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_bars() {
        let histogram = Histogram {
            labels: vec!["0-100".into(), "100-200".into()],
            values: vec![4.0, 0.0],
        };
        let bars = histogram_bars(Some(&histogram)).unwrap();
        assert_eq!(bars[0], HistogramBar { label: "0-100".into(), count: 4 });
        assert_eq!(bars[1].count, 0);

        let mismatched = Histogram {
            labels: vec!["a".into()],
            values: vec![],
        };
        assert!(histogram_bars(Some(&mismatched)).is_none());
        assert!(histogram_bars(None).is_none());
    }

    #[test]
    fn test_income_scatter() {
        let scatter = ScatterSeries {
            x: vec![1.0, 2.0, 3.0],
            y: vec![2.0, 4.0, 6.0],
            x_label: None,
            y_label: None,
        };
        let view = income_scatter(Some(&scatter)).unwrap();
        assert_eq!(view.points, vec![(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]);
        assert!((view.correlation - 1.0).abs() < 1e-12);
        assert!((view.trend_points[0].1 - 2.0).abs() < 1e-9);
        assert!((view.trend_points[1].1 - 6.0).abs() < 1e-9);
        assert!(view.x_bounds[0] < 1.0 && view.x_bounds[1] > 3.0);
        assert_eq!(view.x_label, "Median Income");

        let short = ScatterSeries {
            x: vec![1.0, 2.0],
            y: vec![1.0],
            ..Default::default()
        };
        assert!(income_scatter(Some(&short)).is_none());
    }

    #[test]
    fn test_importance_bars() {
        let importance = FeatureImportance {
            features: vec!["median_income".into(), "ocean_proximity_INLAND".into()],
            importance: vec![0.6, 0.2],
        };
        let bars = importance_bars(Some(&importance)).unwrap();
        assert_eq!(bars[0].name, "median income");
        assert_eq!(bars[1].name, "INLAND");

        let broken = FeatureImportance {
            features: vec!["a".into()],
            importance: vec![],
        };
        assert!(importance_bars(Some(&broken)).is_none());
    }

    #[test]
    fn test_predicted_vs_actual_diagonal_spans_both_series() {
        let comparison = PredictedVsActual {
            predicted: vec![150.0, 300.0],
            actual: vec![100.0, 420.0],
        };
        let view = predicted_vs_actual(Some(&comparison), None).unwrap();
        assert_eq!(view.diagonal, [(100.0, 100.0), (420.0, 420.0)]);
        assert_eq!(view.points, vec![(100.0, 150.0), (420.0, 300.0)]);

        let empty = PredictedVsActual::default();
        assert!(predicted_vs_actual(Some(&empty), None).is_none());
    }

    #[test]
    fn test_padded_bounds() {
        assert_eq!(padded_bounds(0.0, 100.0), [-5.0, 105.0]);
        assert_eq!(padded_bounds(5.0, 5.0), [4.0, 6.0]);
    }
}
