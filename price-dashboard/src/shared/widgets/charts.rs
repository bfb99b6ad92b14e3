//! Chart panels. A panel with unusable input leaves its area empty.

use super::{panel, C_ACCENT, C_DIM, C_DOWN, C_PURPLE, C_UP};
use crate::shared::calc::{format_compact, format_currency};
use crate::shared::charts::{
    histogram_bars, importance_bars, income_scatter, predicted_vs_actual,
};
use crate::shared::types::{FeatureImportance, Histogram, PredictionResult};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::Line,
    widgets::{Axis, Bar, BarChart, BarGroup, Chart, Dataset, GraphType},
    Frame,
};

/// Importance weights are drawn on a fixed [0, 1] axis, in thousandths
const IMPORTANCE_SCALE: f64 = 1000.0;

pub fn render_charts_panel(
    f: &mut Frame,
    area: Rect,
    result: &PredictionResult,
    importance: Option<&FeatureImportance>,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_histogram(f, top[0], result.histogram.as_ref());
    render_income_scatter(f, top[1], result);
    render_importance(f, bottom[0], importance);
    render_predicted_vs_actual(f, bottom[1], result);
}

pub fn render_histogram(f: &mut Frame, area: Rect, histogram: Option<&Histogram>) {
    let Some(buckets) = histogram_bars(histogram) else {
        return;
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    let bar_width = (inner_width / buckets.len().max(1)).saturating_sub(1).clamp(1, 12) as u16;

    let bars: Vec<Bar> = buckets
        .iter()
        .map(|bucket| {
            Bar::default()
                .value(bucket.count)
                .label(Line::from(bucket.label.clone()))
                .style(Style::default().fg(C_ACCENT))
        })
        .collect();

    let chart = BarChart::default()
        .block(panel("Price Distribution"))
        .bar_width(bar_width)
        .bar_gap(1)
        .label_style(Style::default().fg(C_DIM))
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

pub fn render_income_scatter(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let Some(view) = income_scatter(result.scatter.as_ref()) else {
        return;
    };

    let datasets = vec![
        Dataset::default()
            .name("Properties")
            .marker(Marker::Braille)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(C_PURPLE))
            .data(&view.points),
        Dataset::default()
            .name("Trend")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(C_DOWN))
            .data(&view.trend_points),
    ];

    let title = format!("Income vs Price (r = {:.3})", view.correlation);
    let chart = Chart::new(datasets)
        .block(panel(&title))
        .x_axis(
            Axis::default()
                .title(view.x_label.clone())
                .style(Style::default().fg(C_DIM))
                .bounds(view.x_bounds)
                .labels(vec![
                    format!("{:.1}", view.x_bounds[0]),
                    format!("{:.1}", view.x_bounds[1]),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(view.y_label.clone())
                .style(Style::default().fg(C_DIM))
                .bounds(view.y_bounds)
                .labels(vec![
                    format_compact(view.y_bounds[0]),
                    format_compact(view.y_bounds[1]),
                ]),
        );
    f.render_widget(chart, area);
}

pub fn render_importance(f: &mut Frame, area: Rect, importance: Option<&FeatureImportance>) {
    let Some(features) = importance_bars(importance) else {
        return;
    };

    let bars: Vec<Bar> = features
        .iter()
        .map(|feature| {
            let scaled = (feature.weight.clamp(0.0, 1.0) * IMPORTANCE_SCALE).round() as u64;
            Bar::default()
                .value(scaled)
                .label(Line::from(feature.name.clone()))
                .text_value(format!("{:.3}", feature.weight))
                .style(Style::default().fg(C_UP))
        })
        .collect();

    let chart = BarChart::default()
        .block(panel("Feature Importance"))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(IMPORTANCE_SCALE as u64)
        .label_style(Style::default().fg(C_DIM))
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

fn render_predicted_vs_actual(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let Some(view) = predicted_vs_actual(result.predicted_vs_actual.as_ref(), result.metrics)
    else {
        return;
    };

    let datasets = vec![
        Dataset::default()
            .name("Predictions")
            .marker(Marker::Braille)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(C_ACCENT))
            .data(&view.points),
        Dataset::default()
            .name("Perfect")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(C_DIM))
            .data(&view.diagonal),
    ];

    let title = match view.metrics {
        Some(m) => format!(
            "Predicted vs Actual  R² {:.3}  MAE {}  RMSE {}",
            m.r2,
            format_currency(m.mae),
            format_currency(m.rmse)
        ),
        None => "Predicted vs Actual".to_string(),
    };
    let labels = vec![format_compact(view.bounds[0]), format_compact(view.bounds[1])];

    let chart = Chart::new(datasets)
        .block(panel(&title))
        .x_axis(
            Axis::default()
                .title("Actual")
                .style(Style::default().fg(C_DIM))
                .bounds(view.bounds)
                .labels(labels.clone()),
        )
        .y_axis(
            Axis::default()
                .title("Predicted")
                .style(Style::default().fg(C_DIM))
                .bounds(view.bounds)
                .labels(labels),
        );
    f.render_widget(chart, area);
}
