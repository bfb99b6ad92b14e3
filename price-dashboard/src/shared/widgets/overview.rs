//! Summary cards, the price distribution, income scatter and feature importance

use super::charts::{render_histogram, render_importance, render_income_scatter};
use super::{panel, C_ACCENT, C_BRIGHT, C_DIM, C_DOWN, C_PURPLE, C_UP};
use crate::shared::calc::{format_currency, group_thousands};
use crate::shared::types::{FeatureImportance, PredictionResult};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_overview_panel(
    f: &mut Frame,
    area: Rect,
    result: &PredictionResult,
    importance: Option<&FeatureImportance>,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Length(4), Constraint::Min(6)])
        .split(area);

    render_summary_cards(f, rows[0], result);
    render_run_details(f, rows[1], result);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(rows[2]);
    render_histogram(f, charts[0], result.histogram.as_ref());
    render_income_scatter(f, charts[1], result);
    render_importance(f, charts[2], importance);
}

fn render_summary_cards(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let stats = result.summary_stats.clone().unwrap_or_default();
    let currency = |value: Option<f64>| format_currency(value.unwrap_or(f64::NAN));

    let cards = [
        (
            "Properties Analyzed",
            group_thousands(result.total_properties() as i64),
            C_ACCENT,
        ),
        ("Average Price", currency(stats.avg_price), C_PURPLE),
        ("Highest Price", currency(stats.max_price), C_UP),
        ("Lowest Price", currency(stats.min_price), C_DOWN),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((title, value, color), column) in cards.into_iter().zip(columns.iter()) {
        render_card(f, *column, title, value, color);
    }
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let lines = vec![
        Line::from(Span::styled(title.to_string(), Style::default().fg(C_DIM))),
        Line::from(Span::styled(
            value,
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        )),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_run_details(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let block = panel("Run");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let median = result
        .summary_stats
        .as_ref()
        .and_then(|s| s.median_price)
        .map(format_currency)
        .unwrap_or_else(|| "n/a".to_string());

    let mut first = vec![
        Span::styled("Median: ", Style::default().fg(C_DIM)),
        Span::styled(median, Style::default().fg(C_BRIGHT)),
        Span::styled("   Outliers: ", Style::default().fg(C_DIM)),
        Span::styled(
            result.outlier_indices.len().to_string(),
            Style::default().fg(C_BRIGHT),
        ),
    ];
    if let Some(metrics) = result.metrics {
        first.push(Span::styled("   R²: ", Style::default().fg(C_DIM)));
        first.push(Span::styled(
            format!("{:.3}", metrics.r2),
            Style::default().fg(C_BRIGHT),
        ));
    }

    let mut lines = vec![Line::from(first)];
    if let Some(message) = &result.message {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(C_DIM),
        )));
    }
    f.render_widget(Paragraph::new(lines), inner);
}
