//! Braille map of predicted prices with a legend and outlier details

use super::{panel, rgb, C_BRIGHT, C_DIM};
use crate::shared::calc::{format_currency, format_number, price_color};
use crate::shared::map::{project_markers, MapMarker, OUTLIER_COLOR};
use crate::shared::types::PredictionResult;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::canvas::{Canvas, Circle, Map, MapResolution, Points},
    widgets::Paragraph,
    Frame,
};

/// Outlier rows listed in the legend
const MAX_LISTED_OUTLIERS: usize = 12;

pub fn render_map_panel(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let Some(view) = project_markers(&result.rows, &result.outlier_indices) else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(area);

    let ring = (view.lon_bounds[1] - view.lon_bounds[0]).max(view.lat_bounds[1] - view.lat_bounds[0]) * 0.006;

    let canvas = Canvas::default()
        .block(panel("Property Map"))
        .marker(Marker::Braille)
        .x_bounds(view.lon_bounds)
        .y_bounds(view.lat_bounds)
        .paint(|ctx| {
            ctx.draw(&Map {
                color: C_DIM,
                resolution: MapResolution::High,
            });
            ctx.layer();
            for marker in view.markers.iter().filter(|m| !m.outlier) {
                ctx.draw(&Points {
                    coords: &[(marker.lon, marker.lat)],
                    color: rgb(marker.color),
                });
            }
            // Outliers go last so they stay on top
            for marker in view.outliers() {
                ctx.draw(&Circle {
                    x: marker.lon,
                    y: marker.lat,
                    radius: ring * marker.weight as f64,
                    color: rgb(marker.color),
                });
            }
        });
    f.render_widget(canvas, columns[0]);

    render_legend(f, columns[1], &view.markers, view.min_price, view.max_price, result.rows.len());
}

fn render_legend(
    f: &mut Frame,
    area: Rect,
    markers: &[MapMarker],
    min_price: f64,
    max_price: f64,
    total_rows: usize,
) {
    let block = panel("Legend");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mid_price = (min_price + max_price) / 2.0;
    let swatch = |color: (u8, u8, u8), label: &str, value: String| {
        Line::from(vec![
            Span::styled("● ", Style::default().fg(rgb(color))),
            Span::styled(format!("{:<8}", label), Style::default().fg(C_BRIGHT)),
            Span::styled(value, Style::default().fg(C_DIM)),
        ])
    };

    let mut lines = vec![
        swatch(
            price_color(min_price, min_price, max_price),
            "Low",
            format_currency(min_price),
        ),
        swatch(
            price_color(mid_price, min_price, max_price),
            "Mid",
            format_currency(mid_price),
        ),
        swatch(
            price_color(max_price, min_price, max_price),
            "High",
            format_currency(max_price),
        ),
        swatch(OUTLIER_COLOR, "Outlier", "flagged".to_string()),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} of {} rows plotted", markers.len(), total_rows),
            Style::default().fg(C_DIM),
        )),
    ];

    let outliers: Vec<&MapMarker> = markers.iter().filter(|m| m.outlier).collect();
    if !outliers.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Outliers ({})", outliers.len()),
            Style::default()
                .fg(rgb(OUTLIER_COLOR))
                .add_modifier(Modifier::BOLD),
        )));
        for marker in outliers.iter().take(MAX_LISTED_OUTLIERS) {
            lines.extend(marker_details(marker));
        }
        if outliers.len() > MAX_LISTED_OUTLIERS {
            lines.push(Line::from(Span::styled(
                format!("... {} more", outliers.len() - MAX_LISTED_OUTLIERS),
                Style::default().fg(C_DIM),
            )));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}

/// Two legend lines describing one marker
fn marker_details(marker: &MapMarker) -> [Line<'static>; 2] {
    let income = marker
        .income
        .map(format_number)
        .unwrap_or_else(|| "n/a".to_string());
    let ocean = marker.ocean.clone().unwrap_or_else(|| "n/a".to_string());
    [
        Line::from(vec![
            Span::styled(format!("#{} ", marker.index + 1), Style::default().fg(C_DIM)),
            Span::styled(format_currency(marker.price), Style::default().fg(C_BRIGHT)),
            Span::styled(format!("  {}", ocean), Style::default().fg(C_DIM)),
        ]),
        Line::from(Span::styled(
            format!(
                "   income {}  ({:.2}, {:.2})",
                income, marker.lat, marker.lon
            ),
            Style::default().fg(C_DIM),
        )),
    ]
}
