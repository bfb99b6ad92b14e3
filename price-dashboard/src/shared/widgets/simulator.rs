//! What-if simulator: field sliders, ocean selector and the last prediction

use super::{panel, C_ACCENT, C_BRIGHT, C_DIM, C_DOWN, C_PURPLE, C_WARN};
use crate::shared::calc::{format_currency, format_number};
use crate::shared::simulator::{
    SimulatorState, CONFIDENCE_LEVEL_PCT, FIELDS, OCEAN_OPTIONS,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
    Frame,
};

const SLIDER_WIDTH: usize = 24;

fn slider(value: f64, min: f64, max: f64) -> String {
    let ratio = if max > min { (value - min) / (max - min) } else { 0.0 };
    let filled = ((ratio.clamp(0.0, 1.0)) * SLIDER_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(SLIDER_WIDTH - filled))
}

pub fn render_simulator_panel(f: &mut Frame, area: Rect, sim: &SimulatorState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_fields(f, columns[0], sim);
    render_result(f, columns[1], sim);
}

fn render_fields(f: &mut Frame, area: Rect, sim: &SimulatorState) {
    let block = panel("What-If Simulator");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::with_capacity(FIELDS.len() + 4);
    for (index, spec) in FIELDS.iter().enumerate() {
        let value = sim.draft.value(index).unwrap_or(spec.default);
        let selected = index == sim.selected;
        let label_style = if selected {
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_DIM)
        };
        lines.push(Line::from(vec![
            Span::styled(if selected { "> " } else { "  " }, label_style),
            Span::styled(format!("{:<24}", spec.label), label_style),
            Span::styled(
                slider(value, spec.min, spec.max),
                Style::default().fg(if selected { C_ACCENT } else { C_DIM }),
            ),
            Span::styled(format!(" {:>10}", format_number(value)), Style::default().fg(C_BRIGHT)),
        ]));
    }

    let ocean_selected = sim.selected == FIELDS.len();
    let ocean_style = if ocean_selected {
        Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_DIM)
    };
    let mut ocean = vec![
        Span::styled(if ocean_selected { "> " } else { "  " }, ocean_style),
        Span::styled(format!("{:<24}", "Ocean Proximity"), ocean_style),
    ];
    for option in OCEAN_OPTIONS {
        let style = if option == sim.draft.ocean() {
            Style::default().fg(C_PURPLE).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(C_DIM)
        };
        ocean.push(Span::styled(format!(" {} ", option), style));
    }
    lines.push(Line::from(ocean));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        if sim.loading { "Predicting..." } else { "Enter: Predict Price" },
        Style::default().fg(C_ACCENT),
    )));

    f.render_widget(Paragraph::new(lines), inner);
}

fn render_result(f: &mut Frame, area: Rect, sim: &SimulatorState) {
    let block = panel("Estimated Value");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Length(1), Constraint::Min(2)])
        .split(inner);

    let mut lines = Vec::new();
    match &sim.result {
        Some(prediction) => {
            lines.push(Line::from(Span::styled(
                format_currency(prediction.predicted_price),
                Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
            )));
            if let Some((low, high)) = prediction.confidence_range() {
                lines.push(Line::from(vec![
                    Span::styled("Range: ", Style::default().fg(C_DIM)),
                    Span::styled(
                        format!("{} - {}", format_currency(low), format_currency(high)),
                        Style::default().fg(C_BRIGHT),
                    ),
                ]));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "Adjust the fields and press Enter",
            Style::default().fg(C_DIM),
        ))),
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), rows[0]);

    if sim.result.is_some_and(|p| p.confidence_range().is_some()) {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(C_PURPLE))
            .ratio(CONFIDENCE_LEVEL_PCT as f64 / 100.0)
            .label(format!("{}% confidence", CONFIDENCE_LEVEL_PCT));
        f.render_widget(gauge, rows[1]);
    }

    if let Some(error) = &sim.error {
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("! ", Style::default().fg(C_WARN)),
                Span::styled(error.clone(), Style::default().fg(C_DOWN)),
            ]))
            .wrap(Wrap { trim: true }),
            rows[2],
        );
    }
}
