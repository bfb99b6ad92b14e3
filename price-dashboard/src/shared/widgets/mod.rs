//! Ratatui rendering for every dashboard panel

pub mod charts;
pub mod chrome;
pub mod insights;
pub mod map;
pub mod overview;
pub mod results_table;
pub mod simulator;

use crate::shared::state::{Dashboard, Tab};
use crate::shared::types::PredictionResult;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub(crate) const C_UP: Color = Color::Rgb(100, 220, 100);
pub(crate) const C_DOWN: Color = Color::Rgb(220, 100, 100);
pub(crate) const C_WARN: Color = Color::Rgb(245, 158, 11);
pub(crate) const C_DIM: Color = Color::Rgb(120, 120, 120);
pub(crate) const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
pub(crate) const C_ACCENT: Color = Color::Rgb(59, 130, 246);
pub(crate) const C_PURPLE: Color = Color::Rgb(139, 92, 246);

pub(crate) fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

pub(crate) fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM))
}

/// Draw the whole screen
pub fn render_dashboard(f: &mut Frame, dashboard: &Dashboard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    chrome::render_header(f, chunks[0], dashboard);
    chrome::render_tab_bar(f, chunks[1], dashboard.active_tab);
    render_body(f, chunks[2], dashboard);
    chrome::render_footer(f, chunks[3], dashboard);

    if let Some(input) = &dashboard.path_input {
        chrome::render_path_prompt(f, f.area(), input);
    }
    if let Some(message) = &dashboard.alert {
        chrome::render_alert(f, f.area(), message);
    }
}

fn render_body(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    // The simulator works without any upload
    if dashboard.active_tab == Tab::Simulator {
        simulator::render_simulator_panel(f, area, &dashboard.simulator);
        return;
    }

    let result = match &dashboard.result {
        Some(result) if result.has_rows() => result,
        Some(result) => return render_no_data(f, area, result),
        None if dashboard.busy => return render_placeholder(f, area, "Processing your data..."),
        None => {
            return render_placeholder(
                f,
                area,
                "Press u to upload a .csv or .json housing dataset",
            )
        }
    };

    match dashboard.active_tab {
        Tab::Overview => overview::render_overview_panel(
            f,
            area,
            result,
            dashboard.feature_importance.as_ref(),
        ),
        Tab::Table => results_table::render_table_panel(f, area, result, &dashboard.table),
        Tab::Charts => {
            charts::render_charts_panel(f, area, result, dashboard.feature_importance.as_ref())
        }
        Tab::Map => map::render_map_panel(f, area, result),
        Tab::Insights => insights::render_insights_panel(f, area, &result.insights),
        Tab::Simulator => {}
    }
}

fn render_placeholder(f: &mut Frame, area: Rect, text: &str) {
    let block = panel("House Price Prediction");
    let inner = block.inner(area);
    f.render_widget(block, area);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(text.to_string(), Style::default().fg(C_DIM))),
    ];
    f.render_widget(Paragraph::new(lines).centered(), inner);
}

/// Explain a response that carried no rows
fn render_no_data(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let block = panel("No Data");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let keys = if result.response_keys.is_empty() {
        "(none)".to_string()
    } else {
        result.response_keys.join(", ")
    };
    let mut lines = vec![
        Line::from(Span::styled(
            "The backend response contained no prediction rows.",
            Style::default().fg(C_WARN),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Response type: ", Style::default().fg(C_DIM)),
            Span::styled(result.response_kind, Style::default().fg(C_BRIGHT)),
        ]),
        Line::from(vec![
            Span::styled("Top-level keys: ", Style::default().fg(C_DIM)),
            Span::styled(keys, Style::default().fg(C_BRIGHT)),
        ]),
    ];
    if let Some(message) = &result.message {
        lines.push(Line::from(vec![
            Span::styled("Message: ", Style::default().fg(C_DIM)),
            Span::raw(message.clone()),
        ]));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}
