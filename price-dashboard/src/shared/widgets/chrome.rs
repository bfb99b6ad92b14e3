//! Header, tab bar, footer and the modal overlays

use super::{panel, C_ACCENT, C_BRIGHT, C_DIM, C_DOWN, C_UP, C_WARN};
use crate::shared::keys::upload_hint;
use crate::shared::state::{BackendStatus, Dashboard, Tab};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

pub fn render_header(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let (dot_color, label) = match dashboard.status {
        BackendStatus::Checking => (C_WARN, dashboard.status.label()),
        BackendStatus::Connected => (C_UP, dashboard.status.label()),
        BackendStatus::Disconnected => (C_DOWN, dashboard.status.label()),
    };

    let mut spans = vec![
        Span::styled(
            "House Price Predictor",
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  AI-powered real estate valuation", Style::default().fg(C_DIM)),
        Span::raw("   "),
        Span::styled("● ", Style::default().fg(dot_color)),
        Span::styled(label, Style::default().fg(dot_color)),
    ];
    if let Some(result) = &dashboard.result {
        if result.has_rows() {
            spans.push(Span::styled(
                format!("   {} rows loaded", result.rows.len()),
                Style::default().fg(C_DIM),
            ));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_ACCENT));
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

pub fn render_tab_bar(f: &mut Frame, area: Rect, active: Tab) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(C_DIM)))
        .select(active.index())
        .style(Style::default().fg(C_DIM))
        .highlight_style(Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD))
        .divider("|");
    f.render_widget(tabs, area);
}

/// Status line plus key hints
pub fn render_footer(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let status = if dashboard.busy {
        Span::styled("Processing your data...", Style::default().fg(C_WARN))
    } else if let Some(notice) = &dashboard.notice {
        Span::styled(notice.clone(), Style::default().fg(C_BRIGHT))
    } else {
        Span::raw("")
    };

    let hints = match dashboard.active_tab {
        Tab::Table => "←/→ column  s sort  n/p page",
        Tab::Simulator => "↑/↓ field  ←/→ adjust  H/L x10  Enter predict",
        _ => "",
    };

    let line = Line::from(vec![
        status,
        Span::raw("  "),
        Span::styled(hints, Style::default().fg(C_DIM)),
        Span::styled(
            "  u upload  e csv  r report  Tab/1-6 switch  q quit",
            Style::default().fg(C_DIM),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Rectangle of `width` x `height` centred in `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render_alert(f: &mut Frame, area: Rect, message: &str) {
    let popup = centered_rect(60, 7, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Alert ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DOWN));
    let lines = vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(C_BRIGHT))),
        Line::from(""),
        Line::from(Span::styled("Press any key", Style::default().fg(C_DIM))),
    ];
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        popup,
    );
}

pub fn render_path_prompt(f: &mut Frame, area: Rect, input: &str) {
    let popup = centered_rect(70, 6, area);
    f.render_widget(Clear, popup);

    let block = panel("Upload Dataset");
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled(upload_hint(), Style::default().fg(C_DIM))),
        rows[0],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("> ", Style::default().fg(C_ACCENT)),
            Span::styled(input.to_string(), Style::default().fg(C_BRIGHT)),
            Span::styled("█", Style::default().fg(C_ACCENT)),
        ])),
        rows[1],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            "Enter upload  Esc cancel",
            Style::default().fg(C_DIM),
        )),
        rows[2],
    );
}
