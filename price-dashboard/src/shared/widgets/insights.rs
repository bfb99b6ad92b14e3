use super::{panel, C_ACCENT, C_BRIGHT, C_DIM, C_DOWN, C_UP, C_WARN};
use crate::shared::types::{Insight, Severity};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => C_ACCENT,
        Severity::Success => C_UP,
        Severity::Warning => C_WARN,
        Severity::Error => C_DOWN,
    }
}

pub fn render_insights_panel(f: &mut Frame, area: Rect, insights: &[Insight]) {
    let block = panel("AI Insights");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if insights.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "No insights were returned for this dataset.",
                Style::default().fg(C_DIM),
            )),
            inner,
        );
        return;
    }

    let mut lines = Vec::with_capacity(insights.len() * 3);
    for insight in insights {
        let color = severity_color(insight.severity());
        lines.push(Line::from(vec![
            Span::styled("▌ ", Style::default().fg(color)),
            Span::styled(format!("{} ", insight.icon), Style::default().fg(color)),
            Span::styled(
                insight.title.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled("▌ ", Style::default().fg(color)),
            Span::styled(insight.text.clone(), Style::default().fg(C_BRIGHT)),
        ]));
        lines.push(Line::from(""));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
