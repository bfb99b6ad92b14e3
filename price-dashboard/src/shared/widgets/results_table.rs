//! Paginated, sortable grid of prediction rows

use super::{C_ACCENT, C_BRIGHT, C_DIM, C_WARN};
use crate::shared::calc::display_column_name;
use crate::shared::table::{format_cell, table_columns, TableState};
use crate::shared::types::{PredictionResult, PREDICTION_COLUMN};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

const INDEX_WIDTH: u16 = 7;
const PREDICTION_WIDTH: u16 = 22;
const COLUMN_WIDTH: u16 = 15;

fn column_width(column: &str) -> u16 {
    if column == PREDICTION_COLUMN {
        PREDICTION_WIDTH
    } else {
        COLUMN_WIDTH
    }
}

/// Columns that fit in `available` cells while keeping `selected` visible
fn visible_columns(columns: &[String], selected: usize, available: u16) -> std::ops::Range<usize> {
    if columns.is_empty() {
        return 0..0;
    }
    let selected = selected.min(columns.len() - 1);
    let span = |range: std::ops::Range<usize>| -> u16 {
        columns[range].iter().map(|c| column_width(c) + 1).sum()
    };

    let mut start = 0;
    while start < selected && span(start..selected + 1) > available {
        start += 1;
    }
    let mut end = selected + 1;
    while end < columns.len() && span(start..end + 1) <= available {
        end += 1;
    }
    start..end
}

pub fn render_table_panel(f: &mut Frame, area: Rect, result: &PredictionResult, state: &TableState) {
    let columns = table_columns(&result.rows);
    let order = state.display_order(&result.rows);
    let total = order.len();
    let page = state.page(total);

    let block = Block::default()
        .title(format!(
            " Predictions (page {}/{}, {} rows) ",
            page + 1,
            TableState::page_count(total),
            total
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));

    let available = block.inner(area).width.saturating_sub(INDEX_WIDTH + 1);
    let visible = visible_columns(&columns, state.selected_column(), available);

    let mut header_cells = vec![Cell::from(Span::styled("#", Style::default().fg(C_DIM)))];
    for (offset, column) in columns[visible.clone()].iter().enumerate() {
        let mut label = display_column_name(column);
        if let Some(sort) = state.sort().filter(|s| &s.column == column) {
            label = format!("{} {}", label, sort.direction.arrow());
        }
        let mut style = Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD);
        if visible.start + offset == state.selected_column() {
            style = style.add_modifier(Modifier::REVERSED);
        }
        header_cells.push(Cell::from(Span::styled(label, style)));
    }

    let rows: Vec<Row> = state
        .page_slice(&order)
        .iter()
        .map(|&index| {
            let outlier = result.is_outlier(index);
            let marker = if outlier {
                format!("{} !", index + 1)
            } else {
                (index + 1).to_string()
            };
            let mut cells = vec![Cell::from(marker)];
            cells.extend(
                columns[visible.clone()]
                    .iter()
                    .map(|column| Cell::from(format_cell(result, index, column))),
            );
            let style = if outlier {
                Style::default().fg(C_WARN)
            } else {
                Style::default().fg(C_BRIGHT)
            };
            Row::new(cells).style(style)
        })
        .collect();

    let mut widths = vec![Constraint::Length(INDEX_WIDTH)];
    widths.extend(
        columns[visible]
            .iter()
            .map(|column| Constraint::Length(column_width(column))),
    );

    let table = Table::new(rows, widths)
        .header(Row::new(header_cells).bottom_margin(1))
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}
