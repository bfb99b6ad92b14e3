//! Sortable, paginated view over prediction rows
//!
//! Rows are never reordered in place. [`TableState::display_order`] yields
//! original row indices, so outlier and margin lookups stay keyed by the
//! position the backend sent.

use crate::shared::calc::{format_currency, format_number};
use crate::shared::types::{PredictionResult, Record, PREDICTION_COLUMN};
use serde_json::Value;
use std::cmp::Ordering;

/// Rows shown per page
pub const PAGE_SIZE: usize = 20;

/// Target column of the training data, shown as currency when present
pub const LEGACY_VALUE_COLUMN: &str = "median_house_value";

/// Engineered features the backend adds; not meant for display
pub const HIDDEN_COLUMNS: [&str; 3] = [
    "rooms_per_household",
    "bedrooms_per_room",
    "population_per_household",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

/// Display columns: the first row's keys minus hidden ones, prediction first
pub fn table_columns(rows: &[Record]) -> Vec<String> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let mut columns: Vec<String> = first
        .keys()
        .filter(|key| key.as_str() != PREDICTION_COLUMN)
        .filter(|key| !HIDDEN_COLUMNS.contains(&key.as_str()))
        .cloned()
        .collect();
    columns.insert(0, PREDICTION_COLUMN.to_string());
    columns
}

/// How every cell of one column compares, decided for the whole column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOrder {
    /// Every present value is a number; missing and null cells sort first
    Numeric,
    /// Case-sensitive string comparison
    Text,
}

impl CellOrder {
    pub fn for_column(rows: &[Record], column: &str) -> Self {
        let numeric = rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter(|value| !value.is_null())
            .all(|value| value.as_f64().is_some());
        if numeric {
            CellOrder::Numeric
        } else {
            CellOrder::Text
        }
    }

    pub fn compare(&self, a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match self {
            CellOrder::Numeric => {
                match (a.and_then(Value::as_f64), b.and_then(Value::as_f64)) {
                    (Some(x), Some(y)) => x.total_cmp(&y),
                    (None, Some(_)) => Ordering::Less,
                    (Some(_), None) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }
            CellOrder::Text => sort_text(a).cmp(&sort_text(b)),
        }
    }
}

fn sort_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Render one cell. `index` is the row's original position.
pub fn format_cell(result: &PredictionResult, index: usize, column: &str) -> String {
    let value = result.rows.get(index).and_then(|row| row.get(column));

    if column == PREDICTION_COLUMN {
        let price = value.and_then(Value::as_f64).unwrap_or(f64::NAN);
        return match result.margin_for(index) {
            Some(margin) => format!("{} ±{}", format_currency(price), format_currency(margin)),
            None => format_currency(price),
        };
    }

    match value {
        Some(Value::Number(n)) if column == LEGACY_VALUE_COLUMN => {
            format_currency(n.as_f64().unwrap_or(f64::NAN))
        }
        Some(Value::Number(n)) => n.as_f64().map(format_number).unwrap_or_default(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Sort and page position of the results table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableState {
    sort: Option<SortKey>,
    page: usize,
    selected_column: usize,
}

impl TableState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(&self) -> Option<&SortKey> {
        self.sort.as_ref()
    }

    pub fn selected_column(&self) -> usize {
        self.selected_column
    }

    /// Same column flips direction, a new column starts ascending
    pub fn toggle_sort(&mut self, column: &str) {
        self.sort = Some(match self.sort.take() {
            Some(SortKey {
                column: current,
                direction,
            }) if current == column => SortKey {
                column: current,
                direction: match direction {
                    SortDirection::Ascending => SortDirection::Descending,
                    SortDirection::Descending => SortDirection::Ascending,
                },
            },
            _ => SortKey {
                column: column.to_string(),
                direction: SortDirection::Ascending,
            },
        });
    }

    /// Sort by whichever column the cursor is on
    pub fn sort_selected(&mut self, columns: &[String]) {
        if let Some(column) = columns.get(self.selected_column) {
            let column = column.clone();
            self.toggle_sort(&column);
        }
    }

    pub fn select_next_column(&mut self, column_count: usize) {
        if column_count > 0 {
            self.selected_column = (self.selected_column + 1).min(column_count - 1);
        }
    }

    pub fn select_prev_column(&mut self) {
        self.selected_column = self.selected_column.saturating_sub(1);
    }

    /// Original row indices in display order. Descending is the exact
    /// reverse of the stable ascending order.
    pub fn display_order(&self, rows: &[Record]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..rows.len()).collect();
        if let Some(key) = &self.sort {
            let cell_order = CellOrder::for_column(rows, &key.column);
            order.sort_by(|&a, &b| {
                cell_order.compare(rows[a].get(&key.column), rows[b].get(&key.column))
            });
            if key.direction == SortDirection::Descending {
                order.reverse();
            }
        }
        order
    }

    pub fn page_count(total_rows: usize) -> usize {
        total_rows.div_ceil(PAGE_SIZE).max(1)
    }

    /// Current page, clamped to the pages that exist for `total_rows`
    pub fn page(&self, total_rows: usize) -> usize {
        self.page.min(Self::page_count(total_rows) - 1)
    }

    pub fn set_page(&mut self, page: usize, total_rows: usize) {
        self.page = page.min(Self::page_count(total_rows) - 1);
    }

    pub fn next_page(&mut self, total_rows: usize) {
        let next = self.page(total_rows) + 1;
        self.set_page(next, total_rows);
    }

    pub fn prev_page(&mut self, total_rows: usize) {
        let prev = self.page(total_rows).saturating_sub(1);
        self.set_page(prev, total_rows);
    }

    /// The slice of `order` visible on the current page
    pub fn page_slice<'a>(&self, order: &'a [usize]) -> &'a [usize] {
        let start = self.page(order.len()) * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(order.len());
        &order[start.min(end)..end]
    }
}
