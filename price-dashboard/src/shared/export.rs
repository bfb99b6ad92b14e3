//! CSV and PDF export of the loaded result set
//!
//! Both exports are built fully in memory and then written next to each
//! other in the export directory. Writes go through a temporary file and a
//! rename, so a failed export never leaves a truncated file behind.

use crate::shared::calc::format_currency;
use crate::shared::error::DashboardError;
use crate::shared::types::{PredictionResult, Record, PREDICTION_COLUMN};
use chrono::NaiveDateTime;
use printpdf::{BuiltinFont, Color, Mm, PdfDocument, Rgb};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CSV_FILE_NAME: &str = "house_predictions.csv";
pub const REPORT_FILE_NAME: &str = "house_prediction_report.pdf";

pub const REPORT_TITLE: &str = "House Price Prediction Report";

/// A4 portrait
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

pub const MARGIN_MM: f32 = 15.0;
const TEXT_WIDTH_MM: f32 = 180.0;

/// Insights start a new page once the cursor passes this depth
pub const INSIGHT_PAGE_BREAK_MM: f32 = 270.0;
/// Detail rows start a new page once the cursor passes this depth
pub const DETAIL_PAGE_BREAK_MM: f32 = 280.0;
pub const MAX_DETAIL_ROWS: usize = 30;

const TITLE_COLOR: (u8, u8, u8) = (59, 130, 246);
const MUTED_COLOR: (u8, u8, u8) = (100, 100, 100);
const HEADING_COLOR: (u8, u8, u8) = (0, 0, 0);
const BODY_COLOR: (u8, u8, u8) = (60, 60, 60);

// ----------------------------------------------------------------------------
// CSV
// ----------------------------------------------------------------------------

/// Text form of one cell. Whole floats print without a fraction, missing and
/// null values print empty, strings containing a comma are wrapped in double
/// quotes. Embedded quotes and newlines are written as-is.
pub fn csv_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) if s.contains(',') => format!("\"{}\"", s),
        Some(other) => plain_text(other),
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
        Value::Number(n) => n.as_f64().map(|f| f.to_string()).unwrap_or_default(),
        other => other.to_string(),
    }
}

/// Serialize rows using the first row's key order as the header.
/// Returns `None` when there are no rows.
pub fn to_csv(rows: &[Record]) -> Option<String> {
    let headers: Vec<&String> = rows.first()?.keys().collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| h.as_str())
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        let cells: Vec<String> = headers.iter().map(|h| csv_value(row.get(*h))).collect();
        lines.push(cells.join(","));
    }
    Some(lines.join("\n"))
}

/// Write the CSV export into `dir`, returning the written path
pub async fn write_csv(rows: &[Record], dir: &Path) -> Result<PathBuf, DashboardError> {
    let csv = to_csv(rows).ok_or(DashboardError::NothingToExport)?;
    let path = dir.join(CSV_FILE_NAME);
    write_atomically(&path, csv.as_bytes()).await?;
    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(path)
}

// ----------------------------------------------------------------------------
// PDF report
// ----------------------------------------------------------------------------

/// One text run, positioned from the top-left corner of its page
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub text: String,
    pub size: f32,
    pub color: (u8, u8, u8),
    pub x_mm: f32,
    pub y_mm: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPage {
    pub lines: Vec<ReportLine>,
}

/// The composed report, independent of any PDF backend
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub pages: Vec<ReportPage>,
}

impl ReportLayout {
    pub fn lines(&self) -> impl Iterator<Item = &ReportLine> {
        self.pages.iter().flat_map(|page| page.lines.iter())
    }
}

/// Cursor that places lines top to bottom and opens pages on demand
struct Composer {
    pages: Vec<ReportPage>,
    y: f32,
}

impl Composer {
    fn new() -> Self {
        Self {
            pages: vec![ReportPage::default()],
            y: MARGIN_MM,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(ReportPage::default());
        self.y = MARGIN_MM;
    }

    fn text(&mut self, text: impl Into<String>, size: f32, color: (u8, u8, u8)) {
        let line = ReportLine {
            text: text.into(),
            size,
            color,
            x_mm: MARGIN_MM,
            y_mm: self.y,
        };
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(line);
        }
    }

    /// Wrapped text block; continuation lines sit one line height lower
    fn wrapped(&mut self, text: &str, size: f32, color: (u8, u8, u8)) -> usize {
        let wrapped = wrap_text(text, max_chars(size));
        let top = self.y;
        for (i, line) in wrapped.iter().enumerate() {
            self.y = top + i as f32 * line_height_mm(size);
            self.text(line.clone(), size, color);
        }
        self.y = top;
        wrapped.len()
    }

    fn advance(&mut self, mm: f32) {
        self.y += mm;
    }

    fn finish(self) -> ReportLayout {
        ReportLayout { pages: self.pages }
    }
}

/// Baseline distance between wrapped lines at a 1.15 line factor
fn line_height_mm(size: f32) -> f32 {
    size * 1.15 * 25.4 / 72.0
}

/// Characters that fit the text width, assuming an average Helvetica glyph
/// of half an em
fn max_chars(size: f32) -> usize {
    let em_mm = size * 25.4 / 72.0;
    (TEXT_WIDTH_MM / (em_mm * 0.5)).floor().max(1.0) as usize
}

/// Greedy word wrap; words longer than a line are split
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Field text for a detail row; absent values read `n/a`
fn detail_field(row: &Record, key: &str) -> String {
    match row.get(key) {
        None | Some(Value::Null) => "n/a".to_string(),
        Some(value) => plain_text(value),
    }
}

/// One line of the details table for row `index` (zero-based)
pub fn detail_line(index: usize, row: &Record) -> String {
    let price = row
        .get(PREDICTION_COLUMN)
        .and_then(Value::as_f64)
        .unwrap_or(f64::NAN);
    format!(
        "#{}: {} | Income: {} | Ocean: {} | ({}, {})",
        index + 1,
        format_currency(price),
        detail_field(row, "median_income"),
        detail_field(row, "ocean_proximity"),
        detail_field(row, "latitude"),
        detail_field(row, "longitude"),
    )
}

/// Lay out the report for `result`, stamped with `generated_at`
pub fn compose_report(result: &PredictionResult, generated_at: NaiveDateTime) -> ReportLayout {
    let mut doc = Composer::new();

    doc.text(REPORT_TITLE, 20.0, TITLE_COLOR);
    doc.advance(12.0);

    doc.text(
        format!("Generated: {}", generated_at.format("%-m/%-d/%Y, %-I:%M:%S %p")),
        10.0,
        MUTED_COLOR,
    );
    doc.advance(10.0);

    if let Some(stats) = &result.summary_stats {
        doc.text("Summary", 14.0, HEADING_COLOR);
        doc.advance(8.0);
        let currency = |value: Option<f64>| format_currency(value.unwrap_or(f64::NAN));
        let lines = [
            format!("Total Properties: {}", result.total_properties()),
            format!("Average Price: {}", currency(stats.avg_price)),
            format!("Highest Price: {}", currency(stats.max_price)),
            format!("Lowest Price: {}", currency(stats.min_price)),
        ];
        for line in lines {
            doc.text(line, 10.0, BODY_COLOR);
            doc.advance(6.0);
        }
        doc.advance(4.0);
    }

    if let Some(metrics) = result.metrics {
        doc.text("Model Performance", 14.0, HEADING_COLOR);
        doc.advance(8.0);
        let lines = [
            format!("MAE: {}", format_currency(metrics.mae)),
            format!("RMSE: {}", format_currency(metrics.rmse)),
            format!("R² Score: {:.4}", metrics.r2),
        ];
        for line in lines {
            doc.text(line, 10.0, BODY_COLOR);
            doc.advance(6.0);
        }
        doc.advance(4.0);
    }

    if !result.insights.is_empty() {
        doc.text("Key Insights", 14.0, HEADING_COLOR);
        doc.advance(8.0);
        for insight in &result.insights {
            if doc.y > INSIGHT_PAGE_BREAK_MM {
                doc.new_page();
            }
            let text = format!("{} {}: {}", insight.icon, insight.title, insight.text);
            let lines = doc.wrapped(text.trim(), 10.0, BODY_COLOR);
            doc.advance(12.0_f32.max(lines as f32 * line_height_mm(10.0) + 4.0));
        }
        doc.advance(5.0);
    }

    if result.has_rows() {
        doc.new_page();
        doc.text("Prediction Details", 14.0, HEADING_COLOR);
        doc.advance(8.0);
        for (index, row) in result.rows.iter().take(MAX_DETAIL_ROWS).enumerate() {
            if doc.y > DETAIL_PAGE_BREAK_MM {
                doc.new_page();
            }
            let lines = doc.wrapped(&detail_line(index, row), 8.0, BODY_COLOR);
            doc.advance(6.0_f32.max(lines as f32 * line_height_mm(8.0) + 2.0));
        }
    }

    doc.finish()
}

/// Builtin PDF fonts only cover Latin-1; anything else is dropped
fn pdf_safe(text: &str) -> String {
    text.chars()
        .filter(|c| (*c as u32) <= 0xFF)
        .collect::<String>()
        .trim()
        .to_string()
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

/// Render a composed layout to PDF bytes
pub fn render_pdf(layout: &ReportLayout) -> Result<Vec<u8>, DashboardError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        REPORT_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| DashboardError::Report(e.to_string()))?;

    for (page_number, page) in layout.pages.iter().enumerate() {
        let (page_index, layer_index) = if page_number == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for line in &page.lines {
            layer.set_fill_color(rgb(line.color));
            layer.use_text(
                pdf_safe(&line.text),
                line.size,
                Mm(line.x_mm),
                Mm(PAGE_HEIGHT_MM - line.y_mm),
                &font,
            );
        }
    }

    doc.save_to_bytes()
        .map_err(|e| DashboardError::Report(e.to_string()))
}

/// Compose, render and write the PDF report into `dir`
pub async fn write_report(
    result: &PredictionResult,
    generated_at: NaiveDateTime,
    dir: &Path,
) -> Result<PathBuf, DashboardError> {
    if !result.has_rows() {
        return Err(DashboardError::NothingToExport);
    }
    let layout = compose_report(result, generated_at);
    let bytes = render_pdf(&layout)?;
    let path = dir.join(REPORT_FILE_NAME);
    write_atomically(&path, &bytes).await?;
    info!(
        "Exported report with {} pages to {}",
        layout.pages.len(),
        path.display()
    );
    Ok(path)
}

/// Write to a sibling temporary file, then rename over the target
async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), DashboardError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Err(e) = tokio::fs::write(&tmp, bytes).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(DashboardError::io(&tmp, e));
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(DashboardError::io(path, e));
    }
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
