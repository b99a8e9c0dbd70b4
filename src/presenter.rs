//! Presenter - what the operator sees of a mapping run
//!
//! [`MappingReport`] is the JSON view served by the API and `preview --json`;
//! [`render_preview`] is the terminal view.

use crate::core::MappingOutcome;
use crate::types::{AggregateRow, CellValue, Diagnostic, Table};
use serde::Serialize;

/// Default number of output rows shown in a preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub row_count: usize,
}

impl From<&Table> for TableSummary {
    fn from(table: &Table) -> Self {
        Self {
            sheet_name: table.sheet_name.clone(),
            columns: table.headers.clone(),
            row_count: table.row_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticView {
    pub kind: &'static str,
    pub message: String,
    pub detail: Diagnostic,
}

impl From<&Diagnostic> for DiagnosticView {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            kind: diagnostic.kind(),
            message: diagnostic.to_string(),
            detail: diagnostic.clone(),
        }
    }
}

/// Serializable summary of one mapping run.
#[derive(Debug, Clone, Serialize)]
pub struct MappingReport {
    pub hotel_key: String,
    pub download_name: String,
    pub budget: TableSummary,
    pub template: TableSummary,
    pub filtered_rows: usize,
    pub aggregate: Vec<AggregateRow>,
    pub canonical_dates: Vec<String>,
    pub output_columns: Vec<String>,
    /// First `preview_rows` output rows
    pub preview: Vec<Vec<CellValue>>,
    pub output_rows: usize,
    pub diagnostics: Vec<DiagnosticView>,
}

impl MappingReport {
    pub fn from_outcome(outcome: &MappingOutcome, preview_rows: usize) -> Self {
        Self {
            hotel_key: outcome.hotel_key.to_string(),
            download_name: outcome.download_name().to_string(),
            budget: TableSummary::from(&outcome.budget),
            template: TableSummary::from(&outcome.template),
            filtered_rows: outcome.filtered_rows,
            aggregate: outcome.aggregate.clone(),
            canonical_dates: outcome.canonical_dates.clone(),
            output_columns: outcome.output.headers.clone(),
            preview: outcome.output.rows.iter().take(preview_rows).cloned().collect(),
            output_rows: outcome.output.row_count(),
            diagnostics: outcome.diagnostics.iter().map(DiagnosticView::from).collect(),
        }
    }
}

/// Plain-text table of the first `max_rows` rows.
pub fn render_table(table: &Table, max_rows: usize) -> String {
    let shown: Vec<Vec<String>> = table
        .rows
        .iter()
        .take(max_rows)
        .map(|row| row.iter().map(CellValue::to_text).collect())
        .collect();

    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &shown {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let format_line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_line(&table.headers)];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &shown {
        lines.push(format_line(row));
    }
    if table.row_count() > max_rows {
        lines.push(format!("... {} more row(s)", table.row_count() - max_rows));
    }
    lines.join("\n")
}

/// Terminal preview: run summary, output rows, diagnostics.
pub fn render_preview(outcome: &MappingOutcome, max_rows: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("Hotel: {}\n", outcome.hotel_key));
    out.push_str(&format!(
        "Budget rows: {} ({} for this hotel)\n",
        outcome.budget.row_count(),
        outcome.filtered_rows
    ));
    out.push_str(&format!(
        "Aggregate: {} (date, segment) group(s) over {} date(s)\n\n",
        outcome.aggregate.len(),
        outcome.canonical_dates.len()
    ));
    out.push_str(&render_table(&outcome.output, max_rows));
    out.push('\n');

    if !outcome.diagnostics.is_empty() {
        out.push_str("\nDiagnostics:\n");
        for diagnostic in &outcome.diagnostics {
            out.push_str(&format!("  [{}] {}\n", diagnostic.kind(), diagnostic));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let mut t = Table::new("Daily", vec!["Date".into(), "LEIS_RN".into()]);
        t.push_row(vec![CellValue::Text("01/01/2025".into()), CellValue::Number(5.0)]);
        t.push_row(vec![CellValue::Empty, CellValue::Empty]);
        t.push_row(vec![CellValue::Empty, CellValue::Number(1.5)]);
        t
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let text = render_table(&table(), 10);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Date       | LEIS_RN");
        assert_eq!(lines[1], "-----------+--------");
        assert_eq!(lines[2], "01/01/2025 | 5");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_render_table_truncates() {
        let text = render_table(&table(), 1);
        assert!(text.ends_with("... 2 more row(s)"));
    }

    #[test]
    fn test_table_summary() {
        let summary = TableSummary::from(&table());
        assert_eq!(summary.row_count, 3);
        assert_eq!(summary.columns, vec!["Date", "LEIS_RN"]);
    }
}
