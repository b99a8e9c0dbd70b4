//! Schema projector - writes the aggregate into the template layout
//!
//! The template is never modified; the output starts as a copy of it and
//! cells change only through two paths:
//!
//! - column 0 of rows `0..n` receives the canonical date list
//!   (`DD/MM/YYYY`, ascending, distinct), `n` capped by the row count;
//! - for each aggregate row, the `_RN`/`_REV` target columns of its segment
//!   receive the sums on the first row whose column 0 equals its date.
//!
//! Every other cell keeps the template value.

use crate::config::TemplateColumns;
use crate::core::aggregator::distinct_dates;
use crate::types::{format_canonical_date, AggregateRow, CellValue, Diagnostic, Metric, Table};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Index of the date column in every template.
pub const DATE_COLUMN: usize = 0;

/// Result of projecting an aggregate onto a template.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub output: Table,
    /// Dates written into column 0, in order
    pub canonical_dates: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Target columns of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentColumns {
    pub room_nights: Option<usize>,
    pub room_revenue: Option<usize>,
}

impl SegmentColumns {
    pub fn resolve(headers: &[String], segment: &str, suffixes: &TemplateColumns) -> Self {
        Self {
            room_nights: find_metric_column(headers, segment, &suffixes.room_nights_suffix),
            room_revenue: find_metric_column(headers, segment, &suffixes.revenue_suffix),
        }
    }

    fn missing(&self) -> Vec<Metric> {
        let mut missing = Vec::new();
        if self.room_nights.is_none() {
            missing.push(Metric::RoomNights);
        }
        if self.room_revenue.is_none() {
            missing.push(Metric::RoomRevenue);
        }
        missing
    }

    fn is_unmapped(&self) -> bool {
        self.room_nights.is_none() && self.room_revenue.is_none()
    }
}

/// First column named `<segment>…<suffix>`: starts with the segment and
/// ends with the suffix, so `GRP` finds both `GRP_RN` and `GRP_INT_RN`.
///
/// The date column is never a target. Prefix and suffix may overlap: a
/// segment `X_RN` matches a column named `X_RN`.
pub fn find_metric_column(headers: &[String], segment: &str, suffix: &str) -> Option<usize> {
    if segment.is_empty() {
        return None;
    }
    headers
        .iter()
        .enumerate()
        .skip(DATE_COLUMN + 1)
        .find(|(_, name)| name.starts_with(segment) && name.ends_with(suffix))
        .map(|(idx, _)| idx)
}

/// Project `aggregate` (sorted by date, then segment) onto `template`.
pub fn project(template: &Table, aggregate: &[AggregateRow], suffixes: &TemplateColumns) -> Projection {
    let mut output = template.clone();
    let mut diagnostics = Vec::new();

    let all_dates: Vec<String> = distinct_dates(aggregate)
        .into_iter()
        .map(format_canonical_date)
        .collect();

    let fill = if output.column_count() > DATE_COLUMN {
        all_dates.len().min(output.row_count())
    } else {
        0
    };
    for (row, date) in output.rows.iter_mut().zip(&all_dates[..fill]) {
        set_cell(row, DATE_COLUMN, CellValue::Text(date.clone()));
    }
    clear_repeated_dates(&mut output.rows[fill..], &all_dates[..fill]);

    if fill < all_dates.len() {
        diagnostics.push(Diagnostic::TemplateTooShort {
            template_rows: template.row_count(),
            dropped_dates: all_dates[fill..].to_vec(),
        });
    }
    let canonical_dates = all_dates[..fill].to_vec();

    let row_of_date = index_date_rows(&output);

    let mut segment_columns: BTreeMap<&str, SegmentColumns> = BTreeMap::new();
    for entry in aggregate {
        segment_columns
            .entry(entry.segment.as_str())
            .or_insert_with(|| SegmentColumns::resolve(&output.headers, &entry.segment, suffixes));
    }
    for (segment, columns) in &segment_columns {
        let missing = columns.missing();
        if !missing.is_empty() {
            diagnostics.push(Diagnostic::UnmappedSegment {
                segment: segment.to_string(),
                metrics: missing,
            });
        }
    }

    let mut written = 0usize;
    for entry in aggregate {
        let columns = segment_columns[entry.segment.as_str()];
        if columns.is_unmapped() {
            continue;
        }
        let date = format_canonical_date(entry.date);
        let Some(&row_idx) = row_of_date.get(date.as_str()) else {
            diagnostics.push(Diagnostic::DateNotInTemplate {
                date,
                segment: entry.segment.clone(),
            });
            continue;
        };
        let row = &mut output.rows[row_idx];
        if let Some(col) = columns.room_nights {
            set_cell(row, col, CellValue::Number(entry.room_nights));
        }
        if let Some(col) = columns.room_revenue {
            set_cell(row, col, CellValue::Number(entry.room_revenue));
        }
        written += 1;
    }

    debug!(
        dates = canonical_dates.len(),
        written,
        diagnostics = diagnostics.len(),
        "projected aggregate onto template"
    );

    Projection {
        output,
        canonical_dates,
        diagnostics,
    }
}

fn set_cell(row: &mut Vec<CellValue>, col: usize, value: CellValue) {
    if row.len() <= col {
        row.resize(col + 1, CellValue::Empty);
    }
    row[col] = value;
}

/// Blank column-0 cells below the filled range that repeat a written date,
/// so each date appears in column 0 at most once.
fn clear_repeated_dates(rows: &mut [Vec<CellValue>], written: &[String]) {
    let written: HashSet<&str> = written.iter().map(String::as_str).collect();
    for row in rows {
        if let Some(cell) = row.get_mut(DATE_COLUMN) {
            if !cell.is_empty() && written.contains(cell.to_text().as_str()) {
                *cell = CellValue::Empty;
            }
        }
    }
}

/// Column-0 text → first row carrying it, scanning top to bottom.
fn index_date_rows(table: &Table) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (idx, row) in table.rows.iter().enumerate() {
        if let Some(cell) = row.get(DATE_COLUMN) {
            if !cell.is_empty() {
                index.entry(cell.to_text()).or_insert(idx);
            }
        }
    }
    index
}
