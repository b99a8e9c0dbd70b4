//! Segment aggregator - sums RN and RR per (date, segment)

use crate::config::BudgetColumns;
use crate::core::dates::DatedRow;
use crate::error::{MapperError, MapperResult};
use crate::types::{AggregateRow, BudgetRecord, CellValue, Table};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Positions of the required budget columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetSchema {
    pub hotel: usize,
    pub date: usize,
    pub segment: usize,
    pub room_nights: usize,
    pub room_revenue: usize,
}

impl BudgetSchema {
    /// Locate every required column, reporting all the missing ones at once.
    pub fn resolve(budget: &Table, columns: &BudgetColumns) -> MapperResult<Self> {
        let index = budget.column_index();
        let missing: Vec<String> = columns
            .required()
            .iter()
            .filter(|name| !index.contains_key(**name))
            .map(|name| name.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(MapperError::MissingBudgetColumn { columns: missing });
        }

        Ok(Self {
            hotel: index[columns.hotel.as_str()],
            date: index[columns.date.as_str()],
            segment: index[columns.segment.as_str()],
            room_nights: index[columns.room_nights.as_str()],
            room_revenue: index[columns.room_revenue.as_str()],
        })
    }
}

/// Read segment and amounts of each dated row.
///
/// Rows without a segment are skipped, mirroring a group-by that ignores
/// missing keys. Empty amount cells count as zero.
pub fn to_records(
    rows: &[DatedRow<'_>],
    schema: &BudgetSchema,
    columns: &BudgetColumns,
) -> MapperResult<Vec<BudgetRecord>> {
    let mut records = Vec::with_capacity(rows.len());
    for dated in rows {
        let segment = dated.row.get(schema.segment).to_text();
        if segment.is_empty() {
            debug!(row = dated.row.line, "skipping budget row without segment");
            continue;
        }
        let room_nights = read_amount(dated, schema.room_nights, &columns.room_nights)?;
        let room_revenue = read_amount(dated, schema.room_revenue, &columns.room_revenue)?;
        records.push(BudgetRecord {
            date: dated.date,
            segment,
            room_nights,
            room_revenue,
        });
    }
    Ok(records)
}

fn read_amount(dated: &DatedRow<'_>, col: usize, column_name: &str) -> MapperResult<f64> {
    let cell = dated.row.get(col);
    let bad = || MapperError::BadBudgetNumber {
        row: dated.row.line,
        column: column_name.to_string(),
        value: cell.to_text(),
    };
    match cell {
        CellValue::Empty => Ok(0.0),
        CellValue::Number(n) if n.is_finite() => Ok(*n),
        CellValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(bad),
        _ => Err(bad()),
    }
}

/// Group by (date, segment) and sum, sorted by date then segment.
///
/// Sums do not depend on budget row order: each group's amounts are sorted
/// before they are added.
pub fn aggregate(records: &[BudgetRecord]) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<(NaiveDate, &str), (Vec<f64>, Vec<f64>)> = BTreeMap::new();

    for record in records {
        let entry = groups
            .entry((record.date, record.segment.as_str()))
            .or_default();
        entry.0.push(record.room_nights);
        entry.1.push(record.room_revenue);
    }

    let rows: Vec<AggregateRow> = groups
        .into_iter()
        .map(|((date, segment), (room_nights, room_revenue))| AggregateRow {
            date,
            segment: segment.to_string(),
            room_nights: ordered_sum(room_nights),
            room_revenue: ordered_sum(room_revenue),
        })
        .collect();

    debug!(records = records.len(), groups = rows.len(), "aggregated budget");
    rows
}

fn ordered_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

/// Distinct aggregate dates, ascending.
pub fn distinct_dates(aggregate: &[AggregateRow]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = aggregate.iter().map(|a| a.date).collect();
    dates.dedup();
    dates
}
