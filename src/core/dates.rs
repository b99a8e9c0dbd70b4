//! Date normaliser for the budget `GIORNO` column
//!
//! Text dates must be exactly `DD/MM/YY`; the year is always 20YY. Native
//! spreadsheet date cells are taken as they are.

use crate::core::aggregator::BudgetSchema;
use crate::core::filter::SourceRow;
use crate::error::{MapperError, MapperResult};
use crate::types::CellValue;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// A filtered budget row with its parsed date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedRow<'a> {
    pub date: NaiveDate,
    pub row: SourceRow<'a>,
}

fn budget_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{2})/(\d{2})/(\d{2})$").expect("budget date pattern is valid")
    })
}

/// Parse `DD/MM/YY` text. Returns `None` for anything else, including
/// well-formed strings naming a day that does not exist.
pub fn parse_budget_date_str(value: &str) -> Option<NaiveDate> {
    let caps = budget_date_pattern().captures(value)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(2000 + year, month, day)
}

pub fn parse_budget_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Text(s) => parse_budget_date_str(s),
        CellValue::Date(d) => Some(*d),
        _ => None,
    }
}

/// Parse the date of every row. The first malformed value aborts the run.
pub fn normalise_dates<'a>(
    rows: &[SourceRow<'a>],
    schema: &BudgetSchema,
) -> MapperResult<Vec<DatedRow<'a>>> {
    rows.iter()
        .map(|row| {
            let cell = row.get(schema.date);
            parse_budget_date(cell)
                .map(|date| DatedRow { date, row: *row })
                .ok_or_else(|| MapperError::BadBudgetDate {
                    row: row.line,
                    value: cell.to_text(),
                })
        })
        .collect()
}
