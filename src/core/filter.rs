//! Budget filter - keeps the rows of one hotel

use crate::core::aggregator::BudgetSchema;
use crate::types::{CellValue, HotelKey, Table};
use tracing::debug;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// A borrowed budget row plus its position in the source sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRow<'a> {
    /// 1-based spreadsheet row number (the header is row 1)
    pub line: usize,
    pub cells: &'a [CellValue],
}

impl<'a> SourceRow<'a> {
    pub fn get(&self, col: usize) -> &'a CellValue {
        self.cells.get(col).unwrap_or(&EMPTY_CELL)
    }
}

/// Rows whose hotel column equals `key` exactly (case-sensitive).
///
/// An empty result is not an error; the caller reports it as a warning.
pub fn filter_budget<'a>(
    budget: &'a Table,
    schema: &BudgetSchema,
    key: &HotelKey,
) -> Vec<SourceRow<'a>> {
    let rows: Vec<SourceRow<'a>> = budget
        .rows
        .iter()
        .enumerate()
        .map(|(idx, cells)| SourceRow {
            line: idx + 2,
            cells: cells.as_slice(),
        })
        .filter(|row| matches_hotel(row.get(schema.hotel), key))
        .collect();

    debug!(
        hotel = %key,
        kept = rows.len(),
        total = budget.row_count(),
        "filtered budget"
    );
    rows
}

fn matches_hotel(cell: &CellValue, key: &HotelKey) -> bool {
    match cell {
        CellValue::Empty => false,
        CellValue::Text(s) => s == key.as_str(),
        other => other.to_text() == key.as_str(),
    }
}
