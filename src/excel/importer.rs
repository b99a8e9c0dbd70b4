//! Excel importer implementation - Excel (.xlsx) → Table

use crate::error::{MapperError, MapperResult};
use crate::types::{CellValue, Table};
use calamine::{open_workbook_from_rs, Data, DataType, Range, Reader, Xlsx};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Reads the first worksheet of an .xlsx workbook into a [`Table`].
pub struct ExcelImporter {
    bytes: Vec<u8>,
}

impl ExcelImporter {
    /// Create an importer over workbook bytes (an upload, for instance)
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Create an importer by reading a workbook file
    pub fn open<P: AsRef<Path>>(path: P) -> MapperResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Ok(Self::from_bytes(bytes))
    }

    /// Import the first worksheet
    pub fn import(&self) -> MapperResult<Table> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(self.bytes.as_slice()))
            .map_err(|e| MapperError::Workbook(format!("Failed to open Excel file: {}", e)))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| MapperError::Workbook("Workbook has no worksheets".to_string()))?;

        // The declared extent still counts blank rows and columns, which the
        // value range leaves out.
        let declared_end = workbook
            .worksheet_cells_reader(&sheet_name)
            .map(|reader| reader.dimensions().end)
            .map_err(|e| MapperError::Workbook(format!("Failed to read '{}': {}", sheet_name, e)))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| MapperError::Workbook(format!("Failed to read '{}': {}", sheet_name, e)))?;

        let table = Self::range_to_table(&sheet_name, &range, declared_end);
        debug!(
            sheet = %sheet_name,
            columns = table.column_count(),
            rows = table.row_count(),
            "imported worksheet"
        );
        Ok(table)
    }

    /// Sheet row 0 is the header; every following row up to the sheet's
    /// extent becomes a data row. Cells are addressed from `A1`, so leading
    /// blank columns and blank rows are kept.
    fn range_to_table(sheet_name: &str, range: &Range<Data>, declared_end: (u32, u32)) -> Table {
        let (last_row, last_col) = match range.end() {
            Some((row, col)) => (row.max(declared_end.0), col.max(declared_end.1)),
            None if declared_end != (0, 0) => declared_end,
            None => return Table::new(sheet_name, Vec::new()),
        };

        let headers: Vec<String> = (0..=last_col)
            .map(|col| Self::header_name(range.get_value((0, col))))
            .collect();

        let mut table = Table::new(sheet_name, headers);
        for row in 1..=last_row {
            table.push_row(
                (0..=last_col)
                    .map(|col| {
                        range
                            .get_value((row, col))
                            .map(Self::convert_cell)
                            .unwrap_or(CellValue::Empty)
                    })
                    .collect(),
            );
        }
        table
    }

    /// Header text as written; a blank header stays blank.
    fn header_name(cell: Option<&Data>) -> String {
        cell.map(|c| Self::convert_cell(c).to_text()).unwrap_or_default()
    }

    /// Convert a calamine cell to a [`CellValue`].
    pub fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::String(s) if s.is_empty() => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
                Some(d) => CellValue::Date(d),
                None => CellValue::Text(cell.to_string()),
            },
            Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }
}
