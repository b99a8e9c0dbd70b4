//! Excel exporter implementation - Table → Excel (.xlsx)

use crate::error::{MapperError, MapperResult};
use crate::types::{CellValue, Table};
use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Writes a [`Table`] as a single-sheet workbook.
pub struct ExcelExporter<'a> {
    table: &'a Table,
}

impl<'a> ExcelExporter<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    /// Serialise the workbook to memory
    pub fn to_bytes(&self) -> MapperResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        if !self.table.sheet_name.is_empty() {
            worksheet
                .set_name(&self.table.sheet_name)
                .map_err(|e| MapperError::Export(format!("Failed to set worksheet name: {}", e)))?;
        }

        self.write_table(worksheet)?;

        let bytes = workbook
            .save_to_buffer()
            .map_err(|e| MapperError::Export(format!("Failed to serialise workbook: {}", e)))?;
        debug!(bytes = bytes.len(), rows = self.table.row_count(), "exported workbook");
        Ok(bytes)
    }

    /// Write the workbook to `output_path`.
    ///
    /// The bytes go to a temporary file in the destination directory first and
    /// are moved into place only once fully written, so a failed run never
    /// leaves a partial workbook behind.
    pub fn export(&self, output_path: &Path) -> MapperResult<()> {
        let bytes = self.to_bytes()?;
        write_atomically(output_path, &bytes)
    }

    fn write_table(&self, worksheet: &mut Worksheet) -> MapperResult<()> {
        let date_format = Format::new().set_num_format("dd/mm/yyyy");
        // Blank cells carrying a format stay blank in Excel but still count
        // toward the sheet extent, so blank headers and rows survive re-import.
        let blank_format = Format::new().set_num_format("@");

        for (col_idx, name) in self.table.headers.iter().enumerate() {
            let result = if name.is_empty() {
                worksheet.write_blank(0, col_idx as u16, &blank_format)
            } else {
                worksheet.write_string(0, col_idx as u16, name)
            };
            result.map_err(|e| MapperError::Export(format!("Failed to write header: {}", e)))?;
        }

        for (row_idx, row) in self.table.rows.iter().enumerate() {
            let excel_row = (row_idx + 1) as u32; // +1 for header row

            if row.iter().all(CellValue::is_empty) {
                worksheet
                    .write_blank(excel_row, 0, &blank_format)
                    .map_err(|e| MapperError::Export(format!("Failed to write cell: {}", e)))?;
                continue;
            }

            for (col_idx, cell) in row.iter().enumerate() {
                Self::write_cell(worksheet, excel_row, col_idx as u16, cell, &date_format)?;
            }
        }

        Ok(())
    }

    fn write_cell(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        cell: &CellValue,
        date_format: &Format,
    ) -> MapperResult<()> {
        let result = match cell {
            CellValue::Empty => return Ok(()),
            CellValue::Text(s) => worksheet.write_string(row, col, s).map(|_| ()),
            CellValue::Number(n) => worksheet.write_number(row, col, *n).map(|_| ()),
            CellValue::Bool(b) => worksheet.write_boolean(row, col, *b).map(|_| ()),
            CellValue::Date(d) => {
                let datetime = ExcelDateTime::from_ymd(d.year() as u16, d.month() as u8, d.day() as u8)
                    .map_err(|e| MapperError::Export(format!("Unrepresentable date {}: {}", d, e)))?;
                worksheet
                    .write_datetime_with_format(row, col, &datetime, date_format)
                    .map(|_| ())
            }
        };
        result.map_err(|e| MapperError::Export(format!("Failed to write cell: {}", e)))
    }
}

/// Write `bytes` to `path` through a temp file in the same directory.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> MapperResult<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| MapperError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::ExcelImporter;
    use chrono::NaiveDate;

    fn sample_table() -> Table {
        let mut table = Table::new(
            "Daily",
            vec!["Date".into(), "LEIS_RN".into(), "LEIS_REV".into()],
        );
        table.push_row(vec![
            CellValue::Text("01/01/2025".into()),
            CellValue::Number(5.0),
            CellValue::Number(530.0),
        ]);
        table.push_row(vec![CellValue::Empty, CellValue::Empty, CellValue::Empty]);
        table.push_row(vec![
            CellValue::Date(NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()),
            CellValue::Bool(true),
            CellValue::Empty,
        ]);
        table
    }

    #[test]
    fn test_to_bytes_produces_zip() {
        let bytes = ExcelExporter::new(&sample_table()).to_bytes().unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_round_trip_keeps_shape_and_blank_rows() {
        let table = sample_table();
        let bytes = ExcelExporter::new(&table).to_bytes().unwrap();
        let back = ExcelImporter::from_bytes(bytes).import().unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_round_trip_keeps_blank_headers_and_trailing_rows() {
        let mut table = Table::new(
            "Daily",
            vec!["".into(), "NOTES".into(), "".into(), "LEIS_RN".into()],
        );
        table.push_row(vec![CellValue::Empty, CellValue::Text("  ".into())]);
        table.push_row(Vec::new());
        table.push_row(Vec::new());
        let bytes = ExcelExporter::new(&table).to_bytes().unwrap();
        let back = ExcelImporter::from_bytes(bytes).import().unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_export_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("ART_DAILY.xlsx");
        ExcelExporter::new(&sample_table()).export(&path).unwrap();
        assert!(path.exists());
        // No stray temp files remain next to the output
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
