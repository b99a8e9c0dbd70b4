//! Workbook-level tests: import, export, and mapping on real .xlsx bytes

use chrono::NaiveDate;
use hotel_budget_mapper::core::BudgetMapper;
use hotel_budget_mapper::error::MapperError;
use hotel_budget_mapper::excel::{ExcelExporter, ExcelImporter};
use hotel_budget_mapper::types::{CellValue, Table};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// ═══════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

fn num(n: f64) -> CellValue {
    CellValue::Number(n)
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn budget_table() -> Table {
    let mut table = Table::new("Budget", headers(&["HOTEL", "GIORNO", "MKT_OPERA", "RN", "RR"]));
    table.push_row(vec![text("ART"), text("01/01/25"), text("LEIS"), num(2.0), num(200.0)]);
    table.push_row(vec![text("ART"), text("01/01/25"), text("LEIS"), num(3.0), num(330.0)]);
    table.push_row(vec![text("ART"), text("02/01/25"), text("CORP"), num(1.0), num(150.0)]);
    table.push_row(vec![text("XYZ"), text("01/01/25"), text("LEIS"), num(9.0), num(900.0)]);
    table
}

fn template_table(rows: usize) -> Table {
    let mut table = Table::new(
        "Daily",
        headers(&["Date", "LEIS_RN", "LEIS_REV", "CORP_RN", "CORP_REV"]),
    );
    for _ in 0..rows {
        table.push_row(vec![CellValue::Empty; 5]);
    }
    table
}

fn xlsx(table: &Table) -> Vec<u8> {
    ExcelExporter::new(table).to_bytes().unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// IMPORT / EXPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_blank_template_rows_survive_round_trip() {
    let template = template_table(31);
    let imported = ExcelImporter::from_bytes(xlsx(&template)).import().unwrap();

    assert_eq!(imported.sheet_name, "Daily");
    assert_eq!(imported.headers, template.headers);
    assert_eq!(imported.row_count(), 31);
    assert!(imported.rows.iter().flatten().all(CellValue::is_empty));
}

#[test]
fn test_export_to_file_and_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("ART_DAILY.xlsx");

    let table = budget_table();
    ExcelExporter::new(&table).export(&path).unwrap();

    let imported = ExcelImporter::open(&path).unwrap().import().unwrap();
    assert_eq!(imported, table);
}

#[test]
fn test_open_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = ExcelImporter::open(dir.path().join("missing.xlsx"));
    assert!(matches!(result, Err(MapperError::Io(_))));
}

#[test]
fn test_garbage_bytes_are_workbook_error() {
    let result = ExcelImporter::from_bytes(b"not a workbook".to_vec()).import();
    match result {
        Err(e @ MapperError::Workbook(_)) => assert_eq!(e.kind(), "Workbook"),
        other => panic!("expected Workbook error, got {other:?}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// MAPPING ON WORKBOOK BYTES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_map_workbooks_end_to_end() {
    let outcome = BudgetMapper::default()
        .map_workbooks(&xlsx(&budget_table()), &xlsx(&template_table(31)), "ART_1_MAJOR_DAILY.xlsx")
        .unwrap();

    assert_eq!(outcome.filtered_rows, 3);
    assert_eq!(outcome.output.row_count(), 31);
    assert_eq!(outcome.canonical_dates, vec!["01/01/2025", "02/01/2025"]);
    assert!(outcome.diagnostics.is_empty());

    let reread = ExcelImporter::from_bytes(outcome.to_workbook().unwrap())
        .import()
        .unwrap();
    assert_eq!(reread, outcome.output);
    assert_eq!(reread.rows[0], vec![text("01/01/2025"), num(5.0), num(530.0), CellValue::Empty, CellValue::Empty]);
    assert_eq!(reread.rows[1], vec![text("02/01/2025"), CellValue::Empty, CellValue::Empty, num(1.0), num(150.0)]);
}

#[test]
fn test_blank_template_headers_and_cells_pass_through() {
    let mut template = Table::new("Daily", headers(&["Date", "", "LEIS_RN", ""]));
    template.push_row(vec![CellValue::Empty, text("  "), CellValue::Empty, CellValue::Empty]);
    for _ in 0..4 {
        template.push_row(Vec::new());
    }

    let outcome = BudgetMapper::default()
        .map_workbooks(&xlsx(&budget_table()), &xlsx(&template), "ART_DAILY.xlsx")
        .unwrap();
    let reread = ExcelImporter::from_bytes(outcome.to_workbook().unwrap())
        .import()
        .unwrap();

    assert_eq!(reread.headers, template.headers);
    assert_eq!(reread.row_count(), 5);
    assert_eq!(reread.rows[0][1], text("  "));
    assert_eq!(reread.rows[0][2], num(5.0));
    for row in &reread.rows[2..] {
        assert!(row.iter().all(CellValue::is_empty));
    }
}

#[test]
fn test_native_date_cells_in_budget() {
    let mut budget = Table::new("Budget", headers(&["HOTEL", "GIORNO", "MKT_OPERA", "RN", "RR"]));
    budget.push_row(vec![
        text("ART"),
        CellValue::Date(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()),
        text("LEIS"),
        num(4.0),
        num(480.0),
    ]);

    let outcome = BudgetMapper::default()
        .map_workbooks(&xlsx(&budget), &xlsx(&template_table(3)), "ART_DAILY.xlsx")
        .unwrap();

    assert_eq!(outcome.canonical_dates, vec!["14/03/2025"]);
    assert_eq!(outcome.output.rows[0][1], num(4.0));
}

#[test]
fn test_bad_template_name_fails_before_parsing() {
    // Workbook bytes are garbage; the name check must fire first.
    let result = BudgetMapper::default().map_workbooks(b"x", b"y", "ARTDAILY.xlsx");
    assert!(matches!(result, Err(MapperError::BadTemplateName { .. })));
}

#[test]
fn test_missing_budget_columns_listed() {
    let mut budget = Table::new("Budget", headers(&["HOTEL", "GIORNO", "RN"]));
    budget.push_row(vec![text("ART"), text("01/01/25"), num(1.0)]);

    let result = BudgetMapper::default().map_workbooks(
        &xlsx(&budget),
        &xlsx(&template_table(3)),
        "ART_DAILY.xlsx",
    );
    match result {
        Err(MapperError::MissingBudgetColumn { columns }) => {
            assert_eq!(columns, vec!["MKT_OPERA".to_string(), "RR".to_string()]);
        }
        other => panic!("expected MissingBudgetColumn, got {other:?}"),
    }
}
