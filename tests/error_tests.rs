//! Error and diagnostic message tests

use hotel_budget_mapper::error::MapperError;
use hotel_budget_mapper::types::{Diagnostic, Metric};
use pretty_assertions::assert_eq;

// ═══════════════════════════════════════════════════════════════════════════
// FATAL ERRORS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_bad_template_name_display() {
    let err = MapperError::BadTemplateName {
        name: "ARTDAILY.xlsx".into(),
    };
    assert_eq!(
        err.to_string(),
        "Bad template name 'ARTDAILY.xlsx': expected '<HOTELKEY>_<anything>.xlsx'"
    );
    assert_eq!(err.kind(), "BadTemplateName");
}

#[test]
fn test_missing_budget_column_lists_all() {
    let err = MapperError::MissingBudgetColumn {
        columns: vec!["GIORNO".into(), "RR".into()],
    };
    assert_eq!(
        err.to_string(),
        "Budget is missing required column(s): GIORNO, RR"
    );
    assert_eq!(err.kind(), "MissingBudgetColumn");
}

#[test]
fn test_bad_budget_date_display() {
    let err = MapperError::BadBudgetDate {
        row: 7,
        value: "2025-01-01".into(),
    };
    assert_eq!(
        err.to_string(),
        "Bad budget date '2025-01-01' at row 7: expected DD/MM/YY"
    );
}

#[test]
fn test_bad_budget_number_display() {
    let err = MapperError::BadBudgetNumber {
        row: 3,
        column: "RR".into(),
        value: "n/a".into(),
    };
    assert_eq!(err.to_string(), "Bad budget number 'n/a' in column RR at row 3");
    assert_eq!(err.kind(), "BadBudgetNumber");
}

#[test]
fn test_io_error_from_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: MapperError = io.into();
    assert!(err.to_string().starts_with("IO error:"));
    assert_eq!(err.kind(), "Io");
}

#[test]
fn test_string_variants() {
    assert_eq!(
        MapperError::Workbook("corrupt".into()).to_string(),
        "Workbook error: corrupt"
    );
    assert_eq!(
        MapperError::Export("disk full".into()).to_string(),
        "Export error: disk full"
    );
    assert_eq!(
        MapperError::Config("bad yaml".into()).to_string(),
        "Configuration error: bad yaml"
    );
}

#[test]
fn test_errors_convert_to_anyhow() {
    fn fails() -> anyhow::Result<()> {
        Err(MapperError::Workbook("x".into()))?;
        Ok(())
    }
    assert_eq!(fails().unwrap_err().to_string(), "Workbook error: x");
}

// ═══════════════════════════════════════════════════════════════════════════
// DIAGNOSTICS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_unmapped_segment_display() {
    let diagnostic = Diagnostic::UnmappedSegment {
        segment: "VIP".into(),
        metrics: vec![Metric::RoomNights, Metric::RoomRevenue],
    };
    assert_eq!(
        diagnostic.to_string(),
        "segment 'VIP' has no template column for RN, REV"
    );
}

#[test]
fn test_diagnostic_json_is_tagged() {
    let diagnostic = Diagnostic::TemplateTooShort {
        template_rows: 5,
        dropped_dates: vec!["06/01/2025".into()],
    };
    let json = serde_json::to_value(&diagnostic).unwrap();
    assert_eq!(json["kind"], "TemplateTooShort");
    assert_eq!(json["template_rows"], 5);
    assert_eq!(json["dropped_dates"][0], "06/01/2025");
}
