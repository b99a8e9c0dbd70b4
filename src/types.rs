use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Output format of column 0 and of every date shown to the operator.
pub const CANONICAL_DATE_FORMAT: &str = "%d/%m/%Y";

//==============================================================================
// Cells and tables
//==============================================================================

/// A single spreadsheet cell, reduced to the shapes the mapper cares about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Text rendering used for key comparisons and previews.
    ///
    /// Whole numbers drop their fractional part so a numeric `HOTEL` cell
    /// holding `101` compares equal to the key `"101"`.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date(d) => d.format(CANONICAL_DATE_FORMAT).to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Format a number for display, removing unnecessary decimal places
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    let rounded = (n * 1e6).round() / 1e6;
    format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// One worksheet: a header row plus data rows of equal width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(sheet_name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.headers.len(), CellValue::Empty);
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Column name → index, first occurrence wins for duplicated headers.
    pub fn column_index(&self) -> HashMap<&str, usize> {
        let mut index = HashMap::new();
        for (i, name) in self.headers.iter().enumerate() {
            index.entry(name.as_str()).or_insert(i);
        }
        index
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn column_values(&self, col: usize) -> Vec<&CellValue> {
        self.rows.iter().filter_map(|r| r.get(col)).collect()
    }
}

//==============================================================================
// Budget and aggregate records
//==============================================================================

/// Hotel identifier used to filter budget rows. Constant for one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HotelKey(String);

impl HotelKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HotelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A filtered budget row with its date already normalised.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetRecord {
    pub date: NaiveDate,
    pub segment: String,
    pub room_nights: f64,
    pub room_revenue: f64,
}

/// Sum of one (date, segment) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    #[serde(serialize_with = "serialize_canonical_date")]
    pub date: NaiveDate,
    pub segment: String,
    pub room_nights: f64,
    pub room_revenue: f64,
}

fn serialize_canonical_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format_canonical_date(*date))
}

pub fn format_canonical_date(date: NaiveDate) -> String {
    date.format(CANONICAL_DATE_FORMAT).to_string()
}

//==============================================================================
// Diagnostics
//==============================================================================

/// The two per-segment template columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    #[serde(rename = "RN")]
    RoomNights,
    #[serde(rename = "REV")]
    RoomRevenue,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::RoomNights => f.write_str("RN"),
            Metric::RoomRevenue => f.write_str("REV"),
        }
    }
}

/// Non-fatal findings, reported next to the preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Diagnostic {
    /// No budget row carries the hotel key; the output equals the template.
    EmptyFilter { hotel: String },
    /// A segment has no matching template column for one or both metrics.
    UnmappedSegment { segment: String, metrics: Vec<Metric> },
    /// More aggregate dates than template rows; trailing dates dropped.
    TemplateTooShort {
        template_rows: usize,
        dropped_dates: Vec<String>,
    },
    /// A write skipped because its date did not fit in the template.
    DateNotInTemplate { date: String, segment: String },
}

impl Diagnostic {
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::EmptyFilter { .. } => "EmptyFilter",
            Diagnostic::UnmappedSegment { .. } => "UnmappedSegment",
            Diagnostic::TemplateTooShort { .. } => "TemplateTooShort",
            Diagnostic::DateNotInTemplate { .. } => "DateNotInTemplate",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::EmptyFilter { hotel } => {
                write!(f, "no budget rows for hotel '{}'; output equals the template", hotel)
            }
            Diagnostic::UnmappedSegment { segment, metrics } => {
                let names: Vec<String> = metrics.iter().map(|m| m.to_string()).collect();
                write!(
                    f,
                    "segment '{}' has no template column for {}",
                    segment,
                    names.join(", ")
                )
            }
            Diagnostic::TemplateTooShort {
                template_rows,
                dropped_dates,
            } => write!(
                f,
                "template has {} rows; dropped {} date(s): {}",
                template_rows,
                dropped_dates.len(),
                dropped_dates.join(", ")
            ),
            Diagnostic::DateNotInTemplate { date, segment } => {
                write!(f, "skipped {} values for {}: date not in template", segment, date)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_text_whole_number() {
        assert_eq!(CellValue::Number(101.0).to_text(), "101");
        assert_eq!(CellValue::Number(12.5).to_text(), "12.5");
    }

    #[test]
    fn test_cell_date_renders_canonical() {
        let d = NaiveDate::from_ymd_opt(2025, 7, 3).unwrap();
        assert_eq!(CellValue::Date(d).to_text(), "03/07/2025");
    }

    #[test]
    fn test_push_row_pads_to_header_width() {
        let mut table = Table::new("Sheet1", vec!["a".into(), "b".into(), "c".into()]);
        table.push_row(vec![CellValue::Number(1.0)]);
        assert_eq!(table.rows[0].len(), 3);
        assert!(table.rows[0][2].is_empty());
    }

    #[test]
    fn test_column_index_first_duplicate_wins() {
        let table = Table::new("Sheet1", vec!["X".into(), "Y".into(), "X".into()]);
        assert_eq!(table.column_index()["X"], 0);
    }

    #[test]
    fn test_diagnostic_serializes_with_kind_tag() {
        let diag = Diagnostic::UnmappedSegment {
            segment: "VIP".into(),
            metrics: vec![Metric::RoomNights, Metric::RoomRevenue],
        };
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"kind\":\"UnmappedSegment\""));
        assert!(json.contains("[\"RN\",\"REV\"]"));
    }
}
