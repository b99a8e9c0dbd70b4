//! Tabular I/O adapter
//!
//! - Import: Excel (.xlsx) → [`crate::types::Table`] (first sheet, header row)
//! - Export: [`crate::types::Table`] → Excel (.xlsx), in memory or on disk

mod exporter;
mod importer;

pub use exporter::{write_atomically, ExcelExporter};
pub use importer::ExcelImporter;
