//! Hotel Budget Mapper - project a multi-hotel budget onto a hotel template
//!
//! An operator supplies two workbooks: a daily budget export covering many
//! hotels and a per-hotel template with `<SEGMENT>_RN` / `<SEGMENT>_REV`
//! columns. The mapper keeps the template's hotel rows, sums room nights and
//! revenue per day and market segment, and writes the sums into a copy of
//! the template.
//!
//! # Example
//!
//! ```no_run
//! use hotel_budget_mapper::core::BudgetMapper;
//!
//! let budget = std::fs::read("budget.xlsx")?;
//! let template = std::fs::read("ART_DAILY.xlsx")?;
//!
//! let outcome = BudgetMapper::default().map_workbooks(&budget, &template, "ART_DAILY.xlsx")?;
//! for diagnostic in &outcome.diagnostics {
//!     println!("{}", diagnostic);
//! }
//! std::fs::write(outcome.download_name(), outcome.to_workbook()?)?;
//! # Ok::<(), hotel_budget_mapper::error::MapperError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod logging;
pub mod presenter;
pub mod types;

// Re-export commonly used types
pub use error::{MapperError, MapperResult};
pub use types::{AggregateRow, CellValue, Diagnostic, HotelKey, Table};
