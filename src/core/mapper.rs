//! Mapping pipeline
//!
//! hotel key → budget schema → filter → date normaliser → aggregator →
//! projector. Pure: the input tables are borrowed read-only and every stage
//! returns a new value. Any fatal error aborts the whole run.

use crate::config::MappingConfig;
use crate::core::aggregator::{aggregate, to_records, BudgetSchema};
use crate::core::dates::normalise_dates;
use crate::core::filter::filter_budget;
use crate::core::hotel_key::HotelSelector;
use crate::core::projector::project;
use crate::error::MapperResult;
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::types::{AggregateRow, Diagnostic, HotelKey, Table};
use tracing::{info, warn};

/// Everything one run produced, for the presenter and the download.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingOutcome {
    pub hotel_key: HotelKey,
    pub template_name: String,
    pub budget: Table,
    pub template: Table,
    pub filtered_rows: usize,
    pub aggregate: Vec<AggregateRow>,
    pub canonical_dates: Vec<String>,
    pub output: Table,
    pub diagnostics: Vec<Diagnostic>,
}

impl MappingOutcome {
    /// Download name: the template's file name, unchanged.
    pub fn download_name(&self) -> &str {
        &self.template_name
    }

    pub fn to_workbook(&self) -> MapperResult<Vec<u8>> {
        ExcelExporter::new(&self.output).to_bytes()
    }
}

/// Maps budget exports onto hotel templates.
#[derive(Debug, Clone, Default)]
pub struct BudgetMapper {
    config: MappingConfig,
    selector: HotelSelector,
}

impl BudgetMapper {
    pub fn new(config: MappingConfig) -> Self {
        Self {
            config,
            selector: HotelSelector::default(),
        }
    }

    pub fn with_selector(mut self, selector: HotelSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Map already-loaded tables.
    pub fn map_tables(
        &self,
        budget: Table,
        template: Table,
        template_name: &str,
    ) -> MapperResult<MappingOutcome> {
        let hotel_key = self.selector.resolve(template_name)?;
        let schema = BudgetSchema::resolve(&budget, &self.config.budget)?;

        let mut diagnostics = Vec::new();

        let filtered = filter_budget(&budget, &schema, &hotel_key);
        if filtered.is_empty() {
            diagnostics.push(Diagnostic::EmptyFilter {
                hotel: hotel_key.to_string(),
            });
        }

        let dated = normalise_dates(&filtered, &schema)?;
        let records = to_records(&dated, &schema, &self.config.budget)?;
        let aggregate = aggregate(&records);
        let projection = project(&template, &aggregate, &self.config.template);
        diagnostics.extend(projection.diagnostics);

        for diagnostic in &diagnostics {
            warn!(kind = diagnostic.kind(), "{}", diagnostic);
        }
        info!(
            hotel = %hotel_key,
            template = template_name,
            budget_rows = budget.row_count(),
            filtered_rows = filtered.len(),
            aggregate_rows = aggregate.len(),
            diagnostics = diagnostics.len(),
            "mapping complete"
        );

        let filtered_rows = filtered.len();
        Ok(MappingOutcome {
            hotel_key,
            template_name: template_name.to_string(),
            budget,
            template,
            filtered_rows,
            aggregate,
            canonical_dates: projection.canonical_dates,
            output: projection.output,
            diagnostics,
        })
    }

    /// Map raw workbook bytes (uploads or files read from disk).
    pub fn map_workbooks(
        &self,
        budget_bytes: &[u8],
        template_bytes: &[u8],
        template_name: &str,
    ) -> MapperResult<MappingOutcome> {
        // Fail on the name before paying for workbook parsing.
        self.selector.resolve(template_name)?;
        let budget = ExcelImporter::from_bytes(budget_bytes).import()?;
        let template = ExcelImporter::from_bytes(template_bytes).import()?;
        self.map_tables(budget, template, template_name)
    }
}
