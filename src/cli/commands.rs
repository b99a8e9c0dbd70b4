use crate::config::MappingConfig;
use crate::core::hotel_key::template_file_name;
use crate::core::{BudgetMapper, HotelSelector, MappingOutcome};
use crate::error::{MapperError, MapperResult};
use crate::excel::write_atomically;
use crate::presenter::{render_preview, MappingReport};
use crate::types::Diagnostic;
use colored::Colorize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory used when `map` gets no `--output`.
pub const DEFAULT_OUTPUT_DIR: &str = "mapped";

/// Options shared by `map` and `preview`
#[derive(Debug, Clone, Default)]
pub struct MapOptions {
    pub hotel: Option<String>,
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

fn run_mapping(budget: &Path, template: &Path, options: &MapOptions) -> MapperResult<MappingOutcome> {
    let config = MappingConfig::load(options.config.as_deref())?;
    let template_name = template_file_name(template)?;
    let mapper =
        BudgetMapper::new(config).with_selector(HotelSelector::from_override(options.hotel.clone()));

    let budget_bytes = fs::read(budget)?;
    let template_bytes = fs::read(template)?;

    mapper.map_workbooks(&budget_bytes, &template_bytes, &template_name)
}

/// Execute the map command
pub fn map(
    budget: PathBuf,
    template: PathBuf,
    output: Option<PathBuf>,
    options: MapOptions,
) -> MapperResult<()> {
    println!("{}", "🏨 Budget Mapper - Mapping budget onto template".bold().green());
    println!("   Budget:   {}", budget.display());
    println!("   Template: {}", template.display());
    println!();

    if options.verbose {
        println!("{}", "📖 Reading workbooks...".cyan());
    }
    let outcome = run_mapping(&budget, &template, &options)?;
    let output_path = resolve_output_path(output.as_deref(), outcome.download_name());

    if is_same_file(&template, &output_path) {
        return Err(MapperError::Io(std::io::Error::new(
            ErrorKind::InvalidInput,
            format!(
                "refusing to overwrite the template {}; pass --output",
                template.display()
            ),
        )));
    }

    if options.verbose {
        println!(
            "   Hotel {}: {} of {} budget rows, {} aggregate row(s)",
            outcome.hotel_key.to_string().bright_blue().bold(),
            outcome.filtered_rows,
            outcome.budget.row_count(),
            outcome.aggregate.len()
        );
    }

    let bytes = outcome.to_workbook()?;
    write_atomically(&output_path, &bytes)?;

    print_diagnostics(&outcome.diagnostics);
    println!(
        "{}",
        format!("✅ Mapped {} row(s) for hotel {}", outcome.output.row_count(), outcome.hotel_key)
            .bold()
            .green()
    );
    println!("   Output: {}", output_path.display());
    Ok(())
}

/// Execute the preview command (writes nothing)
pub fn preview(
    budget: PathBuf,
    template: PathBuf,
    rows: usize,
    json: bool,
    options: MapOptions,
) -> MapperResult<()> {
    // Stdout carries only the report in JSON mode.
    if options.verbose && !json {
        println!("{}", "📖 Reading workbooks...".cyan());
    }
    let outcome = run_mapping(&budget, &template, &options)?;

    if json {
        let report = MappingReport::from_outcome(&outcome, rows);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "🔍 Mapped Data Preview".bold().green());
    println!();
    print!("{}", render_preview(&outcome, rows));
    Ok(())
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    println!("{}", format!("⚠️  {} diagnostic(s):", diagnostics.len()).yellow());
    for diagnostic in diagnostics {
        println!("   {} {}", format!("[{}]", diagnostic.kind()).yellow(), diagnostic);
    }
    println!();
}

/// Where the mapped workbook goes.
///
/// No output: `mapped/<template name>`. An existing directory: the template
/// name inside it. Anything else is taken as the file path.
pub fn resolve_output_path(output: Option<&Path>, download_name: &str) -> PathBuf {
    match output {
        None => Path::new(DEFAULT_OUTPUT_DIR).join(download_name),
        Some(p) if p.is_dir() => p.join(download_name),
        Some(p) => p.to_path_buf(),
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
