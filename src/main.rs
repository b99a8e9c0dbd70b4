use clap::{Parser, Subcommand};
use colored::Colorize;
use hotel_budget_mapper::api::{run_api_server, ApiConfig};
use hotel_budget_mapper::cli::{self, MapOptions};
use hotel_budget_mapper::config::MappingConfig;
use hotel_budget_mapper::logging::init_tracing;
use hotel_budget_mapper::presenter::DEFAULT_PREVIEW_ROWS;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "budget-mapper")]
#[command(about = "Map a multi-hotel daily budget export onto a per-hotel segment template.")]
#[command(long_about = "Budget Mapper - hotel budget → template mapping

Reads a daily budget export (HOTEL, GIORNO, MKT_OPERA, RN, RR) and a
per-hotel template whose columns are <SEGMENT>_RN / <SEGMENT>_REV, sums
room nights and revenue per day and market segment for the template's
hotel, and writes a workbook with the template's layout.

The hotel key is the template file name up to the first underscore:
  ART_1_MAJOR_DAILY.xlsx  →  ART

COMMANDS:
  map      - Write the mapped workbook
  preview  - Show the mapped data without writing anything
  serve    - Start the HTTP upload server

EXAMPLES:
  budget-mapper map budget.xlsx ART_DAILY.xlsx
  budget-mapper map budget.xlsx ART_DAILY.xlsx -o out/
  budget-mapper preview budget.xlsx ART_DAILY.xlsx --rows 31
  budget-mapper preview budget.xlsx ART_DAILY.xlsx --json")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Map a budget export onto a template and write the result.

The output has the template's sheet, columns and row count. Column 0 is
rewritten with the budget dates (DD/MM/YYYY, ascending); each segment's
RN and REV sums go to the first template columns named
<SEGMENT>...<_RN|_REV>. Everything else is copied from the template.

OUTPUT:
  Default: mapped/<template file name>
  -o DIR:  DIR/<template file name>
  -o FILE: FILE

Diagnostics (unmapped segments, template too short, no rows for the
hotel) are printed but do not stop the mapping. Malformed budget dates
or missing budget columns abort it and nothing is written.")]
    /// Map a budget export onto a template and write the result
    Map {
        /// Budget workbook (.xlsx)
        budget: PathBuf,

        /// Template workbook (.xlsx), named <HOTELKEY>_*.xlsx
        template: PathBuf,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Hotel key to use instead of the template name prefix
        #[arg(long)]
        hotel: Option<String>,

        /// YAML file overriding budget column names / template suffixes
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show verbose mapping steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Preview the mapped data without writing a file
    Preview {
        /// Budget workbook (.xlsx)
        budget: PathBuf,

        /// Template workbook (.xlsx), named <HOTELKEY>_*.xlsx
        template: PathBuf,

        /// Number of output rows to show
        #[arg(short, long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        rows: usize,

        /// Print the full JSON report instead of a table
        #[arg(long)]
        json: bool,

        /// Hotel key to use instead of the template name prefix
        #[arg(long)]
        hotel: Option<String>,

        /// YAML file overriding budget column names / template suffixes
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show verbose mapping steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Start the HTTP upload server
    Serve {
        /// Host address to bind to (use 0.0.0.0 for all interfaces)
        #[arg(short = 'H', long, default_value = "127.0.0.1", env = "BUDGET_MAPPER_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080", env = "BUDGET_MAPPER_PORT")]
        port: u16,

        /// Upload size limit per request, in megabytes
        #[arg(long, default_value = "25", env = "BUDGET_MAPPER_MAX_UPLOAD_MB")]
        max_upload_mb: usize,

        /// YAML file overriding budget column names / template suffixes
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Map {
            budget,
            template,
            output,
            hotel,
            config,
            verbose,
        } => {
            init_tracing(if verbose { "hotel_budget_mapper=debug" } else { "error" });
            cli::map(budget, template, output, MapOptions { hotel, config, verbose })?;
        }

        Commands::Preview {
            budget,
            template,
            rows,
            json,
            hotel,
            config,
            verbose,
        } => {
            init_tracing(if verbose { "hotel_budget_mapper=debug" } else { "error" });
            cli::preview(budget, template, rows, json, MapOptions { hotel, config, verbose })?;
        }

        Commands::Serve {
            host,
            port,
            max_upload_mb,
            config,
        } => {
            let api_config = ApiConfig {
                host,
                port,
                max_upload_mb,
                mapping: MappingConfig::load(config.as_deref())?,
            };
            tokio::runtime::Runtime::new()?.block_on(run_api_server(api_config))?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "❌ Error:".bold().red(), e);
            ExitCode::FAILURE
        }
    }
}
