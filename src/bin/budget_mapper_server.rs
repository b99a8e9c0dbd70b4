//! Budget Mapper API Server binary
//!
//! Standalone HTTP server for budget → template mapping uploads.

use clap::Parser;
use hotel_budget_mapper::api::{run_api_server, ApiConfig};
use hotel_budget_mapper::config::MappingConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "budget-mapper-server")]
#[command(version)]
#[command(about = "Budget Mapper API Server - upload a budget and a template, get the mapped workbook")]
#[command(long_about = r#"
Budget Mapper API Server

Endpoints (multipart/form-data: budget, template, optional hotel):
  - POST /api/v1/preview - JSON report: hotel, aggregate, preview rows, diagnostics
  - POST /api/v1/map     - Mapped .xlsx, named after the template

Additional endpoints:
  - GET  /health         - Health check
  - GET  /version        - Server version info
  - GET  /               - API documentation

Example usage:
  budget-mapper-server                           # Start on localhost:8080
  budget-mapper-server --host 0.0.0.0 --port 3000

  curl -F budget=@budget.xlsx -F template=@ART_DAILY.xlsx \
    http://localhost:8080/api/v1/map -o ART_DAILY.xlsx
"#)]
struct Args {
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
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        max_upload_mb: args.max_upload_mb,
        mapping: MappingConfig::load(args.config.as_deref())?,
    };

    run_api_server(config).await
}
