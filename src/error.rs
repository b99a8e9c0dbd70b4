use thiserror::Error;

pub type MapperResult<T> = Result<T, MapperError>;

/// Fatal errors. Any of these aborts the mapping; no output is produced.
#[derive(Error, Debug)]
pub enum MapperError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bad template name '{name}': expected '<HOTELKEY>_<anything>.xlsx'")]
    BadTemplateName { name: String },

    #[error("Budget is missing required column(s): {}", .columns.join(", "))]
    MissingBudgetColumn { columns: Vec<String> },

    #[error("Bad budget date '{value}' at row {row}: expected DD/MM/YY")]
    BadBudgetDate { row: usize, value: String },

    #[error("Bad budget number '{value}' in column {column} at row {row}")]
    BadBudgetNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MapperError {
    /// Stable machine-readable kind, used by the API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            MapperError::Io(_) => "Io",
            MapperError::Json(_) => "Json",
            MapperError::BadTemplateName { .. } => "BadTemplateName",
            MapperError::MissingBudgetColumn { .. } => "MissingBudgetColumn",
            MapperError::BadBudgetDate { .. } => "BadBudgetDate",
            MapperError::BadBudgetNumber { .. } => "BadBudgetNumber",
            MapperError::Workbook(_) => "Workbook",
            MapperError::Export(_) => "Export",
            MapperError::Config(_) => "Config",
        }
    }
}
