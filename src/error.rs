use crate::row_validation::ValidationReport;
use crate::schema::Layout;
use chrono::NaiveDate;
use serde::Serialize;
use std::io;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaDetectionError {
    #[error("header row is empty")]
    EmptyHeader,
    #[error("no known column layout matches headers [{}]", .headers.join(", "))]
    NoMatchingLayout { headers: Vec<String> },
    #[error("{layout} layout requires column '{column}' (headers: [{}])", .headers.join(", "))]
    MissingRequiredColumn {
        layout: Layout,
        column: String,
        headers: Vec<String>,
    },
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error(transparent)]
    Schema(#[from] SchemaDetectionError),
    #[error("grid is empty")]
    EmptyGrid,
    #[error("grid has a header row but no data rows")]
    NoDataRows,
    #[error("no valid rows remain after validation ({} row errors)", .report.errors.len())]
    NoValidRows { report: Box<ValidationReport> },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConversionResult<T> = Result<T, ConversionError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowValidationError {
    #[error("row {row}: name is blank")]
    BlankName { row: usize },
    #[error("row {row}: start date '{value}' is invalid")]
    InvalidStartDate { row: usize, value: String },
    #[error("row {row}: end date '{value}' is invalid")]
    InvalidEndDate { row: usize, value: String },
    #[error("row {row}: start {start} is after end {end}")]
    StartAfterEnd {
        row: usize,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl RowValidationError {
    pub fn row(&self) -> usize {
        match self {
            RowValidationError::BlankName { row }
            | RowValidationError::InvalidStartDate { row, .. }
            | RowValidationError::InvalidEndDate { row, .. }
            | RowValidationError::StartAfterEnd { row, .. } => *row,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowValidationWarning {
    #[error("recommended column '{column}' is missing; values will be defaulted")]
    MissingOptionalColumn { column: String },
    #[error("row {row}: blank row skipped")]
    BlankRow { row: usize },
    #[error("row {row}: span of {days} days is unusually long")]
    LongSpan { row: usize, days: i64 },
    #[error("row {row}: status '{value}' is not recognized; defaulting to planned")]
    UnrecognizedStatus { row: usize, value: String },
    #[error("row {row}: progress '{value}' is not an integer between 0 and 100")]
    InvalidProgress { row: usize, value: String },
    #[error("row {row}: no status given; defaulting to planned")]
    MissingStatus { row: usize },
    #[error("row {row}: organization level '{value}' is not a number; using level 2")]
    InvalidOrganizationLevel { row: usize, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fix {
    pub row: usize,
    pub field: String,
    pub value: String,
}

impl std::fmt::Display for Fix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {} set to '{}'", self.row, self.field, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DependencyResolutionWarning {
    #[error("no 'id' column; dependency references were not resolved")]
    NoIdColumn,
    #[error("{task_id}: no dependency in [{}] could be resolved; dependencies cleared", .tokens.join(", "))]
    Unresolved { task_id: String, tokens: Vec<String> },
    #[error("{task_id}: dropped unresolved dependencies [{}]", .tokens.join(", "))]
    PartiallyResolved { task_id: String, tokens: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregationWarning {
    #[error("{task_id}: unknown organization type '{value}', grouped with board meetings")]
    UnknownOrganizationType { task_id: String, value: String },
    #[error("{task_id}: organization level {level} is outside 1..=3")]
    UnknownOrganizationLevel { task_id: String, level: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineWarning {
    #[error("{task_id} depends on unknown task {dependency}")]
    MissingReference { task_id: String, dependency: String },
    #[error("{from} ends {days} day(s) after dependent {to} starts")]
    Conflict { from: String, to: String, days: i64 },
    #[error("dependency cycle through {task_id}")]
    Cycle { task_id: String },
}
