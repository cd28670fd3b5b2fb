//! Engine error types.

use thiserror::Error;

/// Errors surfaced by the timetabling engine.
///
/// Most scheduling conditions are *not* errors: capacity limits and region
/// incompatibility are feasibility predicates, and an exhausted attempt
/// budget is reported through [`Coverage::Partial`](crate::search::Coverage).
#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("no curriculum configured for grade '{grade}'")]
    MissingCurriculum { grade: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid {table} record at row {row}: {message}")]
    InvalidRecord {
        table: &'static str,
        row: usize,
        message: String,
    },

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type TimetableResult<T> = Result<T, TimetableError>;

impl TimetableError {
    pub(crate) fn invalid_record(
        table: &'static str,
        row: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidRecord {
            table,
            row,
            message: message.into(),
        }
    }
}
