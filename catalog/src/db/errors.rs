use thiserror::Error;

/// Unified error type for storage operations that application code can handle
#[derive(Error, Debug)]
pub enum DbError {
    /// Entity not found by the given identifier
    #[error("Entity not found")]
    NotFound,

    /// Check constraint violation (e.g. an empty product name reaching the table)
    #[error("Check constraint {} violated on {}: {message}", .constraint.as_deref().unwrap_or("<unnamed>"), .table.as_deref().unwrap_or("<unknown table>"))]
    CheckViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Not-null constraint violation
    #[error("Not-null constraint violated on {}: {message}", .table.as_deref().unwrap_or("<unknown table>"))]
    NotNullViolation {
        table: Option<String>,
        message: String,
    },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convert from sqlx::Error using proper sqlx error categorization
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                if db_err.is_check_violation() {
                    DbError::CheckViolation {
                        constraint: db_err.constraint().map(|s| s.to_string()),
                        table: db_err.table().map(|s| s.to_string()),
                        message: db_err.message().to_string(),
                    }
                } else if db_err.code().as_deref() == Some(NOT_NULL_VIOLATION) {
                    DbError::NotNullViolation {
                        table: db_err.table().map(|s| s.to_string()),
                        message: db_err.message().to_string(),
                    }
                } else {
                    // All other database errors are non-recoverable - convert to anyhow
                    DbError::Other(anyhow::Error::from(err))
                }
            }
            // Pool timeouts, I/O and protocol errors are non-recoverable as well
            _ => DbError::Other(anyhow::Error::from(err)),
        }
    }
}

/// PostgreSQL SQLSTATE for `not_null_violation`
const NOT_NULL_VIOLATION: &str = "23502";

/// Type alias for database operation results
pub type Result<T> = std::result::Result<T, DbError>;
