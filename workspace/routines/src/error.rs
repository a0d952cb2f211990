use sea_orm::DbBackend;
use thiserror::Error;

/// Error types for the delegated investor routines
#[derive(Error, Debug)]
pub enum RoutineError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The stored routines only exist on MySQL/MariaDB deployments
    #[error("Stored routines are not available on the {0:?} backend")]
    UnsupportedBackend(DbBackend),

    /// The state function returned something other than active/inactive
    #[error("Unexpected investor state value: {0}")]
    UnexpectedState(String),

    /// A row returned by the threshold procedure could not be normalized
    #[error("Malformed routine row: {0}")]
    MalformedRow(String),
}

/// Type alias for Result with RoutineError
pub type Result<T> = std::result::Result<T, RoutineError>;
