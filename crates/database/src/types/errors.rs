//! Error types for the database layer

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Failure surfaced by any member storage operation.
///
/// The variants only classify where the backing store gave up; callers that do
/// not care can treat every variant the same way.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Generated key unavailable: {0}")]
    KeyConversion(String),

    #[error("Row decode error: {0}")]
    DecodeError(String),

    #[error("Database query error: {0}")]
    QueryError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Database(db_error) => match db_error.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => {
                    StorageError::ConstraintViolation(db_error.to_string())
                }
                _ => StorageError::QueryError(db_error.to_string()),
            },
            sqlx::Error::Configuration(_)
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StorageError::ConnectionError(error.to_string()),
            sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::TypeNotFound { .. } => StorageError::DecodeError(error.to_string()),
            sqlx::Error::Migrate(migrate_error) => {
                StorageError::MigrationError(migrate_error.to_string())
            }
            other => StorageError::QueryError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_are_connection_errors() {
        assert!(matches!(
            StorageError::from(sqlx::Error::PoolClosed),
            StorageError::ConnectionError(_)
        ));
        assert!(matches!(
            StorageError::from(sqlx::Error::PoolTimedOut),
            StorageError::ConnectionError(_)
        ));
    }

    #[test]
    fn missing_columns_are_decode_errors() {
        let error = StorageError::from(sqlx::Error::ColumnNotFound("name".to_string()));
        assert!(matches!(error, StorageError::DecodeError(ref message) if message.contains("name")));
    }

    #[test]
    fn row_not_found_falls_back_to_query_error() {
        assert!(matches!(
            StorageError::from(sqlx::Error::RowNotFound),
            StorageError::QueryError(_)
        ));
    }
}
