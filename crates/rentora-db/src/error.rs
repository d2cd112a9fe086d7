//! Database-specific error types and conversions.

use rentora_core::error::RentoraError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Malformed row data: {0}")]
    Data(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for RentoraError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => RentoraError::NotFound { entity, id },
            other => RentoraError::Database(other.to_string()),
        }
    }
}
