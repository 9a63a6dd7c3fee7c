use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Generated id {0} does not fit the id column")]
    IdOutOfRange(u64),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e)) if e.is_unique_violation()
        )
    }
}

/// Converts a MySQL `LAST_INSERT_ID()` into the signed `INT` id the schema uses.
pub(crate) fn generated_id(raw: u64) -> Result<i32> {
    i32::try_from(raw).map_err(|_| StorageError::IdOutOfRange(raw))
}
