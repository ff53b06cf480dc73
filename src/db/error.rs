use thiserror::Error;

/// Failures surfaced by [`EmailStore`](super::EmailStore).
///
/// An absent entry is not an error; lookups report it as `None`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Duplicate email on insert.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Driver, pool or I/O fault.
    #[error("storage error: {0}")]
    Storage(sqlx::Error),
}

impl StoreError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, StoreError::ConstraintViolation(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::ConstraintViolation(db.message().to_string())
            }
            _ => StoreError::Storage(err),
        }
    }
}
