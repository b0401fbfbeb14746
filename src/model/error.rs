use thiserror::Error;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("access to this resource is forbidden")]
    Forbidden,
    #[error("uniqueness conflict")]
    Conflict,
    #[error("stored content payload is invalid: {0}")]
    InvalidContent(String),
}

impl DatabaseError {
    /// Folds a unique-constraint violation into the dedicated variant so
    /// callers can answer 409 instead of 500.
    pub fn from_sqlx(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = error
            && db.is_unique_violation()
        {
            return Self::Conflict;
        }
        Self::SqlxError(error)
    }
}
