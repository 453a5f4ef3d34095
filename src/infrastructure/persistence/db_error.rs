//! Translation of sqlx errors into store errors.

use crate::domain::repositories::StoreError;

/// Maps a sqlx error to a [`StoreError`].
///
/// Unique violations keep their constraint name so callers can tell an id
/// collision apart from other failures; everything else is "unavailable".
pub fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return StoreError::UniqueViolation {
            constraint: db.constraint().unwrap_or("unknown").to_string(),
        };
    }

    StoreError::Unavailable(e.to_string())
}
