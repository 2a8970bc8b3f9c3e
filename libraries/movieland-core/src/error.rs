/// Core error types for Movieland
use thiserror::Error;

/// Result type alias using `DatastoreError`
pub type Result<T> = std::result::Result<T, DatastoreError>;

/// Errors reported by a datastore implementation
///
/// Handlers match on the variant to pick an HTTP status, so every
/// distinguishable failure kind gets its own variant.
#[derive(Error, Debug)]
pub enum DatastoreError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique slug constraint violated
    #[error("genre with slug {slug:?} already exists")]
    SlugExists { slug: String },

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),
}

impl DatastoreError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a slug conflict error
    pub fn slug_exists(slug: impl Into<String>) -> Self {
        Self::SlugExists { slug: slug.into() }
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Returns `true` for the not-found kind
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for the unique-slug violation kind
    pub fn is_slug_exists(&self) -> bool {
        matches!(self, Self::SlugExists { .. })
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for DatastoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
