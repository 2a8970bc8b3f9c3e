//! Datastore capability consumed by the request handlers

use crate::error::Result;
use crate::types::{Genre, GenreId, NewGenre};
use async_trait::async_trait;

/// Genre persistence operations
///
/// This trait abstracts the relational datastore so that the HTTP layer can be
/// exercised against a substitute implementation. Implementations own their
/// concurrency safety: every method may be called from many in-flight requests
/// at once.
#[async_trait]
pub trait GenreStore: Send + Sync {
    /// Get all genres, ordered by slug ascending
    async fn list_genres(&self) -> Result<Vec<Genre>>;

    /// Get a genre by ID
    ///
    /// Fails with [`DatastoreError::NotFound`](crate::DatastoreError::NotFound) when absent.
    async fn get_genre(&self, id: GenreId) -> Result<Genre>;

    /// Insert a genre, returning it with the datastore-assigned `id` and `created_at`
    ///
    /// Fails with [`DatastoreError::SlugExists`](crate::DatastoreError::SlugExists)
    /// on a unique-constraint violation.
    async fn insert_genre(&self, genre: NewGenre) -> Result<Genre>;

    /// Update slug and name of an existing genre
    ///
    /// Fails with `SlugExists` on a unique-constraint violation and with
    /// `NotFound` when no genre has the given ID.
    async fn update_genre(&self, genre: &Genre) -> Result<()>;
}
