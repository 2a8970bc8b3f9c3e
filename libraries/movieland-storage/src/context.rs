use crate::genres;
use async_trait::async_trait;
use movieland_core::{error::Result, Genre, GenreId, GenreStore, NewGenre};
use sqlx::PgPool;

/// PostgreSQL-backed datastore
///
/// Cloning is cheap: clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct PgDatastore {
    pool: PgPool,
}

impl PgDatastore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl GenreStore for PgDatastore {
    async fn list_genres(&self) -> Result<Vec<Genre>> {
        genres::get_all(&self.pool).await
    }

    async fn get_genre(&self, id: GenreId) -> Result<Genre> {
        genres::get_by_id(&self.pool, id).await
    }

    async fn insert_genre(&self, genre: NewGenre) -> Result<Genre> {
        genres::create(&self.pool, genre).await
    }

    async fn update_genre(&self, genre: &Genre) -> Result<()> {
        genres::update(&self.pool, genre).await
    }
}
