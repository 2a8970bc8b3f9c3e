use chrono::{DateTime, Utc};
use movieland_core::{error::Result, DatastoreError, Genre, GenreId, NewGenre};
use sqlx::PgPool;

#[derive(Debug, sqlx::FromRow)]
struct GenreRow {
    id: GenreId,
    slug: String,
    name: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<GenreRow> for Genre {
    fn from(row: GenreRow) -> Self {
        Genre {
            id: row.id,
            slug: row.slug,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

/// Get all genres ordered by slug
pub async fn get_all(pool: &PgPool) -> Result<Vec<Genre>> {
    let rows = sqlx::query_as::<_, GenreRow>(
        "SELECT id, slug, name, created_at
         FROM genres
         ORDER BY slug ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Genre::from).collect())
}

/// Get a genre by ID, failing with `NotFound` when absent
pub async fn get_by_id(pool: &PgPool, id: GenreId) -> Result<Genre> {
    let row = sqlx::query_as::<_, GenreRow>(
        "SELECT id, slug, name, created_at
         FROM genres
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Genre::from)
        .ok_or_else(|| DatastoreError::not_found("genre", id))
}

/// Insert a genre; the database assigns `id` and `created_at`
pub async fn create(pool: &PgPool, genre: NewGenre) -> Result<Genre> {
    let (id, created_at): (GenreId, DateTime<Utc>) = sqlx::query_as(
        "INSERT INTO genres (slug, name)
         VALUES ($1, $2)
         RETURNING id, created_at",
    )
    .bind(&genre.slug)
    .bind(&genre.name)
    .fetch_one(pool)
    .await
    .map_err(|e| map_write_error(e, &genre.slug))?;

    Ok(genre.into_genre(id, created_at))
}

/// Update slug and name of an existing genre
pub async fn update(pool: &PgPool, genre: &Genre) -> Result<()> {
    let result = sqlx::query(
        "UPDATE genres
         SET slug = $2, name = $3
         WHERE id = $1",
    )
    .bind(genre.id)
    .bind(&genre.slug)
    .bind(&genre.name)
    .execute(pool)
    .await
    .map_err(|e| map_write_error(e, &genre.slug))?;

    if result.rows_affected() == 0 {
        return Err(DatastoreError::not_found("genre", genre.id));
    }

    Ok(())
}

/// Delete all genres
pub async fn delete_all(pool: &PgPool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM genres").execute(pool).await?;
    Ok(result.rows_affected())
}

// SQLSTATE 23505 surfaces as a unique violation; the only unique key is the slug.
fn map_write_error(err: sqlx::Error, slug: &str) -> DatastoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            DatastoreError::slug_exists(slug)
        }
        _ => err.into(),
    }
}
