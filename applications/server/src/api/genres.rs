/// Genres API routes
use crate::{
    api::json::{json_response, JsonBody},
    error::ApiError,
    state::AppState,
};
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Response,
};
use chrono::{DateTime, SecondsFormat, Utc};
use movieland_core::{DatastoreError, Genre, GenreId, NewGenre, Validator};
use serde::{Deserialize, Serialize};

const GENRE_NOT_FOUND: &str = "genre not found";
const GENRE_SLUG_EXISTS: &str = "genre with this slug already exists";

const SLUG_MAX_LENGTH: usize = 40;
const NAME_MAX_LENGTH: usize = 40;

/// JSON representation of a genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreDto {
    pub id: GenreId,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created_at: String,
}

impl From<Genre> for GenreDto {
    fn from(genre: Genre) -> Self {
        Self {
            id: genre.id,
            slug: genre.slug,
            name: genre.name,
            created_at: format_timestamp(genre.created_at),
        }
    }
}

/// RFC 3339 in UTC, fractional seconds without trailing zeros
fn format_timestamp(ts: DateTime<Utc>) -> String {
    let formatted = ts.to_rfc3339_opts(SecondsFormat::Nanos, true);

    match formatted.split_once('.') {
        Some((seconds, fraction)) => {
            let digits = fraction.trim_end_matches('Z').trim_end_matches('0');
            if digits.is_empty() {
                format!("{seconds}Z")
            } else {
                format!("{seconds}.{digits}Z")
            }
        }
        None => formatted,
    }
}

#[derive(Debug, Serialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateGenreRequest {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// GET /api/v1/genres
/// List all genres ordered by slug
pub async fn list_genres(State(app_state): State<AppState>) -> Result<Response, ApiError> {
    let genres = app_state
        .genres
        .list_genres()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let data: Vec<GenreDto> = genres.into_iter().map(GenreDto::from).collect();

    Ok(json_response(StatusCode::OK, &Envelope { data }))
}

/// GET /api/v1/genres/:id
/// A malformed id is reported the same way as a missing genre
pub async fn get_genre(
    State(app_state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let id: GenreId = id
        .ok()
        .and_then(|Path(raw)| raw.parse().ok())
        .ok_or_else(|| ApiError::NotFound(GENRE_NOT_FOUND.to_string()))?;

    let genre = app_state
        .genres
        .get_genre(id)
        .await
        .map_err(|e| match e {
            DatastoreError::NotFound { .. } => ApiError::NotFound(GENRE_NOT_FOUND.to_string()),
            other => ApiError::Internal(other.to_string()),
        })?;

    Ok(json_response(
        StatusCode::OK,
        &Envelope {
            data: GenreDto::from(genre),
        },
    ))
}

/// POST /api/v1/genres
/// Create a genre
pub async fn create_genre(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<CreateGenreRequest>,
) -> Result<Response, ApiError> {
    let slug = req.slug.unwrap_or_default();
    let name = req.name.unwrap_or_default();

    let mut v = Validator::new();
    v.required("slug", &slug);
    v.max_length("slug", &slug, SLUG_MAX_LENGTH);
    v.slug_shape("slug", &slug);
    v.max_length("name", &name, NAME_MAX_LENGTH);

    if !v.is_valid() {
        return Err(ApiError::Validation(v.into_errors()));
    }

    let genre = app_state
        .genres
        .insert_genre(NewGenre::new(slug, name))
        .await
        .map_err(|e| match e {
            DatastoreError::SlugExists { .. } => ApiError::Conflict(GENRE_SLUG_EXISTS.to_string()),
            other => ApiError::Internal(other.to_string()),
        })?;

    tracing::info!(id = genre.id, slug = %genre.slug, "genre created");

    Ok(json_response(
        StatusCode::CREATED,
        &Envelope {
            data: GenreDto::from(genre),
        },
    ))
}
