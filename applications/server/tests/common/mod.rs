#![allow(dead_code)]
/// Common test utilities and fixtures
use async_trait::async_trait;
use axum::{body::Body, http::Response, Router};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use movieland_core::{DatastoreError, Genre, GenreId, GenreStore, NewGenre, Result};
use movieland_server::{create_router, AppState};
use std::sync::{Arc, Mutex};

/// Failure a [`StubGenreStore`] reports for every call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Database,
    SlugExists,
}

/// In-memory `GenreStore` returning canned genres
#[derive(Default)]
pub struct StubGenreStore {
    genres: Vec<Genre>,
    failure: Option<Failure>,
    inserted: Mutex<Vec<NewGenre>>,
}

impl StubGenreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_genres(genres: Vec<Genre>) -> Self {
        Self {
            genres,
            ..Self::default()
        }
    }

    pub fn failing(failure: Failure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    /// Genres passed to `insert_genre`, in call order
    pub fn inserted(&self) -> Vec<NewGenre> {
        self.inserted.lock().unwrap().clone()
    }

    fn fail(&self, slug: &str) -> Result<()> {
        match self.failure {
            Some(Failure::Database) => Err(DatastoreError::database("connection refused")),
            Some(Failure::SlugExists) => Err(DatastoreError::slug_exists(slug)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GenreStore for StubGenreStore {
    async fn list_genres(&self) -> Result<Vec<Genre>> {
        self.fail("")?;
        Ok(self.genres.clone())
    }

    async fn get_genre(&self, id: GenreId) -> Result<Genre> {
        self.fail("")?;
        self.genres
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or_else(|| DatastoreError::not_found("genre", id))
    }

    async fn insert_genre(&self, genre: NewGenre) -> Result<Genre> {
        self.fail(&genre.slug)?;
        self.inserted.lock().unwrap().push(genre.clone());
        Ok(genre.into_genre(1, fixtures::created_at()))
    }

    async fn update_genre(&self, genre: &Genre) -> Result<()> {
        self.fail(&genre.slug)
    }
}

/// Build the application router around `store`
pub fn create_test_app(store: Arc<StubGenreStore>) -> Router {
    create_router(AppState::new(store))
}

/// Read a response body as UTF-8 text
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub mod fixtures {
    use super::*;

    /// Timestamp the stub store assigns to inserted genres
    pub fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap()
    }

    pub fn genre(id: GenreId, slug: &str, name: Option<&str>) -> Genre {
        Genre {
            id,
            slug: slug.to_string(),
            name: name.map(str::to_string),
            created_at: created_at(),
        }
    }
}
