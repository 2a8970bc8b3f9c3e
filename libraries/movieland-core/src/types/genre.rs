//! Genre types

use chrono::{DateTime, Utc};

/// Datastore-assigned genre identifier
pub type GenreId = i64;

/// A movie genre as stored by the datastore
///
/// `id` and `created_at` are assigned on insert and never change afterwards.
/// `name` is optional: `None` means absent, which is distinct from an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub id: GenreId,
    pub slug: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new genre
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGenre {
    pub slug: String,
    pub name: Option<String>,
}

impl NewGenre {
    /// Create a new genre payload; an empty `name` is stored as absent
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            slug: slug.into(),
            name: (!name.is_empty()).then_some(name),
        }
    }

    /// Attach the datastore-assigned fields, producing the stored entity
    pub fn into_genre(self, id: GenreId, created_at: DateTime<Utc>) -> Genre {
        Genre {
            id,
            slug: self.slug,
            name: self.name,
            created_at,
        }
    }
}
