//! Domain types for Movieland

mod genre;

pub use genre::{Genre, GenreId, NewGenre};
