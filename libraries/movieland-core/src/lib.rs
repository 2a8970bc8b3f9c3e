//! Movieland Core
//!
//! Platform-agnostic domain types, the datastore capability trait, error
//! handling and input validation for Movieland.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Genre`, `NewGenre`
//! - **Core Traits**: `GenreStore`, the capability request handlers depend on
//! - **Error Handling**: `DatastoreError` and `Result`
//! - **Validation**: `Validator`, a per-request field rule accumulator
//!
//! # Example
//!
//! ```rust
//! use movieland_core::Validator;
//!
//! let mut v = Validator::new();
//! v.required("slug", "");
//! v.max_length("name", "Drama", 40);
//!
//! assert!(!v.is_valid());
//! assert_eq!(v.errors(), vec!["slug is required".to_string()]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use error::{DatastoreError, Result};
pub use storage::GenreStore;
pub use types::{Genre, GenreId, NewGenre};
pub use validator::Validator;
