/// API route modules
pub mod genres;
pub mod health;
pub mod json;
