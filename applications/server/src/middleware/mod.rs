/// HTTP middleware
pub mod errors;

pub use errors::log_internal_errors;
