//! JSON request decoding and response encoding
//!
//! [`JsonBody`] replaces axum's `Json` extractor for request bodies so that
//! every decode failure becomes a 400 with a message a client can act on.

use crate::error::ApiError;
use axum::{
    body::Body,
    extract::{FromRequest, Request},
    http::{
        header::{CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::error::Category;

/// Largest request body accepted, in bytes
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// Serialize `body` as a JSON response with `status`
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let bytes = match serde_json::to_vec(body) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(%err, "failed to encode response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    response
}

/// Extractor that decodes a size-limited JSON request body
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let body = Limited::new(req.into_body(), MAX_BODY_BYTES);

        let bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
                return Err(ApiError::BadRequest(format!(
                    "body must not be larger than {MAX_BODY_BYTES} bytes"
                )));
            }
            Err(err) => {
                return Err(ApiError::BadRequest(format!(
                    "failed to read body: {err}"
                )));
            }
        };

        decode(&bytes).map(JsonBody)
    }
}

/// Decode exactly one JSON object from `body`
///
/// A top-level `null` decodes like `{}`. Arrays are rejected even though serde
/// would otherwise fill struct fields from them by position.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let Some(start) = body.iter().position(|b| !b.is_ascii_whitespace()) else {
        return Err(ApiError::BadRequest("body must not be empty".to_string()));
    };
    let end = body
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(body.len(), |i| i + 1);

    match &body[start..end] {
        b"null" => return decode(b"{}"),
        [b'[', ..] => {
            return Err(ApiError::BadRequest(format!(
                "body contains incorrect JSON type (at character {})",
                start + 1
            )));
        }
        _ => {}
    }

    let mut de = serde_json::Deserializer::from_slice(body);

    let value: T = serde_path_to_error::deserialize(&mut de).map_err(|err| {
        let path = err.path().to_string();
        ApiError::BadRequest(describe(body, err.inner(), &path))
    })?;

    de.end().map_err(|_| {
        ApiError::BadRequest("body must only contain a single JSON value".to_string())
    })?;

    Ok(value)
}

fn describe(body: &[u8], err: &serde_json::Error, path: &str) -> String {
    match err.classify() {
        Category::Eof => "body contains badly-formed JSON".to_string(),
        Category::Syntax | Category::Io => format!(
            "body contains badly-formed JSON (at character {})",
            offset(body, err.line(), err.column())
        ),
        Category::Data => {
            if let Some(key) = unknown_field(err) {
                format!("body contains unknown key {key:?}")
            } else if path == "." {
                format!(
                    "body contains incorrect JSON type (at character {})",
                    offset(body, err.line(), err.column())
                )
            } else {
                format!("body contains incorrect JSON type for field {path:?}")
            }
        }
    }
}

// serde reports unknown fields as "unknown field `name`, expected ..."
fn unknown_field(err: &serde_json::Error) -> Option<String> {
    let message = err.to_string();
    let rest = message.split_once("unknown field `")?.1;
    let (key, _) = rest.split_once('`')?;
    Some(key.to_string())
}

/// Byte offset of a 1-based line/column position
fn offset(body: &[u8], line: usize, column: usize) -> usize {
    let preceding: usize = body
        .split(|b| *b == b'\n')
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum();

    preceding + column
}
