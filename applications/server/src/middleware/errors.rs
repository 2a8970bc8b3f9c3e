/// Logging of unhandled request errors
use crate::error::InternalError;
use axum::{extract::Request, middleware::Next, response::Response};

/// Log the error carried by a 500 response together with the request line
pub async fn log_internal_errors(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    if let Some(InternalError(err)) = response.extensions().get::<InternalError>() {
        tracing::error!(%method, url = %uri, %err, "unhandled error");
    }

    response
}
