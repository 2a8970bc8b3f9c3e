/// Route registration
use crate::{api, middleware::log_internal_errors, state::AppState};
use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

/// Build the application router
pub fn create_router(app_state: AppState) -> Router {
    let genre_routes = Router::new()
        .route(
            "/genres",
            get(api::genres::list_genres).post(api::genres::create_genre),
        )
        .route("/genres/:id", get(api::genres::get_genre));

    Router::new()
        .route("/healtz", get(api::health::healtz))
        .nest("/api/v1", genre_routes)
        .layer(middleware::from_fn(log_internal_errors))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
