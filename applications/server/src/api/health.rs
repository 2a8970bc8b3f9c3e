/// Health check API routes

/// GET /healtz - Liveness probe
pub async fn healtz() -> &'static str {
    "OK"
}
