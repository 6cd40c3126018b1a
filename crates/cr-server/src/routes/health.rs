/// `GET /health`: liveness check, no authentication.
pub async fn health_check() -> &'static str {
    "ok"
}
