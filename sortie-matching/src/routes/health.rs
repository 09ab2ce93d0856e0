use axum::Json;
use sortie_shared::types::api::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(
        "sortie-matching",
        env!("CARGO_PKG_VERSION"),
    ))
}
