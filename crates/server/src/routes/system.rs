use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ollama_connected: bool,
}

/// Service liveness and Ollama reachability
#[get("/health")]
pub async fn health(
    state: web::Data<std::sync::Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let ollama_connected = state.llm.test_connection().await.unwrap_or(false);

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        ollama_connected,
    }))
}
