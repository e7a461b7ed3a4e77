use actix_web::{post, web, HttpResponse};
use serde::Serialize;
use tracing::info;

use medisearch_vector::VectorRecord;

use crate::routes::http_error;
use crate::state::AppState;
use crate::types::IngestRequest;

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub anon_id: String,
    pub masked: bool,
    pub record_count: usize,
}

#[post("/ingest")]
pub async fn ingest(
    body: web::Json<IngestRequest>,
    state: web::Data<std::sync::Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    if body.text.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().body("Note text cannot be empty"));
    }

    let anon_id = match body.patient_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!("anon-{}", uuid::Uuid::new_v4()),
    };

    // Mask before the text leaves this handler so the raw note is never
    // embedded or stored.
    let text = if state.config.mask_phi {
        state.masker.mask(&body.text)
    } else {
        body.text.clone()
    };

    let vector = state
        .llm
        .embed(&state.config.embedding_model, &text)
        .await
        .map_err(http_error)?;

    let record = VectorRecord::new(anon_id.clone(), vector, text)
        .with_metadata("timestamp", chrono::Utc::now().to_rfc3339());

    state
        .store
        .upsert(&state.index, vec![record])
        .map_err(http_error)?;

    let stats = state.store.stats(&state.index).map_err(http_error)?;
    info!(
        "Ingested note {} ({} records in index)",
        anon_id, stats.record_count
    );

    Ok(HttpResponse::Ok().json(IngestResponse {
        anon_id,
        masked: state.config.mask_phi,
        record_count: stats.record_count,
    }))
}
