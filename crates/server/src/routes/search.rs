use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::routes::http_error;
use crate::state::AppState;
use crate::types::{SearchQuery, SearchResultItem};

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
    pub query: String,
    pub count: usize,
}

#[get("/search")]
pub async fn search(
    query: web::Query<SearchQuery>,
    state: web::Data<std::sync::Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    if query.q.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().body("Query cannot be empty"));
    }

    let vector = state
        .llm
        .embed(&state.config.embedding_model, &query.q)
        .await
        .map_err(http_error)?;

    let matches = state
        .store
        .query(&state.index, &vector, query.top_k)
        .map_err(http_error)?;

    let results: Vec<SearchResultItem> = matches.into_iter().map(SearchResultItem::from).collect();
    let count = results.len();

    Ok(HttpResponse::Ok().json(SearchResponse {
        results,
        query: query.q.clone(),
        count,
    }))
}

#[get("/search/stats")]
pub async fn search_stats(
    state: web::Data<std::sync::Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let stats = state.store.stats(&state.index).map_err(http_error)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "index": stats.name,
        "record_count": stats.record_count,
        "dimension": stats.dimension,
        "embedding_model": state.config.embedding_model,
    })))
}
