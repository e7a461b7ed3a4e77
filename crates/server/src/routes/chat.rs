use actix_web::{post, web, HttpResponse};
use serde::Serialize;

use crate::routes::http_error;
use crate::state::AppState;
use crate::types::{ChatRequest, SearchResultItem};

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub question: String,
    pub answer: String,
    pub retrieval_ms: f64,
    pub sources: Vec<SearchResultItem>,
}

#[post("/chat")]
pub async fn chat(
    body: web::Json<ChatRequest>,
    state: web::Data<std::sync::Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    if body.question.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().body("Question cannot be empty"));
    }

    let answered = state.chat.answer(&body.question).await.map_err(http_error)?;

    Ok(HttpResponse::Ok().json(ChatResponse {
        question: body.question.clone(),
        answer: answered.answer,
        retrieval_ms: answered.retrieval_ms,
        sources: answered
            .matches
            .into_iter()
            .map(SearchResultItem::from)
            .collect(),
    }))
}
