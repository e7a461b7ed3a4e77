//! MediSearch HTTP Server
//!
//! Actix-web REST API over the in-memory vector store: ingest, search,
//! chat and health endpoints.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_actix_web::TracingLogger;

use medisearch_common::{AppConfig, Result};

mod routes;
mod state;
mod types;

pub use state::AppState;
pub use types::{ChatRequest, IngestRequest, SearchQuery, SearchResultItem};

/// Register every API route on the given service config
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::system::health)
        .service(routes::ingest::ingest)
        .service(routes::search::search)
        .service(routes::search::search_stats)
        .service(routes::chat::chat);
}

/// Run the HTTP server until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let bind_address = config.server_bind_address();
    let state = Arc::new(AppState::new(config)?);

    info!("Starting MediSearch API on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(Arc::clone(&state)))
            .configure(configure)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use async_trait::async_trait;
    use medisearch_llm::{GenerateRequest, LlmClient};
    use serde_json::{json, Value};

    struct StubLlm;

    #[async_trait]
    impl LlmClient for StubLlm {
        async fn generate(&self, _request: GenerateRequest) -> Result<String> {
            Ok("Based on the retrieved notes, monitor and reassess.".to_string())
        }

        async fn embed(&self, _model: &str, text: &str) -> Result<Vec<f32>> {
            // Fold bytes into fixed buckets so equal text maps to an
            // equal vector.
            let mut v = vec![0.0f32; 8];
            for (i, b) in text.bytes().enumerate() {
                v[i % 8] += f32::from(b) / 255.0;
            }
            Ok(v)
        }

        async fn test_connection(&self) -> Result<bool> {
            Ok(true)
        }
    }

    fn stub_state() -> Arc<AppState> {
        let config = AppConfig {
            index_name: "test-notes".to_string(),
            ..AppConfig::default()
        };
        Arc::new(AppState::with_client(config, Arc::new(StubLlm)).expect("state"))
    }

    #[actix_web::test]
    async fn test_health_reports_backend_status() {
        let state = stub_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::clone(&state)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["ollama_connected"], true);
    }

    #[actix_web::test]
    async fn test_ingest_then_search_returns_note() {
        let state = stub_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::clone(&state)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/ingest")
            .set_json(json!({"patient_id": "patient_001", "text": "fever and headache"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["anon_id"], "patient_001");
        assert_eq!(body["masked"], true);
        assert_eq!(body["record_count"], 1);

        let req = test::TestRequest::post()
            .uri("/ingest")
            .set_json(json!({"text": "shortness of breath"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["anon_id"].as_str().unwrap().starts_with("anon-"));
        assert_eq!(body["record_count"], 2);

        let req = test::TestRequest::get()
            .uri("/search?q=fever%20and%20headache&top_k=1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["query"], "fever and headache");
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["id"], "patient_001");
        assert!(body["results"][0]["score"].as_f64().unwrap() > 0.99);
        assert!(body["results"][0]["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn test_ingest_rejects_blank_text() {
        let state = stub_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::clone(&state)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/ingest")
            .set_json(json!({"text": "   "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_ingest_masks_phi_before_storage() {
        let state = stub_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::clone(&state)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/ingest")
            .set_json(json!({
                "patient_id": "patient_002",
                "text": "Patient: John, call 555-123-4567"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["masked"], true);

        let req = test::TestRequest::get().uri("/search?q=callback").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let content = body["results"][0]["content"].as_str().unwrap();
        assert!(content.contains("[REDACTED_NAME]"));
        assert!(content.contains("[REDACTED_PHONE]"));
        assert!(!content.contains("John"));
        assert!(!content.contains("555-123-4567"));
    }

    #[actix_web::test]
    async fn test_search_rejects_blank_query() {
        let state = stub_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::clone(&state)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/search?q=%20").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_search_on_empty_index_returns_no_results() {
        let state = stub_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::clone(&state)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/search?q=anything").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 0);
        assert!(body["results"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_stats_reflects_ingests() {
        let state = stub_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::clone(&state)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/ingest")
            .set_json(json!({"text": "elevated blood pressure"}))
            .to_request();
        let _: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get().uri("/search/stats").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["index"], "test-notes");
        assert_eq!(body["record_count"], 1);
        assert_eq!(body["dimension"], 8);
    }

    #[actix_web::test]
    async fn test_chat_answers_with_sources() {
        let state = stub_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::clone(&state)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/ingest")
            .set_json(json!({"patient_id": "patient_003", "text": "persistent cough"}))
            .to_request();
        let _: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(json!({"question": "What symptoms were reported?"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["question"], "What symptoms were reported?");
        assert_eq!(
            body["answer"],
            "Based on the retrieved notes, monitor and reassess."
        );
        assert!(body["retrieval_ms"].as_f64().unwrap() >= 0.0);
        assert_eq!(body["sources"].as_array().unwrap().len(), 1);
        assert_eq!(body["sources"][0]["id"], "patient_003");
    }

    #[actix_web::test]
    async fn test_chat_rejects_blank_question() {
        let state = stub_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::clone(&state)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(json!({"question": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
