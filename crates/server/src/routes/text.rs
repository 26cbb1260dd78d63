use actix_web::{post, web, HttpResponse};
use studyhelper_llm::{
    clean_input_text, detect_note_type, extract_foreign_terms, extract_key_terms, GenerationRequest,
    Task,
};
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;
use crate::types::{GenerateRequest, GenerateResponse, QuestionsResponse, SummaryResponse, TextRequest};

#[post("/summarize")]
pub async fn summarize(
    req: web::Json<TextRequest>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let text = clean_input_text(&req.text);
    info!("Summary requested - {} chars", text.len());

    let summary = state.generator.generate_summary(&text).await?;

    Ok(HttpResponse::Ok().json(SummaryResponse {
        summary,
        note_type: detect_note_type(&text),
        foreign_terms: extract_foreign_terms(&text),
    }))
}

#[post("/generate-questions")]
pub async fn generate_questions(
    req: web::Json<TextRequest>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let text = clean_input_text(&req.text);
    info!("Questions requested - {} chars", text.len());

    let questions = state.generator.generate_questions(&text).await?;

    Ok(HttpResponse::Ok().json(QuestionsResponse {
        questions,
        note_type: detect_note_type(&text),
        key_terms: extract_key_terms(&text),
    }))
}

/// Any task by name
#[post("/generate")]
pub async fn generate(
    req: web::Json<GenerateRequest>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let task: Task = req.task.parse()?;
    let mut request = GenerationRequest::new(clean_input_text(&req.text), task);

    if let Some(category) = req.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        request = request.with_category(category.parse()?);
    }

    info!("Generation requested - Task: {}", task);
    let result = state.generator.generate(&request).await?;

    Ok(HttpResponse::Ok().json(GenerateResponse { task, result }))
}

#[cfg(test)]
mod tests {
    use crate::configure;
    use crate::test_support::{state, FakeChat};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_summarize() {
        let chat = FakeChat::replying("Summary: Cells divide into two.");
        let app = test::init_service(App::new().configure(configure(state(chat.clone())))).await;

        let req = test::TestRequest::post()
            .uri("/api/summarize")
            .set_json(json!({"text": "  Mitosis: a cell splits into two.\n\n細胞分裂 (さいぼうぶんれつ)  "}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["summary"], "Cells divide into two.");
        assert_eq!(body["note_type"], "science");
        assert_eq!(body["foreign_terms"], json!(["細胞分裂"]));
        assert_eq!(chat.calls(), 1);
    }

    #[actix_web::test]
    async fn test_summarize_rate_limited_is_bad_gateway() {
        let chat = FakeChat::failing(429);
        let app = test::init_service(App::new().configure(configure(state(chat)))).await;

        let req = test::TestRequest::post()
            .uri("/api/summarize")
            .set_json(json!({"text": "Some lecture notes"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["detail"].as_str().unwrap().starts_with("LLM gateway error"));
        assert!(body.get("summary").is_none());
    }

    #[actix_web::test]
    async fn test_empty_text_rejected() {
        let chat = FakeChat::replying("unused");
        let app = test::init_service(App::new().configure(configure(state(chat.clone())))).await;

        let req = test::TestRequest::post()
            .uri("/api/generate-questions")
            .set_json(json!({"text": " \n  "}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(chat.calls(), 0);
    }

    #[actix_web::test]
    async fn test_malformed_json_rejected() {
        let chat = FakeChat::replying("unused");
        let app = test::init_service(App::new().configure(configure(state(chat)))).await;

        let req = test::TestRequest::post()
            .uri("/api/summarize")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"txt\": 1}")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["detail"].is_string());
    }

    #[actix_web::test]
    async fn test_generate_questions() {
        let chat = FakeChat::replying("1. What is X?\n2. Why Y\nNot a question\n4. How Z?");
        let app = test::init_service(App::new().configure(configure(state(chat)))).await;

        let req = test::TestRequest::post()
            .uri("/api/generate-questions")
            .set_json(json!({"text": "Photosynthesis: plants convert light (solar energy) into sugar."}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let questions = body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[0], "What is X?");
        assert_eq!(questions[1], "Why Y?");
        assert_eq!(questions[2], "How Z?");
        assert!(questions.iter().all(|q| q.as_str().unwrap().ends_with('?')));

        let key_terms = body["key_terms"].as_array().unwrap();
        assert!(key_terms.contains(&json!("Photosynthesis")));
        assert!(key_terms.contains(&json!("solar energy")));
    }

    #[actix_web::test]
    async fn test_generate_word_sets_for_category() {
        let chat = FakeChat::replying(r#"{"hard": ["ubiquitous"]}"#);
        let app = test::init_service(App::new().configure(configure(state(chat)))).await;

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({"task": "word_sets", "category": "hard"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["task"], "word_sets");
        let sets = body["result"]["word_sets"].as_object().unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets["hard"].as_array().unwrap().len(), 10);
        assert_eq!(sets["hard"][0], "ubiquitous");
    }

    #[actix_web::test]
    async fn test_generate_unknown_task() {
        let chat = FakeChat::replying("unused");
        let app = test::init_service(App::new().configure(configure(state(chat.clone())))).await;

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({"task": "translate", "text": "hello"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(chat.calls(), 0);
    }
}
