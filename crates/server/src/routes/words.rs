use actix_web::{get, web, HttpResponse};
use studyhelper_llm::Difficulty;
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;
use crate::types::WordsResponse;

/// Ten words for each difficulty
#[get("/words/random")]
pub async fn random_words(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    info!("Word sets requested");
    let sets = state.generator.generate_word_sets(None, None).await?;

    Ok(HttpResponse::Ok().json(WordsResponse::success(sets)))
}

/// Ten words for one difficulty
#[get("/words/random/{category}")]
pub async fn random_words_by_category(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let category: Difficulty = path.into_inner().parse()?;
    info!("Word set requested - Category: {}", category);

    let mut sets = state.generator.generate_word_sets(Some(category), None).await?;
    let words = sets.remove(&category).unwrap_or_default();

    Ok(HttpResponse::Ok().json(WordsResponse::success(words)))
}
