//! Quiz categories and questions (read-only)

use super::{failed, found, ok, parse_id, ApiResponse};
use crate::server::AppState;
use crate::types::Result;

/// GET /api/quiz-categories
pub async fn handle_list_categories(state: &AppState) -> Result<ApiResponse> {
    let categories = state
        .storage
        .get_all_quiz_categories()
        .await
        .map_err(failed("Failed to fetch quiz categories"))?;
    ok(&categories)
}

/// GET /api/quiz-categories/{id}
pub async fn handle_get_category(state: &AppState, raw_id: &str) -> Result<ApiResponse> {
    let id = parse_id(raw_id, "Invalid category ID")?;
    let category = state
        .storage
        .get_quiz_category(id)
        .await
        .map_err(failed("Failed to fetch quiz category"))?;
    ok(&found(category, "Category not found")?)
}

/// GET /api/quiz-categories/{id}/questions
///
/// An unknown category yields an empty list rather than 404.
pub async fn handle_category_questions(state: &AppState, raw_id: &str) -> Result<ApiResponse> {
    let id = parse_id(raw_id, "Invalid category ID")?;
    let questions = state
        .storage
        .get_quiz_questions_by_category(id)
        .await
        .map_err(failed("Failed to fetch questions by category"))?;
    ok(&questions)
}

/// GET /api/quiz-questions
pub async fn handle_list_questions(state: &AppState) -> Result<ApiResponse> {
    let questions = state
        .storage
        .get_all_quiz_questions()
        .await
        .map_err(failed("Failed to fetch quiz questions"))?;
    ok(&questions)
}

/// GET /api/quiz-questions/{id}
pub async fn handle_get_question(state: &AppState, raw_id: &str) -> Result<ApiResponse> {
    let id = parse_id(raw_id, "Invalid question ID")?;
    let question = state
        .storage
        .get_quiz_question(id)
        .await
        .map_err(failed("Failed to fetch quiz question"))?;
    ok(&found(question, "Question not found")?)
}
