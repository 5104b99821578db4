//! Per-user quiz progress and badge awards

use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use super::{created, failed, ok, parse_id, parse_json_body, ApiResponse};
use crate::db::schemas::{AnswerRecord, NewQuizProgress, NewUserBadge};
use crate::server::AppState;
use crate::types::{ExplorerError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressRequest {
    #[serde(default)]
    quiz_id: Option<i64>,
    #[serde(default)]
    score: Option<i64>,
    #[serde(default)]
    answers: Option<Vec<AnswerRecord>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AwardRequest {
    #[serde(default)]
    badge_id: Option<i64>,
}

fn user_id(raw: &str) -> Result<i64> {
    parse_id(raw, "Invalid user ID")
}

/// GET /api/users/{userId}/quiz-progress
pub async fn handle_get_progress(state: &AppState, raw_user_id: &str) -> Result<ApiResponse> {
    let user_id = user_id(raw_user_id)?;
    let progress = state
        .storage
        .get_user_quiz_progress(user_id)
        .await
        .map_err(failed("Failed to fetch quiz progress"))?;
    ok(&progress)
}

/// POST /api/users/{userId}/quiz-progress
pub async fn handle_save_progress(
    state: &AppState,
    raw_user_id: &str,
    body: &Bytes,
) -> Result<ApiResponse> {
    let user_id = user_id(raw_user_id)?;
    let req: ProgressRequest = parse_json_body(body)?;

    let (quiz_id, score, answers) = match (req.quiz_id, req.score, req.answers) {
        (Some(quiz_id), Some(score), Some(answers)) if quiz_id != 0 => (quiz_id, score, answers),
        _ => {
            return Err(ExplorerError::BadRequest(
                "Quiz ID, score, and answers are required".into(),
            ))
        }
    };

    let saved = state
        .storage
        .save_user_quiz_progress(NewQuizProgress {
            user_id,
            quiz_id,
            score,
            answers,
        })
        .await
        .map_err(failed("Failed to save quiz progress"))?;

    info!(user_id, quiz_id, score, "Quiz progress saved");
    created(&saved)
}

/// GET /api/badges
pub async fn handle_list_badges(state: &AppState) -> Result<ApiResponse> {
    let badges = state
        .storage
        .get_all_badges()
        .await
        .map_err(failed("Failed to fetch badges"))?;
    ok(&badges)
}

/// GET /api/users/{userId}/badges
pub async fn handle_user_badges(state: &AppState, raw_user_id: &str) -> Result<ApiResponse> {
    let user_id = user_id(raw_user_id)?;
    let badges = state
        .storage
        .get_user_badges(user_id)
        .await
        .map_err(failed("Failed to fetch user badges"))?;
    ok(&badges)
}

/// POST /api/users/{userId}/badges
pub async fn handle_award_badge(
    state: &AppState,
    raw_user_id: &str,
    body: &Bytes,
) -> Result<ApiResponse> {
    let user_id = user_id(raw_user_id)?;
    let req: AwardRequest = parse_json_body(body)?;

    let badge_id = match req.badge_id {
        Some(id) if id != 0 => id,
        _ => return Err(ExplorerError::BadRequest("Badge ID is required".into())),
    };

    let link = state
        .storage
        .award_badge_to_user(NewUserBadge { user_id, badge_id })
        .await
        .map_err(failed("Failed to award badge"))?;

    info!(user_id, badge_id, "Badge awarded");
    created(&link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Args;
    use hyper::StatusCode;
    use serde_json::json;

    fn body(value: serde_json::Value) -> Bytes {
        Bytes::from(value.to_string())
    }

    #[tokio::test]
    async fn test_zero_quiz_id_is_rejected() {
        let state = AppState::new(Args::for_tests());
        let err = handle_save_progress(
            &state,
            "1",
            &body(json!({"quizId": 0, "score": 3, "answers": []})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.message(), "Quiz ID, score, and answers are required");
    }

    #[tokio::test]
    async fn test_missing_answers_is_rejected() {
        let state = AppState::new(Args::for_tests());
        let err = handle_save_progress(&state, "1", &body(json!({"quizId": 2, "score": 3})))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_save_progress_created() {
        let state = AppState::new(Args::for_tests());
        let resp = handle_save_progress(
            &state,
            "1",
            &body(json!({
                "quizId": 2,
                "score": 1,
                "answers": [{"questionId": 3, "answerId": 1, "correct": true}]
            })),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let stored = state.storage.get_user_quiz_progress(1).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].answers.len(), 1);
    }

    #[tokio::test]
    async fn test_award_requires_badge_id() {
        let state = AppState::new(Args::for_tests());
        let err = handle_award_badge(&state, "1", &body(json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Badge ID is required");

        let err = handle_award_badge(&state, "x", &body(json!({"badgeId": 1})))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Invalid user ID");
    }
}
