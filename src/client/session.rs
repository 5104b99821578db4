//! Signed-in user state for the client
//!
//! Login and registration only return a profile; there is no token. The
//! session remembers that profile and keeps the per-user cache keys fresh:
//!
//! - login invalidates the user's badge and quiz-progress keys
//! - logout removes them
//! - saving progress invalidates the progress key
//! - awarding a badge invalidates the badge key

use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::api::{quiz_progress_key, user_badges_key, ApiClient};
use super::query::Fetcher;
use crate::db::schemas::{AnswerRecord, Badge, QuizProgress, UserBadge, UserProfile};
use crate::types::{ExplorerError, Result};

/// Registration form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Default)]
struct SessionState {
    user: Option<UserProfile>,
    last_error: Option<String>,
}

pub struct Session<F> {
    api: ApiClient<F>,
    state: RwLock<SessionState>,
}

impl<F: Fetcher> Session<F> {
    pub fn new(api: ApiClient<F>) -> Self {
        Self {
            api,
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn api(&self) -> &ApiClient<F> {
        &self.api
    }

    /// Resume with a previously stored profile without contacting the server
    pub async fn restore(&self, user: UserProfile) {
        self.state.write().await.user = Some(user);
    }

    pub async fn current_user(&self) -> Option<UserProfile> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.user.is_some()
    }

    /// Message of the last failed login or registration
    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    pub async fn clear_error(&self) {
        self.state.write().await.last_error = None;
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile> {
        let body = json!({ "username": username, "password": password });
        let outcome: Result<UserProfile> = self.api.post_as("/api/users/login", &body).await;
        let user = self.settle(outcome).await?;

        let query = self.api.query();
        query.invalidate(&user_badges_key(user.id)).await;
        query.invalidate(&quiz_progress_key(user.id)).await;

        info!(user_id = user.id, "Signed in");
        Ok(user)
    }

    pub async fn register(&self, registration: &Registration) -> Result<UserProfile> {
        let body = serde_json::to_value(registration)?;
        let outcome: Result<UserProfile> = self.api.post_as("/api/users/register", &body).await;
        let user = self.settle(outcome).await?;
        info!(user_id = user.id, "Registered and signed in");
        Ok(user)
    }

    async fn settle(&self, outcome: Result<UserProfile>) -> Result<UserProfile> {
        let mut state = self.state.write().await;
        match outcome {
            Ok(user) => {
                state.user = Some(user.clone());
                state.last_error = None;
                Ok(user)
            }
            Err(err) => {
                state.last_error = Some(err.message().to_string());
                Err(err)
            }
        }
    }

    pub async fn logout(&self) {
        let previous = self.state.write().await.user.take();
        if let Some(user) = previous {
            let query = self.api.query();
            query.remove(&user_badges_key(user.id)).await;
            query.remove(&quiz_progress_key(user.id)).await;
            debug!(user_id = user.id, "Signed out");
        }
    }

    async fn require_user(&self) -> Result<UserProfile> {
        self.current_user()
            .await
            .ok_or_else(|| ExplorerError::Unauthorized("Not signed in".into()))
    }

    /// Badges of the signed-in user; empty when signed out
    pub async fn badges(&self) -> Result<Vec<Badge>> {
        match self.current_user().await {
            Some(user) => self.api.user_badges(user.id).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn quiz_progress(&self) -> Result<Vec<QuizProgress>> {
        let user = self.require_user().await?;
        self.api.user_quiz_progress(user.id).await
    }

    pub async fn save_quiz_progress(
        &self,
        quiz_id: i64,
        score: i64,
        answers: Vec<AnswerRecord>,
    ) -> Result<QuizProgress> {
        let user = self.require_user().await?;
        let body = json!({ "quizId": quiz_id, "score": score, "answers": answers });
        let saved = self
            .api
            .post_as(&format!("/api/users/{}/quiz-progress", user.id), &body)
            .await?;
        self.api.query().invalidate(&quiz_progress_key(user.id)).await;
        Ok(saved)
    }

    pub async fn award_badge(&self, badge_id: i64) -> Result<UserBadge> {
        let user = self.require_user().await?;
        let body = json!({ "badgeId": badge_id });
        let link = self
            .api
            .post_as(&format!("/api/users/{}/badges", user.id), &body)
            .await?;
        self.api.query().invalidate(&user_badges_key(user.id)).await;
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::query::tests::FakeFetcher;
    use crate::client::query::QueryState;

    fn profile(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "username": "ada",
            "email": "a@b.com",
            "createdAt": "2026-01-01T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_badges_empty_when_signed_out() {
        let session = Session::new(ApiClient::new(FakeFetcher::default()));
        assert!(session.badges().await.unwrap().is_empty());
        assert_eq!(session.api().query().fetcher().calls(), 0);
    }

    #[tokio::test]
    async fn test_login_invalidates_user_keys() {
        let fetcher = FakeFetcher::default();
        fetcher.respond("/api/users/1/badges", Ok(json!([])));
        fetcher.respond("/api/users/1/badges", Ok(json!([])));
        fetcher.respond("/api/users/login", Ok(profile(1)));
        let session = Session::new(ApiClient::new(fetcher));

        session.restore(serde_json::from_value(profile(1)).unwrap()).await;
        session.badges().await.unwrap();
        session.login("ada", "x").await.unwrap();

        let key = user_badges_key(1);
        assert_eq!(session.api().query().state(&key).await, QueryState::Idle);
        session.badges().await.unwrap();
        assert_eq!(session.api().query().fetcher().calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_login_records_error() {
        let fetcher = FakeFetcher::default();
        fetcher.respond(
            "/api/users/login",
            Err(ExplorerError::Api {
                status: 401,
                message: "Invalid username or password".into(),
            }),
        );
        let session = Session::new(ApiClient::new(fetcher));

        assert!(session.login("ada", "wrong").await.is_err());
        assert!(!session.is_authenticated().await);
        assert_eq!(
            session.last_error().await.as_deref(),
            Some("Invalid username or password")
        );
        session.clear_error().await;
        assert_eq!(session.last_error().await, None);
    }

    #[tokio::test]
    async fn test_logout_removes_user_keys() {
        let fetcher = FakeFetcher::default();
        fetcher.respond("/api/users/1/quiz-progress", Ok(json!([])));
        let session = Session::new(ApiClient::new(fetcher));
        session.restore(serde_json::from_value(profile(1)).unwrap()).await;

        session.quiz_progress().await.unwrap();
        session.logout().await;

        let key = quiz_progress_key(1);
        assert_eq!(session.api().query().state(&key).await, QueryState::Idle);
        assert!(session.current_user().await.is_none());
        assert!(session.quiz_progress().await.is_err());
    }

    #[tokio::test]
    async fn test_award_badge_invalidates_badges() {
        let fetcher = FakeFetcher::default();
        fetcher.respond("/api/users/1/badges", Ok(json!([])));
        fetcher.respond(
            "/api/users/1/badges",
            Ok(json!({"id": 1, "userId": 1, "badgeId": 2, "earnedAt": "2026-01-01T00:00:00Z"})),
        );
        let session = Session::new(ApiClient::new(fetcher));
        session.restore(serde_json::from_value(profile(1)).unwrap()).await;

        session.badges().await.unwrap();
        let link = session.award_badge(2).await.unwrap();
        assert_eq!(link.badge_id, 2);
        assert_eq!(
            session.api().query().state(&user_badges_key(1)).await,
            QueryState::Idle
        );
    }
}
