//! Typed API client
//!
//! [`HttpFetcher`] speaks to a running explorer server with reqwest.
//! [`ApiClient`] wraps a [`QueryClient`] with one method per read endpoint so
//! callers get decoded records and shared caching for free.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::query::{decode, Fetcher, QueryClient, QueryKey};
use crate::db::schemas::{
    Badge, CelestialObject, ExploreContent, FunFact, Planet, QuizCategory, QuizProgress,
    QuizQuestion, SpaceMission, UserProfile, Worksheet,
};
use crate::types::{ExplorerError, Result};

/// Fetcher over HTTP
pub struct HttpFetcher {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:5000`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(http_client, base_url))
    }

    pub fn with_client(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a response into its JSON body, or `Api { status, message }` for
/// non-success statuses using the server's `message` field when present
async fn read_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<Value>(&bytes)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
        return Err(ExplorerError::Api {
            status: status.as_u16(),
            message,
        });
    }

    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes)
        .map_err(|e| ExplorerError::Http(format!("Invalid JSON from server: {}", e)))
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;
        read_response(response).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self.http_client.post(&url).json(body).send().await?;
        read_response(response).await
    }
}

pub fn user_key(user_id: i64) -> QueryKey {
    QueryKey::path(format!("/api/users/{}", user_id))
}

pub fn user_badges_key(user_id: i64) -> QueryKey {
    QueryKey::path(format!("/api/users/{}/badges", user_id))
}

pub fn quiz_progress_key(user_id: i64) -> QueryKey {
    QueryKey::path(format!("/api/users/{}/quiz-progress", user_id))
}

#[derive(Debug, Clone)]
pub struct HomeContent {
    pub planets: Vec<Planet>,
    pub fun_facts: Vec<FunFact>,
    pub explore_contents: Vec<ExploreContent>,
}

/// Read-side client with one method per endpoint
pub struct ApiClient<F> {
    query: QueryClient<F>,
}

impl ApiClient<HttpFetcher> {
    pub fn connect(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self::new(HttpFetcher::new(base_url)?))
    }
}

impl<F: Fetcher> ApiClient<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            query: QueryClient::new(fetcher),
        }
    }

    pub fn query(&self) -> &QueryClient<F> {
        &self.query
    }

    pub async fn planets(&self) -> Result<Vec<Planet>> {
        self.query.fetch_as(&QueryKey::path("/api/planets")).await
    }

    pub async fn planet(&self, id: i64) -> Result<Planet> {
        self.query
            .fetch_as(&QueryKey::path(format!("/api/planets/{}", id)))
            .await
    }

    pub async fn quiz_categories(&self) -> Result<Vec<QuizCategory>> {
        self.query.fetch_as(&QueryKey::path("/api/quiz-categories")).await
    }

    pub async fn quiz_category(&self, id: i64) -> Result<QuizCategory> {
        self.query
            .fetch_as(&QueryKey::path(format!("/api/quiz-categories/{}", id)))
            .await
    }

    pub async fn category_questions(&self, category_id: i64) -> Result<Vec<QuizQuestion>> {
        self.query
            .fetch_as(&QueryKey::path(format!(
                "/api/quiz-categories/{}/questions",
                category_id
            )))
            .await
    }

    pub async fn quiz_questions(&self) -> Result<Vec<QuizQuestion>> {
        self.query.fetch_as(&QueryKey::path("/api/quiz-questions")).await
    }

    pub async fn quiz_question(&self, id: i64) -> Result<QuizQuestion> {
        self.query
            .fetch_as(&QueryKey::path(format!("/api/quiz-questions/{}", id)))
            .await
    }

    pub async fn fun_facts(&self) -> Result<Vec<FunFact>> {
        self.query.fetch_as(&QueryKey::path("/api/fun-facts")).await
    }

    pub async fn explore_contents(&self) -> Result<Vec<ExploreContent>> {
        self.query.fetch_as(&QueryKey::path("/api/explore-contents")).await
    }

    pub async fn celestial_objects(
        &self,
        object_type: Option<&str>,
        parent_id: Option<i64>,
    ) -> Result<Vec<CelestialObject>> {
        let parent = parent_id.map(|id| id.to_string());
        let key = QueryKey::with_params(
            "/api/celestial-objects",
            &[("type", object_type), ("parentId", parent.as_deref())],
        );
        self.query.fetch_as(&key).await
    }

    pub async fn celestial_object(&self, id: i64) -> Result<CelestialObject> {
        self.query
            .fetch_as(&QueryKey::path(format!("/api/celestial-objects/{}", id)))
            .await
    }

    pub async fn space_missions(
        &self,
        status: Option<&str>,
        target: Option<&str>,
    ) -> Result<Vec<SpaceMission>> {
        let key = QueryKey::with_params(
            "/api/space-missions",
            &[("status", status), ("target", target)],
        );
        self.query.fetch_as(&key).await
    }

    pub async fn space_mission(&self, id: i64) -> Result<SpaceMission> {
        self.query
            .fetch_as(&QueryKey::path(format!("/api/space-missions/{}", id)))
            .await
    }

    pub async fn worksheets(
        &self,
        subject: Option<&str>,
        age_range: Option<&str>,
    ) -> Result<Vec<Worksheet>> {
        let key = QueryKey::with_params(
            "/api/worksheets",
            &[("subject", subject), ("ageRange", age_range)],
        );
        self.query.fetch_as(&key).await
    }

    pub async fn worksheet(&self, id: i64) -> Result<Worksheet> {
        self.query
            .fetch_as(&QueryKey::path(format!("/api/worksheets/{}", id)))
            .await
    }

    /// Everything the home page shows, fetched concurrently
    pub async fn home(&self) -> Result<HomeContent> {
        let (planets, fun_facts, explore_contents) =
            futures::try_join!(self.planets(), self.fun_facts(), self.explore_contents())?;
        Ok(HomeContent {
            planets,
            fun_facts,
            explore_contents,
        })
    }

    pub async fn badges(&self) -> Result<Vec<Badge>> {
        self.query.fetch_as(&QueryKey::path("/api/badges")).await
    }

    pub async fn user(&self, user_id: i64) -> Result<UserProfile> {
        self.query.fetch_as(&user_key(user_id)).await
    }

    pub async fn user_badges(&self, user_id: i64) -> Result<Vec<Badge>> {
        self.query.fetch_as(&user_badges_key(user_id)).await
    }

    pub async fn user_quiz_progress(&self, user_id: i64) -> Result<Vec<QuizProgress>> {
        self.query.fetch_as(&quiz_progress_key(user_id)).await
    }

    /// POST and decode the response
    pub async fn post_as<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T> {
        let value = self.query.post(path, body).await?;
        decode(value)
    }
}
