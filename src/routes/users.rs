//! Registration, login and profile lookup
//!
//! Passwords are sealed according to the configured [`PasswordMode`] and
//! never appear in a response; every user payload goes out as a
//! [`UserProfile`].
//!
//! [`PasswordMode`]: crate::auth::PasswordMode

use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use super::{created, failed, found, ok, parse_id, parse_json_body, ApiResponse};
use crate::db::schemas::{NewUser, UserPatch, UserProfile};
use crate::server::AppState;
use crate::types::{ExplorerError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// POST /api/users/register
pub async fn handle_register(state: &AppState, body: &Bytes) -> Result<ApiResponse> {
    let req: RegisterRequest = parse_json_body(body)?;

    let (username, password, email) = match (
        required(req.username),
        required(req.password),
        required(req.email),
    ) {
        (Some(u), Some(p), Some(e)) => (u, p, e),
        _ => {
            return Err(ExplorerError::BadRequest(
                "Username, password, and email are required".into(),
            ))
        }
    };

    // Hashing is CPU-bound and does not depend on the uniqueness checks
    let mode = state.args.password_hashing;
    let sealed = tokio::task::spawn_blocking(move || mode.seal(&password))
        .await
        .map_err(|e| ExplorerError::Internal(format!("Password hashing task failed: {e}")))
        .and_then(|sealed| sealed)
        .map_err(failed("Failed to register user"))?;

    // Check and insert must not interleave with another registration
    let _guard = state.registration.lock().await;

    let storage = state.storage.as_ref();
    if storage
        .get_user_by_username(&username)
        .await
        .map_err(failed("Failed to register user"))?
        .is_some()
    {
        warn!(username = %username, "Registration rejected: username taken");
        return Err(ExplorerError::Conflict("Username already exists".into()));
    }
    if storage
        .get_user_by_email(&email)
        .await
        .map_err(failed("Failed to register user"))?
        .is_some()
    {
        warn!(username = %username, "Registration rejected: email taken");
        return Err(ExplorerError::Conflict("Email already exists".into()));
    }

    let user = storage
        .create_user(NewUser {
            username,
            password: sealed,
            email,
            display_name: required(req.display_name),
        })
        .await
        .map_err(failed("Failed to register user"))?;

    info!(user_id = user.id, username = %user.username, "User registered");
    created(&UserProfile::from(user))
}

/// POST /api/users/login
pub async fn handle_login(state: &AppState, body: &Bytes) -> Result<ApiResponse> {
    let req: LoginRequest = parse_json_body(body)?;

    let (username, password) = match (required(req.username), required(req.password)) {
        (Some(u), Some(p)) => (u, p),
        _ => {
            return Err(ExplorerError::BadRequest(
                "Username and password are required".into(),
            ))
        }
    };

    let storage = state.storage.as_ref();
    let user = storage
        .get_user_by_username(&username)
        .await
        .map_err(failed("Failed to log in"))?;

    let Some(user) = user else {
        warn!(username = %username, "Login failed: unknown user");
        return Err(invalid_credentials());
    };

    let matches = state
        .args
        .password_hashing
        .matches(&password, &user.password)
        .map_err(failed("Failed to log in"))?;
    if !matches {
        warn!(username = %username, "Login failed: wrong password");
        return Err(invalid_credentials());
    }

    let patch = UserPatch {
        last_login: Some(Utc::now()),
        ..UserPatch::default()
    };
    let updated = storage
        .update_user(user.id, patch)
        .await
        .map_err(failed("Failed to log in"))?
        .unwrap_or(user);

    info!(user_id = updated.id, "User logged in");
    ok(&UserProfile::from(updated))
}

fn invalid_credentials() -> ExplorerError {
    ExplorerError::Unauthorized("Invalid username or password".into())
}

/// GET /api/users/{id}
pub async fn handle_get_user(state: &AppState, raw_id: &str) -> Result<ApiResponse> {
    let id = parse_id(raw_id, "Invalid user ID")?;
    let user = state
        .storage
        .get_user(id)
        .await
        .map_err(failed("Failed to fetch user"))?;
    let user = found(user, "User not found")?;
    ok(&UserProfile::from(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Args;
    use crate::auth::PasswordMode;
    use hyper::StatusCode;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};

    fn state() -> AppState {
        AppState::new(Args {
            password_hashing: PasswordMode::Plaintext,
            ..Args::for_tests()
        })
    }

    fn body(value: Value) -> Bytes {
        Bytes::from(value.to_string())
    }

    async fn read_json(resp: ApiResponse) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_register_returns_profile_without_password() {
        let state = state();
        let resp = handle_register(
            &state,
            &body(json!({"username": "ada", "password": "x", "email": "a@x"})),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = read_json(resp).await;
        assert_eq!(json["id"], 1);
        assert_eq!(json["username"], "ada");
        assert!(json.get("password").is_none());
    }

    #[tokio::test]
    async fn test_register_requires_all_fields() {
        let state = state();
        let err = handle_register(&state, &body(json!({"username": "ada", "password": ""})))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Username, password, and email are required");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let state = state();
        handle_register(&state, &body(json!({"username": "ada", "password": "x", "email": "a@x"})))
            .await
            .unwrap();
        let err = handle_register(
            &state,
            &body(json!({"username": "grace", "password": "y", "email": "a@x"})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.message(), "Email already exists");
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_unauthorized() {
        let state = state();
        let err = handle_login(&state, &body(json!({"username": "nobody", "password": "x"})))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_get_user_rejects_non_numeric_id() {
        let state = state();
        let err = handle_get_user(&state, "abc").await.unwrap_err();
        assert_eq!(err.message(), "Invalid user ID");
        let err = handle_get_user(&state, "7").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
