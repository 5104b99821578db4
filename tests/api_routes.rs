//! End-to-end route tests driving the dispatcher without a socket

use http_body_util::BodyExt;
use hyper::{Method, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

use solar_explorer::auth::PasswordMode;
use solar_explorer::db::schemas::{NewSpaceMission, NewWorksheet};
use solar_explorer::db::Storage;
use solar_explorer::routes::{parse_id, ApiRequest, ApiResponse};
use solar_explorer::server::route;
use solar_explorer::{AppState, Args};

async fn seeded() -> AppState {
    assert_ok!(AppState::seeded(Args::for_tests()).await)
}

fn empty() -> AppState {
    AppState::new(Args {
        password_hashing: PasswordMode::Plaintext,
        ..Args::for_tests()
    })
}

async fn call(state: &AppState, req: ApiRequest) -> (StatusCode, Value) {
    let resp: ApiResponse = route(state, req).await;
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(state: &AppState, path: &str) -> (StatusCode, Value) {
    let (path, query) = match path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path, None),
    };
    let mut req = ApiRequest::new(Method::GET, path);
    if let Some(q) = query {
        req = req.with_query(q);
    }
    call(state, req).await
}

async fn post(state: &AppState, path: &str, body: Value) -> (StatusCode, Value) {
    call(state, ApiRequest::new(Method::POST, path).with_json(&body)).await
}

fn ada() -> Value {
    json!({"username": "ada", "password": "x", "email": "a@b.com"})
}

#[tokio::test]
async fn register_then_duplicate_username_conflicts() {
    let state = empty();

    let (status, body) = post(&state, "/api/users/register", ada()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert!(body.get("password").is_none());

    let (status, body) = post(
        &state,
        "/api/users/register",
        json!({"username": "ada", "password": "y", "email": "other@b.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already exists");

    let counts = assert_ok!(state.storage.counts().await);
    assert_eq!(counts.users, 1);
    let stored = assert_ok!(state.storage.get_user(1).await).unwrap();
    assert_eq!(stored.email, "a@b.com");
}

#[tokio::test]
async fn concurrent_registrations_admit_one() {
    let state = Arc::new(empty());

    let attempts = (0..8).map(|_| {
        let state = Arc::clone(&state);
        tokio::spawn(async move { post(&state, "/api/users/register", ada()).await.0 })
    });
    let statuses: Vec<StatusCode> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CREATED).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(), 7);
}

#[tokio::test]
async fn wrong_password_leaves_last_login_untouched() {
    let state = empty();
    post(&state, "/api/users/register", ada()).await;
    let before = assert_ok!(state.storage.get_user(1).await).unwrap().last_login;

    let (status, body) = post(
        &state,
        "/api/users/login",
        json!({"username": "ada", "password": "nope"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password");

    let after = assert_ok!(state.storage.get_user(1).await).unwrap().last_login;
    assert_eq!(before, after);
}

#[tokio::test]
async fn login_updates_last_login_and_hides_password() {
    let state = empty();
    post(&state, "/api/users/register", ada()).await;
    let before = assert_ok!(state.storage.get_user(1).await)
        .unwrap()
        .last_login
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let (status, body) = post(
        &state,
        "/api/users/login",
        json!({"username": "ada", "password": "x"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("password").is_none());

    let after = assert_ok!(state.storage.get_user(1).await)
        .unwrap()
        .last_login
        .unwrap();
    assert!(after > before);
}

#[tokio::test]
async fn argon2_accounts_log_in() {
    let state = AppState::new(Args::for_tests());
    let (status, _) = post(&state, "/api/users/register", ada()).await;
    assert_eq!(status, StatusCode::CREATED);

    let stored = assert_ok!(state.storage.get_user(1).await).unwrap();
    assert_ne!(stored.password, "x");

    let (status, _) = post(
        &state,
        "/api/users/login",
        json!({"username": "ada", "password": "x"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn planets_are_ordered_from_the_sun() {
    let state = seeded().await;
    let (status, body) = get(&state, "/api/planets").await;
    assert_eq!(status, StatusCode::OK);

    let orders: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["orderFromSun"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, (1..=8).collect::<Vec<_>>());
}

#[tokio::test]
async fn mission_status_filter_ignores_case() {
    let state = seeded().await;
    assert_ok!(
        state
            .storage
            .create_space_mission(NewSpaceMission {
                name: "Lowercase Probe".into(),
                agency: "ESA".into(),
                launch_date: "2030-01-01T00:00:00Z".parse().unwrap(),
                end_date: None,
                description: "test".into(),
                objectives: vec![],
                target_bodies: vec!["Mars".into()],
                achievements: None,
                image: "probe.png".into(),
                mission_type: "Orbiter".into(),
                status: "ACTIVE".into(),
            })
            .await
    );

    let (status, body) = get(&state, "/api/space-missions?status=active").await;
    assert_eq!(status, StatusCode::OK);
    let missions = body.as_array().unwrap();
    assert!(!missions.is_empty());
    assert!(missions
        .iter()
        .all(|m| m["status"].as_str().unwrap().eq_ignore_ascii_case("active")));
    assert!(missions.iter().any(|m| m["name"] == "Lowercase Probe"));
}

#[tokio::test]
async fn celestial_objects_by_parent() {
    let state = seeded().await;
    let (status, body) = get(&state, "/api/celestial-objects?parentId=3").await;
    assert_eq!(status, StatusCode::OK);
    let objects = body.as_array().unwrap();
    assert!(objects.iter().any(|o| o["name"] == "Moon"));
    assert!(objects.iter().all(|o| o["parentBodyId"] == 3));

    let (status, body) = get(&state, "/api/celestial-objects?parentId=three").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid parent ID");
}

#[tokio::test]
async fn empty_filter_returns_everything() {
    let state = seeded().await;
    let (_, all) = get(&state, "/api/worksheets").await;
    let (_, blank) = get(&state, "/api/worksheets?subject=").await;
    assert_eq!(all, blank);
}

#[tokio::test]
async fn duplicate_awards_list_badge_once() {
    let state = seeded().await;
    for _ in 0..2 {
        let (status, _) = post(&state, "/api/users/1/badges", json!({"badgeId": 2})).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, body) = get(&state, "/api/users/1/badges").await;
    assert_eq!(status, StatusCode::OK);
    let badges = body.as_array().unwrap();
    assert_eq!(badges.len(), 1);
    assert_eq!(badges[0]["id"], 2);
}

#[tokio::test]
async fn quiz_progress_round_trip() {
    let state = seeded().await;
    let (status, saved) = post(
        &state,
        "/api/users/4/quiz-progress",
        json!({
            "quizId": 1,
            "score": 2,
            "answers": [{"questionId": 1, "answerId": 2, "correct": true}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(saved["completedAt"].is_string());

    let (_, listed) = get(&state, "/api/users/4/quiz-progress").await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["quizId"], 1);
}

#[tokio::test]
async fn id_and_lookup_errors() {
    let state = seeded().await;

    let (status, body) = get(&state, "/api/planets/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid planet ID");

    let (status, body) = get(&state, "/api/planets/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Planet not found");

    let (status, body) = get(&state, "/api/worksheets/0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Worksheet not found");

    let (status, _) = get(&state, "/api/quiz-categories/2/questions").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let state = empty();
    let mut req = ApiRequest::new(Method::POST, "/api/users/register");
    req.body = bytes::Bytes::from_static(b"{not json");
    let (status, body) = call(&state, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON body"));
}

#[tokio::test]
async fn health_reports_store_counts() {
    let state = seeded().await;
    let (status, body) = get(&state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["healthy"], true);
    assert_eq!(body["counts"]["planets"], 8);
    assert_eq!(body["counts"]["badges"], 4);
}

#[tokio::test]
async fn seeding_twice_is_independent_per_state() {
    let a = seeded().await;
    let b = seeded().await;
    post(&a, "/api/users/1/badges", json!({"badgeId": 1})).await;
    let counts = assert_ok!(b.storage.counts().await);
    assert_eq!(counts.user_badges, 0);
}

#[test]
fn fractional_ids_are_rejected() {
    let err = assert_err!(parse_id("1.5", "Invalid planet ID"));
    assert_eq!(err.message(), "Invalid planet ID");
    assert_err!(parse_id("-", "Invalid planet ID"));
}

#[tokio::test]
async fn worksheet_age_range_is_case_sensitive_but_subject_is_not() {
    let state = seeded().await;
    assert_ok!(
        state
            .storage
            .create_worksheet(NewWorksheet {
                title: "Ring Count".into(),
                description: "Count the rings of Saturn".into(),
                age_range: "Ages 8-10".into(),
                subject: "Astronomy Basics".into(),
                pdf_url: "/worksheets/rings.pdf".into(),
                thumbnail_url: "/worksheets/rings.png".into(),
            })
            .await
    );

    let (status, body) = get(&state, "/api/worksheets?ageRange=Ages%208-10").await;
    assert_eq!(status, StatusCode::OK);
    let exact = body.as_array().unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0]["title"], "Ring Count");

    let (status, body) = get(&state, "/api/worksheets?ageRange=ages%208-10").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = get(&state, "/api/worksheets?subject=ASTRONOMY%20BASICS").await;
    let by_subject = body.as_array().unwrap();
    assert_eq!(by_subject.len(), 1);
    assert_eq!(by_subject[0]["title"], "Ring Count");
}

#[tokio::test]
async fn concurrent_argon2_registrations_all_succeed() {
    let state = Arc::new(AppState::new(Args::for_tests()));

    let attempts = ["ada", "grace", "hedy", "katherine"].map(|name| {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            let body = json!({
                "username": name,
                "password": format!("{name}-pw"),
                "email": format!("{name}@example.com"),
            });
            post(&state, "/api/users/register", body).await.0
        })
    });
    for status in futures::future::join_all(attempts).await {
        assert_eq!(status.unwrap(), StatusCode::CREATED);
    }

    let counts = assert_ok!(state.storage.counts().await);
    assert_eq!(counts.users, 4);
    for id in 1..=4 {
        let user = assert_ok!(state.storage.get_user(id).await).unwrap();
        assert!(user.password.starts_with("$argon2"));
        let (status, _) = post(
            &state,
            "/api/users/login",
            json!({"username": user.username, "password": format!("{}-pw", user.username)}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
