//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling. Bodies are collected
//! up front so [`route`] can be driven directly in tests without a socket.

use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::Args;
use crate::db::{seed, MemStorage, Storage};
use crate::routes::{
    self, celestial, content, cors_preflight, error_response, method_not_allowed_response,
    missions, not_found_response, planets, progress, quiz, users, worksheets, ApiRequest,
    ApiResponse,
};
use crate::types::{ExplorerError, Result};

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub storage: Arc<dyn Storage>,
    /// Serializes the username/email check with the insert during registration
    pub registration: Mutex<()>,
    pub started_at: Instant,
}

impl AppState {
    /// Empty in-memory store
    pub fn new(args: Args) -> Self {
        Self::with_storage(args, Arc::new(MemStorage::new()))
    }

    pub fn with_storage(args: Args, storage: Arc<dyn Storage>) -> Self {
        Self {
            args,
            storage,
            registration: Mutex::new(()),
            started_at: Instant::now(),
        }
    }

    /// In-memory store loaded with the bundled catalogue
    pub async fn seeded(args: Args) -> Result<Self> {
        let state = Self::new(args);
        seed::seed(state.storage.as_ref()).await?;
        Ok(state)
    }

    /// Build state according to `args.seed`
    pub async fn from_args(args: Args) -> Result<Self> {
        if args.seed {
            Self::seeded(args).await
        } else {
            Ok(Self::new(args))
        }
    }
}

/// Start the HTTP server on the configured address
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;
    info!("Solar explorer listening on {}", listener.local_addr()?);
    serve(listener, state).await
}

/// Accept connections on an already-bound listener
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> std::result::Result<ApiResponse, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    let body = match Limited::new(req.into_body(), state.args.max_body_bytes)
        .collect()
        .await
    {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("[{}] {} {} body rejected: {}", addr, method, path, e);
            let err = if e.downcast_ref::<http_body_util::LengthLimitError>().is_some() {
                ExplorerError::BadRequest("Request body too large".into())
            } else {
                ExplorerError::BadRequest("Failed to read request body".into())
            };
            return Ok(error_response(err));
        }
    };

    let response = route(
        &state,
        ApiRequest {
            method: method.clone(),
            path: path.clone(),
            query,
            body,
        },
    )
    .await;

    info!(
        "[{}] {} {} -> {}",
        addr,
        method,
        path,
        response.status().as_u16()
    );
    Ok(response)
}

/// Dispatch a collected request to its handler
pub async fn route(state: &AppState, req: ApiRequest) -> ApiResponse {
    if req.method == Method::OPTIONS {
        return cors_preflight();
    }

    let segments: Vec<&str> = req.path.split('/').filter(|s| !s.is_empty()).collect();

    let outcome = match (&req.method, segments.as_slice()) {
        (&Method::GET, ["health"] | ["healthz"]) => Ok(routes::health_check(state).await),

        // Users
        (&Method::POST, ["api", "users", "register"]) => {
            users::handle_register(state, &req.body).await
        }
        (&Method::POST, ["api", "users", "login"]) => users::handle_login(state, &req.body).await,
        (&Method::GET, ["api", "users", id]) => users::handle_get_user(state, id).await,

        // Progress and badges
        (&Method::GET, ["api", "users", id, "quiz-progress"]) => {
            progress::handle_get_progress(state, id).await
        }
        (&Method::POST, ["api", "users", id, "quiz-progress"]) => {
            progress::handle_save_progress(state, id, &req.body).await
        }
        (&Method::GET, ["api", "badges"]) => progress::handle_list_badges(state).await,
        (&Method::GET, ["api", "users", id, "badges"]) => {
            progress::handle_user_badges(state, id).await
        }
        (&Method::POST, ["api", "users", id, "badges"]) => {
            progress::handle_award_badge(state, id, &req.body).await
        }

        // Quizzes
        (&Method::GET, ["api", "quiz-categories"]) => quiz::handle_list_categories(state).await,
        (&Method::GET, ["api", "quiz-categories", id]) => {
            quiz::handle_get_category(state, id).await
        }
        (&Method::GET, ["api", "quiz-categories", id, "questions"]) => {
            quiz::handle_category_questions(state, id).await
        }
        (&Method::GET, ["api", "quiz-questions"]) => quiz::handle_list_questions(state).await,
        (&Method::GET, ["api", "quiz-questions", id]) => quiz::handle_get_question(state, id).await,

        // Catalogue
        (&Method::GET, ["api", "planets"]) => planets::handle_list_planets(state).await,
        (&Method::GET, ["api", "planets", id]) => planets::handle_get_planet(state, id).await,
        (&Method::GET, ["api", "fun-facts"]) => content::handle_fun_facts(state).await,
        (&Method::GET, ["api", "explore-contents"]) => {
            content::handle_explore_contents(state).await
        }
        (&Method::GET, ["api", "celestial-objects"]) => {
            celestial::handle_list_objects(state, &req).await
        }
        (&Method::GET, ["api", "celestial-objects", id]) => {
            celestial::handle_get_object(state, id).await
        }
        (&Method::GET, ["api", "space-missions"]) => {
            missions::handle_list_missions(state, &req).await
        }
        (&Method::GET, ["api", "space-missions", id]) => {
            missions::handle_get_mission(state, id).await
        }
        (&Method::GET, ["api", "worksheets"]) => {
            worksheets::handle_list_worksheets(state, &req).await
        }
        (&Method::GET, ["api", "worksheets", id]) => {
            worksheets::handle_get_worksheet(state, id).await
        }

        (_, segments) if is_known_path(segments) => return method_not_allowed_response(),
        _ => return not_found_response(),
    };

    outcome.unwrap_or_else(error_response)
}

fn is_known_path(segments: &[&str]) -> bool {
    matches!(
        segments,
        ["health"]
            | ["healthz"]
            | ["api", "users", _]
            | ["api", "users", _, "quiz-progress" | "badges"]
            | ["api", "badges" | "fun-facts" | "explore-contents"]
            | ["api", "quiz-categories", _, "questions"]
            | [
                "api",
                "quiz-categories"
                    | "quiz-questions"
                    | "planets"
                    | "celestial-objects"
                    | "space-missions"
                    | "worksheets"
            ]
            | [
                "api",
                "quiz-categories"
                    | "quiz-questions"
                    | "planets"
                    | "celestial-objects"
                    | "space-missions"
                    | "worksheets",
                _
            ]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[test]
    fn test_known_paths() {
        assert!(is_known_path(&["api", "planets"]));
        assert!(is_known_path(&["api", "planets", "3"]));
        assert!(is_known_path(&["api", "users", "1", "badges"]));
        assert!(!is_known_path(&["api", "planets", "3", "moons"]));
        assert!(!is_known_path(&["api", "comets"]));
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let state = AppState::new(Args::for_tests());
        let resp = route(&state, ApiRequest::new(Method::GET, "/api/comets")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let state = AppState::new(Args::for_tests());
        let resp = route(&state, ApiRequest::new(Method::POST, "/api/planets")).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let resp = route(&state, ApiRequest::new(Method::GET, "/api/users/login")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_options_is_preflight() {
        let state = AppState::new(Args::for_tests());
        let resp = route(&state, ApiRequest::new(Method::OPTIONS, "/api/users/register")).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_trailing_slash_matches() {
        let state = AppState::seeded(Args::for_tests()).await.unwrap();
        let resp = route(&state, ApiRequest::new(Method::GET, "/api/planets/")).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
