// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{handlers::quiz, state::AppState};

/// Assembles the main application router.
///
/// * Mounts the quiz API under `/api/quiz`.
/// * Applies global middleware (Trace, CORS).
/// * Serves the static front end as the fallback when `STATIC_DIR` is configured.
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let quiz_routes = Router::new()
        .route("/levels", get(quiz::list_levels))
        .route("/sessions", post(quiz::start_session))
        .route("/sessions/{id}", delete(quiz::end_session))
        .route("/sessions/{id}/question", get(quiz::current_question))
        .route("/sessions/{id}/answer", post(quiz::submit_answer))
        .route("/sessions/{id}/score", get(quiz::get_score))
        .route("/restart", post(quiz::restart));

    let mut router = Router::new().nest("/api/quiz", quiz_routes);

    if let Some(dir) = &state.config.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
