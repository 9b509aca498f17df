mod cookies;
mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use chrono::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::catalog::Catalog;
use crate::config::ServerConfig;
use crate::session::SessionStore;

pub use cookies::{completion_cookie_name, UserSession, SESSION_COOKIE};

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub sessions: SessionStore,
    pub completion_ttl: Duration,
}

impl AppState {
    pub fn new(catalog: Catalog, config: &ServerConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sessions: SessionStore::new(config.session_ttl),
            completion_ttl: config.completion_ttl,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::pick_survey))
        .route("/survey-start", get(handlers::show_survey_start))
        .route("/begin", get(handlers::survey_begin))
        .route("/question/{qid}", get(handlers::show_question))
        .route("/answer", get(handlers::handle_answer))
        .route("/complete", get(handlers::say_thanks))
        .route("/health", get(handlers::health))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
