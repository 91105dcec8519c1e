use crate::config::Config;
use crate::handlers::content::{create_content, delete_content, get_content, update_content};
use crate::service::ContentService;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::time::Duration;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AlphabyteState {
    pub service: ContentService,
    pub request_timeout: Duration,
    pub body_limit: usize,
}

impl AlphabyteState {
    pub fn new(service: ContentService, cfg: &Config) -> Self {
        Self {
            service,
            request_timeout: cfg.request_timeout(),
            body_limit: cfg.body_limit_bytes,
        }
    }
}

pub fn alphabyte_router(state: AlphabyteState) -> Router {
    let body_limit = state.body_limit;
    Router::new()
        .route("/contents", post(create_content))
        .route(
            "/contents/{id}",
            get(get_content).put(update_content).delete(delete_content),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
