use axum::{Router, routing::post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::discovery::DiscoveryClient;
use crate::generative::GenerativeClient;

pub mod handlers;
pub mod models;

/// Shared per-process state: immutable config plus the backend clients.
/// The generative client is a latent collaborator, injected only when
/// configured.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub discovery: Arc<DiscoveryClient>,
    pub generative: Option<Arc<GenerativeClient>>,
}

impl AppState {
    pub fn new(
        config: Config,
        discovery: DiscoveryClient,
        generative: Option<GenerativeClient>,
    ) -> Self {
        AppState {
            config: Arc::new(config),
            discovery: Arc::new(discovery),
            generative: generative.map(Arc::new),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/demo", post(handlers::demo_handler))
        .route("/search", post(handlers::search_handler))
        .with_state(state)
        .layer(cors)
}
