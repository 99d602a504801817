//! Swap Router

use crate::application::config::SwapConfig;
use crate::domain::repository::{FaceSwapGateway, ResultCache};
use crate::infra::gradio::GradioClient;
use crate::infra::memory_cache::InMemoryResultCache;
use crate::presentation::handlers::{self, SwapAppState};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Create the swap router backed by the Gradio service and an in-memory cache
pub fn swap_router(gateway: GradioClient, config: SwapConfig) -> Router {
    let cache = InMemoryResultCache::new(config.cache_capacity, config.cache_ttl);
    swap_router_generic(gateway, cache, config)
}

/// Create a generic swap router for any gateway and cache implementation
pub fn swap_router_generic<G, C>(gateway: G, cache: C, config: SwapConfig) -> Router
where
    G: FaceSwapGateway + Sync + 'static,
    C: ResultCache + Sync + 'static,
{
    let body_limit = config.max_upload_bytes;
    let output = ServeDir::new(&config.output_dir);
    let mount = config.public_url_prefix.trim_end_matches('/').to_string();

    let state = SwapAppState {
        gateway: Arc::new(gateway),
        cache: Arc::new(cache),
        config: Arc::new(config),
    };

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/swap",
            post(handlers::swap_faces::<G, C>).layer(DefaultBodyLimit::max(body_limit)),
        )
        .nest_service(&mount, output)
        .with_state(state)
}
