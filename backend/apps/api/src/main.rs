//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are rendered
//! by `faceswap` through `kernel::error::AppError`.

mod config;
mod shutdown;

use axum::{
    Router, http,
    http::{Method, header},
};
use config::ServerConfig;
use faceswap::{GradioClient, swap_router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,faceswap=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    // Artifacts are served from here, so it must exist before the first request
    tokio::fs::create_dir_all(&config.swap.output_dir).await?;
    tracing::info!(
        output_dir = %config.swap.output_dir.display(),
        max_dimension = config.swap.max_dimension,
        cache_capacity = config.swap.cache_capacity,
        "Swap pipeline configured"
    );

    let gateway = GradioClient::new(config.gradio.clone())?;
    tracing::info!(
        base_url = %gateway.config().base_url,
        api_name = %gateway.config().api_name,
        "Remote inference endpoint configured"
    );

    let app = build_app(swap_router(gateway, config.swap.clone()), &config);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);
    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn build_app(router: Router, config: &ServerConfig) -> Router {
    router
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config.cors_origins.as_deref()))
}

/// Permissive unless an explicit origin list is configured
fn build_cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let allowed_origins: Vec<http::HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
}
