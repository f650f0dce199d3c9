use anyhow::{Context, Result};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::{log_requests, metrics::metrics_handler, state::*, ServerConfig};
use crate::gallery::{FilterSpec, GalleryQuery, GalleryResponse};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

#[derive(Serialize)]
struct PingResponse {
    message: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    Json(stats)
}

async fn ping(State(config): State<ServerConfig>) -> impl IntoResponse {
    Json(PingResponse {
        message: config.ping_message,
    })
}

/// Always answers 200; upstream trouble shows up as `success: false` with
/// the curated fallback artworks. A query string that cannot be decoded is
/// treated as an unfiltered request.
async fn get_gallery(
    State(aggregator): State<GuardedAggregator>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Json<GalleryResponse> {
    let query = match pairs {
        Ok(Query(pairs)) => GalleryQuery::from_pairs(pairs),
        Err(rejection) => {
            warn!("Ignoring undecodable gallery query: {}", rejection);
            GalleryQuery::default()
        }
    };
    let filters = FilterSpec::from(query);
    debug!("Gallery request with filters {:?}", filters.descriptors());

    let mut rng = StdRng::from_rng(&mut rand::rng());
    let outcome = aggregator.aggregate(&filters, &mut rng).await;
    Json(GalleryResponse::from(outcome))
}

pub fn make_app(config: ServerConfig, aggregator: GuardedAggregator) -> Router {
    let state = ServerState::new(config.clone(), aggregator);

    let api_routes: Router = Router::new()
        .route("/ping", get(ping))
        .route("/rijksmuseum", get(get_gallery))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    home_router
        .nest("/api", api_routes)
        .layer(cors)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

pub async fn run_server(
    config: ServerConfig,
    aggregator: GuardedAggregator,
    metrics_port: u16,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, aggregator);

    let metrics_listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;
    tokio::spawn(async move {
        if let Err(err) = axum::serve(metrics_listener, make_metrics_app()).await {
            tracing::error!("Metrics server stopped: {}", err);
        }
    });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Gallery server listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
