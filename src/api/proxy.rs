use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::env;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{
    collector::{CollectorClient, ERROR_PATH, TOP_SRC_PATH, VOLUME_PATH},
    error::ProxyError,
    metrics, synthetic,
};

const VOLUME_FALLBACK: &str = "failed to load volume metrics";
const ERROR_FALLBACK: &str = "failed to load error metrics";
const TOP_SRC_FALLBACK: &str = "failed to load top sources";

#[derive(Clone)]
pub struct ProxyState {
    pub collector: CollectorClient,
}

enum MetricsMode {
    Proxy,
    Synthetic,
}

fn metrics_mode() -> MetricsMode {
    match env::var("METRICS_MODE").as_deref() {
        Ok("synthetic") => MetricsMode::Synthetic,
        _ => MetricsMode::Proxy,
    }
}

/// The three metric proxy routes. Each forwards its inbound query parameters
/// to one fixed collector path and relays the collector's JSON unchanged.
pub fn proxy_router() -> Router<ProxyState> {
    Router::new()
        .route("/api/mock/metrics/volume", get(get_volume))
        .route("/api/mock/metrics/error", get(get_error_rate))
        .route("/api/mock/metrics/top-src", get(get_top_sources))
}

async fn get_volume(
    State(state): State<ProxyState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ProxyError> {
    relay(&state, VOLUME_PATH, &params, VOLUME_FALLBACK).await
}

async fn get_error_rate(
    State(state): State<ProxyState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ProxyError> {
    relay(&state, ERROR_PATH, &params, ERROR_FALLBACK).await
}

async fn get_top_sources(
    State(state): State<ProxyState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ProxyError> {
    relay(&state, TOP_SRC_PATH, &params, TOP_SRC_FALLBACK).await
}

/// Shared endpoint body: one collector call, pass-through on success, fixed
/// envelope on any failure. The upstream error is logged, never relayed.
async fn relay(
    state: &ProxyState,
    path: &'static str,
    params: &HashMap<String, String>,
    fallback: &'static str,
) -> Result<Json<Value>, ProxyError> {
    let _timer = metrics::RequestTimer::new(path);

    match state.collector.fetch(path, params).await {
        Ok(body) => Ok(Json(body)),
        Err(err) => {
            metrics::record_upstream_failure(path);
            error!("collector request for {} failed: {}", path, err);
            Err(ProxyError::new(fallback))
        }
    }
}

async fn get_internal_metrics() -> String {
    metrics::render()
}

/// Assembles the full application router for the configured mode.
pub fn build_app() -> Router {
    let router = match metrics_mode() {
        MetricsMode::Proxy => {
            let state = ProxyState {
                collector: CollectorClient::from_env(),
            };
            proxy_router().with_state(state)
        }
        MetricsMode::Synthetic => {
            info!("METRICS_MODE=synthetic: serving generated metrics, collector is not contacted");
            synthetic::synthetic_router()
        }
    };

    router
        .route("/internal/metrics", get(get_internal_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn start_server() -> std::io::Result<()> {
    let app = build_app();

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);
    info!("Starting dashboard proxy on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
