//! Axum-based HTTP API for the price dashboard

use crate::error::SpotdashError;
use crate::resample::Resolution;
use crate::service::PriceService;
use crate::zones;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PriceService>,
}

#[derive(Deserialize)]
pub struct SeriesParams {
    pub area: Option<String>,
}

#[derive(Deserialize)]
pub struct DashboardParams {
    pub area: Option<String>,
    pub resolution: Option<String>,
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("APP_VERSION"),
    }))
}

async fn zones_list() -> impl IntoResponse {
    Json(zones::all())
}

async fn prices(
    State(state): State<AppState>,
    Query(params): Query<SeriesParams>,
) -> Response {
    match state
        .service
        .series_for(params.area.as_deref(), Utc::now())
        .await
    {
        Ok(series) => Json(series).into_response(),
        Err(e) => error_response(e),
    }
}

async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Response {
    let label = params.resolution.as_deref().unwrap_or("hourly");
    let Some(resolution) = Resolution::from_label(label) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": format!("Unknown resolution '{}'; expected 'hourly' or '15min'", label)
            })),
        )
            .into_response();
    };

    match state
        .service
        .dashboard(params.area.as_deref(), resolution, Utc::now())
        .await
    {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => error_response(e),
    }
}

async fn refresh(
    State(state): State<AppState>,
    Query(params): Query<SeriesParams>,
) -> Response {
    match state
        .service
        .force_refresh(params.area.as_deref(), Utc::now())
        .await
    {
        Ok(series) => Json(series).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(e: SpotdashError) -> Response {
    let status = match e {
        SpotdashError::MalformedFeed { .. } | SpotdashError::Network { .. } => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(serde_json::json!({ "error": e.to_string() })),
    )
        .into_response()
}

pub fn build_router(state: AppState) -> Router {
    // Browser and proxy caches must never serve price data transparently;
    // staleness is governed by the explicit cache state machine alone.
    let no_store = SetResponseHeaderLayer::overriding(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate, max-age=0"),
    );

    Router::new()
        .route("/api/health", get(health))
        .route("/api/zones", get(zones_list))
        .route("/api/prices", get(prices))
        .route("/api/dashboard", get(dashboard))
        .route("/api/refresh", post(refresh))
        .with_state(state)
        .layer(no_store)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(service: Arc<PriceService>, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState { service };
    let router = build_router(state);

    let logger = crate::logging::get_logger("web");
    logger.info(&format!(
        "Starting web server; requested host={}, port={}",
        host, port
    ));

    let (addr, parsed_ok): (SocketAddr, bool) = match host.parse::<IpAddr>() {
        Ok(ip) => (SocketAddr::new(ip, port), true),
        Err(_) => (([127, 0, 0, 1], port).into(), false),
    };
    if !parsed_ok {
        logger.warn(&format!("Invalid host '{}'; falling back to 127.0.0.1", host));
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    logger.info(&format!(
        "Web server listening at http://{}:{} (API /api)",
        local_addr.ip(),
        local_addr.port()
    ));

    axum::serve(listener, router).await?;
    Ok(())
}
