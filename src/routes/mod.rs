pub mod cloud_config;
pub mod home;

use crate::{config::IpSource, templates::Templates};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, Router},
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    pub templates: Arc<Templates>,
    pub version: Arc<str>,
    pub ip_source: IpSource,
}

pub fn build(state: AppState) -> Router {
    Router::new()
        .fallback(fallback)
        .route("/", get(home::home))
        .route("/pxe-cloud-config.yml", get(cloud_config::pxe_cloud_config))
        .route("/health", get(health).options(health))
        .route("/version", get(version).options(version))
        .with_state(state)
}

async fn fallback(uri: axum::http::Uri) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, format!("No route for URI: {}", uri))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "I'm alive!")
}

async fn version(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, state.version.to_string())
}
