//! CDL HTTP API layer (C10).
//!
//! Binds §6's four endpoints — `/api/validate`, `/api/render`,
//! `/api/export/stl`, `/api/export/gltf` — over `cdl-core`'s pipeline and
//! `cdl-encoders`' output encoders. HTTP routing, CORS and auth are
//! explicitly out of scope for the crystallographic core (§1); this crate
//! is a minimal, unauthenticated binding sufficient to exercise those four
//! endpoints, not a hardened multi-tenant service.

pub mod config;
pub mod error;
pub mod rest;

pub use config::Config;
pub use error::{Error, Result};

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_origin == "*" {
        CorsLayer::permissive()
    } else {
        match config.cors_origin.parse::<HeaderValue>() {
            Ok(origin) => CorsLayer::new().allow_origin(origin),
            Err(_) => CorsLayer::permissive(),
        }
    }
}

/// Build the full axum router: `/health` plus the four pipeline-backed
/// routes, wrapped in request tracing, a CORS layer from [`Config`], and a
/// body-size cap from [`Config`].
pub fn create_router(config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/validate", post(rest::validate))
        .route("/api/render", get(rest::render).post(rest::render_post))
        .route("/api/export/stl", post(rest::export_stl))
        .route("/api/export/gltf", post(rest::export_gltf))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
