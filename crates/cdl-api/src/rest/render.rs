//! `POST /api/render`, `GET /api/render` (§6): orthographic SVG.

use crate::error::{Error, Result};
use axum::extract::Query;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cdl_encoders::{export_svg, RenderOptions};
use serde::Deserialize;

/// Shared by both the JSON body (POST) and query-string (GET) bindings;
/// every field is optional so the spec's defaults (§6: elev=30, azim=-45,
/// width=300, height=300) apply uniformly.
#[derive(Debug, Deserialize)]
pub struct RenderParams {
    pub cdl: String,
    pub elev: Option<f64>,
    pub azim: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl RenderParams {
    fn options(&self) -> RenderOptions {
        let defaults = RenderOptions::default();
        RenderOptions {
            elev: self.elev.unwrap_or(defaults.elev),
            azim: self.azim.unwrap_or(defaults.azim),
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
        }
    }
}

fn render_response(params: &RenderParams) -> Result<Response> {
    let out = cdl_core::pipeline::run(&params.cdl).map_err(Error::Pipeline)?;
    for w in &out.warnings {
        tracing::warn!(warning = %w, "CDL rendered with warnings");
    }
    let svg = export_svg(&out.geometry, params.options());
    Ok((
        [(header::CONTENT_TYPE, "image/svg+xml")],
        svg,
    )
        .into_response())
}

pub async fn render_post(Json(params): Json<RenderParams>) -> Result<Response> {
    render_response(&params)
}

pub async fn render_get(Query(params): Query<RenderParams>) -> Result<Response> {
    render_response(&params)
}

/// Router entry re-exported under one name; `cdl-api::lib` wires the
/// method-specific handlers to the same path.
pub use render_get as render;
