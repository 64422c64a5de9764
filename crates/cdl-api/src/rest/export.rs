//! `POST /api/export/stl`, `POST /api/export/gltf` (§6).

use crate::error::{Error, Result};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cdl_encoders::{export_gltf as encode_gltf, export_stl as encode_stl, GltfOptions};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct StlRequest {
    pub cdl: String,
    pub scale: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct GltfRequest {
    pub cdl: String,
    pub scale: Option<f64>,
}

/// `POST /api/export/stl`: `scale` clamped to `[1, 100]`, default 10.
pub async fn export_stl(Json(req): Json<StlRequest>) -> Result<Response> {
    let out = cdl_core::pipeline::run(&req.cdl).map_err(Error::Pipeline)?;
    let scale = req.scale.unwrap_or(10.0).clamp(1.0, 100.0);
    let stl = encode_stl(&out.geometry, scale);

    Ok((
        [
            (header::CONTENT_TYPE, "model/stl".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"crystal.stl\"".to_string(),
            ),
        ],
        stl,
    )
        .into_response())
}

/// `POST /api/export/gltf`: `scale` clamped to `[0.1, 10]`, default 1.
pub async fn export_gltf(Json(req): Json<GltfRequest>) -> Result<Json<serde_json::Value>> {
    let out = cdl_core::pipeline::run(&req.cdl).map_err(Error::Pipeline)?;
    let scale = req.scale.unwrap_or(1.0).clamp(0.1, 10.0);
    let doc = encode_gltf(&out.geometry, GltfOptions { scale });
    Ok(Json(doc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stl_export_is_ascii_solid() {
        let response = export_stl(Json(StlRequest {
            cdl: "cubic[m3m]:{100}@1".to_string(),
            scale: None,
        }))
        .await
        .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn gltf_export_has_asset_version() {
        let Json(doc) = export_gltf(Json(GltfRequest {
            cdl: "cubic[m3m]:{100}@1".to_string(),
            scale: None,
        }))
        .await
        .unwrap();
        assert_eq!(doc["asset"]["version"], "2.0");
    }

    #[tokio::test]
    async fn scale_out_of_range_is_clamped_not_rejected() {
        let response = export_stl(Json(StlRequest {
            cdl: "cubic[m3m]:{100}@1".to_string(),
            scale: Some(1000.0),
        }))
        .await
        .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
