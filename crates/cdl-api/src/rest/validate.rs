//! `POST /api/validate` (§6): parse-only, no geometry. Never itself fails
//! the request — a malformed CDL expression is a successful validation
//! call that reports `valid: false`.

use axum::Json;
use cdl_core::ast::{CrystalForm, ParseResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub cdl: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed: Option<ParsedSummary>,
}

#[derive(Debug, Serialize)]
pub struct ParsedSummary {
    pub system: String,
    #[serde(rename = "pointGroup")]
    pub point_group: String,
    #[serde(rename = "formsCount")]
    pub forms_count: usize,
    pub forms: Vec<FormSummary>,
}

#[derive(Debug, Serialize)]
pub struct FormSummary {
    pub miller: String,
    pub scale: f64,
}

impl From<&ParseResult> for ParsedSummary {
    fn from(parsed: &ParseResult) -> Self {
        let leaves: Vec<CrystalForm> = parsed.flattened_forms();
        ParsedSummary {
            system: parsed.system.as_str().to_string(),
            point_group: parsed.point_group.clone(),
            forms_count: leaves.len(),
            forms: leaves
                .iter()
                .map(|f| FormSummary {
                    miller: f.miller.to_brace_string(),
                    scale: f.scale,
                })
                .collect(),
        }
    }
}

pub async fn validate(Json(req): Json<ValidateRequest>) -> Json<ValidateResponse> {
    match cdl_core::pipeline::parse_only(&req.cdl) {
        Ok((parsed, warnings)) => {
            for w in &warnings {
                tracing::warn!(warning = %w, "CDL validated with warnings");
            }
            Json(ValidateResponse {
                valid: true,
                error: None,
                parsed: Some(ParsedSummary::from(&parsed)),
            })
        }
        Err(e) => Json(ValidateResponse {
            valid: false,
            error: Some(e.to_string()),
            parsed: None,
        }),
    }
}
