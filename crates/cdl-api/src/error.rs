//! API error type: wraps [`cdl_core::Error`] and maps every failure to an
//! HTTP response (§10.2).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A pipeline failure (lex/parse/geometry error) — always a 400, the
    /// request was malformed CDL.
    #[error(transparent)]
    Pipeline(#[from] cdl_core::Error),

    /// A request the pipeline never even saw: missing/invalid query or
    /// body parameters.
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // `Error::Other` is the pipeline's internal-invariant-violation
            // slot (§7: "should not normally be reachable") — a 500, not a
            // 400, since it isn't the caller's malformed input.
            Error::Pipeline(cdl_core::Error::Other(msg)) => {
                tracing::error!(error = %msg, "pipeline invariant violation");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            Error::Pipeline(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
