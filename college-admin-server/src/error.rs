//! Error types for college-admin-server

use std::net::AddrParseError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid bind address '{addr}': {source}")]
    BindAddr {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));
        (status, body).into_response()
    }
}
