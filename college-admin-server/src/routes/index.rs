//! Entry document at `/`

use std::io::ErrorKind;

use axum::{extract::State, response::Html, routing::get, Router};
use tracing::debug;

use crate::error::ServerResult;
use crate::state::HostState;

/// Served when the static directory has no `index.html`
pub const DEFAULT_INDEX: &str = include_str!("../../assets/index.html");

/// GET /
async fn index(State(state): State<HostState>) -> ServerResult<Html<String>> {
    let path = state.index_path();
    match tokio::fs::read_to_string(&path).await {
        Ok(document) => Ok(Html(document)),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no index.html on disk, serving built-in page");
            Ok(Html(DEFAULT_INDEX.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

pub fn router() -> Router<HostState> {
    Router::new().route("/", get(index))
}
