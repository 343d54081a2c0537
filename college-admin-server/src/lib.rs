//! college-admin-server: static host for the admin panel
//!
//! Serves the panel's entry document at `/`, a liveness probe at `/health`
//! and any other file found in the static directory. Stateless, no auth.

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use server::{build_router, run_server, ServerArgs, ServerConfig};
pub use state::HostState;
