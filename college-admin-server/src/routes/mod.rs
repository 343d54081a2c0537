//! Route handlers for the static host
//!
//! - index: the panel's entry document at `/`
//! - health: liveness probe

pub mod health;
pub mod index;
