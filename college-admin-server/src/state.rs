//! Host state shared across handlers

use std::path::PathBuf;
use std::sync::Arc;

/// Read-only state; cloning shares the same allocation
#[derive(Debug, Clone)]
pub struct HostState {
    inner: Arc<HostStateInner>,
}

#[derive(Debug)]
struct HostStateInner {
    static_dir: PathBuf,
}

impl HostState {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(HostStateInner {
                static_dir: static_dir.into(),
            }),
        }
    }

    /// Where an on-disk entry document would live
    pub fn index_path(&self) -> PathBuf {
        self.inner.static_dir.join("index.html")
    }
}
