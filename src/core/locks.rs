use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;

/// Read/write locks keyed by working directory.
///
/// Build steps hold the write half so that no run or query observes a
/// half-rebuilt tree; runs and queries share the read half.
#[derive(Debug, Default)]
pub struct WorkdirLocks {
    locks: DashMap<PathBuf, Arc<RwLock<()>>>,
}

impl WorkdirLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_dir(&self, dir: &Path) -> Arc<RwLock<()>> {
        self.locks
            .entry(dir.to_path_buf())
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }
}
