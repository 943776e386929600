//! Directory-backed work queue.
//!
//! Each item is a file `<seq>.json`. Writers create `<seq>.json.tmp` and
//! rename it into place, so a reader never sees a partial item. A worker
//! claims an item by renaming it to `<seq>.claimed`; only `*.json` files
//! count toward the depth.

use agora_application::{QueueError, WorkQueue};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

const ITEM_EXT: &str = "json";
const CLAIMED_EXT: &str = "claimed";

pub struct SpoolQueue {
    name: String,
    dir: PathBuf,
    counter: AtomicU64,
}

impl SpoolQueue {
    /// Open the spool directory, creating it if needed
    pub fn open(name: impl Into<String>, dir: impl Into<PathBuf>) -> Result<Self, QueueError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;
        Ok(Self {
            name: name.into(),
            dir,
            counter: AtomicU64::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Claim and read the oldest pending item.
    ///
    /// This is the claim protocol the external batch worker follows; the
    /// engine itself only pushes and checks depth.
    pub async fn pop(&self) -> Result<Option<Value>, QueueError> {
        for path in self.pending().await? {
            let claimed = path.with_extension(CLAIMED_EXT);
            // Another worker may have claimed it first
            if tokio::fs::rename(&path, &claimed).await.is_err() {
                continue;
            }
            let text = tokio::fs::read_to_string(&claimed)
                .await
                .map_err(|e| io_error(&claimed, e))?;
            let value = serde_json::from_str(&text)
                .map_err(|e| QueueError::Serialization(e.to_string()))?;
            tokio::fs::remove_file(&claimed)
                .await
                .map_err(|e| io_error(&claimed, e))?;
            return Ok(Some(value));
        }
        Ok(None)
    }

    /// Pending item files, oldest first
    async fn pending(&self) -> Result<Vec<PathBuf>, QueueError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;
        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&self.dir, e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == ITEM_EXT) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn next_item_name(&self) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{:020}-{:06}.{}", nanos, seq, ITEM_EXT)
    }
}

fn io_error(path: &Path, e: std::io::Error) -> QueueError {
    QueueError::Io(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl WorkQueue for SpoolQueue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn depth(&self) -> Result<usize, QueueError> {
        Ok(self.pending().await?.len())
    }

    async fn push(&self, items: Vec<Value>) -> Result<usize, QueueError> {
        let mut written = 0;
        for item in &items {
            let body =
                serde_json::to_vec(item).map_err(|e| QueueError::Serialization(e.to_string()))?;
            let target = self.dir.join(self.next_item_name());
            let tmp = target.with_extension("json.tmp");
            tokio::fs::write(&tmp, body)
                .await
                .map_err(|e| io_error(&tmp, e))?;
            tokio::fs::rename(&tmp, &target)
                .await
                .map_err(|e| io_error(&target, e))?;
            written += 1;
        }
        debug!("Spooled {} item(s) to queue '{}'", written, self.name);
        Ok(written)
    }
}
