//! JSON snapshot of the whole session.
//!
//! ```json
//! {"version": 1, "saved_at": "2026-01-01T00:00:00.000Z", "state": {...}}
//! ```
//!
//! Saves go to `<path>.tmp` and are renamed over the previous snapshot.

use agora_application::{SessionStore, StoreError};
use agora_domain::SessionState;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    saved_at: String,
    state: &'a SessionState,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    state: serde_json::Value,
}

pub struct JsonSessionStore {
    path: PathBuf,
}

impl JsonSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl SessionStore for JsonSessionStore {
    async fn load(&self) -> Result<Option<SessionState>, StoreError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot =
            serde_json::from_str(&text).map_err(|e| StoreError::Serialization(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        let state: SessionState = serde_json::from_value(snapshot.state)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        state.validate()?;

        debug!("Loaded session from {}", self.path.display());
        Ok(Some(state))
    }

    async fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        let snapshot = SnapshotRef {
            version: SNAPSHOT_VERSION,
            saved_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            state,
        };
        let body = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!("Saved session to {}", self.path.display());
        Ok(())
    }
}
