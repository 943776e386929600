//! Session persistence port
//!
//! The whole [`SessionState`] is written after every turn and read back at
//! start-up. There is no incremental log.

use agora_domain::{DomainError, SessionState};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unsupported snapshot version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Stored session is invalid: {0}")]
    Invalid(#[from] DomainError),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The stored session, or `None` if nothing was saved yet
    async fn load(&self) -> Result<Option<SessionState>, StoreError>;

    async fn save(&self, state: &SessionState) -> Result<(), StoreError>;
}
