//! Work queue port
//!
//! A passed proposal pushes its generated experiment records onto a queue
//! drained by an external batch worker. The engine only ever pushes and
//! checks the depth.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueueError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Queue unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait WorkQueue: Send + Sync {
    /// Queue name, for logs
    fn name(&self) -> &str;

    /// Number of items not yet taken by the worker
    async fn depth(&self) -> Result<usize, QueueError>;

    /// Enqueue items in order; returns how many were added
    async fn push(&self, items: Vec<Value>) -> Result<usize, QueueError>;
}
