//! Knowledge graph ports
//!
//! The graph is built and refreshed by an external pipeline. The engine
//! reads it through [`KnowledgeGraphPort`] and learns about refreshes by
//! polling [`RebuildSignal`] once per turn.

use agora_domain::graph::format_traversal;
use agora_domain::{DomainError, GraphNode, NodeId, TraversalAlgorithm};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Knowledge graph is not loaded")]
    NotLoaded,

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid graph: {0}")]
    Invalid(#[from] DomainError),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

impl GraphError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, GraphError::Io(_) | GraphError::Timeout(_))
    }
}

/// Result of a traversal, detached from the graph it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    pub result_metric: String,
    pub nodes: Vec<GraphNode>,
}

impl Traversal {
    /// Text shown to the agent
    pub fn render(&self) -> String {
        let nodes: Vec<&GraphNode> = self.nodes.iter().collect();
        format_traversal(&nodes, &self.result_metric)
    }
}

/// Read access to the current knowledge graph
#[async_trait]
pub trait KnowledgeGraphPort: Send + Sync {
    /// Ids of every node, used for random starts
    async fn node_ids(&self) -> Result<Vec<NodeId>, GraphError>;

    /// Walk from `start`; `None` if the node does not exist
    async fn traverse(
        &self,
        start: NodeId,
        algorithm: TraversalAlgorithm,
        max_count: usize,
    ) -> Result<Option<Traversal>, GraphError>;

    /// Example ids attached to a node; `None` if the node does not exist
    async fn example_ids(&self, node: NodeId) -> Result<Option<Vec<u64>>, GraphError>;

    /// Text of one example; `None` if there is no such example
    async fn lookup_example(&self, example_id: u64) -> Result<Option<String>, GraphError>;
}

/// Edge-triggered "the graph was rebuilt" flag.
///
/// `poll_rebuilt` returns `true` once per rebuild and resets itself.
pub trait RebuildSignal: Send + Sync {
    fn poll_rebuilt(&self) -> bool;
}

/// Signal that never fires
pub struct NoRebuildSignal;

impl RebuildSignal for NoRebuildSignal {
    fn poll_rebuilt(&self) -> bool {
        false
    }
}
