//! Knowledge graph nodes and the document they are loaded from.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Node identifier. Ids start at 1.
pub type NodeId = u64;

/// An edge as seen from one of its endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: NodeId,
    /// Whether the neighbour supports (true) or contradicts (false) this node
    pub validates: bool,
    /// Overlap between the two nodes' supporting example sets
    pub similarity: f64,
}

/// A hypothesis node in the knowledge graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub description: String,
    pub effect_size: f64,
    pub p_value: f64,
    /// Ids of concrete examples (line numbers in the examples file)
    pub example_ids: Vec<u64>,
    /// Edges incident to this node, in document order
    pub neighbors: Vec<Neighbor>,
}

/// Node entry in a [`GraphDocument`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effect_size: f64,
    #[serde(default)]
    pub p_value: f64,
    #[serde(default)]
    pub example_ids: Vec<u64>,
}

/// Edge entry in a [`GraphDocument`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: NodeId,
    pub target: NodeId,
    pub validates: bool,
    #[serde(alias = "jaccard")]
    pub similarity: f64,
}

/// Serialized form of the graph as written by the rebuild pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Name of the metric the effect sizes refer to
    #[serde(default)]
    pub result_metric: String,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// Read-only, indexed knowledge graph
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    result_metric: String,
    nodes: Vec<GraphNode>,
    index: HashMap<NodeId, usize>,
}

impl KnowledgeGraph {
    /// Build the graph, attaching every edge to both endpoints.
    pub fn from_document(document: GraphDocument) -> Result<Self, DomainError> {
        let mut nodes = Vec::with_capacity(document.nodes.len());
        let mut index = HashMap::with_capacity(document.nodes.len());

        for record in document.nodes {
            if index.insert(record.id, nodes.len()).is_some() {
                return Err(DomainError::InvalidGraph(format!(
                    "duplicate node id {}",
                    record.id
                )));
            }
            nodes.push(GraphNode {
                id: record.id,
                description: record.description,
                effect_size: record.effect_size,
                p_value: record.p_value,
                example_ids: record.example_ids,
                neighbors: Vec::new(),
            });
        }

        for edge in document.edges {
            let (Some(&a), Some(&b)) = (index.get(&edge.source), index.get(&edge.target)) else {
                return Err(DomainError::InvalidGraph(format!(
                    "edge {} -> {} references a missing node",
                    edge.source, edge.target
                )));
            };
            nodes[a].neighbors.push(Neighbor {
                id: edge.target,
                validates: edge.validates,
                similarity: edge.similarity,
            });
            if a != b {
                nodes[b].neighbors.push(Neighbor {
                    id: edge.source,
                    validates: edge.validates,
                    similarity: edge.similarity,
                });
            }
        }

        Ok(Self {
            result_metric: document.result_metric,
            nodes,
            index,
        })
    }

    pub fn result_metric(&self) -> &str {
        &self.result_metric
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
