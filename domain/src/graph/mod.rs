//! Knowledge graph of hypotheses
//!
//! Built from a [`GraphDocument`] by the rebuild pipeline and consulted
//! read-only by the traverse and example commands.

pub mod entities;
pub mod format;
pub mod traversal;

pub use entities::{
    EdgeRecord, GraphDocument, GraphNode, KnowledgeGraph, Neighbor, NodeId, NodeRecord,
};
pub use format::format_traversal;
pub use traversal::TraversalAlgorithm;
