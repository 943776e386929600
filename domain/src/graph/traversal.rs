//! Breadth-first and depth-first walks over the knowledge graph.

use super::entities::{GraphNode, KnowledgeGraph, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Order in which neighbours are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalAlgorithm {
    /// Breadth-first
    Bfs,
    /// Depth-first
    Dfs,
}

impl std::fmt::Display for TraversalAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraversalAlgorithm::Bfs => write!(f, "bfs"),
            TraversalAlgorithm::Dfs => write!(f, "dfs"),
        }
    }
}

impl KnowledgeGraph {
    /// Visit up to `max_count` nodes starting at `start`.
    ///
    /// Nodes are marked visited when they are first discovered, so each node
    /// is returned at most once. Returns `None` if `start` does not exist.
    pub fn traverse(
        &self,
        start: NodeId,
        algorithm: TraversalAlgorithm,
        max_count: usize,
    ) -> Option<Vec<&GraphNode>> {
        let start = self.node(start)?;

        let mut frontier = VecDeque::from([start]);
        let mut visited = HashSet::from([start.id]);
        let mut visited_order = Vec::new();

        while visited_order.len() < max_count {
            let next = match algorithm {
                TraversalAlgorithm::Bfs => frontier.pop_front(),
                TraversalAlgorithm::Dfs => frontier.pop_back(),
            };
            let Some(current) = next else {
                break;
            };

            visited_order.push(current);

            for neighbor in &current.neighbors {
                if visited.insert(neighbor.id)
                    && let Some(node) = self.node(neighbor.id)
                {
                    frontier.push_back(node);
                }
            }
        }

        Some(visited_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::entities::{EdgeRecord, GraphDocument, NodeRecord};

    /// 1 - 2 - 4
    /// |
    /// 3 - 5
    fn sample_graph() -> KnowledgeGraph {
        let nodes = (1..=5)
            .map(|id| NodeRecord {
                id,
                description: String::new(),
                effect_size: 0.0,
                p_value: 0.5,
                example_ids: vec![],
            })
            .collect();
        let edge = |source, target| EdgeRecord {
            source,
            target,
            validates: true,
            similarity: 0.5,
        };
        KnowledgeGraph::from_document(GraphDocument {
            result_metric: "m".to_string(),
            nodes,
            edges: vec![edge(1, 2), edge(1, 3), edge(2, 4), edge(3, 5)],
        })
        .unwrap()
    }

    fn ids(nodes: Vec<&GraphNode>) -> Vec<NodeId> {
        nodes.into_iter().map(|n| n.id).collect()
    }

    #[test]
    fn test_bfs_order() {
        let graph = sample_graph();
        let visited = graph.traverse(1, TraversalAlgorithm::Bfs, 10).unwrap();
        assert_eq!(ids(visited), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_dfs_order() {
        let graph = sample_graph();
        let visited = graph.traverse(1, TraversalAlgorithm::Dfs, 10).unwrap();
        assert_eq!(ids(visited), vec![1, 3, 5, 2, 4]);
    }

    #[test]
    fn test_max_count_limits_result() {
        let graph = sample_graph();
        let visited = graph.traverse(1, TraversalAlgorithm::Bfs, 2).unwrap();
        assert_eq!(ids(visited), vec![1, 2]);
    }

    #[test]
    fn test_missing_start() {
        assert!(sample_graph().traverse(42, TraversalAlgorithm::Bfs, 3).is_none());
    }
}
