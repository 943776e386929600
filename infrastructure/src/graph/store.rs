//! File-backed knowledge graph.
//!
//! The graph document is JSON written by the rebuild pipeline. Examples
//! live in a separate JSONL file; an example's id is its zero-based line
//! index.

use agora_application::{GraphError, KnowledgeGraphPort, RebuildSignal, Traversal};
use agora_domain::{GraphDocument, KnowledgeGraph, NodeId, TraversalAlgorithm};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::RwLock;
use tracing::{debug, info};

struct Loaded {
    graph: Arc<KnowledgeGraph>,
    modified: Option<SystemTime>,
}

pub struct JsonGraphStore {
    graph_path: PathBuf,
    examples_path: PathBuf,
    current: RwLock<Option<Loaded>>,
    rebuilt: AtomicBool,
}

impl JsonGraphStore {
    pub fn new(graph_path: impl Into<PathBuf>, examples_path: impl Into<PathBuf>) -> Self {
        Self {
            graph_path: graph_path.into(),
            examples_path: examples_path.into(),
            current: RwLock::new(None),
            rebuilt: AtomicBool::new(false),
        }
    }

    pub fn graph_path(&self) -> &Path {
        &self.graph_path
    }

    /// Load the graph if the file changed since the last load.
    ///
    /// Returns `true` when a new graph was swapped in. Replacing an
    /// already-loaded graph raises the rebuilt signal; the first load does
    /// not.
    pub async fn reload_if_changed(&self) -> Result<bool, GraphError> {
        let modified = tokio::fs::metadata(&self.graph_path)
            .await
            .and_then(|m| m.modified())
            .ok();

        let previous = {
            let current = self.current.read().await;
            match current.as_ref() {
                Some(loaded) if loaded.modified.is_some() && loaded.modified == modified => {
                    return Ok(false);
                }
                Some(_) => true,
                None => false,
            }
        };

        let graph = read_graph(&self.graph_path).await?;
        info!(
            "Loaded knowledge graph from {} ({} nodes)",
            self.graph_path.display(),
            graph.len()
        );
        *self.current.write().await = Some(Loaded {
            graph: Arc::new(graph),
            modified,
        });

        if previous {
            self.rebuilt.store(true, Ordering::SeqCst);
        }
        Ok(true)
    }

    async fn graph(&self) -> Result<Arc<KnowledgeGraph>, GraphError> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|loaded| Arc::clone(&loaded.graph))
            .ok_or(GraphError::NotLoaded)
    }
}

async fn read_graph(path: &Path) -> Result<KnowledgeGraph, GraphError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| GraphError::Io(format!("{}: {}", path.display(), e)))?;
    let document: GraphDocument =
        serde_json::from_str(&text).map_err(|e| GraphError::Parse(e.to_string()))?;
    Ok(KnowledgeGraph::from_document(document)?)
}

#[async_trait]
impl KnowledgeGraphPort for JsonGraphStore {
    async fn node_ids(&self) -> Result<Vec<NodeId>, GraphError> {
        Ok(self.graph().await?.node_ids())
    }

    async fn traverse(
        &self,
        start: NodeId,
        algorithm: TraversalAlgorithm,
        max_count: usize,
    ) -> Result<Option<Traversal>, GraphError> {
        let graph = self.graph().await?;
        Ok(graph
            .traverse(start, algorithm, max_count)
            .map(|nodes| Traversal {
                result_metric: graph.result_metric().to_string(),
                nodes: nodes.into_iter().cloned().collect(),
            }))
    }

    async fn example_ids(&self, node: NodeId) -> Result<Option<Vec<u64>>, GraphError> {
        let graph = self.graph().await?;
        Ok(graph.node(node).map(|n| n.example_ids.clone()))
    }

    async fn lookup_example(&self, example_id: u64) -> Result<Option<String>, GraphError> {
        let file = match tokio::fs::File::open(&self.examples_path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Examples file {} is missing", self.examples_path.display());
                return Ok(None);
            }
            Err(e) => return Err(GraphError::Io(e.to_string())),
        };

        let mut lines = BufReader::new(file).lines();
        let mut index = 0u64;
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| GraphError::Io(e.to_string()))?
        {
            if index == example_id {
                return Ok(Some(line));
            }
            index += 1;
        }
        Ok(None)
    }
}

impl RebuildSignal for JsonGraphStore {
    fn poll_rebuilt(&self) -> bool {
        self.rebuilt.swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph_json(description: &str) -> String {
        json!({
            "result_metric": "accuracy",
            "nodes": [
                {"id": 1, "description": description, "effect_size": 0.3, "p_value": 0.01, "example_ids": [0, 2]},
                {"id": 2, "description": "Smaller batches", "effect_size": -0.1, "p_value": 0.04, "example_ids": [1]}
            ],
            "edges": [
                {"source": 1, "target": 2, "validates": true, "jaccard": 0.5}
            ]
        })
        .to_string()
    }

    fn setup(dir: &tempfile::TempDir, description: &str) -> JsonGraphStore {
        let graph = dir.path().join("graph.json");
        let examples = dir.path().join("experiments.jsonl");
        std::fs::write(&graph, graph_json(description)).unwrap();
        std::fs::write(&examples, "{\"lr\": 0.1}\n{\"lr\": 0.2}\n{\"lr\": 0.3}\n").unwrap();
        JsonGraphStore::new(graph, examples)
    }

    #[tokio::test]
    async fn test_not_loaded_until_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = setup(&dir, "Higher learning rate");

        assert_eq!(store.node_ids().await, Err(GraphError::NotLoaded));
        assert!(store.reload_if_changed().await.unwrap());
        assert!(!store.poll_rebuilt());

        let mut ids = store.node_ids().await.unwrap();
        ids.sort();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_traverse_and_examples() {
        let dir = tempfile::tempdir().unwrap();
        let store = setup(&dir, "Higher learning rate");
        store.reload_if_changed().await.unwrap();

        let traversal = store
            .traverse(1, TraversalAlgorithm::Bfs, 5)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(traversal.result_metric, "accuracy");
        assert_eq!(traversal.nodes.len(), 2);
        assert!(store.traverse(9, TraversalAlgorithm::Dfs, 5).await.unwrap().is_none());

        assert_eq!(store.example_ids(1).await.unwrap(), Some(vec![0, 2]));
        assert_eq!(
            store.lookup_example(2).await.unwrap(),
            Some("{\"lr\": 0.3}".to_string())
        );
        assert_eq!(store.lookup_example(3).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unchanged_file_is_not_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let store = setup(&dir, "Higher learning rate");

        assert!(store.reload_if_changed().await.unwrap());
        assert!(!store.reload_if_changed().await.unwrap());
        assert!(!store.poll_rebuilt());
    }

    #[tokio::test]
    async fn test_rewrite_raises_rebuilt_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = setup(&dir, "Higher learning rate");
        store.reload_if_changed().await.unwrap();

        // Force a different modification time
        let path = store.graph_path().to_path_buf();
        std::fs::write(&path, graph_json("Warmup helps")).unwrap();
        let file = std::fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + std::time::Duration::from_secs(60))
            .unwrap();

        assert!(store.reload_if_changed().await.unwrap());
        assert!(store.poll_rebuilt());
        assert!(!store.poll_rebuilt());

        let traversal = store
            .traverse(1, TraversalAlgorithm::Bfs, 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(traversal.nodes[0].description, "Warmup helps");
    }

    #[tokio::test]
    async fn test_invalid_document_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        std::fs::write(
            &path,
            json!({"nodes": [{"id": 1}], "edges": [{"source": 1, "target": 7, "validates": true, "similarity": 0.1}]})
                .to_string(),
        )
        .unwrap();
        let store = JsonGraphStore::new(path, dir.path().join("none.jsonl"));

        assert!(matches!(
            store.reload_if_changed().await,
            Err(GraphError::Invalid(_))
        ));
        assert_eq!(store.lookup_example(0).await.unwrap(), None);
    }
}
