use agora_application::{QueueError, WorkQueue};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

/// Queue used when generation is disabled; without a script runner
/// nothing is pushed, so the depth stays at zero.
pub struct InMemoryWorkQueue {
    name: String,
    items: Mutex<Vec<Value>>,
}

impl InMemoryWorkQueue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Value>>, QueueError> {
        self.items
            .lock()
            .map_err(|_| QueueError::Unavailable(format!("queue '{}' is poisoned", self.name)))
    }
}

#[async_trait]
impl WorkQueue for InMemoryWorkQueue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn depth(&self) -> Result<usize, QueueError> {
        Ok(self.lock()?.len())
    }

    async fn push(&self, items: Vec<Value>) -> Result<usize, QueueError> {
        let count = items.len();
        self.lock()?.extend(items);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_push_counts_items() {
        let queue = InMemoryWorkQueue::new("experiments");
        assert_eq!(queue.name(), "experiments");
        assert_eq!(queue.depth().await.unwrap(), 0);

        let added = queue
            .push(vec![json!({"lr": 0.1}), json!({"lr": 0.2})])
            .await
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(queue.depth().await.unwrap(), 2);

        queue.push(vec![json!({"lr": 0.3})]).await.unwrap();
        assert_eq!(queue.depth().await.unwrap(), 3);
    }
}
