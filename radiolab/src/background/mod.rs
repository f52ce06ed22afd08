pub mod data_loader;

use std::collections::HashMap;
use std::future::Future;
use tokio::task::JoinHandle;

/// Tracks running background jobs by key and provides cancellation support
pub struct BackgroundTaskManager {
    tasks: HashMap<String, JoinHandle<()>>,
}

impl BackgroundTaskManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    /// Spawn a background job
    /// If a job with the same ID is still running it is aborted first, so only the
    /// newest load of a kind can deliver a result
    pub fn spawn_load_task<F>(&mut self, task_id: String, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(handle) = self.tasks.remove(&task_id) {
            if !handle.is_finished() {
                tracing::debug!("Aborting superseded task {}", task_id);
            }
            handle.abort();
        }

        // Finished jobs are dropped here so the map only holds live work
        self.tasks.retain(|_, handle| !handle.is_finished());

        let handle = tokio::spawn(future);
        self.tasks.insert(task_id, handle);
    }

    /// Number of jobs that have not finished yet
    pub fn running(&self) -> usize {
        self.tasks
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Cancel all running tasks (used on shutdown)
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl Default for BackgroundTaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BackgroundTaskManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_same_id_aborts_previous_task() {
        let mut manager = BackgroundTaskManager::new();
        let (first_tx, first_rx) = oneshot::channel::<()>();
        let (second_tx, second_rx) = oneshot::channel::<()>();

        manager.spawn_load_task("load".to_string(), async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            let _ = first_tx.send(());
        });
        manager.spawn_load_task("load".to_string(), async move {
            let _ = second_tx.send(());
        });

        assert!(second_rx.await.is_ok());
        // The aborted task dropped its sender without sending
        assert!(first_rx.await.is_err());
    }

    #[tokio::test]
    async fn test_cancel_all_clears_tasks() {
        let mut manager = BackgroundTaskManager::new();
        manager.spawn_load_task("a".to_string(), async {
            tokio::time::sleep(Duration::from_secs(30)).await;
        });
        manager.spawn_load_task("b".to_string(), async {
            tokio::time::sleep(Duration::from_secs(30)).await;
        });
        assert_eq!(manager.running(), 2);

        manager.cancel_all();
        assert_eq!(manager.running(), 0);
    }
}
