use std::collections::HashMap;
use tokio::task::JoinHandle;

/// Background tasks keyed by purpose. Spawning under a key that is already
/// running aborts the older task, so only the latest lookup can land.
#[derive(Default)]
pub struct TaskManager {
    tasks: HashMap<String, JoinHandle<()>>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    pub fn spawn(&mut self, key: &str, task: JoinHandle<()>) {
        self.tasks.retain(|_, handle| !handle.is_finished());
        if let Some(handle) = self.tasks.insert(key.to_string(), task) {
            handle.abort();
        }
    }

    pub fn abort(&mut self, key: &str) {
        if let Some(handle) = self.tasks.remove(key) {
            handle.abort();
        }
    }

    pub fn abort_all(&mut self) {
        for handle in self.tasks.values() {
            handle.abort();
        }
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn pending(done: oneshot::Sender<()>) -> JoinHandle<()> {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            let _ = done.send(());
        })
    }

    #[tokio::test]
    async fn respawning_a_key_aborts_the_previous_task() {
        let mut tasks = TaskManager::new();
        let (tx, rx) = oneshot::channel();
        tasks.spawn("preview", pending(tx));
        tasks.spawn("preview", tokio::spawn(async {}));

        // The aborted task drops its sender without sending
        assert!(rx.await.is_err());
    }

    #[tokio::test]
    async fn abort_all_stops_everything() {
        let mut tasks = TaskManager::new();
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        tasks.spawn("preview", pending(tx1));
        tasks.spawn("search", pending(tx2));
        tasks.abort_all();
        assert!(rx1.await.is_err());
        assert!(rx2.await.is_err());
    }
}
