//! In-memory mirror of the remote task service.
//!
//! Every successful fetch is a full replace, never an incremental merge.
//! Task-list refreshes draw a generation number before the request goes
//! out and a response is only applied if it is newer than the last one
//! applied, so a stale poll resolving late can never overwrite fresher
//! data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::client::ApiClient;
use crate::error::DashboardError;
use crate::model::{
    EvaluationResult, Indicator, IndicatorCategory, SystemStats, Task, TaskStatus,
};

#[derive(Debug, Default)]
pub struct DashboardStore {
    pub tasks: Vec<Task>,
    pub indicators: Vec<Indicator>,
    pub selected_result: Option<EvaluationResult>,
    pub system_stats: Option<SystemStats>,
    applied_generation: u64,
}

impl DashboardStore {
    /// Full-replace the task list if `generation` is newer than the last
    /// applied one. Returns whether the payload was applied.
    pub fn apply_tasks(&mut self, generation: u64, tasks: Vec<Task>) -> bool {
        if generation <= self.applied_generation {
            tracing::debug!(
                target: "evaldash.store",
                generation,
                applied = self.applied_generation,
                "dropping stale task payload"
            );
            return false;
        }
        self.applied_generation = generation;
        self.tasks = tasks;
        true
    }

    pub fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn indicators_in(&self, category: IndicatorCategory) -> Vec<&Indicator> {
        self.indicators
            .iter()
            .filter(|i| i.category == category)
            .collect()
    }
}

/// Cloneable handle over the shared store plus the poll generation
/// counter.
#[derive(Clone, Default)]
pub struct StoreHandle {
    inner: Arc<Mutex<DashboardStore>>,
    generation: Arc<AtomicU64>,
}

impl StoreHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, DashboardStore> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Draw the generation for a refresh about to be sent.
    pub fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replace the task list from the service. Errors are logged and the
    /// cache keeps its last known value.
    pub async fn refresh_tasks(&self, api: &ApiClient) {
        let generation = self.next_generation();
        match api.list_tasks().await {
            Ok(tasks) => {
                self.lock().apply_tasks(generation, tasks);
            }
            Err(e) => {
                tracing::warn!(target: "evaldash.store", error = %e, "task refresh failed");
            }
        }
    }

    pub async fn refresh_indicators(&self, api: &ApiClient) {
        match api.list_indicators().await {
            Ok(indicators) => self.lock().indicators = indicators,
            Err(e) => {
                tracing::warn!(target: "evaldash.store", error = %e, "indicator refresh failed");
            }
        }
    }

    /// Resolve the result for a task the user asked to view and make it
    /// the selected result. Failed tasks surface their failure text; a
    /// task without a result reports why none is available.
    pub async fn select_task_result(
        &self,
        api: &ApiClient,
        task_id: i64,
    ) -> Result<EvaluationResult, DashboardError> {
        let task = api.get_task(task_id).await?;
        if task.status == TaskStatus::Failed {
            let reason = task
                .description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "check the dataset path, the agent endpoint, and the service logs".to_string());
            return Err(DashboardError::TaskFailed(reason));
        }
        if task.result_id.is_none() {
            return Err(if task.status == TaskStatus::Completed {
                DashboardError::ResultMissing
            } else {
                DashboardError::ResultNotReady
            });
        }
        let result = api.task_result(task_id).await?;
        self.lock().selected_result = Some(result.clone());
        Ok(result)
    }

    pub async fn refresh_system_stats(&self, api: &ApiClient) {
        match api.system_stats().await {
            Ok(stats) => self.lock().system_stats = Some(stats),
            Err(e) => {
                tracing::warn!(target: "evaldash.store", error = %e, "stats refresh failed");
            }
        }
    }
}

/// Periodic task-list refresh, alive only while the task-list view is
/// active. Each tick is fire-and-forget; overlap is resolved by the
/// generation gate, and stopping aborts the schedule without waiting for
/// in-flight requests.
pub struct TaskPoller {
    handle: Option<JoinHandle<()>>,
}

impl TaskPoller {
    pub fn start(store: StoreHandle, api: ApiClient, interval: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            // the immediate first tick would duplicate the startup fetch
            tick.tick().await;
            loop {
                tick.tick().await;
                let store = store.clone();
                let api = api.clone();
                tokio::spawn(async move {
                    store.refresh_tasks(&api).await;
                });
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!(target: "evaldash.store", "task poller stopped");
        }
    }
}

impl Drop for TaskPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskStatus;
    use pretty_assertions::assert_eq;

    fn task(id: i64, name: &str) -> Task {
        Task {
            id,
            name: name.to_string(),
            description: None,
            status: TaskStatus::Pending,
            progress: None,
            total_samples: 0,
            processed_samples: 0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn refresh_is_full_replace() {
        let mut store = DashboardStore::default();
        assert!(store.apply_tasks(1, vec![task(1, "a"), task(2, "b")]));
        assert!(store.apply_tasks(2, vec![task(3, "c")]));
        assert_eq!(store.tasks.len(), 1);
        assert_eq!(store.tasks[0].id, 3);
    }

    #[test]
    fn stale_generation_is_dropped() {
        let mut store = DashboardStore::default();
        // generation 2 resolves before generation 1
        assert!(store.apply_tasks(2, vec![task(9, "new")]));
        assert!(!store.apply_tasks(1, vec![task(1, "old")]));
        assert_eq!(store.tasks[0].id, 9);
    }

    #[test]
    fn generations_are_monotonic() {
        let handle = StoreHandle::new();
        let a = handle.next_generation();
        let b = handle.next_generation();
        assert!(b > a);
    }

    #[tokio::test]
    async fn interleaved_polls_keep_newest_generation() {
        let handle = StoreHandle::new();
        // two polls drawn in order; the older one resolves last
        let first = handle.next_generation();
        let second = handle.next_generation();
        handle.lock().apply_tasks(second, vec![task(2, "second")]);
        handle.lock().apply_tasks(first, vec![task(1, "first")]);
        assert_eq!(handle.lock().tasks[0].name, "second");
    }

    #[tokio::test]
    async fn refresh_tasks_swallows_errors_and_keeps_cache() {
        let handle = StoreHandle::new();
        handle.lock().apply_tasks(
            handle.next_generation(),
            vec![task(1, "kept")],
        );

        // no server listening on this port
        let api = ApiClient::new("http://127.0.0.1:1", 200).unwrap();
        handle.refresh_tasks(&api).await;
        assert_eq!(handle.lock().tasks.len(), 1);
        assert_eq!(handle.lock().tasks[0].name, "kept");
    }

    #[tokio::test]
    async fn refresh_tasks_applies_server_payload() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/tasks")
            .with_status(200)
            .with_body(r#"[{"id": 4, "name": "remote", "status": "completed"}]"#)
            .create_async()
            .await;

        let handle = StoreHandle::new();
        let api = ApiClient::new(&server.url(), 1_000).unwrap();
        handle.refresh_tasks(&api).await;
        assert_eq!(handle.lock().tasks[0].name, "remote");
    }

    #[tokio::test]
    async fn poller_stop_aborts_schedule() {
        let handle = StoreHandle::new();
        let api = ApiClient::new("http://127.0.0.1:1", 200).unwrap();
        let mut poller = TaskPoller::start(handle, api, Duration::from_secs(60));
        assert!(poller.is_running());
        poller.stop();
        tokio::task::yield_now().await;
        assert!(!poller.is_running());
    }

    #[tokio::test]
    async fn viewing_a_failed_task_surfaces_its_description() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/tasks/2")
            .with_status(200)
            .with_body(
                r#"{"id": 2, "name": "t", "status": "failed",
                     "description": "execution failed: dataset missing"}"#,
            )
            .create_async()
            .await;

        let handle = StoreHandle::new();
        let api = ApiClient::new(&server.url(), 1_000).unwrap();
        let err = handle.select_task_result(&api, 2).await.unwrap_err();
        assert_eq!(err.to_string(), "task failed: execution failed: dataset missing");
        assert!(handle.lock().selected_result.is_none());
    }

    #[tokio::test]
    async fn viewing_an_unfinished_task_reports_no_result() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/tasks/2")
            .with_status(200)
            .with_body(r#"{"id": 2, "name": "t", "status": "running"}"#)
            .create_async()
            .await;

        let handle = StoreHandle::new();
        let api = ApiClient::new(&server.url(), 1_000).unwrap();
        let err = handle.select_task_result(&api, 2).await.unwrap_err();
        assert!(matches!(err, DashboardError::ResultNotReady));
    }

    #[tokio::test]
    async fn viewing_a_finished_task_selects_its_result() {
        let mut server = mockito::Server::new_async().await;
        let _task = server
            .mock("GET", "/api/tasks/2")
            .with_status(200)
            .with_body(r#"{"id": 2, "name": "t", "status": "completed", "result_id": 31}"#)
            .create_async()
            .await;
        let _result = server
            .mock("GET", "/api/results/task/2")
            .with_status(200)
            .with_body(
                r#"{"id": 31, "task_id": 2, "overall_score": 0.7,
                     "result_items": [{"indicator_name": "accuracy", "score": 0.7}]}"#,
            )
            .create_async()
            .await;

        let handle = StoreHandle::new();
        let api = ApiClient::new(&server.url(), 1_000).unwrap();
        let result = handle.select_task_result(&api, 2).await.unwrap();
        assert_eq!(result.id, 31);
        assert!(handle.lock().selected_result.is_some());
    }

    #[test]
    fn indicators_filter_by_category() {
        let mut store = DashboardStore::default();
        store.indicators = vec![
            Indicator {
                id: 1,
                name: "a".to_string(),
                display_name: "A".to_string(),
                description: None,
                category: IndicatorCategory::Custom,
                is_builtin: false,
            },
            Indicator {
                id: 2,
                name: "b".to_string(),
                display_name: "B".to_string(),
                description: None,
                category: IndicatorCategory::Generalization,
                is_builtin: true,
            },
        ];
        let custom = store.indicators_in(IndicatorCategory::Custom);
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].id, 1);
    }
}
