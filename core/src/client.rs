//! HTTP client for the evaluation task service.
//!
//! One attempt per call, no retries. Failures normalize to a single
//! [`ApiError`] carrying a human-readable message; presentation is left to
//! the caller.

use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::model::{
    EvaluationResult, Indicator, SystemStats, Task, TaskCreate, TaskDetail, TaskUpdate,
};

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.call(Method::GET, "/api/tasks", None).await
    }

    pub async fn get_task(&self, id: i64) -> Result<TaskDetail, ApiError> {
        self.call(Method::GET, &format!("/api/tasks/{id}"), None)
            .await
    }

    pub async fn create_task(&self, task: &TaskCreate) -> Result<Value, ApiError> {
        self.call(Method::POST, "/api/tasks", Some(to_body(task)?))
            .await
    }

    pub async fn update_task(&self, id: i64, update: &TaskUpdate) -> Result<Value, ApiError> {
        self.call(
            Method::PUT,
            &format!("/api/tasks/{id}"),
            Some(to_body(update)?),
        )
        .await
    }

    pub async fn start_task(&self, id: i64) -> Result<Value, ApiError> {
        self.call(Method::POST, &format!("/api/tasks/{id}/start"), None)
            .await
    }

    pub async fn delete_task(&self, id: i64) -> Result<Value, ApiError> {
        self.call(Method::DELETE, &format!("/api/tasks/{id}"), None)
            .await
    }

    pub async fn list_indicators(&self) -> Result<Vec<Indicator>, ApiError> {
        self.call(Method::GET, "/api/indicators", None).await
    }

    pub async fn task_result(&self, task_id: i64) -> Result<EvaluationResult, ApiError> {
        self.call(Method::GET, &format!("/api/results/task/{task_id}"), None)
            .await
    }

    pub async fn system_stats(&self) -> Result<SystemStats, ApiError> {
        self.call(Method::GET, "/api/system/stats", None).await
    }

    pub async fn health(&self) -> Result<bool, ApiError> {
        let url = format!("{}/api/system/health", self.base_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(resp.status().is_success())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(target: "evaldash.api", method = %method, url = %url, "request");

        let mut req = self.http.request(method, &url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        decode_response(resp).await
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

async fn decode_response<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message(status.as_u16(), &body),
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Resolve the message of a non-success body: a JSON `detail` or `message`
/// field wins, then the raw text, then a generic code-only fallback.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "message"] {
            if let Some(msg) = value.get(key).and_then(Value::as_str) {
                return msg.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    format!("HTTP error {status}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AgentConfig, AgentConfigUpdate, DatasetConfig, TaskStatus};
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn client(server: &Server) -> ApiClient {
        ApiClient::new(&server.url(), 1_000).unwrap()
    }

    #[test]
    fn base_url_is_normalized() {
        let api = ApiClient::new("http://localhost:8000/", 1_000).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8000");
    }

    #[test]
    fn error_message_prefers_detail() {
        assert_eq!(error_message(400, r#"{"detail": "bad input"}"#), "bad input");
        assert_eq!(error_message(400, r#"{"message": "nope"}"#), "nope");
        assert_eq!(error_message(400, "plain text"), "plain text");
        assert_eq!(error_message(502, ""), "HTTP error 502");
        assert_eq!(error_message(500, "   "), "HTTP error 500");
    }

    #[test]
    fn error_message_ignores_non_string_fields() {
        assert_eq!(error_message(422, r#"{"detail": [1, 2]}"#), r#"{"detail": [1, 2]}"#);
    }

    #[tokio::test]
    async fn list_tasks_decodes_rows() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/tasks")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id": 1, "name": "demo", "status": "running", "progress": "40%",
                     "total_samples": 10, "processed_samples": 4,
                     "created_at": "2024-03-01T10:00:00+00:00", "updated_at": null}]"#,
            )
            .create_async()
            .await;

        let tasks = client(&server).list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, TaskStatus::Running);
        assert_eq!(tasks[0].progress.as_deref(), Some("40%"));
    }

    #[tokio::test]
    async fn structured_error_body_surfaces_detail() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/tasks/9")
            .with_status(404)
            .with_body(r#"{"detail": "task does not exist"}"#)
            .create_async()
            .await;

        let err = client(&server).get_task(9).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "task does not exist");
    }

    #[tokio::test]
    async fn unstructured_error_body_passes_through() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("DELETE", "/api/tasks/3")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = client(&server).delete_task(3).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn empty_error_body_falls_back_to_status() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/api/tasks/3/start")
            .with_status(502)
            .create_async()
            .await;

        let err = client(&server).start_task(3).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error 502");
    }

    #[tokio::test]
    async fn update_transmits_null_api_key_marker() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("PUT", "/api/tasks/5")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "agent_config": {"api_endpoint": "http://agent", "api_key": null}
            })))
            .with_status(200)
            .with_body(r#"{"id": 5, "name": "t", "status": "pending", "message": "ok"}"#)
            .create_async()
            .await;

        let update = TaskUpdate {
            name: "t".to_string(),
            description: String::new(),
            agent_config: AgentConfigUpdate {
                api_endpoint: "http://agent".to_string(),
                api_key: None,
            },
            dataset_config: DatasetConfig::default(),
            selected_indicators: vec![],
            indicator_weights: BTreeMap::new(),
        };
        client(&server).update_task(5, &update).await.unwrap();
    }

    #[tokio::test]
    async fn create_posts_full_payload() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/api/tasks")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "name": "demo",
                "dataset_config": {"type": "json", "file_path": "app/data/samples.json"}
            })))
            .with_status(200)
            .with_body(r#"{"id": 11, "name": "demo", "status": "pending"}"#)
            .create_async()
            .await;

        let create = TaskCreate {
            name: "demo".to_string(),
            description: String::new(),
            agent_config: AgentConfig::default(),
            dataset_config: DatasetConfig {
                kind: "json".to_string(),
                file_path: "app/data/samples.json".to_string(),
            },
            selected_indicators: vec![1, 2],
            indicator_weights: BTreeMap::new(),
        };
        let value = client(&server).create_task(&create).await.unwrap();
        assert_eq!(value["id"], 11);
    }

    #[tokio::test]
    async fn non_json_success_body_is_a_decode_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/system/stats")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client(&server).system_stats().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn health_reports_success_flag() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/system/health")
            .with_status(200)
            .with_body(r#"{"status": "healthy"}"#)
            .create_async()
            .await;

        assert!(client(&server).health().await.unwrap());
    }
}
