use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of an evaluation task, owned by the remote service.
///
/// The wire format is a closed set; an unknown status in a payload is a
/// decode error rather than a silent passthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Display label shown in task tables and badges.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "waiting",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Only tasks that have not started (or failed and may be retried)
    /// accept configuration changes.
    pub fn is_editable(self) -> bool {
        matches!(self, Self::Pending | Self::Failed)
    }

    /// The service accepts a start request in the same states that allow
    /// editing.
    pub fn is_startable(self) -> bool {
        matches!(self, Self::Pending | Self::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub api_endpoint: String,
    /// Write-only: the service never echoes a stored key back.
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(rename = "type", default = "default_dataset_type")]
    pub kind: String,
    #[serde(default)]
    pub file_path: String,
}

fn default_dataset_type() -> String {
    "json".to_string()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            kind: default_dataset_type(),
            file_path: String::new(),
        }
    }
}

/// Row of the task list payload (`GET /api/tasks`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub progress: Option<String>,
    #[serde(default)]
    pub total_samples: u64,
    #[serde(default)]
    pub processed_samples: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Full task payload (`GET /api/tasks/{id}`), including configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDetail {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub progress: Option<String>,
    #[serde(default)]
    pub agent_config: Option<AgentConfig>,
    #[serde(default)]
    pub dataset_config: Option<DatasetConfig>,
    #[serde(default)]
    pub selected_indicators: Vec<i64>,
    #[serde(default)]
    pub indicator_weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub total_samples: u64,
    #[serde(default)]
    pub processed_samples: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub result_id: Option<i64>,
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, Serialize)]
pub struct TaskCreate {
    pub name: String,
    pub description: String,
    pub agent_config: AgentConfig,
    pub dataset_config: DatasetConfig,
    pub selected_indicators: Vec<i64>,
    pub indicator_weights: BTreeMap<String, f64>,
}

/// Agent config section of an update: `api_key: None` serializes to JSON
/// `null`, the "leave unchanged" marker the service expects.
#[derive(Debug, Clone, Serialize)]
pub struct AgentConfigUpdate {
    pub api_endpoint: String,
    pub api_key: Option<String>,
}

/// Body of `PUT /api/tasks/{id}`. Full-replace semantics apart from the
/// api_key marker.
#[derive(Debug, Clone, Serialize)]
pub struct TaskUpdate {
    pub name: String,
    pub description: String,
    pub agent_config: AgentConfigUpdate,
    pub dataset_config: DatasetConfig,
    pub selected_indicators: Vec<i64>,
    pub indicator_weights: BTreeMap<String, f64>,
}
