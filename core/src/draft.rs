//! Transient create/edit drafts and the session manager that guards them.
//!
//! A draft is the only place task data is mutated locally. Stored API keys
//! never enter a draft; an empty key on save means "leave unchanged" and
//! is transmitted as an explicit null marker.

use std::collections::BTreeMap;

use crate::client::ApiClient;
use crate::error::DashboardError;
use crate::model::{
    AgentConfig, AgentConfigUpdate, DatasetConfig, TaskCreate, TaskDetail, TaskUpdate,
};

/// Dataset path used when the form leaves it blank.
pub const DEFAULT_DATASET_PATH: &str = "app/data/samples.json";

#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub name: String,
    pub description: String,
    pub api_endpoint: String,
    pub api_key: String,
    pub dataset_type: String,
    pub dataset_path: String,
    pub selected_indicators: Vec<i64>,
    pub indicator_weights: BTreeMap<String, f64>,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            api_endpoint: String::new(),
            api_key: String::new(),
            dataset_type: "json".to_string(),
            dataset_path: String::new(),
            selected_indicators: Vec::new(),
            indicator_weights: BTreeMap::new(),
        }
    }
}

impl TaskDraft {
    /// Project a fetched task into an editable draft. The stored api_key
    /// is never copied in; missing nested configs default instead of
    /// failing.
    pub fn from_task(task: &TaskDetail) -> Self {
        let agent = task.agent_config.clone().unwrap_or_default();
        let dataset = task.dataset_config.clone().unwrap_or_default();
        Self {
            name: task.name.clone(),
            description: task.description.clone().unwrap_or_default(),
            api_endpoint: agent.api_endpoint,
            api_key: String::new(),
            dataset_type: dataset.kind,
            dataset_path: dataset.file_path,
            selected_indicators: task.selected_indicators.clone(),
            indicator_weights: task.indicator_weights.clone(),
        }
    }

    pub fn toggle_indicator(&mut self, id: i64) {
        if let Some(pos) = self.selected_indicators.iter().position(|&i| i == id) {
            self.selected_indicators.remove(pos);
            self.indicator_weights.remove(&id.to_string());
        } else {
            self.selected_indicators.push(id);
        }
    }

    /// Create payload: a blank dataset path falls back to the default,
    /// and whatever is there gets trimmed.
    pub fn create_payload(&self) -> TaskCreate {
        let path = if self.dataset_path.trim().is_empty() {
            DEFAULT_DATASET_PATH
        } else {
            self.dataset_path.trim()
        };
        TaskCreate {
            name: self.name.clone(),
            description: self.description.clone(),
            agent_config: AgentConfig {
                api_endpoint: self.api_endpoint.clone(),
                api_key: self.api_key.clone(),
            },
            dataset_config: DatasetConfig {
                kind: self.dataset_type.clone(),
                file_path: path.to_string(),
            },
            selected_indicators: self.selected_indicators.clone(),
            indicator_weights: self.indicator_weights.clone(),
        }
    }

    /// Update payload: an empty api_key becomes the null "no change"
    /// marker, never an empty-string overwrite.
    pub fn update_payload(&self) -> TaskUpdate {
        let api_key = if self.api_key.is_empty() {
            None
        } else {
            Some(self.api_key.clone())
        };
        TaskUpdate {
            name: self.name.clone(),
            description: self.description.clone(),
            agent_config: AgentConfigUpdate {
                api_endpoint: self.api_endpoint.clone(),
                api_key,
            },
            dataset_config: DatasetConfig {
                kind: self.dataset_type.clone(),
                file_path: self.dataset_path.clone(),
            },
            selected_indicators: self.selected_indicators.clone(),
            indicator_weights: self.indicator_weights.clone(),
        }
    }
}

/// A mutating call that must be confirmed by the user before it goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Start(i64),
    Delete(i64),
}

impl PendingAction {
    pub fn prompt(&self) -> String {
        match self {
            Self::Start(id) => format!("Start task {id}?"),
            Self::Delete(id) => {
                format!("Delete task {id}? This cannot be undone.")
            }
        }
    }
}

/// Holds the create and edit drafts plus any pending confirmation. Every
/// mutation either succeeds (session closes, caller refreshes the list)
/// or fails with the surface left open carrying the error.
#[derive(Debug, Default)]
pub struct FormSession {
    create: Option<TaskDraft>,
    edit: Option<(i64, TaskDraft)>,
    pending: Option<PendingAction>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_draft(&self) -> Option<&TaskDraft> {
        self.create.as_ref()
    }

    pub fn create_draft_mut(&mut self) -> Option<&mut TaskDraft> {
        self.create.as_mut()
    }

    pub fn edit_draft(&self) -> Option<(i64, &TaskDraft)> {
        self.edit.as_ref().map(|(id, draft)| (*id, draft))
    }

    pub fn edit_draft_mut(&mut self) -> Option<&mut TaskDraft> {
        self.edit.as_mut().map(|(_, draft)| draft)
    }

    pub fn pending_action(&self) -> Option<PendingAction> {
        self.pending
    }

    /// Open the create panel with a blank draft.
    pub fn start_create(&mut self) {
        self.create = Some(TaskDraft::default());
    }

    pub fn cancel_create(&mut self) {
        self.create = None;
    }

    /// Send the create request. On success the panel closes and the draft
    /// resets; on failure it stays open for retry.
    pub async fn submit_create(&mut self, api: &ApiClient) -> Result<(), DashboardError> {
        let draft = self.create.as_ref().ok_or(DashboardError::NoActiveDraft)?;
        api.create_task(&draft.create_payload()).await?;
        self.create = None;
        Ok(())
    }

    /// Fetch the task and open an edit draft for it. Tasks that are not
    /// waiting or failed are rejected and no state changes.
    pub async fn start_edit(
        &mut self,
        api: &ApiClient,
        task_id: i64,
    ) -> Result<(), DashboardError> {
        self.edit = None;
        let task = api.get_task(task_id).await?;
        if !task.status.is_editable() {
            return Err(DashboardError::TaskNotEditable(task.status));
        }
        self.edit = Some((task.id, TaskDraft::from_task(&task)));
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    pub async fn submit_edit(&mut self, api: &ApiClient) -> Result<(), DashboardError> {
        let (id, draft) = self.edit.as_ref().ok_or(DashboardError::NoActiveDraft)?;
        api.update_task(*id, &draft.update_payload()).await?;
        self.edit = None;
        Ok(())
    }

    /// Queue a start for confirmation; nothing is sent yet.
    pub fn request_start(&mut self, task_id: i64) {
        self.pending = Some(PendingAction::Start(task_id));
    }

    /// Queue a delete for confirmation; nothing is sent yet.
    pub fn request_delete(&mut self, task_id: i64) {
        self.pending = Some(PendingAction::Delete(task_id));
    }

    pub fn dismiss_pending(&mut self) {
        self.pending = None;
    }

    /// Execute the confirmed action. The confirmation clears either way;
    /// a failure propagates for the caller to surface.
    pub async fn confirm_pending(&mut self, api: &ApiClient) -> Result<(), DashboardError> {
        let action = self.pending.take().ok_or(DashboardError::NothingToConfirm)?;
        match action {
            PendingAction::Start(id) => {
                api.start_task(id).await?;
            }
            PendingAction::Delete(id) => {
                api.delete_task(id).await?;
            }
        }
        Ok(())
    }
}
