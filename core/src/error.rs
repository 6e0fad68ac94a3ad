use thiserror::Error;

use crate::model::TaskStatus;

/// Normalized failure for any call against the task service.
///
/// Every variant carries a human-readable message; callers decide whether
/// to surface it or log and keep the last known state.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("failed to decode response body: {0}")]
    Decode(String),
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("only waiting or failed tasks can be edited (task is {0})")]
    TaskNotEditable(TaskStatus),
    #[error("no edit session is active")]
    NoActiveDraft,
    #[error("no action awaiting confirmation")]
    NothingToConfirm,
    #[error("task failed: {0}")]
    TaskFailed(String),
    #[error("task is not finished yet, no result available")]
    ResultNotReady,
    #[error("task completed but produced no result")]
    ResultMissing,
}
