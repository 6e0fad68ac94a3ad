//! Client core for the evaluation task dashboard.
//!
//! The remote service owns the tasks; this crate owns the client side:
//! the HTTP gateway, the cached mirror of the task list, create/edit
//! drafts, and the chart descriptor pipeline the presentation layer draws
//! from.

pub mod chart;
pub mod client;
pub mod config;
pub mod display;
pub mod draft;
pub mod error;
pub mod model;
pub mod store;

pub use chart::{ChartPipeline, ScoreBand, ScoreTier};
pub use client::ApiClient;
pub use config::AppConfig;
pub use draft::{FormSession, PendingAction, TaskDraft};
pub use error::{ApiError, DashboardError};
pub use store::{DashboardStore, StoreHandle, TaskPoller};
