pub mod app;
pub mod events;
pub mod loop_run;
pub mod terminal;
pub mod ui;

pub use app::DashApp;
pub use loop_run::run_dashboard;
