use std::time::Duration;

use evaldash_core::{ApiClient, AppConfig, PendingAction, StoreHandle, TaskPoller};

use super::app::{Action, DashApp, View};
use super::events::InputReader;
use super::terminal::{check_tui_support, restore_terminal, setup_terminal};
use super::ui;

pub async fn run_dashboard(cfg: &AppConfig, api: ApiClient) -> anyhow::Result<()> {
    check_tui_support().map_err(|e| anyhow::anyhow!(e))?;

    let store = StoreHandle::new();
    store.refresh_tasks(&api).await;
    store.refresh_indicators(&api).await;
    store.refresh_system_stats(&api).await;

    let mut app = DashApp::new(store);
    let mut terminal = setup_terminal().map_err(|e| anyhow::anyhow!(e))?;
    let result = run_loop(&mut terminal, &mut app, &api, cfg).await;
    restore_terminal(&mut terminal);
    result
}

async fn run_loop(
    terminal: &mut ratatui::Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
    app: &mut DashApp,
    api: &ApiClient,
    cfg: &AppConfig,
) -> anyhow::Result<()> {
    tracing::debug!(target: "evaldash.tui", "dashboard loop starting");
    let (input_reader, mut input_rx) = InputReader::start();
    let mut tick = tokio::time::interval(Duration::from_millis(cfg.ui.tick_ms.max(16)));
    let poll_interval = Duration::from_secs(cfg.ui.poll_interval_secs.max(1));
    let mut poller: Option<TaskPoller> = None;

    loop {
        // the poll only runs while the task list is on screen
        match (app.view == View::Tasks, poller.is_some()) {
            (true, false) => {
                poller = Some(TaskPoller::start(
                    app.store.clone(),
                    api.clone(),
                    poll_interval,
                ));
            }
            (false, true) => {
                if let Some(mut p) = poller.take() {
                    p.stop();
                }
            }
            _ => {}
        }

        terminal.draw(|f| ui::draw(f, app))?;

        // the analysis targets exist once they have been drawn; parked
        // chart specs materialize on this signal
        if app.view == View::Analysis && !app.charts.is_mounted() {
            app.charts.view_mounted();
        }

        if app.should_quit {
            break;
        }

        tokio::select! {
            Some(key) = input_rx.recv() => {
                if let Some(action) = app.handle_key(key) {
                    dispatch(app, api, action).await;
                }
            }
            _ = tick.tick() => {}
        }
    }

    input_reader.stop();
    Ok(())
}

/// Run the network side effect behind a key action. User-initiated
/// mutations surface their outcome; refreshes stay quiet on failure.
async fn dispatch(app: &mut DashApp, api: &ApiClient, action: Action) {
    match action {
        Action::RefreshTasks => {
            app.store.refresh_tasks(api).await;
        }
        Action::SubmitCreate => match app.forms.submit_create(api).await {
            Ok(()) => {
                app.close_form();
                app.info("task created");
                app.store.refresh_tasks(api).await;
            }
            Err(e) => app.error(e.to_string()),
        },
        Action::StartEdit(id) => match app.forms.start_edit(api, id).await {
            Ok(()) => app.open_edit_form(),
            Err(e) => app.error(e.to_string()),
        },
        Action::SubmitEdit => match app.forms.submit_edit(api).await {
            Ok(()) => {
                app.close_form();
                app.info("task configuration updated");
                app.store.refresh_tasks(api).await;
            }
            Err(e) => app.error(e.to_string()),
        },
        Action::ConfirmPending => {
            let pending = app.forms.pending_action();
            match app.forms.confirm_pending(api).await {
                Ok(()) => {
                    match pending {
                        Some(PendingAction::Start(id)) => app.info(format!("task {id} started")),
                        Some(PendingAction::Delete(id)) => app.info(format!("task {id} deleted")),
                        None => {}
                    }
                    app.store.refresh_tasks(api).await;
                }
                Err(e) => app.error(e.to_string()),
            }
        }
        Action::ViewResult(id) => match app.store.select_task_result(api, id).await {
            Ok(result) => {
                app.set_view(View::Analysis);
                app.charts.render(&result);
            }
            Err(e) => app.error(e.to_string()),
        },
        Action::LoadStats => {
            app.store.refresh_system_stats(api).await;
        }
        Action::RefreshStats => {
            app.store.refresh_system_stats(api).await;
            app.info("statistics refreshed");
        }
    }
}
