//! End-to-end client flow against a mock service: create a task, poll the
//! list, edit it, view its result, and materialize the charts.

use evaldash_core::chart::ScoreBand;
use evaldash_core::{ApiClient, ChartPipeline, FormSession, StoreHandle};
use mockito::{Matcher, Server};

#[tokio::test]
async fn create_edit_view_flow() {
    let mut server = Server::new_async().await;

    let _create = server
        .mock("POST", "/api/tasks")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "name": "eval gpt agent",
            "dataset_config": {"type": "json", "file_path": "app/data/samples.json"}
        })))
        .with_status(200)
        .with_body(r#"{"id": 1, "name": "eval gpt agent", "status": "pending"}"#)
        .create_async()
        .await;

    let _list = server
        .mock("GET", "/api/tasks")
        .with_status(200)
        .with_body(
            r#"[{"id": 1, "name": "eval gpt agent", "status": "pending",
                 "progress": "0%", "created_at": "2024-03-01T10:00:00+00:00"}]"#,
        )
        .create_async()
        .await;

    let _detail = server
        .mock("GET", "/api/tasks/1")
        .with_status(200)
        .with_body(
            r#"{"id": 1, "name": "eval gpt agent", "status": "pending",
                 "agent_config": {"api_endpoint": "http://agent", "api_key": "stored-secret"},
                 "dataset_config": {"type": "json", "file_path": "app/data/samples.json"},
                 "selected_indicators": [1], "indicator_weights": {"1": 1.0},
                 "result_id": 42}"#,
        )
        .create_async()
        .await;

    let _update = server
        .mock("PUT", "/api/tasks/1")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "name": "eval gpt agent v2",
            "agent_config": {"api_key": null}
        })))
        .with_status(200)
        .with_body(r#"{"id": 1, "name": "eval gpt agent v2", "status": "pending"}"#)
        .create_async()
        .await;

    let _result = server
        .mock("GET", "/api/results/task/1")
        .with_status(200)
        .with_body(
            r#"{"id": 42, "task_id": 1, "overall_score": 0.74,
                 "result_items": [
                    {"indicator_name": "accuracy", "score": 0.91},
                    {"indicator_name": "fluency", "score": 0.65},
                    {"indicator_name": "robustness", "score": 0.31}
                 ],
                 "radar_chart_data": {
                    "labels": ["accuracy", "fluency", "robustness"],
                    "datasets": [{"label": "run", "data": [0.91, 0.65, 0.31]}]
                 }}"#,
        )
        .create_async()
        .await;

    let api = ApiClient::new(&server.url(), 1_000).unwrap();
    let store = StoreHandle::new();
    let mut forms = FormSession::new();
    let mut charts = ChartPipeline::new();

    // create with a blank dataset path, which falls back to the default
    forms.start_create();
    {
        let draft = forms.create_draft_mut().unwrap();
        draft.name = "eval gpt agent".to_string();
        draft.toggle_indicator(1);
    }
    forms.submit_create(&api).await.unwrap();
    assert!(forms.create_draft().is_none());

    store.refresh_tasks(&api).await;
    assert_eq!(store.lock().tasks.len(), 1);

    // edit: the stored key never reaches the draft, and saving with it
    // blank sends the null marker
    forms.start_edit(&api, 1).await.unwrap();
    {
        let draft = forms.edit_draft_mut().unwrap();
        assert_eq!(draft.api_key, "");
        draft.name = "eval gpt agent v2".to_string();
    }
    forms.submit_edit(&api).await.unwrap();

    // view the result and materialize the charts on the mount signal
    let result = store.select_task_result(&api, 1).await.unwrap();
    charts.render(&result);
    assert_eq!(charts.bar().live_count(), 0);

    charts.view_mounted();
    assert_eq!(charts.radar().live_count(), 1);
    assert_eq!(charts.bar().live_count(), 1);

    let bar = match charts.bar().instance().unwrap().spec() {
        evaldash_core::chart::ChartSpec::Bar(spec) => spec.clone(),
        other => panic!("expected a bar spec, got {other:?}"),
    };
    assert_eq!(bar.bars.len(), 3);
    assert_eq!(bar.bars[0].band, ScoreBand::Success);
    assert_eq!(bar.bars[1].band, ScoreBand::Warning);
    assert_eq!(bar.bars[2].band, ScoreBand::Danger);
}
