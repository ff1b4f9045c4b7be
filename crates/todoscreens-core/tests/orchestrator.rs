#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]
//! Orchestrator behaviour against in-memory services

use assert_matches::assert_matches;
use std::sync::Arc;
use todoscreens_core::{
    DisplayNode, MarkDone, Orchestrator, OrchestratorError, Renderer, TaskId,
};
use todoscreens_testkit::{
    overdue_todo, todo, FixedClock, MockDisplay, MockTaskSource,
};

fn orchestrator(tasks: &MockTaskSource, display: &MockDisplay) -> Orchestrator {
    Orchestrator::new(
        Arc::new(tasks.clone()),
        Arc::new(display.clone()),
        Arc::new(FixedClock::default()),
        Renderer::default(),
    )
}

fn row_titles(doc: &serde_json::Value) -> Vec<String> {
    doc["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|item| item["data"]["font"] == "ROBOTO_CONDENSED_24")
        .map(|item| item["data"]["text"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_refresh_pushes_to_matching_nodes_only() {
    let tasks = MockTaskSource::new(vec![todo(1, "Water plants", 1)]);
    let display = MockDisplay::new(vec![
        DisplayNode::new("AAA", "D42B"),
        DisplayNode::new("BBB", "D29"),
        DisplayNode::new("CCC", "D42B"),
    ]);

    let report = orchestrator(&tasks, &display).refresh().await.unwrap();

    assert_eq!(report.tasks, 1);
    assert_eq!(report.pushed, ["AAA", "CCC"]);
    assert!(report.failed.is_empty());
    assert_eq!(report.skipped, 1);

    let draws = display.draws();
    assert_eq!(draws.len(), 2);
    assert_eq!(row_titles(&draws[0].1), ["Water plants"]);
}

#[tokio::test]
async fn test_refresh_honours_node_model_override() {
    let tasks = MockTaskSource::new(vec![]);
    let display = MockDisplay::new(vec![
        DisplayNode::new("AAA", "D42B"),
        DisplayNode::new("BBB", "D75"),
    ]);

    let report = orchestrator(&tasks, &display)
        .with_node_model("D75")
        .refresh()
        .await
        .unwrap();

    assert_eq!(report.pushed, ["BBB"]);
}

#[tokio::test]
async fn test_refresh_continues_after_failed_push() {
    let tasks = MockTaskSource::new(vec![todo(1, "A", 0)]);
    let display = MockDisplay::new(vec![
        DisplayNode::new("AAA", "D42B"),
        DisplayNode::new("BBB", "D42B"),
    ])
    .failing_node("AAA");

    let report = orchestrator(&tasks, &display).refresh().await.unwrap();

    assert_eq!(report.failed, ["AAA"]);
    assert_eq!(report.pushed, ["BBB"]);
}

#[tokio::test]
async fn test_refresh_propagates_fetch_failure() {
    let tasks = MockTaskSource::failing();
    let display = MockDisplay::single();

    let result = orchestrator(&tasks, &display).refresh().await;

    assert_matches!(result, Err(OrchestratorError::Tasks(_)));
    assert_eq!(display.call_count(), 0);
}

#[tokio::test]
async fn test_refresh_propagates_node_list_failure() {
    let tasks = MockTaskSource::new(vec![]);
    let display = MockDisplay::single().failing_list();

    let result = orchestrator(&tasks, &display).refresh().await;

    assert_matches!(result, Err(OrchestratorError::Display(_)));
}

#[tokio::test]
async fn test_invalid_priority_pushes_nothing() {
    let tasks = MockTaskSource::new(vec![todo(1, "Bad", 7)]);
    let display = MockDisplay::single();

    let result = orchestrator(&tasks, &display).refresh().await;

    assert_matches!(result, Err(OrchestratorError::Render(_)));
    assert!(display.draws().is_empty());
}

#[tokio::test]
async fn test_mark_done_closes_task_and_refreshes() {
    let tasks = MockTaskSource::new(vec![
        todo(10, "Low", 0),
        todo(20, "High", 3),
        overdue_todo(30, "Mid", 2, 3),
    ]);
    let display = MockDisplay::single();

    let outcome = orchestrator(&tasks, &display).mark_done(0).await.unwrap();

    assert_matches!(outcome, MarkDone::Closed { ref id, .. } if id == &TaskId::from(20u64));
    assert_eq!(tasks.closed(), [TaskId::from(20u64)]);
    assert_eq!(tasks.fetch_count(), 2);

    let draws = display.draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(row_titles(&draws[0].1), ["Mid", "Low"]);
}

#[tokio::test]
async fn test_mark_done_second_position() {
    let tasks = MockTaskSource::new(vec![todo(1, "First", 3), todo(2, "Second", 1)]);
    let display = MockDisplay::single();

    orchestrator(&tasks, &display).mark_done(1).await.unwrap();

    assert_eq!(tasks.closed(), [TaskId::from(2u64)]);
}

#[tokio::test]
async fn test_mark_done_out_of_range_closes_nothing() {
    let tasks = MockTaskSource::new(vec![todo(1, "Only", 2)]);
    let display = MockDisplay::single();

    let outcome = orchestrator(&tasks, &display).mark_done(1).await.unwrap();

    assert_eq!(outcome, MarkDone::NoTask);
    assert!(tasks.closed().is_empty());
    assert_eq!(display.call_count(), 0);
}

#[tokio::test]
async fn test_mark_done_on_empty_list() {
    let tasks = MockTaskSource::new(vec![]);
    let display = MockDisplay::single();

    let outcome = orchestrator(&tasks, &display).mark_done(0).await.unwrap();

    assert_eq!(outcome, MarkDone::NoTask);
    assert!(tasks.closed().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_overlapping_triggers_each_complete() {
    let tasks = MockTaskSource::new(vec![todo(1, "A", 3), todo(2, "B", 2), todo(3, "C", 1)]);
    let display = MockDisplay::single();
    let orchestrator = Arc::new(orchestrator(&tasks, &display));

    let a = tokio::spawn({
        let o = orchestrator.clone();
        async move { o.mark_done(0).await }
    });
    let b = tokio::spawn({
        let o = orchestrator.clone();
        async move { o.mark_done(0).await }
    });
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    let mut closed = tasks.closed();
    closed.sort_by(|x, y| x.as_str().cmp(y.as_str()));
    assert_eq!(closed, [TaskId::from(1u64), TaskId::from(2u64)]);
    assert_eq!(display.draws().len(), 2);
    assert_eq!(row_titles(&display.draws()[1].1), ["C"]);
}
