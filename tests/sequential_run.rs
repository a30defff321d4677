// tests/sequential_run.rs

use anyhow::anyhow;
use serde_json::{Value, json};
use taskdag::{CallArgs, Dependency, Pipeline, RunMode, TaskFailure, TaskSpec};
use taskdag_test_utils::builders::{fails, returns};
use taskdag_test_utils::init_tracing;
use taskdag_test_utils::probes::{RecordingNotifier, RecordingSink};

/// `a` returns 2; `b` divides 10 by the injected result.
fn division_specs() -> Vec<TaskSpec> {
    let a = returns("a", json!(2));
    let b = TaskSpec::new("b", |call: CallArgs| {
        let divisor = call
            .args
            .first()
            .and_then(Value::as_i64)
            .ok_or_else(|| anyhow!("expected an integer divisor"))?;
        10i64
            .checked_div(divisor)
            .map(|v| json!(v))
            .ok_or_else(|| anyhow!("division by zero"))
    })
    .depends_on(Dependency::on("a").as_arg());

    vec![a, b]
}

#[tokio::test]
async fn division_chain_passes_results() {
    init_tracing();
    let pipeline = Pipeline::new(division_specs()).expect("valid graph");

    let report = pipeline.run(RunMode::Sequential).await.expect("run");

    assert_eq!(report.result_of("a"), Some(&json!(2)));
    assert_eq!(report.result_of("b"), Some(&json!(5)));
    assert_eq!(report.failed_count(), 0);
}

#[tokio::test]
async fn failing_task_fails_dependents_without_invoking_them() {
    init_tracing();
    let sink = RecordingSink::new();

    // `a` "raises" a division error; `b` depends on it.
    let a = TaskSpec::new("a", |_call: CallArgs| {
        0i64.checked_div(0)
            .map(|v| json!(v))
            .ok_or_else(|| anyhow!("division by zero"))
    });
    let b = returns("b", json!("unreachable"))
        .after("a")
        .log_sink(sink.clone());

    let pipeline = Pipeline::new(vec![a, b]).expect("valid graph");
    let report = pipeline.run(RunMode::Sequential).await.expect("run");

    assert_eq!(report.completed_count(), 0);
    assert!(report.is_failed("a"));
    assert!(report.is_failed("b"));
    assert!(!sink.started("b"), "b's body must never be invoked");

    match report.failure_of("a") {
        Some(TaskFailure::Execution(err)) => {
            assert!(err.to_string().contains("division by zero"));
        }
        other => panic!("expected Execution failure for a, got: {other:?}"),
    }
    match report.failure_of("b") {
        Some(TaskFailure::Skipped { upstream }) => assert_eq!(upstream, "a"),
        other => panic!("expected Skipped failure for b, got: {other:?}"),
    }
}

#[tokio::test]
async fn failure_propagates_transitively_but_spares_other_branches() {
    init_tracing();
    let pipeline = Pipeline::new(vec![
        fails("a", "boom"),
        returns("b", json!(1)).after("a"),
        returns("c", json!(2)).after("b"),
        returns("d", json!(3)),
    ])
    .expect("valid graph");

    let report = pipeline.run(RunMode::Sequential).await.expect("run");

    assert!(report.is_failed("a"));
    assert!(report.is_failed("b"));
    assert!(report.is_failed("c"));
    assert_eq!(report.result_of("d"), Some(&json!(3)));
    assert_eq!(report.completed_count() + report.failed_count(), 4);
}

#[tokio::test]
async fn repeated_runs_yield_identical_outcomes() {
    init_tracing();
    let pipeline = Pipeline::new(vec![
        returns("a", json!(1)),
        fails("b", "boom"),
        returns("c", json!(2)).after("a").after("b"),
    ])
    .expect("valid graph");

    let first = pipeline.run(RunMode::Sequential).await.expect("first run");
    let second = pipeline.run(RunMode::Sequential).await.expect("second run");

    assert_eq!(first.completed_count(), second.completed_count());
    assert_eq!(first.failed_count(), second.failed_count());
    assert_eq!(first.result_of("a"), second.result_of("a"));
    assert!(second.is_failed("b") && second.is_failed("c"));
}

#[tokio::test]
async fn sink_sees_start_and_finish_around_each_invocation() {
    init_tracing();
    let sink = RecordingSink::new();

    let pipeline = Pipeline::new(vec![
        returns("a", json!(1)).log_sink(sink.clone()),
        returns("b", json!(2)).after("a").log_sink(sink.clone()),
    ])
    .expect("valid graph");

    pipeline.run(RunMode::Sequential).await.expect("run");

    use taskdag_test_utils::probes::SinkEvent::*;
    assert_eq!(
        sink.events(),
        vec![
            Started("a".into()),
            Succeeded("a".into()),
            Started("b".into()),
            Succeeded("b".into()),
        ]
    );
}

#[tokio::test]
async fn notifier_is_called_on_failure_with_downstream_context() {
    init_tracing();
    let notifier = RecordingNotifier::new();

    let pipeline = Pipeline::new(vec![
        fails("a", "boom").notifier(notifier.clone()),
        returns("b", json!(1)).after("a"),
        returns("c", json!(2)).after("b"),
    ])
    .expect("valid graph");

    pipeline.run(RunMode::Sequential).await.expect("run");

    assert_eq!(
        notifier.calls(),
        vec![("a".to_string(), vec!["b".to_string(), "c".to_string()])]
    );
}

#[tokio::test]
async fn notifier_errors_never_abort_the_run() {
    init_tracing();
    let notifier = RecordingNotifier::failing();

    let pipeline = Pipeline::new(vec![
        fails("a", "boom").notifier(notifier.clone()),
        returns("b", json!(1)),
    ])
    .expect("valid graph");

    let report = pipeline.run(RunMode::Sequential).await.expect("run");

    assert_eq!(notifier.calls().len(), 1);
    assert!(report.is_failed("a"));
    assert_eq!(report.result_of("b"), Some(&json!(1)));
}

#[tokio::test]
async fn empty_pipeline_runs_to_an_empty_report() {
    init_tracing();
    let pipeline = Pipeline::new(Vec::new()).expect("empty pipeline");

    let report = pipeline.run(RunMode::Sequential).await.expect("run");

    assert_eq!(report.completed_count(), 0);
    assert_eq!(report.failed_count(), 0);
    assert!(report.all_succeeded());
}
