// tests/result_injection.rs

use serde_json::json;
use taskdag::{Dependency, Pipeline, RunMode};
use taskdag_test_utils::builders::{echoes_call, returns};
use taskdag_test_utils::init_tracing;

#[tokio::test]
async fn positional_injection_appends_after_base_args() {
    init_tracing();
    let pipeline = Pipeline::new(vec![
        returns("p", json!(7)),
        echoes_call("c")
            .arg(10)
            .depends_on(Dependency::on("p").as_arg()),
    ])
    .expect("valid graph");

    let report = pipeline.run(RunMode::Sequential).await.expect("run");

    assert_eq!(
        report.result_of("c"),
        Some(&json!({"args": [10, 7], "kwargs": {}}))
    );
}

#[tokio::test]
async fn named_injection_merges_with_base_kwargs() {
    init_tracing();
    let pipeline = Pipeline::new(vec![
        returns("p", json!(7)),
        echoes_call("c")
            .arg(10)
            .kwarg("x", 1)
            .depends_on(Dependency::on("p").as_kwarg("c")),
    ])
    .expect("valid graph");

    let report = pipeline.run(RunMode::Sequential).await.expect("run");

    assert_eq!(
        report.result_of("c"),
        Some(&json!({"args": [10], "kwargs": {"c": 7, "x": 1}}))
    );
}

#[tokio::test]
async fn named_injection_overrides_base_kwarg_of_same_name() {
    init_tracing();
    let pipeline = Pipeline::new(vec![
        returns("p", json!(7)),
        echoes_call("c")
            .kwarg("c", 0)
            .depends_on(Dependency::on("p").as_kwarg("c")),
    ])
    .expect("valid graph");

    let report = pipeline.run(RunMode::Sequential).await.expect("run");

    assert_eq!(
        report.result_of("c"),
        Some(&json!({"args": [], "kwargs": {"c": 7}}))
    );
}

#[tokio::test]
async fn one_edge_may_inject_both_ways() {
    init_tracing();
    let pipeline = Pipeline::new(vec![
        returns("p", json!(7)),
        echoes_call("c").depends_on(Dependency::on("p").as_arg().as_kwarg("also")),
    ])
    .expect("valid graph");

    let report = pipeline.run(RunMode::Sequential).await.expect("run");

    assert_eq!(
        report.result_of("c"),
        Some(&json!({"args": [7], "kwargs": {"also": 7}}))
    );
}

#[tokio::test]
async fn positional_injections_follow_edge_declaration_order() {
    init_tracing();
    let forward = Pipeline::new(vec![
        returns("p1", json!("one")),
        returns("p2", json!("two")),
        echoes_call("c")
            .arg("base")
            .depends_on(Dependency::on("p1").as_arg())
            .depends_on(Dependency::on("p2").as_arg()),
    ])
    .expect("valid graph");

    let reversed = Pipeline::new(vec![
        returns("p1", json!("one")),
        returns("p2", json!("two")),
        echoes_call("c")
            .arg("base")
            .depends_on(Dependency::on("p2").as_arg())
            .depends_on(Dependency::on("p1").as_arg()),
    ])
    .expect("valid graph");

    let forward_report = forward.run(RunMode::Sequential).await.expect("run");
    let reversed_report = reversed.run(RunMode::Sequential).await.expect("run");

    assert_eq!(
        forward_report.result_of("c"),
        Some(&json!({"args": ["base", "one", "two"], "kwargs": {}}))
    );
    assert_eq!(
        reversed_report.result_of("c"),
        Some(&json!({"args": ["base", "two", "one"], "kwargs": {}}))
    );
}

#[tokio::test]
async fn ordering_only_edges_inject_nothing() {
    init_tracing();
    let pipeline = Pipeline::new(vec![
        returns("p", json!(7)),
        echoes_call("c").arg(1).after("p"),
    ])
    .expect("valid graph");

    let report = pipeline.run(RunMode::Sequential).await.expect("run");

    assert_eq!(
        report.result_of("c"),
        Some(&json!({"args": [1], "kwargs": {}}))
    );
}

#[tokio::test]
async fn base_arguments_survive_repeated_runs_unchanged() {
    init_tracing();
    // If injection mutated the stored spec, the second run would see the
    // previously injected value as an extra base argument.
    let pipeline = Pipeline::new(vec![
        returns("p", json!(7)),
        echoes_call("c")
            .arg(10)
            .depends_on(Dependency::on("p").as_arg()),
    ])
    .expect("valid graph");

    let first = pipeline.run(RunMode::Sequential).await.expect("first run");
    let second = pipeline.run(RunMode::Sequential).await.expect("second run");

    let expected = json!({"args": [10, 7], "kwargs": {}});
    assert_eq!(first.result_of("c"), Some(&expected));
    assert_eq!(second.result_of("c"), Some(&expected));
}
