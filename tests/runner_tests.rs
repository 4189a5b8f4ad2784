//! Conformance runner behavior against scripted clients.

mod common;

use common::{Scripted, ScriptedClient};
use rpc_conformance::{
    expect, run, Check, ClientResult, ConformanceRunner, ExecutionMode, HarnessError, Outcome,
    RpcClient, RunnerConfig,
};
use serde_json::{json, Value};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

fn status_check() -> Check {
    Check::new("getStatus", json!({}), expect::field_equals("status", "OK")).unwrap()
}

fn category_check(id: &str) -> Check {
    Check::new(
        "GetCategory",
        json!({ "categoryID": id }),
        expect::field_equals("ID", id),
    )
    .unwrap()
}

fn list_check() -> Check {
    Check::new(
        "ListCategories",
        json!({}),
        expect::non_empty_array("categories"),
    )
    .unwrap()
}

fn category(id: &str, name: &str) -> Value {
    json!({ "ID": id, "name": name, "parentID": "" })
}

#[tokio::test]
async fn test_status_ok_passes() {
    let client = ScriptedClient::new().on(
        "getStatus",
        json!({}),
        Scripted::Reply(json!({ "status": "OK" })),
    );

    let report = run(&client, &[status_check()]).await.unwrap();

    assert_eq!(report.len(), 1);
    let result = &report.results()[0];
    assert_eq!(result.outcome(), Outcome::Passed);
    assert_eq!(result.response(), Some(&json!({ "status": "OK" })));
    assert_eq!(result.failure_detail(), None);
}

#[tokio::test]
async fn test_status_down_fails_mentioning_expected_value() {
    let client = ScriptedClient::new().on(
        "getStatus",
        json!({}),
        Scripted::Reply(json!({ "status": "DOWN" })),
    );

    let report = run(&client, &[status_check()]).await.unwrap();
    let result = &report.results()[0];

    assert_eq!(result.outcome(), Outcome::Failed);
    let detail = result.failure_detail().unwrap();
    assert!(!detail.is_empty());
    assert!(detail.contains("\"OK\""), "detail was: {detail}");
    assert_eq!(result.response(), Some(&json!({ "status": "DOWN" })));
}

#[tokio::test]
async fn test_get_category_not_found_errors() {
    let client = ScriptedClient::new().on(
        "GetCategory",
        json!({ "categoryID": "1" }),
        Scripted::NotFound {
            resource: "Category".to_string(),
            id: "1".to_string(),
        },
    );

    let report = run(&client, &[category_check("1")]).await.unwrap();
    let result = &report.results()[0];

    assert_eq!(result.outcome(), Outcome::Errored);
    assert!(result.response().is_none());
    assert_eq!(result.failure_detail(), Some("Category not found: 1"));
}

#[tokio::test]
async fn test_all_passing_checks_reported_in_order() {
    let client = ScriptedClient::new()
        .on("getStatus", json!({}), Scripted::Reply(json!({ "status": "OK" })))
        .on(
            "ListCategories",
            json!({}),
            Scripted::Reply(json!({ "categories": [category("1", "Sport")] })),
        )
        .on(
            "GetCategory",
            json!({ "categoryID": "1" }),
            Scripted::Reply(category("1", "Sport")),
        );

    let checks = vec![status_check(), list_check(), category_check("1")];
    let report = run(&client, &checks).await.unwrap();

    assert_eq!(report.len(), 3);
    assert!(report.all_passed());
    let operations: Vec<&str> = report.iter().map(|r| r.check().operation()).collect();
    assert_eq!(operations, ["getStatus", "ListCategories", "GetCategory"]);
    let indices: Vec<usize> = report.iter().map(|r| r.index()).collect();
    assert_eq!(indices, [0, 1, 2]);
}

#[tokio::test]
async fn test_out_of_order_completions_attributed_to_their_checks() {
    // The first check finishes last and the last check finishes first
    let client = ScriptedClient::new()
        .on_delayed(
            "GetCategory",
            json!({ "categoryID": "1" }),
            Scripted::Reply(category("1", "Sport")),
            Duration::from_millis(80),
        )
        .on_delayed(
            "GetCategory",
            json!({ "categoryID": "2" }),
            Scripted::Reply(category("2", "Music")),
            Duration::from_millis(40),
        )
        .on(
            "GetCategory",
            json!({ "categoryID": "3" }),
            Scripted::Reply(category("3", "Chess")),
        );

    let checks = vec![category_check("1"), category_check("2"), category_check("3")];
    let runner = ConformanceRunner::new(RunnerConfig::concurrent(3));
    let report = runner.run(&client, &checks).await.unwrap();

    assert_eq!(report.mode(), ExecutionMode::Concurrent);
    assert!(report.all_passed());
    for (position, (result, id)) in report.iter().zip(["1", "2", "3"]).enumerate() {
        assert_eq!(result.index(), position);
        assert_eq!(result.check().request(), &json!({ "categoryID": id }));
        assert_eq!(result.response().unwrap()["ID"], json!(id));
    }
}

#[tokio::test]
async fn test_repeated_operation_with_different_payloads() {
    let client = ScriptedClient::new()
        .on(
            "GetCategory",
            json!({ "categoryID": "1" }),
            Scripted::Reply(category("1", "Sport")),
        )
        .on(
            "GetCategory",
            json!({ "categoryID": "2" }),
            Scripted::NotFound {
                resource: "Category".to_string(),
                id: "2".to_string(),
            },
        );

    let checks = vec![category_check("1"), category_check("2"), category_check("1")];
    let report = run(&client, &checks).await.unwrap();

    let outcomes: Vec<Outcome> = report.iter().map(|r| r.outcome()).collect();
    assert_eq!(outcomes, [Outcome::Passed, Outcome::Errored, Outcome::Passed]);
    assert_eq!(client.calls().len(), 3);
}

#[tokio::test]
async fn test_failures_never_abort_remaining_checks() {
    let client = ScriptedClient::new()
        .on_any("Broken", Scripted::Transport("connection refused".to_string()), None)
        .on("getStatus", json!({}), Scripted::Reply(json!({ "status": "DOWN" })))
        .on(
            "ListCategories",
            json!({}),
            Scripted::Reply(json!({ "categories": [category("1", "Sport")] })),
        );

    let checks = vec![
        Check::new("Broken", json!({}), expect::accept_any()).unwrap(),
        list_check(),
        status_check(),
        Check::new("Missing", json!({}), expect::accept_any()).unwrap(),
        list_check(),
    ];

    for config in [RunnerConfig::sequential(), RunnerConfig::concurrent(2)] {
        let report = ConformanceRunner::new(config).run(&client, &checks).await.unwrap();
        let outcomes: Vec<Outcome> = report.iter().map(|r| r.outcome()).collect();
        assert_eq!(
            outcomes,
            [
                Outcome::Errored,
                Outcome::Passed,
                Outcome::Failed,
                Outcome::Errored,
                Outcome::Passed,
            ]
        );
        assert_eq!(
            report.results()[0].failure_detail(),
            Some("Transport error: connection refused")
        );
        assert_eq!(
            report.results()[3].failure_detail(),
            Some("Unknown operation: Missing")
        );

        let summary = report.summary();
        assert_eq!((summary.passed, summary.failed, summary.errored), (2, 1, 2));
    }
}

#[tokio::test]
async fn test_call_timeout_is_errored() {
    let client = ScriptedClient::new()
        .on_any("Slow", Scripted::Hang, None)
        .on("getStatus", json!({}), Scripted::Reply(json!({ "status": "OK" })));

    let checks = vec![
        Check::new("Slow", json!({}), expect::accept_any()).unwrap(),
        status_check(),
    ];
    let config = RunnerConfig::concurrent(2).with_call_timeout(Some(Duration::from_millis(50)));
    let report = ConformanceRunner::new(config).run(&client, &checks).await.unwrap();

    let timed_out = &report.results()[0];
    assert_eq!(timed_out.outcome(), Outcome::Errored);
    assert!(timed_out.response().is_none());
    assert_eq!(
        timed_out.failure_detail(),
        Some("Timeout waiting for operation: Slow (50ms)")
    );
    assert_eq!(report.results()[1].outcome(), Outcome::Passed);
}

#[tokio::test]
async fn test_faulting_predicate_is_errored_not_failed() {
    let client = ScriptedClient::new().on(
        "getStatus",
        json!({}),
        Scripted::Reply(json!({ "status": "OK" })),
    );

    let raising = Check::new(
        "getStatus",
        json!({}),
        expect::try_satisfies("uptime is numeric", |response| {
            response
                .get("uptime")
                .map(Value::is_number)
                .ok_or_else(|| "response has no uptime".to_string())
        }),
    )
    .unwrap();

    let panicking = Check::new(
        "getStatus",
        json!({}),
        rpc_conformance::Predicate::new("always panics", |_| panic!("predicate exploded")),
    )
    .unwrap();

    let report = run(&client, &[raising, panicking, status_check()]).await.unwrap();

    let raised = &report.results()[0];
    assert_eq!(raised.outcome(), Outcome::Errored);
    assert_eq!(
        raised.failure_detail(),
        Some("predicate raised: response has no uptime")
    );
    assert_eq!(raised.response(), Some(&json!({ "status": "OK" })));

    let panicked = &report.results()[1];
    assert_eq!(panicked.outcome(), Outcome::Errored);
    assert_eq!(
        panicked.failure_detail(),
        Some("predicate panicked: predicate exploded")
    );

    assert_eq!(report.results()[2].outcome(), Outcome::Passed);
}

#[tokio::test]
async fn test_panicking_client_is_errored() {
    let client = ScriptedClient::new()
        .on_any("Explode", Scripted::Panic("stub blew up".to_string()), None)
        .on("getStatus", json!({}), Scripted::Reply(json!({ "status": "OK" })));

    let checks = vec![
        Check::new("Explode", json!({}), expect::accept_any()).unwrap(),
        status_check(),
    ];
    let report = run(&client, &checks).await.unwrap();

    assert_eq!(report.results()[0].outcome(), Outcome::Errored);
    assert_eq!(
        report.results()[0].failure_detail(),
        Some("client panicked: stub blew up")
    );
    assert_eq!(report.results()[1].outcome(), Outcome::Passed);
}

/// Validates eagerly: panics while building the future instead of inside it
struct EagerValidatingClient;

impl RpcClient for EagerValidatingClient {
    fn transport_name(&self) -> &'static str {
        "eager"
    }

    fn invoke<'life0, 'life1, 'async_trait>(
        &'life0 self,
        operation: &'life1 str,
        _request: Value,
    ) -> Pin<Box<dyn Future<Output = ClientResult<Value>> + Send + 'async_trait>>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        assert_ne!(operation, "Explode", "operation rejected before dispatch");
        Box::pin(async move { Ok(json!({ "status": "OK" })) })
    }
}

#[tokio::test]
async fn test_client_panicking_before_returning_future_is_errored() {
    let checks = vec![
        Check::new("Explode", json!({}), expect::accept_any()).unwrap(),
        status_check(),
    ];

    for config in [RunnerConfig::sequential(), RunnerConfig::concurrent(2)] {
        let report = ConformanceRunner::new(config)
            .run(&EagerValidatingClient, &checks)
            .await
            .unwrap();

        let outcomes: Vec<Outcome> = report.iter().map(|r| r.outcome()).collect();
        assert_eq!(outcomes, [Outcome::Errored, Outcome::Passed]);
        let detail = report.results()[0].failure_detail().unwrap();
        assert!(detail.starts_with("client panicked: "), "detail was: {detail}");
        assert!(detail.contains("operation rejected before dispatch"));
        assert!(report.results()[0].response().is_none());
    }
}

#[tokio::test]
async fn test_empty_check_list_rejected() {
    let client = ScriptedClient::new();
    let result = run(&client, &[]).await;
    assert!(matches!(result, Err(HarnessError::EmptyCheckList)));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_repeated_runs_produce_identical_outcomes() {
    let client = ScriptedClient::new()
        .on("getStatus", json!({}), Scripted::Reply(json!({ "status": "DOWN" })))
        .on(
            "GetCategory",
            json!({ "categoryID": "1" }),
            Scripted::Reply(category("1", "Sport")),
        )
        .on_any("ListCategories", Scripted::Fault(503, "unavailable".to_string()), None);

    let checks = vec![status_check(), list_check(), category_check("1")];

    let first = run(&client, &checks).await.unwrap();
    let second = run(&client, &checks).await.unwrap();
    let sequential = ConformanceRunner::new(RunnerConfig::sequential())
        .run(&client, &checks)
        .await
        .unwrap();

    assert_eq!(first.outcomes(), second.outcomes());
    assert_eq!(first.outcomes(), sequential.outcomes());
    assert_ne!(first.run_id(), second.run_id());
}

#[tokio::test]
async fn test_concurrency_respects_in_flight_limit() {
    let delay = Some(Duration::from_millis(30));
    let client = ScriptedClient::new().on_any(
        "getStatus",
        Scripted::Reply(json!({ "status": "OK" })),
        delay,
    );
    let checks: Vec<Check> = (0..6).map(|_| status_check()).collect();

    let report = ConformanceRunner::new(RunnerConfig::concurrent(2))
        .run(&client, &checks)
        .await
        .unwrap();
    assert!(report.all_passed());
    assert_eq!(client.peak_in_flight(), 2);

    let client = ScriptedClient::new().on_any(
        "getStatus",
        Scripted::Reply(json!({ "status": "OK" })),
        delay,
    );
    ConformanceRunner::new(RunnerConfig::concurrent(0))
        .run(&client, &checks)
        .await
        .unwrap();
    assert_eq!(client.peak_in_flight(), 1);

    let client = ScriptedClient::new().on_any(
        "getStatus",
        Scripted::Reply(json!({ "status": "OK" })),
        delay,
    );
    ConformanceRunner::new(RunnerConfig::sequential())
        .run(&client, &checks)
        .await
        .unwrap();
    assert_eq!(client.peak_in_flight(), 1);
}
