//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use roster_api::build_router;
use roster_client::{GatewayCall, InMemoryGateway};

fn gateway() -> Arc<InMemoryGateway> {
    Arc::new(
        InMemoryGateway::new()
            .with_course("7", "Chemistry")
            .with_section("7", "s-default", "Chem 101", &["u1", "u2", "u3", "u4"])
            .with_member("7", "u1", &["s-default"])
            .with_member("7", "u2", &["s-default"])
            .with_member("7", "u3", &["s-default"])
            .with_member("7", "u4", &["s-default"]),
    )
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn send(router: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn healthz_answers_ok() {
    let router = build_router(gateway());
    let req = Request::builder()
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();

    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn reconcile_returns_summary_line() {
    let gateway = gateway();
    let router = build_router(gateway.clone());

    let (status, body) = send(
        router,
        post_json(
            "/api/v1/reconcile",
            json!({"courseId": 7, "sectionNames": ["A", "B"]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"]["status"],
        "Rebalanced course 'Chemistry' (7): placed 4/4 students across 2 sections, \
         removed 0/0 withdrawn enrollments"
    );
    assert!(
        gateway
            .calls()
            .iter()
            .any(|c| matches!(c, GatewayCall::CreateEnrollment { .. }))
    );
}

#[tokio::test]
async fn reconcile_dry_run_writes_nothing() {
    let gateway = gateway();
    let router = build_router(gateway.clone());

    let (status, body) = send(
        router,
        post_json(
            "/api/v1/reconcile",
            json!({"courseId": "7", "sectionNames": ["A"], "dryRun": true}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let line = body["data"]["status"].as_str().unwrap();
    assert!(line.starts_with("Planned course 'Chemistry' (7)"), "{line}");
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn unknown_course_is_reported_in_status() {
    let router = build_router(gateway());

    let (status, body) = send(
        router,
        post_json(
            "/api/v1/reconcile",
            json!({"courseId": "404", "sectionNames": ["A"]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let line = body["data"]["status"].as_str().unwrap();
    assert!(line.starts_with("Error processing course 404:"), "{line}");
}

#[tokio::test]
async fn batch_joins_statuses_in_order() {
    let router = build_router(gateway());

    let (status, body) = send(
        router,
        post_json(
            "/api/v1/batch",
            json!({"data": [
                {"courseId": "404", "sectionNames": ["A"]},
                {"courseId": "7", "sectionNames": ["A"]}
            ]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let statuses = body["data"]["statuses"].as_array().unwrap();
    assert_eq!(statuses.len(), 2);
    assert!(statuses[0].as_str().unwrap().starts_with("Error processing"));
    assert!(statuses[1].as_str().unwrap().starts_with("Rebalanced"));

    let joined = body["data"]["status"].as_str().unwrap();
    assert_eq!(joined.lines().count(), 2);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let router = build_router(gateway());

    let (status, _) = send(
        router,
        post_json("/api/v1/reconcile", json!({"sectionNames": ["A"]})),
    )
    .await;

    assert!(status.is_client_error());
}
