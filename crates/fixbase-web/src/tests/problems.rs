use axum::http::StatusCode;
use serde_json::{Value, json};

use super::harness::{TestHarness, decode_json, json_request};

fn kernel_problem() -> Value {
    json!({
        "title": "Kernel panic after update",
        "description": "System halts during boot",
        "distro": "Arch",
        "category": "Boot Issues",
        "tags": ["kernel"]
    })
}

async fn ask(harness: &TestHarness, user: &str) -> Value {
    let response = harness
        .send(json_request("POST", "/problems", Some(user), kernel_problem()))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    decode_json(response).await
}

#[tokio::test]
async fn asking_without_a_caller_is_unauthorized() {
    let harness = TestHarness::setup();
    for user in [None, Some("   ")] {
        let response = harness
            .send(json_request("POST", "/problems", user, kernel_problem()))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let payload: Value = decode_json(response).await;
        assert_eq!(payload["code"], "UNAUTHORIZED");
    }
    let listed: Vec<Value> = decode_json(harness.get("/problems").await).await;
    assert!(listed.is_empty());
}

#[tokio::test]
async fn asked_problem_records_its_owner() {
    let harness = TestHarness::setup();
    let created = ask(&harness, "alice").await;
    assert_eq!(created["userId"], "alice");
    assert_eq!(created["upvotes"], 0);

    let id = created["id"].as_str().expect("id");
    let fetched: Value = decode_json(harness.get(&format!("/problems/{id}")).await).await;
    assert_eq!(fetched, created);

    let filtered: Vec<Value> =
        decode_json(harness.get("/problems?distro=arch&search=PANIC").await).await;
    assert_eq!(filtered.len(), 1);
    let none: Vec<Value> = decode_json(harness.get("/problems?distro=Fedora").await).await;
    assert!(none.is_empty());
}

#[tokio::test]
async fn problem_upvotes_increment_on_the_server() {
    let harness = TestHarness::setup();
    let created = ask(&harness, "alice").await;
    let path = format!("/problems/{}/upvote", created["id"].as_str().expect("id"));

    for expected in [1, 2] {
        let response = harness
            .send(
                axum::http::Request::builder()
                    .method("PATCH")
                    .uri(&path)
                    .body(axum::body::Body::empty())
                    .expect("request"),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated: Value = decode_json(response).await;
        assert_eq!(updated["upvotes"], expected);
    }

    let missing = harness
        .send(
            axum::http::Request::builder()
                .method("PATCH")
                .uri("/problems/missing/upvote")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn answers_require_a_caller_and_content() {
    let harness = TestHarness::setup();
    let created = ask(&harness, "alice").await;
    let path = format!("/problems/{}/answers", created["id"].as_str().expect("id"));

    let anonymous = harness
        .send(json_request("POST", &path, None, json!({"content": "reboot"})))
        .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let blank = harness
        .send(json_request("POST", &path, Some("bob"), json!({"content": ""})))
        .await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let answered = harness
        .send(json_request(
            "POST",
            &path,
            Some("bob"),
            json!({"content": "Boot the previous kernel"}),
        ))
        .await;
    assert_eq!(answered.status(), StatusCode::CREATED);
    let answer: Value = decode_json(answered).await;
    assert_eq!(answer["userId"], "bob");
    assert_eq!(answer["isAccepted"], false);

    let listed: Vec<Value> = decode_json(harness.get(&path).await).await;
    assert_eq!(listed, vec![answer]);

    let orphan = harness
        .send(json_request(
            "POST",
            "/problems/missing/answers",
            Some("bob"),
            json!({"content": "hi"}),
        ))
        .await;
    assert_eq!(orphan.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn anonymous_writes_are_unauthorized_before_body_checks() {
    let harness = TestHarness::setup();
    let cases = [
        ("/problems", "{not json"),
        ("/problems/x/answers", ""),
        ("/problems/x/answers", "{\"content\": 7}"),
    ];
    for (path, body) in cases {
        let response = harness
            .send(
                axum::http::Request::builder()
                    .method("POST")
                    .uri(path)
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from(body))
                    .expect("request"),
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path} {body}");
        let payload: Value = decode_json(response).await;
        assert_eq!(payload["code"], "UNAUTHORIZED");
    }

    let malformed = harness
        .send(
            axum::http::Request::builder()
                .method("POST")
                .uri("/problems")
                .header("content-type", "application/json")
                .header(crate::auth::USER_HEADER, "alice")
                .body(axum::body::Body::from("{not json"))
                .expect("request"),
        )
        .await;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
}
