//! End-to-end tests over the HTTP surface.
//!
//! Drives the real router against an in-memory database with engine delays
//! set to zero, so a full scan-then-remove flow finishes quickly.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use delist_broker::BrokerCatalog;
use delist_core::AppConfig;
use delist_db::Database;
use delist_server::{api, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

async fn test_app() -> Router {
    let db = Database::new(":memory:", 1).await.expect("create database");
    db.run_migrations().await.expect("run migrations");

    let catalog = Arc::new(BrokerCatalog::load_seed().expect("load catalog"));

    let mut config = AppConfig::default();
    config.scanning.broker_delay_ms = 0;
    config.removal.request_delay_ms = 0;

    api::create_router(AppState::new(db, catalog, &config))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request must not fail");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is JSON")
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("build request")
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("build request")
}

fn user_payload(email: &str) -> Value {
    json!({
        "first_name": "John",
        "last_name": "Doe",
        "email": email,
        "phone": "555-0100",
        "date_of_birth": "1985-06-15",
        "current_address": "123 Main St",
        "city": "Springfield",
        "state": "IL",
        "zip_code": "62704"
    })
}

/// Register a user, returning the session cookie and the user id.
async fn register(app: &Router, email: &str) -> (String, String) {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/users", None, &user_payload(email)))
        .await
        .expect("request must not fail");
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie is set")
        .to_str()
        .expect("cookie is ascii")
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string();

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let user: Value = serde_json::from_slice(&bytes).expect("user JSON");
    let user_id = user["id"].as_str().expect("user id").to_string();

    (cookie, user_id)
}

/// Poll the user's latest scan until it leaves the running state.
async fn wait_for_scan(app: &Router, cookie: &str, user_id: &str) -> Value {
    for _ in 0..200 {
        let (status, scan) = send(
            app,
            get_request(&format!("/api/users/{user_id}/latest-scan"), Some(cookie)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        if scan["status"] != "running" {
            return scan;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("scan did not finish in time");
}

#[tokio::test]
async fn test_register_sets_session_and_rejects_duplicates() {
    let app = test_app().await;

    let (cookie, _user_id) = register(&app, "john@example.com").await;
    assert!(cookie.starts_with("delist_session="));

    let (status, body) = send(
        &app,
        json_request("POST", "/api/users", None, &user_payload("john@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists with this email");
}

#[tokio::test]
async fn test_scan_requires_a_session() {
    let app = test_app().await;
    let (_cookie, user_id) = register(&app, "john@example.com").await;

    let (status, _body) = send(
        &app,
        json_request("POST", "/api/scans", None, &json!({ "user_id": user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_scan_and_results_are_owner_only() {
    let app = test_app().await;
    let (cookie_a, user_a) = register(&app, "alice@example.com").await;
    let (cookie_b, _user_b) = register(&app, "bob@example.com").await;

    // Bob cannot start a scan for Alice.
    let (status, _body) = send(
        &app,
        json_request(
            "POST",
            "/api/scans",
            Some(&cookie_b),
            &json!({ "user_id": user_a }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Alice scans herself; Bob cannot read her scan or its results.
    let (status, scan) = send(
        &app,
        json_request(
            "POST",
            "/api/scans",
            Some(&cookie_a),
            &json!({ "user_id": user_a }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scan["status"], "running");
    let scan_id = scan["id"].as_str().expect("scan id");

    let (status, _body) = send(
        &app,
        get_request(&format!("/api/users/{user_a}/latest-scan"), Some(&cookie_b)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _body) = send(
        &app,
        get_request(&format!("/api/scans/{scan_id}/results"), Some(&cookie_b)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_full_scan_and_removal_flow() {
    let app = test_app().await;
    let (cookie, user_id) = register(&app, "john@example.com").await;

    let (status, _scan) = send(
        &app,
        json_request(
            "POST",
            "/api/scans",
            Some(&cookie),
            &json!({ "user_id": user_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let scan = wait_for_scan(&app, &cookie, &user_id).await;
    assert_eq!(scan["status"], "completed");
    assert_eq!(scan["sites_scanned"], 20);
    let sites_found = scan["sites_found"].as_i64().expect("sites_found");
    assert!(sites_found > 0);
    let score = scan["privacy_score"].as_i64().expect("privacy_score");
    assert!((0..=100).contains(&score));
    let scan_id = scan["id"].as_str().expect("scan id").to_string();

    // Results carry one exposure per found broker, each with its broker.
    let (status, results) = send(
        &app,
        get_request(&format!("/api/scans/{scan_id}/results"), Some(&cookie)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let exposures = results["exposures"].as_array().expect("exposures");
    assert_eq!(exposures.len() as i64, sites_found);
    for exposure in exposures {
        let labels = exposure["exposed_data"].as_array().expect("labels");
        assert!(!labels.is_empty() && labels.len() <= 6);
        assert!(exposure["broker"]["name"].is_string());
    }

    // Kick off removal and wait for every request to be classified.
    let (status, ack) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/scans/{scan_id}/remove"),
            Some(&cookie),
            &json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["message"], "Removal process started");

    let mut progress = Value::Null;
    for _ in 0..200 {
        let (status, body) = send(
            &app,
            get_request(
                &format!("/api/scans/{scan_id}/removal-progress"),
                Some(&cookie),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        if body["stats"]["pending"] == 0 {
            progress = body;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(progress["stats"]["total"].as_i64(), Some(sites_found));

    // Manually override one request to completed.
    let request_id = progress["requests"][0]["id"].as_str().expect("request id");
    let (status, updated) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/removal-requests/{request_id}"),
            None,
            &json!({ "status": "completed", "notes": "confirmed by operator" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "completed");
    assert!(updated["completed_at"].is_string());

    // Removal form for the first exposure.
    let exposure_id = progress["requests"][0]["exposure_id"]
        .as_str()
        .expect("exposure id");
    let (status, form) = send(
        &app,
        get_request(
            &format!("/api/exposures/{exposure_id}/removal-form"),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["user_data"]["full_name"], "John Doe");
    let template = form["form_template"].as_str().expect("form template");
    assert!(template.contains("Privacy Team,"));
    assert!(template.contains("Sincerely,\nJohn Doe"));
}

#[tokio::test]
async fn test_broker_catalog_is_public() {
    let app = test_app().await;

    let (status, brokers) = send(&app, get_request("/api/data-brokers", None)).await;
    assert_eq!(status, StatusCode::OK);
    let brokers = brokers.as_array().expect("broker array");
    assert_eq!(brokers.len(), 20);

    let (status, broker) = send(&app, get_request("/api/data-brokers/whitepages", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(broker["name"], "Whitepages");

    let (status, _body) = send(&app, get_request("/api/data-brokers/nope", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
