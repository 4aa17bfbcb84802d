#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use outbreak_trends::config::PipelineSettings;
use outbreak_trends::http::{create_router, AppState};
use outbreak_trends::pipeline::ViewState;
use outbreak_trends::services::{load_base_dataset, Session};
use outbreak_trends::sources::InMemorySource;

use support::fixture_source;

async fn app_with_source(source: InMemorySource) -> Router {
    let dataset = load_base_dataset(&fixture_source(), &PipelineSettings::default())
        .await
        .unwrap();
    let session = Session::new(Arc::new(dataset), ["Italy"], ViewState::default());
    create_router(AppState::new(
        session,
        Arc::new(source),
        PipelineSettings::default(),
    ))
}

async fn app() -> Router {
    app_with_source(fixture_source()).await
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["regions"], 4);
}

#[tokio::test]
async fn test_regions_list_colours_and_selection() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/v1/regions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 4);

    let regions = body["regions"].as_array().unwrap();
    assert_eq!(regions[0]["display_name"], "Italy");
    assert_eq!(regions[0]["selected"], true);
    assert_eq!(regions[0]["colour"], "#1f77b4");
    assert_eq!(regions[1]["display_name"], "Hubei, China");
    assert_eq!(regions[1]["key"]["sub_region"], "Hubei");
    assert_eq!(regions[1]["selected"], false);
}

#[tokio::test]
async fn test_report_lists_skipped_regions() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/v1/report", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["merged"], 4);
    assert_eq!(body["unmatched_events"], 1);
    assert_eq!(body["skipped"][0]["display_name"], "Malta");
    assert_eq!(body["skipped"][0]["reason"]["kind"], "missing_from");
    assert_eq!(body["skipped"][0]["reason"]["table"], "recovered");
}

#[tokio::test]
async fn test_toggle_and_replace_selection() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/selection/toggle",
        Some(json!({ "name": "Spain" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "name": "Spain", "selected": true }));

    let (_, body) = send(&app, Method::GET, "/v1/selection", None).await;
    assert_eq!(body["selected"], json!(["Italy", "Spain"]));

    let (status, body) = send(
        &app,
        Method::PUT,
        "/v1/selection",
        Some(json!({ "selected": ["Hubei, China", "Atlantis"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected"], json!(["Hubei, China"]));
    assert_eq!(body["total"], 4);
}

#[tokio::test]
async fn test_toggle_unknown_region_is_not_found() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/selection/toggle",
        Some(json!({ "name": "Atlantis", "selected": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_view_with_query_overrides() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/v1/view", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["series"].as_array().unwrap().len(), 1);
    assert_eq!(body["series"][0]["display_name"], "Italy");
    assert_eq!(body["extent"], json!([1694, 3858]));
    assert_eq!(body["series"][0]["colour"], "#1f77b4");
    assert_eq!(body["series"][0]["label"]["day"], 4);

    let (status, body) = send(
        &app,
        Method::GET,
        "/v1/view?days=2&metric=current_cases&scale=linear",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["max_days"], 2);
    assert_eq!(body["view"]["scale"], "linear");
    assert_eq!(body["extent"], json!([1694 - 34 - 83, 2036 - 52 - 149]));
    assert_eq!(body["series"][0]["series"][0]["current_cases"], 1694 - 34 - 83);

    // query parameters do not stick
    let (_, body) = send(&app, Method::GET, "/v1/view", None).await;
    assert_eq!(body["view"]["scale"], "log");
}

#[tokio::test]
async fn test_view_rejects_bad_parameters() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/v1/view?metric=hospitalised", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, _) = send(&app, Method::GET, "/v1/view?threshold=-5", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_put_view_is_stored() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::PUT,
        "/v1/view",
        Some(json!({ "threshold": 3000, "scale": "linear" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["extent"], json!([3089, 3858]));

    let (_, body) = send(&app, Method::GET, "/v1/view", None).await;
    assert_eq!(body["view"]["threshold"], 3000.0);
    assert_eq!(body["view"]["scale"], "linear");
}

#[tokio::test]
async fn test_post_view_uses_explicit_selection() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/view",
        Some(json!({ "selected": ["Spain", "France"], "view": { "max_days": 3 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["series"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["display_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Spain", "France"]);
    assert_eq!(body["slider"], json!({ "min": 3, "max": 5, "value": 3 }));

    // the stored selection is untouched
    let (_, body) = send(&app, Method::GET, "/v1/selection", None).await;
    assert_eq!(body["selected"], json!(["Italy"]));
}

#[tokio::test]
async fn test_empty_selection_gives_null_extent() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/view",
        Some(json!({ "selected": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["extent"], Value::Null);
    assert_eq!(body["y_domain"], Value::Null);
    assert_eq!(body["series"], json!([]));
}

async fn wait_for_job(app: &Router, job_id: &str) -> Value {
    for _ in 0..100 {
        let (status, body) = send(app, Method::GET, &format!("/v1/jobs/{}", job_id), None).await;
        assert_eq!(status, StatusCode::OK);
        if body["status"] != "running" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} did not finish", job_id);
}

#[tokio::test]
async fn test_reload_runs_as_job() {
    let app = app().await;
    let (status, body) = send(&app, Method::POST, "/v1/dataset/reload", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let job_id = body["job_id"].as_str().unwrap().to_string();

    let job = wait_for_job(&app, &job_id).await;
    assert_eq!(job["status"], "completed");
    assert_eq!(job["kind"], "dataset_reload");
    assert_eq!(job["result"]["merged"], 4);

    let (_, body) = send(&app, Method::GET, "/v1/selection", None).await;
    assert_eq!(body["selected"], json!(["Italy"]));
}

#[tokio::test]
async fn test_failed_reload_keeps_serving() {
    let app = app_with_source(InMemorySource::new()).await;
    let (status, body) = send(&app, Method::POST, "/v1/dataset/reload", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let job = wait_for_job(&app, body["job_id"].as_str().unwrap()).await;
    assert_eq!(job["status"], "failed");

    let (_, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(body["regions"], 4);
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let app = app().await;
    let (status, _) = send(&app, Method::GET, "/v1/jobs/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
