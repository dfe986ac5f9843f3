//! REST API tests driving the axum router in-process

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

mod common;
use common::{in_memory_module, print_test_header};

async fn app() -> Router {
    in_memory_module()
        .await
        .register_rest(Router::new())
        .expect("routes register")
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, String, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("router is infallible");

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, content_type, bytes.to_vec())
}

async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn create(app: &Router) -> String {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/inspections",
        Some(json!({
            "templateType": "sedan",
            "vehicle": { "make": "Hyundai", "model": "Elantra", "year": 2022 },
            "generalNotes": "Minor wear"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().expect("id").to_string()
}

#[tokio::test]
async fn test_inspection_lifecycle_over_http() {
    let app = app().await;

    print_test_header(
        "test_inspection_lifecycle_over_http",
        &["Create, record parts, finalize, then confirm edits are rejected with 409."],
    );

    let id = create(&app).await;
    let uri = format!("/inspections/{}", id);

    let (status, body) = send_json(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({
            "partKey": "front_bumper",
            "condition": "scratch",
            "severity": "light",
            "notes": "left corner"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parts"][0]["partKey"], "front_bumper");
    assert_eq!(body["parts"][0]["condition"], "scratch");
    assert_eq!(body["parts"][0]["severity"], "light");

    let (status, body) = send_json(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "partKey": "wheel_front_left", "tireStatus": "damaged", "severity": "severe" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let wheel = body["parts"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["partKey"] == "wheel_front_left")
        .unwrap()
        .clone();
    assert_eq!(wheel["condition"], "broken");
    assert_eq!(wheel["severity"], Value::Null);

    let (status, body) = send_json(&app, Method::POST, &format!("{}/finalize", uri), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "finalized");
    assert!(body["finalizedAt"].is_string());

    let (status, problem) = send_json(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "partKey": "hood", "condition": "good" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(problem["title"], "Inspection Locked");
    assert_eq!(problem["instance"], uri.as_str());

    let (status, problem) = send_json(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "partKey": "wheel_front_left", "condition": "painted" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(problem["title"], "Inspection Locked");

    let (status, _) = send_json(&app, Method::PATCH, &uri, Some(json!({ "generalNotes": "late" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, problem) = send_json(&app, Method::POST, &format!("{}/finalize", uri), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(problem["title"], "Already Finalized");

    let (_, body) = send_json(&app, Method::GET, &uri, None).await;
    assert_eq!(body["parts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_details_patch_updates_notes() {
    let app = app().await;
    let id = create(&app).await;

    let (status, body) = send_json(
        &app,
        Method::PATCH,
        &format!("/inspections/{}", id),
        Some(json!({ "generalNotes": "Customer waiting", "customer": { "name": "Nora" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["generalNotes"], "Customer waiting");
    assert_eq!(body["customer"]["name"], "Nora");
}

#[tokio::test]
async fn test_invalid_part_updates_are_bad_requests() {
    let app = app().await;
    let uri = format!("/inspections/{}", create(&app).await);

    let (status, problem) = send_json(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "partKey": "hood", "condition": "not_inspected" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["status"], 400);

    let (status, problem) = send_json(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "partKey": "spoiler", "condition": "good" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["title"], "Unknown Part");

    let (status, _) = send_json(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "partKey": "hood", "condition": "scratch", "tireStatus": "new" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_problem_details_content_type() {
    let app = app().await;
    let (status, content_type, _) = send(
        &app,
        Method::GET,
        &format!("/inspections/{}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type, "application/problem+json");
}

#[tokio::test]
async fn test_diagram_is_svg() {
    let app = app().await;
    let id = create(&app).await;

    let (status, content_type, body) =
        send(&app, Method::GET, &format!("/inspections/{}/diagrams/front", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "image/svg+xml");
    let svg = String::from_utf8(body).unwrap();
    assert!(svg.contains("data-part=\"front_bumper\""));

    let (status, _, _) =
        send(&app, Method::GET, &format!("/inspections/{}/diagrams/underside", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_is_printable_html() {
    let app = app().await;
    let id = create(&app).await;

    let (status, content_type, body) = send(
        &app,
        Method::GET,
        &format!("/inspections/{}/report?lang=en&page=letter", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/html"));
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<html lang=\"en\" dir=\"ltr\">"));
    assert!(html.contains("@page { size: letter"));

    let (_, _, body) = send(&app, Method::GET, &format!("/inspections/{}/report", id), None).await;
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("dir=\"rtl\""));

    let (status, _, _) = send(
        &app,
        Method::GET,
        &format!("/inspections/{}/report?lang=fr", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_and_delete() {
    let app = app().await;
    let first = create(&app).await;
    let _second = create(&app).await;

    let (status, body) = send_json(&app, Method::GET, "/inspections?limit=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);

    let (status, _) = send_json(&app, Method::DELETE, &format!("/inspections/{}", first), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send_json(&app, Method::GET, &format!("/inspections/{}", first), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unlink_vehicle() {
    let app = app().await;
    let car = Uuid::new_v4();
    let (status, created) = send_json(
        &app,
        Method::POST,
        "/inspections",
        Some(json!({ "carId": car })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["carId"], car.to_string());
    assert_eq!(created["templateType"], "sedan");

    let (status, body) =
        send_json(&app, Method::POST, &format!("/vehicles/{}/unlink", car), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cleared"], 1);

    let (_, fetched) = send_json(
        &app,
        Method::GET,
        &format!("/inspections/{}", created["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert!(fetched.get("carId").is_none());
}

#[tokio::test]
async fn test_catalog_endpoints() {
    let app = app().await;

    let (status, colors) = send_json(&app, Method::GET, "/color-mappings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(colors.as_array().unwrap().len(), 7);

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/color-mappings/painted",
        Some(json!({ "color": "#2563eb", "labelAr": "مصبوغ", "labelEn": "Repainted" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["color"], "#2563eb");

    let (_, colors) = send_json(&app, Method::GET, "/color-mappings", None).await;
    let painted = colors
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["condition"] == "painted")
        .unwrap()
        .clone();
    assert_eq!(painted["labelEn"], "Repainted");

    let (status, parts) = send_json(&app, Method::GET, "/part-dictionary", None).await;
    assert_eq!(status, StatusCode::OK);
    let keys: Vec<&str> = parts
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["key"].as_str())
        .collect();
    assert!(keys.contains(&"front_bumper"));
    assert!(keys.contains(&"wheel_rear_right"));
}

#[tokio::test]
async fn test_template_endpoints() {
    let app = app().await;

    let (status, template) = send_json(&app, Method::GET, "/templates/sedan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(template["isDefault"], true);
    for angle in ["front", "rear", "left", "right"] {
        assert!(template["diagrams"][angle].is_string());
    }

    // Unknown body types resolve to the default template
    let (status, template) = send_json(&app, Method::GET, "/templates/pickup", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(template["id"], "sedan");

    let (status, list) = send_json(&app, Method::GET, "/templates", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);
}

#[tokio::test]
async fn test_openapi_document() {
    let app = app().await;
    let (status, doc) = send_json(&app, Method::GET, "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/inspections/{id}"].is_object());
    assert!(doc["components"]["schemas"]["InspectionDto"].is_object());
}
