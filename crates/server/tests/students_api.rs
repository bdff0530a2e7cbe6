use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use server::routes;
use server::state::AppState;
use service::student::repo::MemoryStudentRepository;

fn app() -> Router {
    let repo = Arc::new(MemoryStudentRepository::default());
    routes::build_router(AppState::new(repo), CorsLayer::very_permissive())
}

fn student(name: &str, email: &str, course: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "course": course,
        "batch": "2024",
        "grade": "A",
        "dateOfAdmission": "2024-09-01"
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

#[tokio::test]
async fn root_and_health_respond() {
    let app = app();
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("request hit"));

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_then_fetch_normalises_fields() {
    let app = app();
    let (status, created) = send(
        &app,
        "POST",
        "/api/students",
        Some(student("  Ada Lovelace ", "ADA@Example.com", "Maths")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Ada Lovelace");
    assert_eq!(created["email"], "ada@example.com");
    assert_eq!(created["grade"], "A");
    assert_eq!(created["dateOfAdmission"], "2024-09-01");
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let id = created["_id"].as_str().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/api/students/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn invalid_payload_reports_every_field() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/students",
        Some(json!({ "name": "", "grade": "E", "dateOfAdmission": "yesterday" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2001);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    for f in ["name", "email", "course", "batch", "grade", "dateOfAdmission"] {
        assert!(fields.contains(&f), "missing violation for {f}: {fields:?}");
    }

    let (_, list) = send(&app, "GET", "/api/students", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let app = app();
    let (status, _) = send(&app, "POST", "/api/students", Some(student("A", "a@x.com", "Art"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, "POST", "/api/students", Some(student("B", "A@X.COM", "Bio"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
async fn search_filters_and_keeps_insertion_order() {
    let app = app();
    for (name, email, course) in [
        ("Ada", "ada@x.com", "Mathematics"),
        ("Brian", "brian@x.com", "History"),
        ("Cleo", "cleo@maths.org", "Art"),
    ] {
        let (status, _) = send(&app, "POST", "/api/students", Some(student(name, email, course))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, all) = send(&app, "GET", "/api/students", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, hits) = send(&app, "GET", "/api/students?search=MATH", None).await;
    let names: Vec<&str> = hits.as_array().unwrap().iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Ada", "Cleo"]);

    let (_, empty_term) = send(&app, "GET", "/api/students?search=", None).await;
    assert_eq!(empty_term.as_array().unwrap().len(), 3);

    let (_, none) = send(&app, "GET", "/api/students?search=zzz", None).await;
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_identity() {
    let app = app();
    let (_, created) = send(&app, "POST", "/api/students", Some(student("Ada", "ada@x.com", "Maths"))).await;
    let id = created["_id"].as_str().unwrap().to_string();

    let mut body = created.clone();
    body["course"] = json!("Physics");
    body["grade"] = json!("B+");
    body["createdAt"] = json!("1999-01-01T00:00:00Z");
    let (status, updated) = send(&app, "PUT", &format!("/api/students/{id}"), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["_id"], created["_id"]);
    assert_eq!(updated["course"], "Physics");
    assert_eq!(updated["grade"], "B+");
    assert_eq!(updated["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn update_to_taken_email_conflicts() {
    let app = app();
    send(&app, "POST", "/api/students", Some(student("Ada", "ada@x.com", "Maths"))).await;
    let (_, bob) = send(&app, "POST", "/api/students", Some(student("Bob", "bob@x.com", "Art"))).await;
    let id = bob["_id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/students/{id}"),
        Some(student("Bob", "ada@x.com", "Art")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, still) = send(&app, "GET", &format!("/api/students/{id}"), None).await;
    assert_eq!(still["email"], "bob@x.com");
}

#[tokio::test]
async fn overlong_name_is_a_validation_error() {
    let app = app();
    let long = "n".repeat(300);
    let (status, body) = send(&app, "POST", "/api/students", Some(student(&long, "long@x.com", "Art"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "name");
    assert_eq!(body["details"][0]["rule"], "too_long");
}

#[tokio::test]
async fn update_of_missing_id_with_taken_email_is_not_found() {
    let app = app();
    send(&app, "POST", "/api/students", Some(student("Ada", "ada@x.com", "Maths"))).await;
    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/students/{missing}"),
        Some(student("Ada", "ada@x.com", "Maths")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_record() {
    let app = app();
    let (_, created) = send(&app, "POST", "/api/students", Some(student("Ada", "ada@x.com", "Maths"))).await;
    let id = created["_id"].as_str().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/api/students/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Student deleted");
    assert_eq!(body["id"], created["_id"]);

    let (status, _) = send(&app, "GET", &format!("/api/students/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &format!("/api/students/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() {
    let app = app();
    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(&app, "GET", &format!("/api/students/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/api/students/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/students/{missing}"),
        Some(student("Ada", "ada@x.com", "Maths")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_lists_student_paths() {
    let app = app();
    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/students"].is_object());
    assert!(doc["paths"]["/api/students/{id}"].is_object());
}
