//! End-to-end tests of the HTTP surface over the in-memory store.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use genealogy_api::{app, AppState, MemoryPersonStore, Settings};
use serde_json::{json, Value};
use tower::ServiceExt;

fn router() -> Router {
    app(AppState::new(MemoryPersonStore::new()), &Settings::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn homer() -> Value {
    json!({ "motherId": null, "fatherId": null, "firstName": "Homer", "lastName": "Simpson" })
}

async fn create(app: &Router, gender: &str, body: Value) -> String {
    let (status, created) = send(app, Method::POST, &format!("/{gender}"), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    created["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn male_lifecycle() {
    let app = router();
    let id = create(&app, "male", homer()).await;

    let (status, got) = send(&app, Method::GET, &format!("/male/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        got,
        json!({ "id": id, "motherId": null, "fatherId": null, "firstName": "Homer", "lastName": "Simpson" })
    );

    let (status, body) = send(&app, Method::DELETE, &format!("/male/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::GET, &format!("/male/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Value::Null);
    let (status, _) = send(&app, Method::GET, &format!("/people/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn person_is_invisible_under_the_other_gender() {
    let app = router();
    let id = create(&app, "male", homer()).await;
    let (status, _) = send(&app, Method::GET, &format!("/female/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &format!("/female/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_gender_segment_and_bad_ids_are_not_found() {
    let app = router();
    let (status, _) = send(&app, Method::POST, "/robot", Some(homer())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, "/male/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &format!("/male/{}", uuid::Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn strict_create_rejects_unknown_and_missing_fields() {
    let app = router();
    let mut body = homer();
    body["age"] = json!(39);
    let (status, err) = send(&app, Method::POST, "/male", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["code"], "validation_error");

    let (status, err) = send(&app, Method::POST, "/female", Some(json!({ "firstName": "Marge" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let paths: Vec<&str> = err["error"]["details"]["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"motherId"));
    assert!(paths.contains(&"fatherId"));
    assert!(paths.contains(&"lastName"));

    let (status, _) = send(&app, Method::GET, "/people", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = router();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/male")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_parent_reference_is_rejected() {
    let app = router();
    let body = json!({
        "motherId": uuid::Uuid::new_v4(),
        "fatherId": null,
        "firstName": "Bart",
        "lastName": "Simpson",
    });
    let (status, err) = send(&app, Method::POST, "/male", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["code"], "invalid_reference");

    // A male id cannot be used as a mother.
    let homer_id = create(&app, "male", homer()).await;
    let body = json!({ "motherId": homer_id, "fatherId": null, "firstName": "Bart", "lastName": "Simpson" });
    let (status, _) = send(&app, Method::POST, "/male", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn partial_update_keeps_untouched_fields() {
    let app = router();
    let homer_id = create(&app, "male", homer()).await;
    let bart_id = create(
        &app,
        "male",
        json!({ "motherId": null, "fatherId": homer_id, "firstName": "Bart", "lastName": "Simpson" }),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/male/{bart_id}"),
        Some(json!({ "firstName": "Bartholomew" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, got) = send(&app, Method::GET, &format!("/male/{bart_id}"), None).await;
    assert_eq!(got["firstName"], "Bartholomew");
    assert_eq!(got["lastName"], "Simpson");
    assert_eq!(got["fatherId"], json!(homer_id));

    let (status, _) = send(&app, Method::PATCH, &format!("/male/{bart_id}"), Some(json!({ "fatherId": null }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, got) = send(&app, Method::GET, &format!("/male/{bart_id}"), None).await;
    assert_eq!(got["fatherId"], Value::Null);
    assert_eq!(got["firstName"], "Bartholomew");

    let (status, err) = send(&app, Method::PATCH, &format!("/male/{bart_id}"), Some(json!({ "nickname": "El Barto" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["code"], "validation_error");

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/female/{bart_id}"),
        Some(json!({ "firstName": "Lisa" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn people_endpoints_cover_both_genders() {
    let app = router();
    let (status, marge) = send(
        &app,
        Method::POST,
        "/people",
        Some(json!({ "gender": "female", "firstName": "Marge", "lastName": "Bouvier" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(marge["gender"], "female");
    assert_eq!(marge["motherId"], Value::Null);
    let marge_id = marge["id"].as_str().unwrap().to_string();

    let (status, got) = send(&app, Method::GET, &format!("/female/{marge_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(got["firstName"], "Marge");

    let (status, base) = send(&app, Method::GET, &format!("/people/{marge_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(base, json!({ "id": marge_id, "firstName": "Marge", "lastName": "Bouvier" }));

    create(&app, "male", homer()).await;
    let (status, list) = send(&app, Method::GET, "/people", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<(&str, &str)> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|p| (p["firstName"].as_str().unwrap(), p["gender"].as_str().unwrap()))
        .collect();
    assert_eq!(names, vec![("Marge", "female"), ("Homer", "male")]);

    let (status, _) = send(&app, Method::DELETE, &format!("/people/{marge_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &format!("/female/{marge_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &format!("/people/{marge_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn seed_then_name_relationships() {
    let app = router();
    let (status, seeded) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    let seeded = seeded.as_array().unwrap().clone();
    assert_eq!(seeded.len(), 4);
    let id_of = |name: &str| {
        seeded
            .iter()
            .find(|p| p["firstName"] == name)
            .and_then(|p| p["id"].as_str())
            .unwrap()
            .to_string()
    };
    let (homer, marge, bart, lisa) = (id_of("Homer"), id_of("Marge"), id_of("Bart"), id_of("Lisa"));

    let (_, bart_row) = send(&app, Method::GET, &format!("/male/{bart}"), None).await;
    assert_eq!(bart_row["motherId"], json!(marge));
    assert_eq!(bart_row["fatherId"], json!(homer));

    let label = |body: Value| body["label"].as_str().unwrap().to_string();
    let (status, kin) = send(&app, Method::GET, &format!("/people/{bart}/relationship/{lisa}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(label(kin.clone()), "sister");
    assert_eq!(kin["half"], false);
    let (_, kin) = send(&app, Method::GET, &format!("/people/{lisa}/relationship/{homer}"), None).await;
    assert_eq!(label(kin), "father");
    let (_, kin) = send(&app, Method::GET, &format!("/people/{marge}/relationship/{bart}"), None).await;
    assert_eq!(label(kin), "son");
    let (_, kin) = send(&app, Method::GET, &format!("/people/{homer}/relationship/{marge}"), None).await;
    assert_eq!(label(kin), "unrelated");

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/people/{bart}/relationship/{}", uuid::Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Seeding again adds a second family.
    send(&app, Method::GET, "/", None).await;
    let (_, list) = send(&app, Method::GET, "/people", None).await;
    assert_eq!(list.as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn deleting_a_parent_clears_child_links() {
    let app = router();
    let (_, seeded) = send(&app, Method::GET, "/", None).await;
    let find = |name: &str| {
        seeded
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["firstName"] == name)
            .and_then(|p| p["id"].as_str())
            .unwrap()
            .to_string()
    };
    let (homer, lisa) = (find("Homer"), find("Lisa"));
    let (status, _) = send(&app, Method::DELETE, &format!("/male/{homer}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, lisa_row) = send(&app, Method::GET, &format!("/female/{lisa}"), None).await;
    assert_eq!(lisa_row["fatherId"], Value::Null);
}

#[tokio::test]
async fn operational_endpoints() {
    let app = router();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let (status, _) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, Method::GET, "/version", None).await;
    assert_eq!(body["name"], "genealogy-api");
    let (status, doc) = send(&app, Method::GET, "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/{gender}/{id}"]["patch"].is_object());
    assert!(doc["components"]["schemas"]["PersonEntry"].is_object());
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let mut settings = Settings::default();
    settings.body_limit_bytes = 32;
    let app = app(AppState::new(MemoryPersonStore::new()), &settings);
    let body = homer().to_string();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/male")
        .header("content-type", "application/json")
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
