use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use turnote::http::{router, AppState};
use turnote::{ServerConfig, SqliteStore};

fn app_with(config: &ServerConfig) -> Router {
    let store = SqliteStore::open_in_memory().unwrap();
    router(AppState::new(store, config))
}

fn test_app() -> Router {
    app_with(&ServerConfig::default())
}

async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    user: Option<&str>,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
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
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_with(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    user: Option<&str>,
) -> (StatusCode, Value) {
    let (status, text) = send_raw(app, method, uri, body, user).await;
    let value = serde_json::from_str(&text).unwrap_or(Value::Null);
    (status, value)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_with(app, method, uri, body, None).await
}

fn note_full() -> Value {
    json!({"owner": 1, "content": "Are er kul", "name": "Best note ever"})
}

async fn create_full(app: &Router) -> i64 {
    let (status, data) = send(app, "POST", "/note", Some(note_full())).await;
    assert_eq!(status, StatusCode::CREATED);
    data["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_add_note_ok() {
    let app = test_app();
    let (status, data) = send(&app, "POST", "/note", Some(note_full())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(data["owner"], 1);
    assert_eq!(data["content"], "Are er kul");
    assert_eq!(data["name"], "Best note ever");
    assert_eq!(data["private"], false);
    assert!(data["id"].is_i64());
    assert!(data["create_time"].is_string());
}

#[tokio::test]
async fn test_add_note_no_owner() {
    let app = test_app();
    let body = json!({"content": "Are er kul", "name": "Best note ever"});
    let (status, data) = send(&app, "POST", "/note", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data, json!({"message": "Missing mandatory field 'owner'"}));
}

#[tokio::test]
async fn test_add_note_no_content() {
    let app = test_app();
    let body = json!({"owner": 1, "name": "Best note ever"});
    let (status, data) = send(&app, "POST", "/note", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data["message"], "Missing mandatory field 'content'");
}

#[tokio::test]
async fn test_add_note_bad_private() {
    let app = test_app();
    let body = json!({"owner": 1, "content": "x", "private": "yes"});
    let (status, data) = send(&app, "POST", "/note", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data["message"], "'private' must be boolean");
}

#[tokio::test]
async fn test_add_note_malformed_json() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/note")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let data: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(data["message"].is_string());
}

#[tokio::test]
async fn test_identity_header_overrides_payload_owner() {
    let app = test_app();
    let (status, data) = send_with(&app, "POST", "/note", Some(note_full()), Some("7")).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(data["owner"], 7);
}

#[tokio::test]
async fn test_get_note() {
    let app = test_app();
    let id = create_full(&app).await;

    let (status, data) = send(&app, "GET", &format!("/note/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["note"]["owner"], 1);
    assert_eq!(data["note"]["content"], "Are er kul");
    assert_eq!(data["note"]["name"], "Best note ever");
}

#[tokio::test]
async fn test_get_note_not_found() {
    let app = test_app();
    assert_eq!(create_full(&app).await, 1);

    let (status, data) = send(&app, "GET", "/note/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(data, json!({"message": "note not found"}));
}

#[tokio::test]
async fn test_delete_note() {
    let app = test_app();
    let id = create_full(&app).await;

    let (status, _) = send(&app, "DELETE", &format!("/note/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, data) = send(&app, "GET", &format!("/note/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(data["message"], "note not found");
}

#[tokio::test]
async fn test_delete_note_not_found() {
    let app = test_app();
    create_full(&app).await;

    let (status, data) = send(&app, "DELETE", "/note/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(data["message"], "note not found");
}

#[tokio::test]
async fn test_change_note_owner() {
    let app = test_app();
    let id = create_full(&app).await;

    let (status, data) = send(
        &app,
        "PATCH",
        &format!("/note/{id}/owner"),
        Some(json!({"owner": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["status"], "ok");

    let (status, data) = send(&app, "GET", &format!("/note/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["note"]["owner"], 2);
}

#[tokio::test]
async fn test_change_note_owner_same_owner() {
    let app = test_app();
    let id = create_full(&app).await;

    let (status, data) = send(
        &app,
        "PATCH",
        &format!("/note/{id}/owner"),
        Some(json!({"owner": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data["message"], "new owner is same as old");
}

#[tokio::test]
async fn test_change_note_owner_note_not_found() {
    let app = test_app();
    create_full(&app).await;

    let (status, data) = send(&app, "PATCH", "/note/2/owner", Some(json!({"owner": 2}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(data["message"], "note not found");
}

#[tokio::test]
async fn test_change_note_owner_no_owner_given() {
    let app = test_app();
    create_full(&app).await;

    let (status, data) = send(&app, "PATCH", "/note/1/owner", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data, json!({"message": "must supply owner as int"}));

    let (status, data) = send(&app, "PATCH", "/note/1/owner", Some(json!({"owner": "2"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data["message"], "must supply owner as int");
}

#[tokio::test]
async fn test_rename_note() {
    let app = test_app();
    create_full(&app).await;

    let body = json!({"name": "newlist"});
    let (status, data) = send(&app, "PATCH", "/note/1/rename", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["status"], "ok");

    // same name again is still fine
    let (status, _) = send(&app, "PATCH", "/note/1/rename", Some(json!({"name": "newlist"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, data) = send(&app, "GET", "/note/1", None).await;
    assert_eq!(data["note"]["name"], "newlist");
}

#[tokio::test]
async fn test_rename_note_not_found() {
    let app = test_app();
    let (status, data) = send(&app, "PATCH", "/note/9/rename", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(data["message"], "note not found");
}

#[tokio::test]
async fn test_update_note() {
    let app = test_app();
    create_full(&app).await;

    let (status, data) = send(
        &app,
        "PATCH",
        "/note/1/update",
        Some(json!({"content": "newcontent"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["status"], "ok");

    let (_, data) = send(&app, "GET", "/note/1", None).await;
    assert_eq!(data["note"]["content"], "newcontent");
    assert_eq!(data["note"]["name"], "Best note ever");
    assert_eq!(data["note"]["private"], false);

    let (status, _) = send(&app, "PATCH", "/note/1/update", Some(json!({"private": true}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, data) = send(&app, "GET", "/note/1", None).await;
    assert_eq!(data["note"]["content"], "newcontent");
    assert_eq!(data["note"]["private"], true);
}

#[tokio::test]
async fn test_update_note_rejects_empty_content() {
    let app = test_app();
    create_full(&app).await;

    let (status, data) = send(&app, "PATCH", "/note/1/update", Some(json!({"content": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data["message"], "Missing mandatory field 'content'");
}

#[tokio::test]
async fn test_update_note_not_found() {
    let app = test_app();
    let (status, data) = send(&app, "PATCH", "/note/3/update", Some(json!({"content": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(data["message"], "note not found");
}

#[tokio::test]
async fn test_notes_by_owner() {
    let app = test_app();

    let (status, data) = send(&app, "GET", "/notes/owner/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["count"], 0);
    assert_eq!(data["notes"], json!([]));

    create_full(&app).await;
    create_full(&app).await;
    send(&app, "POST", "/note", Some(json!({"owner": 2, "content": "other"}))).await;

    let (status, data) = send(&app, "GET", "/notes/owner/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["count"], 2);
    assert_eq!(data["notes"][0]["owner"], 1);
}

#[tokio::test]
async fn test_note_fields_keep_their_order() {
    let app = test_app();
    let body = json!({"owner": 1, "content": "x", "private": true});
    let (status, text) = send_raw(&app, "POST", "/note", Some(body), None).await;

    assert_eq!(status, StatusCode::CREATED);
    let expected = r#"{"id":1,"owner":1,"name":null,"content":"x","private":true,"create_time":"#;
    assert!(text.starts_with(expected), "unexpected body: {text}");

    let (_, text) = send_raw(&app, "GET", "/note/1", None, None).await;
    let expected = r#"{"note":{"id":1,"owner":1,"name":null,"content":"x","private":true,"#;
    assert!(text.starts_with(expected), "unexpected body: {text}");
}

#[tokio::test]
async fn test_non_integer_path_id_is_json_bad_request() {
    let app = test_app();

    let (status, data) = send(&app, "GET", "/note/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(data["message"].is_string());

    let body = json!({"name": "x"});
    let (status, data) = send(&app, "PATCH", "/note/abc/rename", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(data["message"].is_string());

    let (status, data) = send(&app, "GET", "/notes/owner/bob", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(data["message"].is_string());
}

#[tokio::test]
async fn test_rename_note_rejects_non_string_name() {
    let app = test_app();
    create_full(&app).await;

    let (status, data) = send(&app, "PATCH", "/note/1/rename", Some(json!({"name": 5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data["message"], "'name' must be string");

    let (_, data) = send(&app, "GET", "/note/1", None).await;
    assert_eq!(data["note"]["name"], "Best note ever");
}

#[tokio::test]
async fn test_rename_note_requires_name_key() {
    let app = test_app();
    create_full(&app).await;

    let (status, data) = send(&app, "PATCH", "/note/1/rename", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data["message"], "Missing mandatory field 'name'");
}

#[tokio::test]
async fn test_rename_note_null_clears_name() {
    let app = test_app();
    create_full(&app).await;

    let (status, _) = send(&app, "PATCH", "/note/1/rename", Some(json!({"name": null}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, data) = send(&app, "GET", "/note/1", None).await;
    assert!(data["note"]["name"].is_null());
}

#[tokio::test]
async fn test_update_note_rejects_non_bool_private() {
    let app = test_app();
    create_full(&app).await;

    let body = json!({"private": "yes"});
    let (status, data) = send(&app, "PATCH", "/note/1/update", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data["message"], "'private' must be boolean");
}

#[tokio::test]
async fn test_update_note_null_keeps_stored_values() {
    let app = test_app();
    create_full(&app).await;

    let body = json!({"private": true});
    let (status, _) = send(&app, "PATCH", "/note/1/update", Some(body)).await;
    assert_eq!(status, StatusCode::OK);

    let body = json!({"content": null, "private": null});
    let (status, _) = send(&app, "PATCH", "/note/1/update", Some(body)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, data) = send(&app, "GET", "/note/1", None).await;
    assert_eq!(data["note"]["private"], true);
    assert_eq!(data["note"]["content"], "Are er kul");
}

#[tokio::test]
async fn test_untrusted_payload_owner_is_missing_owner() {
    let config = ServerConfig {
        trust_payload_owner: false,
        ..ServerConfig::default()
    };
    let app = app_with(&config);

    let (status, data) = send(&app, "POST", "/note", Some(note_full())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data, json!({"message": "Missing mandatory field 'owner'"}));

    let (status, data) = send_with(&app, "POST", "/note", Some(note_full()), Some("4")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(data["owner"], 4);
}
