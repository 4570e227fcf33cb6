use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::{json, Value};
use tower::ServiceExt;

// base64("test-app:test-key")
const AUTH: &str = "Basic dGVzdC1hcHA6dGVzdC1rZXk=";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::AUTHORIZATION, AUTH)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, AUTH)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_credentials_return_401_error_list() {
    let resp = app()
        .oneshot(Request::builder().uri("/admins/").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["type"], "error.list");
    assert_eq!(body["errors"][0]["code"], "unauthorized");
}

#[tokio::test]
async fn wrong_credentials_return_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/admins/")
                .header(http::header::AUTHORIZATION, "Basic d3Jvbmc6Y3JlZHM=")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- admins / segments ---

#[tokio::test]
async fn list_admins_returns_seeded_admins() {
    let resp = app().oneshot(get("/admins/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["type"], "admin.list");
    assert_eq!(body["admins"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn get_segment_found_and_missing() {
    let resp = app()
        .oneshot(get("/segments/5310d8e7598c9a0b24000002"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["name"], "Active");

    let resp = app().oneshot(get("/segments/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["errors"][0]["message"], "Segment Not Found");
}

// --- users ---

#[tokio::test]
async fn get_user_not_found() {
    let resp = app().oneshot(get("/users/?email=ghost%40example.com")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["errors"][0]["code"], "not_found");
}

#[tokio::test]
async fn upsert_without_key_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/users/", r#"{"name":"Nobody"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_users_empty() {
    let resp = app().oneshot(get("/users/?page=0&order=desc")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["total_count"], 0);
    assert_eq!(body["pages"]["page"], 1);
    assert!(body["users"].as_array().unwrap().is_empty());
}

// --- messages ---

#[tokio::test]
async fn email_message_from_known_admin() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/messages/",
            &json!({
                "message_type": "email",
                "subject": "Hi",
                "body": "Welcome",
                "template": "plain",
                "from": {"type": "admin", "id": "814"},
                "to": {"type": "user", "user_id": "25"},
            })
            .to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["type"], "admin_message");
    assert_eq!(body["owner"]["id"], "814");
}

#[tokio::test]
async fn sent_messages_are_listed() {
    use tower::Service;

    let mut app = app().into_service();
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/messages/",
            r#"{"message_type":"inapp","body":"Need a hand?","from":{"type":"admin","id":"815"},"to":{"type":"user","email":"jane@example.com"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let sent = body_json(resp).await;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/messages/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let listed = body_json(resp).await;
    assert_eq!(listed["type"], "message.list");
    assert_eq!(listed["messages"], json!([sent]));
}

#[tokio::test]
async fn message_from_unknown_admin_returns_404() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/messages/",
            r#"{"message_type":"inapp","body":"x","from":{"type":"admin","id":"1"},"to":{"type":"user","id":"u"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn email_message_without_subject_returns_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/messages/",
            r#"{"message_type":"email","body":"x","from":{"type":"admin","id":"814"},"to":{"type":"user","id":"u"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- events ---

#[tokio::test]
async fn event_for_unknown_user_returns_404() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/events/",
            r#"{"user_id":"ghost","event_name":"login","created_at":1700000000,"metadata":{}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full user lifecycle ---

#[tokio::test]
async fn user_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/users/",
            r#"{"user_id":"25","email":"jane@example.com","name":"Jane"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created = body_json(resp).await;
    assert_eq!(created["type"], "user");
    assert_eq!(created["name"], "Jane");
    let id = created["id"].clone();

    // same user_id updates in place
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/users/", r#"{"user_id":"25","name":"Jane Doe"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["id"], id);
    assert_eq!(updated["name"], "Jane Doe");
    assert_eq!(updated["email"], "jane@example.com");

    // get by email
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/users/?email=jane%40example.com"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["user_id"], "25");

    // event is accepted with an empty body
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/events/",
            r#"{"user_id":"25","event_name":"login","created_at":1700000000,"metadata":{}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert!(body_bytes(resp).await.is_empty());

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/events/?user_id=25"))
        .await
        .unwrap();
    let events = body_json(resp).await;
    assert_eq!(events["events"][0]["event_name"], "login");

    // list
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/users/?page=1&per_page=10&order=asc"))
        .await
        .unwrap();
    let page = body_json(resp).await;
    assert_eq!(page["total_count"], 1);
    assert_eq!(page["users"][0]["user_id"], "25");

    // delete by user_id
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri("/users/?user_id=25")
                .header(http::header::AUTHORIZATION, AUTH)
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["id"], id);

    // gone after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/users/?user_id=25"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_users_pages_newest_first() {
    use tower::Service;

    let mut app = app().into_service();
    for n in 1..=3 {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/users/", &format!(r#"{{"user_id":"u{n}"}}"#)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/users/?page=2&per_page=2&order=desc"))
        .await
        .unwrap();
    let page = body_json(resp).await;
    assert_eq!(page["pages"]["total_pages"], 2);
    let users = page["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["user_id"], "u1");
}
