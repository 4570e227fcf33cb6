//! In-memory stand-in for the slice of the Intercom API the client consumes.
//!
//! Admins and segments are seeded; users, messages and events live in a
//! per-app store. Every route requires `Authorization: Basic
//! base64(app_id:api_key)`. Failures use Intercom's `error.list` shape so
//! the client's `errors` unwrapping is exercised for real.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

pub const APP_ID: &str = "test-app";
pub const API_KEY: &str = "test-key";

const DEFAULT_PER_PAGE: u32 = 50;

/// An `error.list` response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", format!("{what} Not Found"))
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "parameter_invalid", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "type": "error.list",
            "request_id": Uuid::new_v4().to_string(),
            "errors": [{"code": self.code, "message": self.message}],
        });
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Default)]
pub struct Store {
    admins: Vec<Value>,
    segments: Vec<Value>,
    /// Insertion order; newest last.
    users: Vec<Map<String, Value>>,
    messages: Vec<Value>,
    events: Vec<Value>,
}

impl Store {
    fn seeded() -> Self {
        let now = now();
        Self {
            admins: vec![
                json!({"type": "admin", "id": "814", "name": "Support Bot", "email": "support@example.com"}),
                json!({"type": "admin", "id": "815", "name": "Ops Team", "email": "ops@example.com"}),
            ],
            segments: vec![
                json!({"type": "segment", "id": "5310d8e7598c9a0b24000002", "name": "Active", "created_at": now, "updated_at": now}),
                json!({"type": "segment", "id": "5310d8e7598c9a0b24000003", "name": "New", "created_at": now, "updated_at": now}),
            ],
            ..Self::default()
        }
    }

    fn position(&self, key: &UserKey) -> Option<usize> {
        self.users.iter().position(|u| match key {
            UserKey::UserId(id) => u.get("user_id").and_then(Value::as_str) == Some(id),
            UserKey::Email(email) => u.get("email").and_then(Value::as_str) == Some(email),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<Store>>,
    authorization: Arc<str>,
}

pub fn app() -> Router {
    app_with_credentials(APP_ID, API_KEY)
}

pub fn app_with_credentials(app_id: &str, api_key: &str) -> Router {
    let state = AppState {
        store: Arc::new(RwLock::new(Store::seeded())),
        authorization: format!("Basic {}", STANDARD.encode(format!("{app_id}:{api_key}"))).into(),
    };
    Router::new()
        .route("/admins/", get(list_admins))
        .route("/users/", get(get_users).post(upsert_user).delete(delete_user))
        .route("/segments/{id}", get(get_segment))
        .route("/messages/", get(list_messages).post(create_message))
        .route("/events/", get(list_events).post(create_event))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let provided = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if provided != Some(&*state.authorization) {
        warn!(path = %req.uri().path(), "rejected request with bad credentials");
        return ApiError::new(StatusCode::UNAUTHORIZED, "unauthorized", "Access Token Invalid").into_response();
    }
    next.run(req).await
}

#[derive(Debug)]
enum UserKey {
    UserId(String),
    Email(String),
}

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    email: Option<String>,
    user_id: Option<String>,
    page: Option<u32>,
    per_page: Option<u32>,
    order: Option<String>,
}

impl UsersQuery {
    fn key(&self) -> Option<UserKey> {
        match (&self.user_id, &self.email) {
            (Some(id), _) => Some(UserKey::UserId(id.clone())),
            (None, Some(email)) => Some(UserKey::Email(email.clone())),
            (None, None) => None,
        }
    }
}

fn key_from_body(body: &Map<String, Value>) -> Option<UserKey> {
    if let Some(id) = body.get("user_id").and_then(Value::as_str) {
        return Some(UserKey::UserId(id.to_string()));
    }
    body.get("email")
        .and_then(Value::as_str)
        .map(|email| UserKey::Email(email.to_string()))
}

async fn list_admins(State(state): State<AppState>) -> Json<Value> {
    let store = state.store.read().await;
    Json(json!({"type": "admin.list", "admins": store.admins}))
}

async fn get_users(State(state): State<AppState>, Query(query): Query<UsersQuery>) -> Result<Json<Value>, ApiError> {
    let store = state.store.read().await;

    if let Some(key) = query.key() {
        let pos = store.position(&key).ok_or_else(|| ApiError::not_found("User"))?;
        return Ok(Json(Value::Object(store.users[pos].clone())));
    }

    let ascending = match query.order.as_deref() {
        None | Some("desc") => false,
        Some("asc") => true,
        Some(other) => return Err(ApiError::bad_request(format!("order must be asc or desc, got {other}"))),
    };
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE).max(1);
    // Pages are 1-based; page 0 means the first page.
    let page = query.page.unwrap_or(1).max(1);

    let mut users: Vec<&Map<String, Value>> = store.users.iter().collect();
    if !ascending {
        users.reverse();
    }
    let total = users.len();
    let total_pages = total.div_ceil(per_page as usize).max(1);
    let items: Vec<Value> = users
        .into_iter()
        .skip((page as usize - 1) * per_page as usize)
        .take(per_page as usize)
        .map(|u| Value::Object(u.clone()))
        .collect();

    Ok(Json(json!({
        "type": "user.list",
        "total_count": total,
        "pages": {"type": "pages", "page": page, "per_page": per_page, "total_pages": total_pages},
        "users": items,
    })))
}

async fn upsert_user(State(state): State<AppState>, Json(body): Json<Value>) -> Result<Json<Value>, ApiError> {
    let Value::Object(fields) = body else {
        return Err(ApiError::bad_request("body must be a JSON object"));
    };
    let key = key_from_body(&fields).ok_or_else(|| ApiError::bad_request("user_id or email is required"))?;

    let mut store = state.store.write().await;
    let now = now();
    let user = match store.position(&key) {
        Some(pos) => {
            let user = &mut store.users[pos];
            for (k, v) in fields {
                if !matches!(k.as_str(), "id" | "type" | "created_at") {
                    user.insert(k, v);
                }
            }
            user.insert("updated_at".to_string(), json!(now));
            user.clone()
        }
        None => {
            let mut user = fields;
            user.insert("type".to_string(), json!("user"));
            user.insert("id".to_string(), json!(Uuid::new_v4().simple().to_string()));
            user.insert("created_at".to_string(), json!(now));
            user.insert("updated_at".to_string(), json!(now));
            store.users.push(user.clone());
            user
        }
    };
    debug!(?key, "upserted user");
    Ok(Json(Value::Object(user)))
}

async fn delete_user(State(state): State<AppState>, Query(query): Query<UsersQuery>) -> Result<Json<Value>, ApiError> {
    let key = query
        .key()
        .ok_or_else(|| ApiError::bad_request("user_id or email is required"))?;
    let mut store = state.store.write().await;
    let pos = store.position(&key).ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(Value::Object(store.users.remove(pos))))
}

async fn get_segment(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, ApiError> {
    let store = state.store.read().await;
    store
        .segments
        .iter()
        .find(|s| s["id"] == id.as_str())
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Segment"))
}

async fn create_message(State(state): State<AppState>, Json(body): Json<Value>) -> Result<Json<Value>, ApiError> {
    let message_type = body["message_type"].as_str().unwrap_or_default();
    if !matches!(message_type, "inapp" | "email") {
        return Err(ApiError::bad_request("message_type must be inapp or email"));
    }
    if message_type == "email" && body["subject"].as_str().is_none() {
        return Err(ApiError::bad_request("subject is required for email messages"));
    }
    let text = body["body"]
        .as_str()
        .ok_or_else(|| ApiError::bad_request("body is required"))?;
    if body["from"]["type"] != "admin" {
        return Err(ApiError::bad_request("from.type must be admin"));
    }
    if body["to"]["type"] != "user" {
        return Err(ApiError::bad_request("to.type must be user"));
    }

    let mut store = state.store.write().await;
    let admin_id = body["from"]["id"].as_str().unwrap_or_default();
    let owner = store
        .admins
        .iter()
        .find(|a| a["id"] == admin_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Admin"))?;

    let message = json!({
        "type": "admin_message",
        "id": Uuid::new_v4().simple().to_string(),
        "created_at": now(),
        "message_type": message_type,
        "subject": body["subject"],
        "body": text,
        "template": body["template"],
        "owner": owner,
        "to": body["to"],
    });
    store.messages.push(message.clone());
    debug!(admin_id, "created message");
    Ok(Json(message))
}

/// Everything sent through `POST messages/`, oldest first.
async fn list_messages(State(state): State<AppState>) -> Json<Value> {
    let store = state.store.read().await;
    Json(json!({"type": "message.list", "messages": store.messages}))
}

async fn create_event(State(state): State<AppState>, Json(body): Json<Value>) -> Result<StatusCode, ApiError> {
    let Value::Object(fields) = body else {
        return Err(ApiError::bad_request("body must be a JSON object"));
    };
    if fields.get("event_name").and_then(Value::as_str).is_none() {
        return Err(ApiError::bad_request("event_name is required"));
    }
    if fields.get("created_at").and_then(Value::as_i64).is_none() {
        return Err(ApiError::bad_request("created_at is required"));
    }
    let key = key_from_body(&fields).ok_or_else(|| ApiError::bad_request("user_id or email is required"))?;

    let mut store = state.store.write().await;
    if store.position(&key).is_none() {
        return Err(ApiError::not_found("User"));
    }
    store.events.push(Value::Object(fields));
    Ok(StatusCode::ACCEPTED)
}

async fn list_events(State(state): State<AppState>, Query(query): Query<UsersQuery>) -> Result<Json<Value>, ApiError> {
    let key = query
        .key()
        .ok_or_else(|| ApiError::bad_request("user_id or email is required"))?;
    let store = state.store.read().await;
    let events: Vec<Value> = store
        .events
        .iter()
        .filter(|e| match &key {
            UserKey::UserId(id) => e["user_id"] == id.as_str(),
            UserKey::Email(email) => e["email"] == email.as_str(),
        })
        .cloned()
        .collect();
    Ok(Json(json!({"type": "event.list", "events": events})))
}
