//! Stateless HTTP request builder and response parser for the Intercom API.
//!
//! # Design
//! `IntercomClient` holds the trimmed endpoint and the precomputed
//! `Authorization` value and carries no mutable state between calls. Each
//! operation is a `build_*` method producing an `HttpRequest`; responses go
//! through one `parse_response`, because every endpoint shares the same
//! decoding protocol. The caller (or [`crate::Intercom`]) executes the
//! round-trip in between.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::identifier::UserIdentifier;
use crate::response::ApiResponse;
use crate::types::{Conversation, Event, ListUsers, Template};

/// Synchronous, stateless client for the Intercom API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct IntercomClient {
    base_url: String,
    authorization: String,
}

impl IntercomClient {
    /// Validates `config` and derives the auth header from it.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        Ok(Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            authorization: config.authorization(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let url = format!("{}/{path}", self.base_url);
        debug!(method = method.as_str(), %url, "built request");
        HttpRequest {
            method,
            url,
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), self.authorization.clone()),
            ],
            body,
        }
    }

    fn json_request<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> ClientResult<HttpRequest> {
        let body = serde_json::to_string(payload).map_err(ClientError::Serialization)?;
        Ok(self.request(HttpMethod::Post, path, Some(body)))
    }

    pub fn build_list_admins(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "admins/", None)
    }

    /// `identifier` is an email address or the application's user_id.
    pub fn build_get_user(&self, identifier: &str) -> HttpRequest {
        let id = UserIdentifier::classify(identifier);
        self.request(HttpMethod::Get, &format!("users/?{}", id.query()), None)
    }

    pub fn build_list_users(&self, params: &ListUsers) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("users/?{}", params.query()), None)
    }

    pub fn build_get_segment(&self, id: &str) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            &format!("segments/{}", urlencoding::encode(id)),
            None,
        )
    }

    /// Create-or-update: the API upserts on `user_id` / `email`.
    pub fn build_create_user<T: Serialize + ?Sized>(&self, user: &T) -> ClientResult<HttpRequest> {
        self.json_request("users/", user)
    }

    /// Same request as [`Self::build_create_user`].
    pub fn build_update_user<T: Serialize + ?Sized>(&self, user: &T) -> ClientResult<HttpRequest> {
        self.build_create_user(user)
    }

    pub fn build_delete_user(&self, identifier: &str) -> HttpRequest {
        let id = UserIdentifier::classify(identifier);
        self.request(HttpMethod::Delete, &format!("users/?{}", id.query()), None)
    }

    /// `data` is usually a [`Conversation`], but any JSON object is sent as-is.
    pub fn build_create_conversation<T: Serialize + ?Sized>(&self, data: &T) -> ClientResult<HttpRequest> {
        self.json_request("messages/", data)
    }

    /// Email from `admin_id` to the user with `user_id`.
    pub fn build_admin_email(
        &self,
        subject: &str,
        body: &str,
        template: Template,
        user_id: &str,
        admin_id: &str,
    ) -> ClientResult<HttpRequest> {
        let conversation = Conversation::admin_email(subject, body, template, user_id, admin_id);
        self.build_create_conversation(&conversation)
    }

    /// Stamps a missing `created_at` with the current time.
    pub fn build_create_event(&self, event: &Event) -> ClientResult<HttpRequest> {
        self.build_create_event_at(event, Utc::now().timestamp())
    }

    /// Like [`Self::build_create_event`] with an explicit clock reading.
    pub fn build_create_event_at(&self, event: &Event, now: i64) -> ClientResult<HttpRequest> {
        if event.created_at.is_some() {
            return self.json_request("events/", event);
        }
        let stamped = Event {
            created_at: Some(now),
            ..event.clone()
        };
        self.json_request("events/", &stamped)
    }

    /// Decode a response body.
    ///
    /// An empty body is `Success(Null)`. A JSON object with a non-null
    /// `errors` member yields `ApiError(errors)`. Anything else that parses
    /// is `Success`. The HTTP status is not consulted except for error
    /// reporting.
    pub fn parse_response(&self, response: HttpResponse) -> ClientResult<ApiResponse> {
        let body = response.body.trim();
        if body.is_empty() {
            return Ok(ApiResponse::Success(Value::Null));
        }

        let mut value: Value = serde_json::from_str(body).map_err(|source| ClientError::Decode {
            status: response.status,
            source,
        })?;

        if let Some(errors) = value.get_mut("errors").filter(|e| !e.is_null()).map(Value::take) {
            warn!(status = response.status, %errors, "API reported errors");
            return Ok(ApiResponse::ApiError(errors));
        }
        Ok(ApiResponse::Success(value))
    }

    /// Like [`Self::parse_response`], unwrapping the `admins` list.
    pub fn parse_list_admins(&self, response: HttpResponse) -> ClientResult<ApiResponse> {
        self.parse_list(response, "admins")
    }

    /// Like [`Self::parse_response`], unwrapping the `users` list.
    pub fn parse_list_users(&self, response: HttpResponse) -> ClientResult<ApiResponse> {
        self.parse_list(response, "users")
    }

    fn parse_list(&self, response: HttpResponse, key: &str) -> ClientResult<ApiResponse> {
        match self.parse_response(response)? {
            ApiResponse::Success(Value::Object(mut map)) if map.contains_key(key) => {
                Ok(ApiResponse::Success(map.remove(key).unwrap_or(Value::Null)))
            }
            other => Ok(other),
        }
    }
}
