//! Request payloads and optional-argument structures.
//!
//! # Design
//! User records are opaque: any `Serialize` value is sent verbatim. Events
//! and conversations get small typed builders because their optional fields
//! carry defaults (`metadata`, `created_at`) or a fixed shape (the admin ->
//! user email). Nothing here validates content; the API does that.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sort order for user listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Arguments for listing users. Defaults: page 0, server-side page size,
/// descending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsers {
    #[serde(default)]
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(default = "default_order", skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

fn default_order() -> Option<SortOrder> {
    Some(SortOrder::Desc)
}

impl Default for ListUsers {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: None,
            order: default_order(),
        }
    }
}

impl ListUsers {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    #[must_use]
    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// `page=<p>[&per_page=<n>][&order=<o>]`
    pub fn query(&self) -> String {
        let mut query = format!("page={}", self.page);
        if let Some(per_page) = self.per_page {
            query.push_str(&format!("&per_page={per_page}"));
        }
        if let Some(order) = self.order {
            query.push_str(&format!("&order={}", order.as_str()));
        }
        query
    }
}

/// A custom event attributed to a user.
///
/// `created_at` is a Unix timestamp in seconds; when `None` the client
/// stamps the event with the current time before sending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub user_id: String,
    pub event_name: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl Event {
    pub fn new(user_id: impl Into<String>, event_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            event_name: event_name.into(),
            metadata: Map::new(),
            created_at: None,
        }
    }

    #[must_use]
    pub fn metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn created_at(mut self, created_at: i64) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Inapp,
    Email,
}

/// Email style. Only meaningful for email messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Plain,
    Personal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefType {
    Admin,
    User,
}

/// The sending admin: `{"type":"admin","id":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRef {
    #[serde(rename = "type")]
    pub kind: RefType,
    pub id: String,
}

impl AdminRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            kind: RefType::Admin,
            id: id.into(),
        }
    }
}

/// How the recipient is addressed: Intercom id, own user_id or email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserKey {
    Id(String),
    UserId(String),
    Email(String),
}

/// The recipient: `{"type":"user","user_id":...}` and friends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRef {
    #[serde(rename = "type")]
    pub kind: RefType,
    #[serde(flatten)]
    pub key: UserKey,
}

impl UserRef {
    pub fn user_id(user_id: impl Into<String>) -> Self {
        Self {
            kind: RefType::User,
            key: UserKey::UserId(user_id.into()),
        }
    }

    pub fn email(email: impl Into<String>) -> Self {
        Self {
            kind: RefType::User,
            key: UserKey::Email(email.into()),
        }
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self {
            kind: RefType::User,
            key: UserKey::Id(id.into()),
        }
    }
}

/// Body of `POST messages/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversation {
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
    pub from: AdminRef,
    pub to: UserRef,
}

impl Conversation {
    /// An email from an admin to a user identified by `user_id`.
    pub fn admin_email(
        subject: impl Into<String>,
        body: impl Into<String>,
        template: Template,
        user_id: impl Into<String>,
        admin_id: impl Into<String>,
    ) -> Self {
        Self {
            message_type: MessageType::Email,
            subject: Some(subject.into()),
            body: body.into(),
            template: Some(template),
            from: AdminRef::new(admin_id),
            to: UserRef::user_id(user_id),
        }
    }

    /// An in-app message; no subject or template.
    pub fn in_app(body: impl Into<String>, from: AdminRef, to: UserRef) -> Self {
        Self {
            message_type: MessageType::Inapp,
            subject: None,
            body: body.into(),
            template: None,
            from,
            to,
        }
    }
}
