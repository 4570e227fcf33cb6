//! Synchronous client for the Intercom REST API.
//!
//! # Overview
//! Covers admins, users, segments, conversations and events. `IntercomClient`
//! builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern); `Intercom` pairs it with a
//! [`Transport`] for one-call-per-operation use.
//!
//! # Design
//! - Configuration (endpoint, app id, API key) is fixed at construction;
//!   the client holds no other state and is freely shareable.
//! - Every response goes through one decoding rule: an `errors` member is
//!   an API error, anything else is the result. See [`ApiResponse`].
//! - Payloads are opaque `Serialize` values; only events and conversations
//!   have typed helpers, for their defaults.
//! - The `ureq` feature (default) provides a blocking [`UreqTransport`].
//!
//! ```no_run
//! use intercom_core::{ClientConfig, Event, Intercom};
//!
//! let config = ClientConfig::new("app-id", "api-key");
//! let intercom = Intercom::connect(&config)?;
//! let user = intercom.user("jane@example.com")?;
//! intercom.create_event(&Event::new("25", "upgraded-plan"))?;
//! # let _ = user;
//! # Ok::<(), intercom_core::ClientError>(())
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod identifier;
pub mod response;
pub mod types;

pub use api::Intercom;
pub use client::IntercomClient;
pub use config::{ClientConfig, DEFAULT_ENDPOINT};
pub use error::{ClientError, ClientResult};
#[cfg(feature = "ureq")]
pub use http::UreqTransport;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use identifier::{is_email, UserIdentifier};
pub use response::{ApiResponse, ResponseError};
pub use types::{
    AdminRef, Conversation, Event, ListUsers, MessageType, RefType, SortOrder, Template, UserKey,
    UserRef,
};
