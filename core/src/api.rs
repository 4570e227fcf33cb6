//! One call per operation: build, execute, decode.

use serde::Serialize;
use tracing::{instrument, warn};

use crate::client::IntercomClient;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::response::ApiResponse;
use crate::types::{Event, ListUsers, Template};

/// Intercom API bound to a transport.
///
/// Each method issues exactly one request through `transport` and blocks
/// until it returns. A transport failure comes back as
/// `ApiResponse::TransportError`; nothing is retried.
#[derive(Debug, Clone)]
pub struct Intercom<T> {
    client: IntercomClient,
    transport: T,
}

impl<T: Transport> Intercom<T> {
    pub fn new(config: &ClientConfig, transport: T) -> ClientResult<Self> {
        Ok(Self {
            client: IntercomClient::new(config)?,
            transport,
        })
    }

    pub fn client(&self) -> &IntercomClient {
        &self.client
    }

    fn send(&self, request: HttpRequest) -> ClientResult<ApiResponse> {
        self.send_with(request, IntercomClient::parse_response)
    }

    fn send_with(
        &self,
        request: HttpRequest,
        parse: fn(&IntercomClient, HttpResponse) -> ClientResult<ApiResponse>,
    ) -> ClientResult<ApiResponse> {
        match self.transport.execute(request) {
            Ok(response) => parse(&self.client, response),
            Err(err) => {
                warn!(error = %err, "transport failed");
                Ok(ApiResponse::from(err))
            }
        }
    }

    /// All admins of the workspace, as the bare `admins` list.
    #[instrument(level = "debug", skip(self))]
    pub fn list_admins(&self) -> ClientResult<ApiResponse> {
        self.send_with(self.client.build_list_admins(), IntercomClient::parse_list_admins)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn user(&self, identifier: &str) -> ClientResult<ApiResponse> {
        self.send(self.client.build_get_user(identifier))
    }

    /// One page of users, as the bare `users` list.
    #[instrument(level = "debug", skip(self))]
    pub fn list_users(&self, params: &ListUsers) -> ClientResult<ApiResponse> {
        self.send_with(self.client.build_list_users(params), IntercomClient::parse_list_users)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn segment(&self, id: &str) -> ClientResult<ApiResponse> {
        self.send(self.client.build_get_segment(id))
    }

    #[instrument(level = "debug", skip_all)]
    pub fn create_user<U: Serialize + ?Sized>(&self, user: &U) -> ClientResult<ApiResponse> {
        self.send(self.client.build_create_user(user)?)
    }

    #[instrument(level = "debug", skip_all)]
    pub fn update_user<U: Serialize + ?Sized>(&self, user: &U) -> ClientResult<ApiResponse> {
        self.send(self.client.build_update_user(user)?)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete_user(&self, identifier: &str) -> ClientResult<ApiResponse> {
        self.send(self.client.build_delete_user(identifier))
    }

    #[instrument(level = "debug", skip_all)]
    pub fn create_conversation<C: Serialize + ?Sized>(&self, data: &C) -> ClientResult<ApiResponse> {
        self.send(self.client.build_create_conversation(data)?)
    }

    #[instrument(level = "debug", skip(self, body))]
    pub fn send_admin_email(
        &self,
        subject: &str,
        body: &str,
        template: Template,
        user_id: &str,
        admin_id: &str,
    ) -> ClientResult<ApiResponse> {
        self.send(
            self.client
                .build_admin_email(subject, body, template, user_id, admin_id)?,
        )
    }

    #[instrument(level = "debug", skip(self), fields(user_id = %event.user_id, event_name = %event.event_name))]
    pub fn create_event(&self, event: &Event) -> ClientResult<ApiResponse> {
        self.send(self.client.build_create_event(event)?)
    }
}

#[cfg(feature = "ureq")]
impl Intercom<crate::http::UreqTransport> {
    /// Client over the bundled blocking transport, honouring `config.timeout`.
    pub fn connect(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(config, crate::http::UreqTransport::new(config.timeout))
    }

    /// [`Self::connect`] with [`ClientConfig::from_env`].
    pub fn from_env() -> ClientResult<Self> {
        Self::connect(&ClientConfig::from_env()?)
    }
}
