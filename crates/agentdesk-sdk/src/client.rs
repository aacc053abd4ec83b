//! Typed HTTP gateway to the AgentDesk backend.
//!
//! [`AgentDeskClient`] exposes one async method per logical operation. Each
//! method issues exactly one request against the resolved [`ApiBase`]: no
//! retry, no backoff, no caching. Any transport failure or non-2xx status
//! comes back as an [`SdkError`].
//!
//! # Typical usage
//!
//! ```rust,no_run
//! use agentdesk_models::{AgentChatRequest, SessionId, UserId};
//! use agentdesk_sdk::AgentDeskClient;
//!
//! # async fn run() -> Result<(), agentdesk_sdk::SdkError> {
//! let client = AgentDeskClient::from_env();
//! let reply = client
//!     .chat(&AgentChatRequest {
//!         session_id: SessionId::new("default-session"),
//!         message: "hello".into(),
//!         user_id: Some(UserId::new("default-user")),
//!     })
//!     .await?;
//! println!("{}", reply.response);
//! # Ok(())
//! # }
//! ```

use agentdesk_models::{
    AgentChatRequest, AgentCompleteRequest, AgentHealth, AgentResponse, UserId, UserState,
    UserStateCreate, UserStateUpdate, WorldKey, WorldState, WorldStateCreate, WorldStateUpdate,
};
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{api_base, ApiBase};
use crate::error::SdkError;

/// Client for the backend REST surface.
#[derive(Debug, Clone)]
pub struct AgentDeskClient {
    http: reqwest::Client,
    base: ApiBase,
}

impl AgentDeskClient {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Client bound to the process-wide base URL (see [`api_base`]).
    pub fn from_env() -> Self {
        Self::new(api_base().clone())
    }

    /// Client bound to an explicit base.
    pub fn new(base: ApiBase) -> Self {
        Self::with_http(base, reqwest::Client::new())
    }

    /// Client reusing an existing `reqwest` connection pool.
    pub fn with_http(base: ApiBase, http: reqwest::Client) -> Self {
        Self { http, base }
    }

    /// The base every request is issued against.
    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    // ------------------------------------------------------------------
    // User state
    // ------------------------------------------------------------------

    /// `GET /users`
    pub async fn list_users(&self) -> Result<Vec<UserState>, SdkError> {
        let url = self.endpoint(&["users"])?;
        self.fetch_json(self.request(Method::GET, url)).await
    }

    /// `GET /users/{user_id}`
    pub async fn get_user(&self, user_id: &UserId) -> Result<UserState, SdkError> {
        let url = self.endpoint(&["users", user_id.as_str()])?;
        self.fetch_json(self.request(Method::GET, url)).await
    }

    /// `POST /users`
    pub async fn create_user(&self, body: &UserStateCreate) -> Result<UserState, SdkError> {
        let url = self.endpoint(&["users"])?;
        self.fetch_json(self.request(Method::POST, url).json(body)).await
    }

    /// `PUT /users/{user_id}`
    pub async fn update_user(
        &self,
        user_id: &UserId,
        body: &UserStateUpdate,
    ) -> Result<UserState, SdkError> {
        let url = self.endpoint(&["users", user_id.as_str()])?;
        self.fetch_json(self.request(Method::PUT, url).json(body)).await
    }

    /// `DELETE /users/{user_id}`
    pub async fn delete_user(&self, user_id: &UserId) -> Result<(), SdkError> {
        let url = self.endpoint(&["users", user_id.as_str()])?;
        self.execute(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // World state
    // ------------------------------------------------------------------

    /// `GET /world`
    pub async fn list_world(&self) -> Result<Vec<WorldState>, SdkError> {
        let url = self.endpoint(&["world"])?;
        self.fetch_json(self.request(Method::GET, url)).await
    }

    /// `GET /world/{key}`
    pub async fn get_world(&self, key: &WorldKey) -> Result<WorldState, SdkError> {
        let url = self.endpoint(&["world", key.as_str()])?;
        self.fetch_json(self.request(Method::GET, url)).await
    }

    /// `POST /world`
    pub async fn create_world(&self, body: &WorldStateCreate) -> Result<WorldState, SdkError> {
        let url = self.endpoint(&["world"])?;
        self.fetch_json(self.request(Method::POST, url).json(body)).await
    }

    /// `PUT /world/{key}`
    pub async fn update_world(
        &self,
        key: &WorldKey,
        body: &WorldStateUpdate,
    ) -> Result<WorldState, SdkError> {
        let url = self.endpoint(&["world", key.as_str()])?;
        self.fetch_json(self.request(Method::PUT, url).json(body)).await
    }

    /// `DELETE /world/{key}`
    pub async fn delete_world(&self, key: &WorldKey) -> Result<(), SdkError> {
        let url = self.endpoint(&["world", key.as_str()])?;
        self.execute(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Agent
    // ------------------------------------------------------------------

    /// `POST /agent/chat` — one conversational turn.
    pub async fn chat(&self, body: &AgentChatRequest) -> Result<AgentResponse, SdkError> {
        let url = self.endpoint(&["agent", "chat"])?;
        self.fetch_json(self.request(Method::POST, url).json(body)).await
    }

    /// `POST /agent/complete` — single prompt completion.
    pub async fn complete(&self, body: &AgentCompleteRequest) -> Result<AgentResponse, SdkError> {
        let url = self.endpoint(&["agent", "complete"])?;
        self.fetch_json(self.request(Method::POST, url).json(body)).await
    }

    /// `GET /agent/health`
    pub async fn health(&self) -> Result<AgentHealth, SdkError> {
        let url = self.endpoint(&["agent", "health"])?;
        self.fetch_json(self.request(Method::GET, url)).await
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    /// Absolute URL for the given path segments, each percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, SdkError> {
        let raw = self.base.absolute_url("");
        let mut url = Url::parse(&raw)
            .map_err(|e| SdkError::Config(format!("invalid base URL `{raw}`: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| SdkError::Config(format!("base URL `{raw}` cannot carry a path")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "backend request");
        self.http
            .request(method, url)
            .header(ACCEPT, "application/json")
    }

    /// Send the request and turn non-2xx statuses into [`SdkError::Status`].
    async fn execute(&self, request: RequestBuilder) -> Result<Response, SdkError> {
        let res = request.send().await.inspect_err(|e| {
            warn!(error = %e, "backend unreachable");
        })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%status, body = %body, "backend returned an error");
            return Err(SdkError::Status { status, body });
        }
        Ok(res)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, SdkError> {
        let res = self.execute(request).await?;
        let bytes = res.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
