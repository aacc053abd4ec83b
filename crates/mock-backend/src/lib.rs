//! Mock AgentDesk backend — an in-memory stand-in for the REST service the
//! client talks to.
//!
//! Routes mirror the production surface: `/users`, `/world` and `/agent/*`.
//! [`app`] serves them both at the root and under the `/api` proxy prefix so
//! the same process can be targeted directly or through a dev proxy.

mod error;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use agentdesk_models::{
    AgentChatRequest, AgentCompleteRequest, AgentHealth, AgentResponse, SessionId, UserId,
    UserState, UserStateCreate, UserStateUpdate, WorldState, WorldStateCreate, WorldStateUpdate,
};
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tracing::info;
use uuid::Uuid;

pub use crate::error::BackendError;
use crate::store::Store;

/// Prefix under which [`app`] additionally mounts every route.
pub const PROXY_PREFIX: &str = "/api";

type SharedStore = Arc<Store>;

// ---------------------------------------------------------------------------
// Routers
// ---------------------------------------------------------------------------

/// Routes at the root **and** under [`PROXY_PREFIX`], sharing one store.
pub fn app() -> Router {
    let store = SharedStore::default();
    Router::new()
        .merge(routes().with_state(store.clone()))
        .nest(PROXY_PREFIX, routes().with_state(store))
}

fn routes() -> Router<SharedStore> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/world", get(list_world).post(create_world))
        .route(
            "/world/{key}",
            get(get_world).put(update_world).delete(delete_world),
        )
        .route("/agent/chat", post(chat))
        .route("/agent/complete", post(complete))
        .route("/agent/health", get(health))
}

/// Serve [`app`] on an OS-assigned localhost port in a background task.
///
/// Returns the bound address. Used by tests across the workspace.
pub async fn spawn_ephemeral() -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app()).await {
            tracing::error!(error = %e, "mock backend stopped");
        }
    });
    Ok(addr)
}

// ---------------------------------------------------------------------------
// User state handlers
// ---------------------------------------------------------------------------

async fn list_users(State(store): State<SharedStore>) -> Json<Vec<UserState>> {
    Json(store.list_users().await)
}

async fn get_user(
    State(store): State<SharedStore>,
    Path(user_id): Path<String>,
) -> Result<Json<UserState>, BackendError> {
    store.get_user(&user_id).await.map(Json)
}

async fn create_user(
    State(store): State<SharedStore>,
    Json(body): Json<UserStateCreate>,
) -> Result<(StatusCode, Json<UserState>), BackendError> {
    let record = store.create_user(body).await?;
    info!(user_id = %record.user_id, id = %record.id, "user state created");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_user(
    State(store): State<SharedStore>,
    Path(user_id): Path<String>,
    Json(body): Json<UserStateUpdate>,
) -> Result<Json<UserState>, BackendError> {
    store.update_user(&user_id, body).await.map(Json)
}

async fn delete_user(
    State(store): State<SharedStore>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, BackendError> {
    store.delete_user(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// World state handlers
// ---------------------------------------------------------------------------

async fn list_world(State(store): State<SharedStore>) -> Json<Vec<WorldState>> {
    Json(store.list_world().await)
}

async fn get_world(
    State(store): State<SharedStore>,
    Path(key): Path<String>,
) -> Result<Json<WorldState>, BackendError> {
    store.get_world(&key).await.map(Json)
}

async fn create_world(
    State(store): State<SharedStore>,
    Json(body): Json<WorldStateCreate>,
) -> Result<(StatusCode, Json<WorldState>), BackendError> {
    let record = store.create_world(body).await?;
    info!(key = %record.key, id = %record.id, "world state created");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_world(
    State(store): State<SharedStore>,
    Path(key): Path<String>,
    Json(body): Json<WorldStateUpdate>,
) -> Result<Json<WorldState>, BackendError> {
    store.update_world(&key, body).await.map(Json)
}

async fn delete_world(
    State(store): State<SharedStore>,
    Path(key): Path<String>,
) -> Result<StatusCode, BackendError> {
    store.delete_world(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Agent handlers
// ---------------------------------------------------------------------------

/// `POST /agent/chat` — echo agent.
///
/// Replies `Agent received: <message>`, noting how many user-state records
/// exist when a user id is supplied. A blank session id gets a fresh UUID.
async fn chat(
    State(store): State<SharedStore>,
    Json(req): Json<AgentChatRequest>,
) -> Json<AgentResponse> {
    let session_id = session_or_new(req.session_id);
    let mut response = format!("Agent received: {}", req.message);
    if let Some(user_id) = req.user_id {
        let found = store.user_record_count(user_id.as_str()).await;
        if found > 0 {
            response.push_str(&format!(" (Found {found} user states)"));
        }
    }
    info!(session_id = %session_id, "chat turn answered");
    Json(AgentResponse {
        response,
        session_id,
    })
}

/// `POST /agent/complete` — single-shot echo of the prompt.
async fn complete(Json(req): Json<AgentCompleteRequest>) -> Json<AgentResponse> {
    let session_id = session_or_new(req.session_id);
    let user = req.user_id.unwrap_or_else(|| UserId::new("anonymous"));
    Json(AgentResponse {
        response: format!("Agent completed for {user}: {}", req.prompt),
        session_id,
    })
}

async fn health() -> Json<AgentHealth> {
    Json(AgentHealth {
        status: "healthy".into(),
        service: "agent".into(),
    })
}

fn session_or_new(session_id: SessionId) -> SessionId {
    if session_id.is_blank() {
        SessionId::new(&Uuid::new_v4().to_string())
    } else {
        session_id
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    async fn base_url() -> String {
        let addr = spawn_ephemeral().await.expect("bind mock backend");
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn create_then_get_user_over_http() {
        let base = base_url().await;
        let http = reqwest::Client::new();

        let res = http
            .post(format!("{base}/users"))
            .json(&json!({ "user_id": "u1", "data": { "created_at": "2024-05-01T12:30:00.000Z" } }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::CREATED);
        let created: Value = res.json().await.unwrap();
        assert_eq!(created["user_id"], "u1");
        assert!(created["id"].as_str().is_some_and(|id| !id.is_empty()));

        let fetched: Value = http
            .get(format!("{base}/users/u1"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(fetched["id"], created["id"]);
    }

    #[tokio::test]
    async fn proxy_prefix_shares_the_store() {
        let base = base_url().await;
        let http = reqwest::Client::new();

        http.post(format!("{base}/api/world"))
            .json(&json!({ "key": "example-key", "data": {} }))
            .send()
            .await
            .unwrap();

        let listed: Vec<Value> = http
            .get(format!("{base}/world"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["key"], "example-key");
    }

    #[tokio::test]
    async fn missing_record_is_404_with_detail() {
        let base = base_url().await;
        let res = reqwest::get(format!("{base}/world/nope")).await.unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["detail"], "world state `nope` not found");
    }

    #[tokio::test]
    async fn chat_echoes_and_counts_user_states() {
        let base = base_url().await;
        let http = reqwest::Client::new();

        let reply: Value = http
            .post(format!("{base}/agent/chat"))
            .json(&json!({ "session_id": "s1", "message": "hi", "user_id": "u1" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(reply, json!({ "response": "Agent received: hi", "session_id": "s1" }));

        http.post(format!("{base}/users"))
            .json(&json!({ "user_id": "u1", "data": {} }))
            .send()
            .await
            .unwrap();

        let reply: Value = http
            .post(format!("{base}/agent/chat"))
            .json(&json!({ "session_id": "s1", "message": "hi", "user_id": "u1" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(reply["response"], "Agent received: hi (Found 1 user states)");
    }

    #[tokio::test]
    async fn blank_session_gets_generated_id() {
        let base = base_url().await;
        let reply: Value = reqwest::Client::new()
            .post(format!("{base}/agent/chat"))
            .json(&json!({ "session_id": "", "message": "hi" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let session = reply["session_id"].as_str().unwrap();
        assert!(Uuid::parse_str(session).is_ok());
    }
}
