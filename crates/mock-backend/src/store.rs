//! In-memory record stores.
//!
//! One user-state record per `user_id` and one world-state record per
//! `key`. Listing is ordered by id / key so responses are deterministic.

use std::collections::BTreeMap;

use agentdesk_models::{
    UserState, UserStateCreate, UserStateUpdate, WorldState, WorldStateCreate, WorldStateUpdate,
};
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::BackendError;

/// Both record stores, shared by every handler.
#[derive(Debug, Default)]
pub struct Store {
    users: Mutex<BTreeMap<String, UserState>>,
    world: Mutex<BTreeMap<String, WorldState>>,
}

impl Store {
    // ------------------------------------------------------------------
    // User state
    // ------------------------------------------------------------------

    pub async fn list_users(&self) -> Vec<UserState> {
        self.users.lock().await.values().cloned().collect()
    }

    pub async fn get_user(&self, user_id: &str) -> Result<UserState, BackendError> {
        self.users
            .lock()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("user state `{user_id}`")))
    }

    pub async fn create_user(&self, body: UserStateCreate) -> Result<UserState, BackendError> {
        let mut users = self.users.lock().await;
        let user_id = body.user_id.to_string();
        if users.contains_key(&user_id) {
            return Err(BackendError::Conflict(format!("user state `{user_id}`")));
        }
        let now = Utc::now();
        let record = UserState {
            id: Uuid::new_v4().to_string(),
            user_id: body.user_id,
            data: body.data,
            created_at: now,
            updated_at: now,
        };
        users.insert(user_id, record.clone());
        Ok(record)
    }

    pub async fn update_user(
        &self,
        user_id: &str,
        body: UserStateUpdate,
    ) -> Result<UserState, BackendError> {
        let mut users = self.users.lock().await;
        let record = users
            .get_mut(user_id)
            .ok_or_else(|| BackendError::NotFound(format!("user state `{user_id}`")))?;
        if let Some(data) = body.data {
            record.data = data;
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<(), BackendError> {
        self.users
            .lock()
            .await
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| BackendError::NotFound(format!("user state `{user_id}`")))
    }

    /// Number of records stored for `user_id` (what the agent reports back).
    pub async fn user_record_count(&self, user_id: &str) -> usize {
        usize::from(self.users.lock().await.contains_key(user_id))
    }

    // ------------------------------------------------------------------
    // World state
    // ------------------------------------------------------------------

    pub async fn list_world(&self) -> Vec<WorldState> {
        self.world.lock().await.values().cloned().collect()
    }

    pub async fn get_world(&self, key: &str) -> Result<WorldState, BackendError> {
        self.world
            .lock()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("world state `{key}`")))
    }

    pub async fn create_world(&self, body: WorldStateCreate) -> Result<WorldState, BackendError> {
        let mut world = self.world.lock().await;
        let key = body.key.to_string();
        if world.contains_key(&key) {
            return Err(BackendError::Conflict(format!("world state `{key}`")));
        }
        let now = Utc::now();
        let record = WorldState {
            id: Uuid::new_v4().to_string(),
            key: body.key,
            data: body.data,
            created_at: now,
            updated_at: now,
        };
        world.insert(key, record.clone());
        Ok(record)
    }

    /// Update a world record, moving it when `body.key` renames it.
    pub async fn update_world(
        &self,
        key: &str,
        body: WorldStateUpdate,
    ) -> Result<WorldState, BackendError> {
        let mut world = self.world.lock().await;
        if !world.contains_key(key) {
            return Err(BackendError::NotFound(format!("world state `{key}`")));
        }
        if let Some(ref new_key) = body.key {
            if new_key.as_str() != key && world.contains_key(new_key.as_str()) {
                return Err(BackendError::Conflict(format!("world state `{new_key}`")));
            }
        }

        let Some(mut record) = world.remove(key) else {
            return Err(BackendError::NotFound(format!("world state `{key}`")));
        };
        if let Some(new_key) = body.key {
            record.key = new_key;
        }
        if let Some(data) = body.data {
            record.data = data;
        }
        record.updated_at = Utc::now();
        world.insert(record.key.to_string(), record.clone());
        Ok(record)
    }

    pub async fn delete_world(&self, key: &str) -> Result<(), BackendError> {
        self.world
            .lock()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BackendError::NotFound(format!("world state `{key}`")))
    }
}
