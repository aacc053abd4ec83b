//! User-state and world-state records.
//!
//! Both record kinds are owned by the backend. The client builds create and
//! update payloads; everything else (`id`, timestamps) is server-assigned
//! and read back as-is.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ModelError;
use crate::identity::{UserId, WorldKey};

/// Opaque JSON object attached to every record.
pub type RecordData = Map<String, Value>;

/// Key of the example world-state record created from the UI.
pub const EXAMPLE_WORLD_KEY: &str = "example-key";

/// The example payload the UI attaches to freshly created records:
/// `{ "created_at": "<ISO-8601 timestamp>" }`.
///
/// The timestamp uses millisecond precision and a `Z` suffix.
pub fn creation_stamp(now: DateTime<Utc>) -> RecordData {
    let mut data = RecordData::new();
    data.insert(
        "created_at".to_string(),
        Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    data
}

/// Parse user-supplied JSON into a [`RecordData`] object.
///
/// ```
/// use agentdesk_models::parse_record_data;
///
/// let data = parse_record_data(r#"{"level": 3}"#).unwrap();
/// assert_eq!(data["level"], 3);
/// assert!(parse_record_data("[1, 2]").is_err());
/// ```
pub fn parse_record_data(raw: &str) -> Result<RecordData, ModelError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ModelError::InvalidRecordData {
            value: raw.to_string(),
            reason: "must be a JSON object".into(),
        }),
        Err(e) => Err(ModelError::InvalidRecordData {
            value: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// User state
// ---------------------------------------------------------------------------

/// A stored user-state record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserState {
    /// Server-assigned identifier.
    pub id: String,
    /// Owner of the record.
    pub user_id: UserId,
    /// Opaque payload.
    pub data: RecordData,
    /// Creation time (server clock).
    pub created_at: DateTime<Utc>,
    /// Last update time (server clock).
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /users`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserStateCreate {
    /// Owner of the new record.
    pub user_id: UserId,
    /// Initial payload.
    pub data: RecordData,
}

impl UserStateCreate {
    /// The payload the UI sends: the user id plus a [`creation_stamp`].
    pub fn stamped(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            data: creation_stamp(now),
        }
    }
}

/// Body of `PUT /users/{user_id}`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UserStateUpdate {
    /// Replacement payload; omitted fields are left untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RecordData>,
}

// ---------------------------------------------------------------------------
// World state
// ---------------------------------------------------------------------------

/// A stored world-state record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorldState {
    /// Server-assigned identifier.
    pub id: String,
    /// Lookup key.
    pub key: WorldKey,
    /// Opaque payload.
    pub data: RecordData,
    /// Creation time (server clock).
    pub created_at: DateTime<Utc>,
    /// Last update time (server clock).
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /world`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorldStateCreate {
    /// Lookup key of the new record.
    pub key: WorldKey,
    /// Initial payload.
    pub data: RecordData,
}

impl WorldStateCreate {
    /// The payload the UI sends: [`EXAMPLE_WORLD_KEY`] plus a [`creation_stamp`].
    pub fn example(now: DateTime<Utc>) -> Self {
        Self {
            key: WorldKey::new(EXAMPLE_WORLD_KEY),
            data: creation_stamp(now),
        }
    }
}

/// Body of `PUT /world/{key}`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct WorldStateUpdate {
    /// New key, when renaming the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<WorldKey>,
    /// Replacement payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RecordData>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
