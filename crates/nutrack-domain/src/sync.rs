//! Offline-sync payload types.
//!
//! The client batches local changes since its last sync and posts them as a
//! [`SyncPayload`]; the server answers with the canonical state in a
//! [`SyncResponse`]. Conflict resolution is a server concern, not encoded here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::meal::Meal;
use crate::nutrition::FoodItem;

/// Created/updated/deleted buckets for one entity kind. Deletions travel as
/// bare ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet<T> {
    pub created: Vec<T>,
    pub updated: Vec<T>,
    pub deleted: Vec<String>,
}

impl<T> Default for ChangeSet<T> {
    fn default() -> Self {
        Self {
            created: vec![],
            updated: vec![],
            deleted: vec![],
        }
    }
}

/// Client-to-server sync batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPayload {
    pub meals: ChangeSet<Meal>,
    pub foods: ChangeSet<FoodItem>,
    pub last_sync_timestamp: DateTime<Utc>,
}

/// Server-to-client sync answer: full current state plus the server clock the
/// client should store as its next `last_sync_timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub meals: Vec<Meal>,
    pub foods: Vec<FoodItem>,
    pub server_timestamp: DateTime<Utc>,
}
