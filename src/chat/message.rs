//! Message history types and the publish input.

use serde::{Deserialize, Serialize};

/// A committed chat message.
///
/// Immutable once created; `id` equals its position in the append-only
/// history. The serde renames define the gateway wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: usize,
    pub user_id: usize,
    pub room_id: usize,
    pub user_name: String,
    pub room_name: String,
    pub text: String,
    /// Fixed-width, lexicographically sortable wall-clock stamp
    /// (`YYYYMMDDHHMMSS`).
    pub timestamp: String,
}

/// What a publisher hands to the engine: target room and raw text.
#[derive(Debug, Clone)]
pub struct PublishInput {
    pub room: usize,
    pub text: String,
}
