//! Warning data models.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Number of warnings that triggers an automatic ban.
pub const WARN_LIMIT: u64 = 3;

/// One warning issued to a user in a chat.
///
/// A (user, chat) pair accumulates one document per warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: u64,
    pub chat_id: i64,
    pub reason: String,
    /// Admin who issued the warning
    pub warned_by: u64,
    /// Unix timestamp when warning was issued
    pub timestamp: i64,
}

impl Warning {
    pub fn new(user_id: u64, chat_id: i64, reason: impl Into<String>, warned_by: u64) -> Self {
        Self {
            id: None,
            user_id,
            chat_id,
            reason: reason.into(),
            warned_by,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}
