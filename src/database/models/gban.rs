//! Global ban entries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalBan {
    pub user_id: u64,
    pub reason: String,
    pub banned_by: u64,
    pub timestamp: i64,
}

impl GlobalBan {
    pub fn new(user_id: u64, reason: impl Into<String>, banned_by: u64) -> Self {
        Self {
            user_id,
            reason: reason.into(),
            banned_by,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}
