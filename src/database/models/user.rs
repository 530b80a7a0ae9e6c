//! User data model.

use serde::{Deserialize, Serialize};
use teloxide::types::User;

/// A user the bot has seen.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecord {
    /// Telegram user ID.
    pub user_id: u64,
    /// Username without @, lowercase for matching.
    #[serde(default)]
    pub username: Option<String>,
    /// Original username (preserving case for display).
    #[serde(default)]
    pub username_display: Option<String>,
    pub first_name: String,
    /// Unix timestamp of last update.
    pub timestamp: i64,
}

impl UserRecord {
    pub fn from_telegram(user: &User) -> Self {
        Self {
            user_id: user.id.0,
            username: user.username.as_ref().map(|u| u.to_lowercase()),
            username_display: user.username.clone(),
            first_name: user.first_name.clone(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}
