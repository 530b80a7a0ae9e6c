//! Known chats.

use serde::{Deserialize, Serialize};

/// A group the bot has seen traffic in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRecord {
    pub chat_id: i64,
    pub chat_title: String,
    /// Public username, when the group has one.
    #[serde(default)]
    pub username: Option<String>,
    /// No public username, so no t.me link can be built.
    #[serde(default = "default_private")]
    pub is_private: bool,
    /// Unix timestamp of last activity.
    pub timestamp: i64,
}

fn default_private() -> bool {
    true
}

impl ChatRecord {
    pub fn new(chat_id: i64, chat_title: impl Into<String>, username: Option<String>) -> Self {
        Self {
            chat_id,
            chat_title: chat_title.into(),
            is_private: username.is_none(),
            username,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// `t.me` link for public groups.
    pub fn public_link(&self) -> Option<String> {
        self.username.as_ref().map(|name| format!("https://t.me/{}", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privacy_follows_username() {
        let public = ChatRecord::new(-100, "Rustaceans", Some("rustaceans".into()));
        assert!(!public.is_private);
        assert_eq!(public.public_link().as_deref(), Some("https://t.me/rustaceans"));

        let hidden = ChatRecord::new(-101, "Family", None);
        assert!(hidden.is_private);
        assert!(hidden.public_link().is_none());
    }
}
