//! Per-chat text settings.

use serde::{Deserialize, Serialize};

/// Welcome, goodbye and rules texts for one chat.
///
/// Fields are written independently, so any of them may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatSettings {
    pub chat_id: i64,
    #[serde(default)]
    pub welcome: Option<String>,
    #[serde(default)]
    pub goodbye: Option<String>,
    #[serde(default)]
    pub rules: Option<String>,
    #[serde(default)]
    pub timestamp: i64,
}
