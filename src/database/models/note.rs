//! Note model.

use serde::{Deserialize, Serialize};

use super::{StoredContent, normalize_key};

/// A named message saved in one chat (stored in `notes` collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub chat_id: i64,
    /// Lowercased name, unique per chat.
    pub name: String,
    #[serde(flatten)]
    pub body: StoredContent,
    pub timestamp: i64,
}

impl Note {
    pub fn new(chat_id: i64, name: impl Into<String>, body: StoredContent) -> Self {
        Self {
            chat_id,
            name: normalize_key(&name.into()),
            body,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_case_insensitive() {
        let note = Note::new(-100, "Foo", StoredContent::text("bar"));
        assert_eq!(note.name, "foo");
        assert_eq!(note.name, normalize_key("FOO"));
    }
}
