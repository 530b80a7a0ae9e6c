//! Note repository.
//!
//! Notes are keyed by (chat_id, name); names are stored lowercased.

use anyhow::Result;
use futures::StreamExt;
use mongodb::Collection;
use mongodb::bson::{Document, doc};
use mongodb::options::{FindOptions, ReplaceOptions};
use tracing::debug;

use crate::database::Database;
use crate::database::models::{Note, normalize_key};

/// Lookup document for one note of one chat.
fn note_key(chat_id: i64, name: &str) -> Document {
    doc! { "chat_id": chat_id, "name": normalize_key(name) }
}

pub struct NoteRepository {
    collection: Collection<Note>,
}

impl NoteRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("notes"),
        }
    }

    /// Insert or overwrite a note.
    pub async fn save(&self, note: &Note) -> Result<()> {
        let filter = note_key(note.chat_id, &note.name);
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(filter, note)
            .with_options(options)
            .await?;

        debug!("Saved note '{}' in chat {}", note.name, note.chat_id);
        Ok(())
    }

    pub async fn get(&self, chat_id: i64, name: &str) -> Result<Option<Note>> {
        Ok(self.collection.find_one(note_key(chat_id, name)).await?)
    }

    /// All note names in a chat, sorted.
    pub async fn names(&self, chat_id: i64) -> Result<Vec<String>> {
        let raw: Collection<Document> = self.collection.clone_with_type();
        let options = FindOptions::builder()
            .projection(doc! { "name": 1, "_id": 0 })
            .sort(doc! { "name": 1 })
            .build();

        let mut cursor = raw
            .find(doc! { "chat_id": chat_id })
            .with_options(options)
            .await?;

        let mut names = Vec::new();
        while let Some(result) = cursor.next().await {
            if let Ok(name) = result?.get_str("name") {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }

    /// Delete a note. Returns whether one existed.
    pub async fn delete(&self, chat_id: i64, name: &str) -> Result<bool> {
        let result = self.collection.delete_one(note_key(chat_id, name)).await?;
        debug!(
            "Deleted note '{}' in chat {}: {}",
            name,
            chat_id,
            result.deleted_count > 0
        );
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_key_is_case_insensitive() {
        assert_eq!(note_key(-100, "Foo"), note_key(-100, "foo"));
        let chat_id: i64 = -100;
        assert_eq!(note_key(chat_id, " RULES "), doc! { "chat_id": chat_id, "name": "rules" });
    }

    #[test]
    fn test_note_key_is_scoped_per_chat() {
        assert_ne!(note_key(-100, "foo"), note_key(-200, "foo"));
        assert_eq!(note_key(-200, "foo").get_i64("chat_id").unwrap(), -200);
    }
}
