//! Filter repository.

use anyhow::Result;
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::{Document, doc};
use mongodb::options::ReplaceOptions;
use tracing::debug;

use crate::database::Database;
use crate::database::models::{Filter, normalize_key};

/// Lookup document for one keyword of one chat.
fn filter_key(chat_id: i64, keyword: &str) -> Document {
    doc! { "chat_id": chat_id, "keyword": normalize_key(keyword) }
}

pub struct FilterRepository {
    collection: Collection<Filter>,
}

impl FilterRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("filters"),
        }
    }

    /// Insert or overwrite the filter for (chat, keyword).
    pub async fn save(&self, filter: &Filter) -> Result<()> {
        let query = filter_key(filter.chat_id, &filter.keyword);
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(query, filter)
            .with_options(options)
            .await?;

        debug!("Saved filter '{}' in chat {}", filter.keyword, filter.chat_id);
        Ok(())
    }

    /// Every filter of a chat, in the order the store returns them.
    pub async fn list(&self, chat_id: i64) -> Result<Vec<Filter>> {
        let cursor = self.collection.find(doc! { "chat_id": chat_id }).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Delete a filter. Returns whether one existed.
    pub async fn delete(&self, chat_id: i64, keyword: &str) -> Result<bool> {
        let query = filter_key(chat_id, keyword);
        let result = self.collection.delete_one(query).await?;
        debug!(
            "Deleted filter '{}' in chat {}: {}",
            keyword,
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
    fn test_filter_key_normalizes_keyword() {
        let chat_id: i64 = -100;
        assert_eq!(
            filter_key(chat_id, "Hello "),
            doc! { "chat_id": chat_id, "keyword": "hello" }
        );
    }

    #[test]
    fn test_filter_key_is_scoped_per_chat() {
        assert_ne!(filter_key(-100, "hi"), filter_key(-200, "hi"));
    }
}
