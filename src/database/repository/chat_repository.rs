//! Known chats repository.

use std::sync::Arc;

use anyhow::Result;
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::options::ReplaceOptions;
use tokio::spawn;
use tracing::{debug, warn};

use crate::database::Database;
use crate::database::models::ChatRecord;

pub struct ChatRepository {
    collection: Collection<ChatRecord>,
}

impl ChatRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("chats"),
        }
    }

    /// Record or refresh a chat.
    pub async fn upsert(&self, record: &ChatRecord) -> Result<()> {
        let filter = doc! { "chat_id": record.chat_id };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(filter, record)
            .with_options(options)
            .await?;

        debug!("Upserted chat {} ({})", record.chat_id, record.chat_title);
        Ok(())
    }

    /// Record a chat without blocking the caller.
    pub fn upsert_background(self: Arc<Self>, record: ChatRecord) {
        spawn(async move {
            if let Err(e) = self.upsert(&record).await {
                warn!("Failed to record chat {}: {}", record.chat_id, e);
            }
        });
    }

    pub async fn all(&self) -> Result<Vec<ChatRecord>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}
