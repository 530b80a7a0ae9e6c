//! Chat settings repository.
//!
//! Welcome, goodbye and rules are set independently with `$set`, so
//! writing one never clobbers the others.

use anyhow::Result;
use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::options::UpdateOptions;
use tracing::debug;

use crate::database::Database;
use crate::database::models::ChatSettings;

pub struct SettingsRepository {
    collection: Collection<ChatSettings>,
}

impl SettingsRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("settings"),
        }
    }

    pub async fn get(&self, chat_id: i64) -> Result<Option<ChatSettings>> {
        Ok(self.collection.find_one(doc! { "chat_id": chat_id }).await?)
    }

    async fn set_field(&self, chat_id: i64, field: &str, value: &str) -> Result<()> {
        let filter = doc! { "chat_id": chat_id };
        let update = doc! {
            "$set": { field: value, "timestamp": chrono::Utc::now().timestamp() }
        };
        let options = UpdateOptions::builder().upsert(true).build();

        self.collection
            .update_one(filter, update)
            .with_options(options)
            .await?;

        debug!("Updated {} for chat {}", field, chat_id);
        Ok(())
    }

    pub async fn set_welcome(&self, chat_id: i64, text: &str) -> Result<()> {
        self.set_field(chat_id, "welcome", text).await
    }

    pub async fn set_goodbye(&self, chat_id: i64, text: &str) -> Result<()> {
        self.set_field(chat_id, "goodbye", text).await
    }

    pub async fn set_rules(&self, chat_id: i64, text: &str) -> Result<()> {
        self.set_field(chat_id, "rules", text).await
    }

    /// Welcome template, or `default` when the chat has none.
    pub async fn welcome_or(&self, chat_id: i64, default: &str) -> Result<String> {
        Ok(self
            .get(chat_id)
            .await?
            .and_then(|s| s.welcome)
            .unwrap_or_else(|| default.to_string()))
    }

    /// Goodbye template, or `default` when the chat has none.
    pub async fn goodbye_or(&self, chat_id: i64, default: &str) -> Result<String> {
        Ok(self
            .get(chat_id)
            .await?
            .and_then(|s| s.goodbye)
            .unwrap_or_else(|| default.to_string()))
    }

    pub async fn rules(&self, chat_id: i64) -> Result<Option<String>> {
        Ok(self.get(chat_id).await?.and_then(|s| s.rules))
    }
}
