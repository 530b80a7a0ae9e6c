//! User repository.
//!
//! Records everyone the bot sees so usernames can be resolved and
//! broadcasts can reach users in DM.

use std::sync::Arc;

use anyhow::Result;
use futures::StreamExt;
use mongodb::Collection;
use mongodb::bson::{Document, doc};
use mongodb::options::{FindOptions, ReplaceOptions};
use teloxide::types::User;
use tokio::spawn;
use tracing::{debug, warn};

use super::Database;
use super::models::UserRecord;

/// Repository for user data.
pub struct UserRepo {
    collection: Collection<UserRecord>,
}

impl UserRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }

    /// Upsert user data (update or insert).
    pub async fn upsert(&self, user: &User) -> Result<()> {
        let record = UserRecord::from_telegram(user);
        let filter = doc! { "user_id": record.user_id as i64 };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(filter, &record)
            .with_options(options)
            .await?;

        debug!("Upserted user {} (@{:?})", record.user_id, record.username);
        Ok(())
    }

    /// Upsert user in background (non-blocking).
    pub fn upsert_background(self: Arc<Self>, user: User) {
        spawn(async move {
            if let Err(e) = self.upsert(&user).await {
                warn!("Failed to upsert user {}: {}", user.id, e);
            }
        });
    }

    pub async fn get_by_id(&self, user_id: u64) -> Result<Option<UserRecord>> {
        Ok(self
            .collection
            .find_one(doc! { "user_id": user_id as i64 })
            .await?)
    }

    /// Get user by username (case-insensitive, leading @ ignored).
    pub async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let username = username.trim_start_matches('@').to_lowercase();
        Ok(self
            .collection
            .find_one(doc! { "username": username })
            .await?)
    }

    /// Ids of every known user.
    pub async fn all_ids(&self) -> Result<Vec<u64>> {
        let raw: Collection<Document> = self.collection.clone_with_type();
        let options = FindOptions::builder()
            .projection(doc! { "user_id": 1, "_id": 0 })
            .build();

        let mut cursor = raw.find(doc! {}).with_options(options).await?;
        let mut ids = Vec::new();

        while let Some(result) = cursor.next().await {
            if let Ok(id) = result?.get_i64("user_id") {
                ids.push(id as u64);
            }
        }

        Ok(ids)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}
