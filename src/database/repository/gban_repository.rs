//! Global ban repository.

use anyhow::Result;
use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::options::ReplaceOptions;
use tracing::{debug, info};

use crate::database::Database;
use crate::database::models::GlobalBan;

pub struct GbanRepository {
    collection: Collection<GlobalBan>,
}

impl GbanRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("gbans"),
        }
    }

    pub async fn add(&self, ban: &GlobalBan) -> Result<()> {
        let filter = doc! { "user_id": ban.user_id as i64 };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(filter, ban)
            .with_options(options)
            .await?;

        info!("User {} globally banned by {}", ban.user_id, ban.banned_by);
        Ok(())
    }

    /// Remove a global ban. Returns whether one existed.
    pub async fn remove(&self, user_id: u64) -> Result<bool> {
        let result = self
            .collection
            .delete_one(doc! { "user_id": user_id as i64 })
            .await?;
        debug!("Removed gban for {}: {}", user_id, result.deleted_count > 0);
        Ok(result.deleted_count > 0)
    }

    pub async fn get(&self, user_id: u64) -> Result<Option<GlobalBan>> {
        Ok(self
            .collection
            .find_one(doc! { "user_id": user_id as i64 })
            .await?)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}
