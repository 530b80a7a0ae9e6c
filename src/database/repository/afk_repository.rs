//! AFK status repository.

use anyhow::Result;
use mongodb::Collection;
use mongodb::bson::doc;
use mongodb::options::ReplaceOptions;
use tracing::debug;

use crate::database::Database;
use crate::database::models::AfkStatus;

pub struct AfkRepository {
    collection: Collection<AfkStatus>,
}

impl AfkRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("afk"),
        }
    }

    pub async fn set(&self, status: &AfkStatus) -> Result<()> {
        let filter = doc! { "user_id": status.user_id as i64 };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(filter, status)
            .with_options(options)
            .await?;

        debug!("User {} is now AFK", status.user_id);
        Ok(())
    }

    pub async fn get(&self, user_id: u64) -> Result<Option<AfkStatus>> {
        Ok(self
            .collection
            .find_one(doc! { "user_id": user_id as i64 })
            .await?)
    }

    /// Clear a user's AFK status, handing back what was stored.
    pub async fn take(&self, user_id: u64) -> Result<Option<AfkStatus>> {
        Ok(self
            .collection
            .find_one_and_delete(doc! { "user_id": user_id as i64 })
            .await?)
    }

    /// Delete every status that started at or before `cutoff`.
    pub async fn sweep(&self, cutoff: i64) -> Result<u64> {
        let result = self
            .collection
            .delete_many(doc! { "since": { "$lte": cutoff } })
            .await?;
        Ok(result.deleted_count)
    }
}
