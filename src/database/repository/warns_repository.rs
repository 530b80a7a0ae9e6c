//! Warns repository.
//!
//! One document per warning; the count for a (user, chat) pair is the
//! number of matching documents.

use std::future::Future;

use anyhow::Result;
use mongodb::Collection;
use mongodb::bson::doc;
use tracing::debug;

use crate::database::Database;
use crate::database::models::Warning;

/// Storage a warning flow needs.
///
/// Kept narrow so the threshold logic can run against an in-memory ledger.
pub trait WarnLedger: Send + Sync {
    /// Store one warning.
    fn add(&self, warning: Warning) -> impl Future<Output = Result<()>> + Send;

    /// Number of warnings for the pair.
    fn count(&self, user_id: u64, chat_id: i64) -> impl Future<Output = Result<u64>> + Send;

    /// Drop every warning for the pair, returning how many were removed.
    fn clear(&self, user_id: u64, chat_id: i64) -> impl Future<Output = Result<u64>> + Send;
}

/// Repository for warns data.
pub struct WarnsRepository {
    collection: Collection<Warning>,
}

impl WarnsRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("warns"),
        }
    }
}

impl WarnLedger for WarnsRepository {
    async fn add(&self, warning: Warning) -> Result<()> {
        self.collection.insert_one(&warning).await?;
        debug!(
            "Stored warning for user {} in chat {}",
            warning.user_id, warning.chat_id
        );
        Ok(())
    }

    async fn count(&self, user_id: u64, chat_id: i64) -> Result<u64> {
        let filter = doc! { "user_id": user_id as i64, "chat_id": chat_id };
        Ok(self.collection.count_documents(filter).await?)
    }

    async fn clear(&self, user_id: u64, chat_id: i64) -> Result<u64> {
        let filter = doc! { "user_id": user_id as i64, "chat_id": chat_id };
        let result = self.collection.delete_many(filter).await?;
        debug!(
            "Cleared {} warnings for user {} in chat {}",
            result.deleted_count, user_id, chat_id
        );
        Ok(result.deleted_count)
    }
}
