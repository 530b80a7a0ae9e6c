//! MongoDB database wrapper.

use mongodb::bson::{Document, doc};
use mongodb::{Client, Collection, options::ClientOptions};
use tracing::info;

/// How long warns, notes and filters are kept.
pub const RETENTION_SECS: i64 = 30 * 24 * 60 * 60;

/// Collections subject to age-based cleanup.
const RETAINED_COLLECTIONS: [&str; 3] = ["warns", "notes", "filters"];

/// Documents with a `timestamp` strictly below this are purged.
pub fn retention_cutoff(now: i64) -> i64 {
    now - RETENTION_SECS
}

/// Outcome of one cleanup pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub warns: u64,
    pub notes: u64,
    pub filters: u64,
}

impl CleanupReport {
    pub fn total(&self) -> u64 {
        self.warns + self.notes + self.filters
    }
}

/// Database wrapper for MongoDB operations.
#[derive(Debug, Clone)]
pub struct Database {
    db: mongodb::Database,
}

impl Database {
    /// Connect to MongoDB with the given URI and database name.
    ///
    /// # Errors
    /// Returns error if connection fails.
    pub async fn connect(uri: &str, db_name: &str) -> anyhow::Result<Self> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;

        // Ping the database to verify connection
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("Successfully connected to MongoDB");

        Ok(Self {
            db: client.database(db_name),
        })
    }

    /// Get a typed collection from the database.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Delete warns, notes and filters older than the retention window.
    pub async fn cleanup_old_data(&self, now: i64) -> anyhow::Result<CleanupReport> {
        let filter = doc! { "timestamp": { "$lt": retention_cutoff(now) } };
        let mut report = CleanupReport::default();

        for name in RETAINED_COLLECTIONS {
            let collection: Collection<Document> = self.collection(name);
            let deleted = collection.delete_many(filter.clone()).await?.deleted_count;
            match name {
                "warns" => report.warns = deleted,
                "notes" => report.notes = deleted,
                _ => report.filters = deleted,
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retention_cutoff() {
        let now = 1_700_000_000;
        let cutoff = retention_cutoff(now);
        assert_eq!(now - cutoff, 2_592_000);

        // "$lt" semantics: exactly 30 days old survives, one second older does not.
        let exactly_thirty_days = now - RETENTION_SECS;
        assert!(exactly_thirty_days >= cutoff);
        assert!(exactly_thirty_days - 1 < cutoff);
        assert!(now - 86_400 >= cutoff);
    }

    #[test]
    fn test_report_total() {
        let report = CleanupReport {
            warns: 2,
            notes: 1,
            filters: 4,
        };
        assert_eq!(report.total(), 7);
    }
}
