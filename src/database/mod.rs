//! Persistence façade over MongoDB.
//!
//! Collections: chats, users, settings, warns, notes, filters, gbans, afk.

mod models;
mod mongo;
mod repository;
mod users;

pub use models::*;
pub use mongo::{CleanupReport, Database, RETENTION_SECS, retention_cutoff};
pub use repository::{
    AfkRepository, ChatRepository, FilterRepository, GbanRepository, NoteRepository,
    SettingsRepository, WarnLedger, WarnsRepository,
};
pub use users::UserRepo;
