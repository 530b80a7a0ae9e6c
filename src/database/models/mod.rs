//! Database models.

pub mod afk;
pub mod chat;
pub mod content;
pub mod filter;
pub mod gban;
pub mod note;
pub mod settings;
pub mod user;
pub mod warn;

pub use afk::{AfkStatus, afk_cutoff};
pub use chat::ChatRecord;
pub use content::{MsgType, StoredContent, normalize_key};
pub use filter::{Filter, first_match};
pub use gban::GlobalBan;
pub use note::Note;
pub use settings::ChatSettings;
pub use user::UserRecord;
pub use warn::{WARN_LIMIT, Warning};
