//! Repository module - one repository per collection.

mod afk_repository;
mod chat_repository;
mod filter_repository;
mod gban_repository;
mod note_repository;
mod settings_repository;
mod warns_repository;

pub use afk_repository::AfkRepository;
pub use chat_repository::ChatRepository;
pub use filter_repository::FilterRepository;
pub use gban_repository::GbanRepository;
pub use note_repository::NoteRepository;
pub use settings_repository::SettingsRepository;
pub use warns_repository::{WarnLedger, WarnsRepository};
