//! Message dispatcher setup.
//!
//! Builds the dispatcher with all command handlers and event handlers.

use std::sync::Arc;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::UserId;

use super::error_handler::OwnerErrorMirror;
use crate::config::Config;
use crate::database::{
    AfkRepository, ChatRecord, ChatRepository, Database, FilterRepository, GbanRepository,
    NoteRepository, SettingsRepository, UserRepo, WarnsRepository,
};
use crate::events::{self, SpamGuard};
use crate::permissions::Permissions;
use crate::plugins::{self, broadcast::PendingConfirmations};

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Live admin checks and the owner id.
    pub permissions: Permissions,

    pub users: Arc<UserRepo>,
    pub chats: Arc<ChatRepository>,
    pub settings: Arc<SettingsRepository>,
    pub warns: Arc<WarnsRepository>,
    pub notes: Arc<NoteRepository>,
    pub filters: Arc<FilterRepository>,
    pub gbans: Arc<GbanRepository>,
    pub afk: Arc<AfkRepository>,

    /// Broadcast/post requests waiting for the owner's confirmation.
    pub pending: PendingConfirmations,

    pub bot_id: UserId,

    /// Bot username (without @) for deep link construction.
    pub bot_username: String,
}

impl AppState {
    pub fn new(
        bot: ThrottledBot,
        db: &Database,
        config: Arc<Config>,
        bot_id: UserId,
        bot_username: String,
    ) -> Self {
        Self {
            permissions: Permissions::new(bot, config.owner_id),
            users: Arc::new(UserRepo::new(db)),
            chats: Arc::new(ChatRepository::new(db)),
            settings: Arc::new(SettingsRepository::new(db)),
            warns: Arc::new(WarnsRepository::new(db)),
            notes: Arc::new(NoteRepository::new(db)),
            filters: Arc::new(FilterRepository::new(db)),
            gbans: Arc::new(GbanRepository::new(db)),
            afk: Arc::new(AfkRepository::new(db)),
            pending: PendingConfirmations::new(),
            config,
            bot_id,
            bot_username,
        }
    }

    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.permissions.is_bot_owner(user_id)
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(
    bot: ThrottledBot,
    db: &Database,
    config: Arc<Config>,
    bot_id: UserId,
    bot_username: String,
) -> Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey> {
    let owner = ChatId(config.owner_id as i64);
    let state = AppState::new(bot.clone(), db, config, bot_id, bot_username);
    let spam_guard = SpamGuard::new();

    Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![state, spam_guard])
        .error_handler(Arc::new(OwnerErrorMirror::new(bot, owner)))
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    use teloxide::dispatching::UpdateFilterExt;

    // Tracking first, then commands, then passive group events
    let message_handler = Update::filter_message()
        .inspect_async(track_activity)
        .branch(plugins::command_handler())
        .branch(events::message_event_handler());

    // Joins and leaves
    let member_handler = Update::filter_chat_member().branch(events::member_handler());

    let callback_handler = plugins::callback_handler();

    dptree::entry()
        .branch(message_handler)
        .branch(member_handler)
        .branch(callback_handler)
}

/// Record the sender and, in groups, the chat.
async fn track_activity(msg: Message, state: AppState) {
    if let Some(user) = msg.from.as_ref() {
        state.users.clone().upsert_background(user.clone());
    }

    if msg.chat.is_group() || msg.chat.is_supergroup() {
        let record = ChatRecord::new(
            msg.chat.id.0,
            msg.chat.title().unwrap_or_default(),
            msg.chat.username().map(str::to_string),
        );
        state.chats.clone().upsert_background(record);
    }
}
