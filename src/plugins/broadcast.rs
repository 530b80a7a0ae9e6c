//! /broadcast and /post with a confirm step.
//!
//! The command only stages the request; the fan-out runs when the owner
//! presses the confirmation button. Each request gets a fresh token that is
//! consumed on first use, so a stale or repeated press does nothing.

use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId};
use tracing::info;
use uuid::Uuid;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::cache::{CacheConfig, TypedCache};
use crate::database::{MsgType, StoredContent};
use crate::utils::{FanoutReport, fanout, reply_text, reply_with_keyboard, send_stored_to};

/// How long a confirmation button stays valid.
const CONFIRM_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanoutKind {
    /// Every known user and chat, copied verbatim.
    Broadcast,
    /// Every known chat, re-sent by media type.
    Post,
}

impl FanoutKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Broadcast => "broadcast",
            Self::Post => "post",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Broadcast => "Broadcast",
            Self::Post => "Post",
        }
    }
}

/// A staged fan-out waiting for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFanout {
    pub kind: FanoutKind,
    pub from_chat: ChatId,
    pub message_id: MessageId,
    /// What the source message carries, when it's something `post` can re-send.
    pub content: Option<StoredContent>,
}

/// Tokens for staged fan-outs, dropped after [`CONFIRM_TTL`].
#[derive(Clone, Debug)]
pub struct PendingConfirmations {
    tokens: TypedCache<String, PendingFanout>,
}

impl Default for PendingConfirmations {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingConfirmations {
    pub fn new() -> Self {
        Self {
            tokens: TypedCache::new("pending_fanouts", CacheConfig::tokens(CONFIRM_TTL)),
        }
    }

    /// Stage a fan-out and hand back its token.
    pub fn register(&self, pending: PendingFanout) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), pending);
        token
    }

    /// Consume a token. `None` when it's unknown, expired, already used, or
    /// belongs to the other kind.
    pub fn confirm(&self, kind: FanoutKind, token: &str) -> Option<PendingFanout> {
        let key = token.to_string();
        if self.tokens.get(&key)?.kind != kind {
            return None;
        }
        self.tokens.take(&key)
    }

    /// Drop a token. Returns whether it was still live.
    pub fn cancel(&self, token: &str) -> bool {
        self.tokens.take(&token.to_string()).is_some()
    }
}

fn confirmation_keyboard(kind: FanoutKind, token: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[
        InlineKeyboardButton::callback(
            format!("✅ Confirm {}", kind.title()),
            format!("confirm_{}_{}", kind.as_str(), token),
        ),
        InlineKeyboardButton::callback("❌ Cancel", format!("cancel_{}_{}", kind.as_str(), token)),
    ]])
}

async fn stage(bot: ThrottledBot, msg: Message, state: AppState, kind: FanoutKind) -> anyhow::Result<()> {
    let Some(source) = msg.reply_to_message() else {
        let hint = match kind {
            FanoutKind::Broadcast => "Please reply to a message to broadcast it.",
            FanoutKind::Post => "Please reply to a message to post it to all groups.",
        };
        return reply_text(&bot, &msg, hint).await;
    };

    let token = state.pending.register(PendingFanout {
        kind,
        from_chat: source.chat.id,
        message_id: source.id,
        content: StoredContent::from_message(source),
    });

    let question = match kind {
        FanoutKind::Broadcast => "Are you sure you want to broadcast this message to all users and groups?",
        FanoutKind::Post => "Are you sure you want to post this message to all groups?",
    };

    reply_with_keyboard(
        &bot,
        &msg,
        format!("📢 <b>{} Preview</b>\n\n{}", kind.title(), question),
        confirmation_keyboard(kind, &token),
    )
    .await
}

/// Handle /broadcast command.
pub async fn broadcast_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    stage(bot, msg, state, FanoutKind::Broadcast).await
}

/// Handle /post command.
pub async fn post_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    stage(bot, msg, state, FanoutKind::Post).await
}

/// Whether `post` re-sends this content itself instead of copying.
fn resends_natively(content: &StoredContent) -> bool {
    matches!(
        content.msgtype,
        MsgType::Text | MsgType::Photo | MsgType::Video | MsgType::Sticker | MsgType::Animation
    )
}

async fn copy_to(bot: &ThrottledBot, target: i64, pending: &PendingFanout) -> anyhow::Result<()> {
    bot.copy_message(ChatId(target), pending.from_chat, pending.message_id)
        .await?;
    Ok(())
}

async fn post_to(bot: &ThrottledBot, target: i64, pending: &PendingFanout) -> anyhow::Result<()> {
    match &pending.content {
        Some(content) if resends_natively(content) => {
            send_stored_to(bot, ChatId(target), None, content).await
        }
        _ => copy_to(bot, target, pending).await,
    }
}

fn tally(label: &str, report: FanoutReport) -> String {
    format!(
        "<u>{}</u>\n✅ Success: <code>{}</code>\n❌ Failed: <code>{}</code>",
        label, report.success, report.failed
    )
}

/// Run a confirmed fan-out and describe the result.
pub async fn execute(bot: &ThrottledBot, state: &AppState, pending: &PendingFanout) -> anyhow::Result<String> {
    let chat_ids: Vec<i64> = state.chats.all().await?.iter().map(|c| c.chat_id).collect();

    match pending.kind {
        FanoutKind::Broadcast => {
            let user_ids: Vec<i64> = state.users.all_ids().await?.into_iter().map(|id| id as i64).collect();
            let users = fanout(user_ids, |id: i64| async move { copy_to(bot, id, pending).await }).await;
            let chats = fanout(chat_ids, |id: i64| async move { copy_to(bot, id, pending).await }).await;

            info!(
                "Broadcast done: users {}/{}, chats {}/{}",
                users.success,
                users.attempted(),
                chats.success,
                chats.attempted()
            );
            Ok(format!(
                "📢 <b>Broadcast Results</b>\n\n{}\n\n{}",
                tally("Users", users),
                tally("Groups", chats)
            ))
        }
        FanoutKind::Post => {
            let chats = fanout(chat_ids, |id: i64| async move { post_to(bot, id, pending).await }).await;

            info!("Post done: chats {}/{}", chats.success, chats.attempted());
            Ok(format!("📝 <b>Post Results</b>\n\n{}", tally("Groups", chats)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(kind: FanoutKind) -> PendingFanout {
        PendingFanout {
            kind,
            from_chat: ChatId(1),
            message_id: MessageId(10),
            content: Some(StoredContent::text("hello")),
        }
    }

    #[test]
    fn test_token_is_single_use() {
        let store = PendingConfirmations::new();
        let token = store.register(pending(FanoutKind::Broadcast));

        assert_eq!(store.confirm(FanoutKind::Broadcast, &token), Some(pending(FanoutKind::Broadcast)));
        assert_eq!(store.confirm(FanoutKind::Broadcast, &token), None);
    }

    #[test]
    fn test_token_kind_must_match() {
        let store = PendingConfirmations::new();
        let token = store.register(pending(FanoutKind::Post));

        assert_eq!(store.confirm(FanoutKind::Broadcast, &token), None);
        assert!(store.confirm(FanoutKind::Post, &token).is_some());
    }

    #[test]
    fn test_cancel_drops_token() {
        let store = PendingConfirmations::new();
        let token = store.register(pending(FanoutKind::Broadcast));

        assert!(store.cancel(&token));
        assert!(!store.cancel(&token));
        assert_eq!(store.confirm(FanoutKind::Broadcast, &token), None);
    }

    #[test]
    fn test_tokens_are_distinct() {
        let store = PendingConfirmations::new();
        let a = store.register(pending(FanoutKind::Post));
        let b = store.register(pending(FanoutKind::Post));
        assert_ne!(a, b);
    }

    #[test]
    fn test_confirmation_callback_data() {
        let markup = confirmation_keyboard(FanoutKind::Post, "abc");
        let row = &markup.inline_keyboard[0];
        assert_eq!(row.len(), 2);
        assert_eq!(row[0].text, "✅ Confirm Post");
    }

    #[test]
    fn test_post_copies_documents() {
        assert!(resends_natively(&StoredContent::text("hi")));
        assert!(!resends_natively(&StoredContent::media(MsgType::Document, "f", "")));
    }
}
