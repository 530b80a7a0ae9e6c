//! Inline button presses: start card navigation, the owner panel and
//! broadcast/post confirmations.

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MessageId, ParseMode};
use tracing::{debug, info};

use super::broadcast::{self, FanoutKind};
use super::{owner, start};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::utils::html_escape;

/// What a button press asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    UserCommands,
    BackToStart,
    OwnerPanel,
    OwnerBack,
    OwnerStats,
    OwnerBroadcast,
    OwnerGban,
    OwnerPost,
    OwnerUpdate,
    OwnerLogs,
    Confirm(FanoutKind, String),
    Cancel(FanoutKind, String),
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        let action = match data {
            "user_commands" => Self::UserCommands,
            "back_to_start" => Self::BackToStart,
            "owner_panel" => Self::OwnerPanel,
            "owner_back" => Self::OwnerBack,
            "owner_stats" => Self::OwnerStats,
            "owner_broadcast" => Self::OwnerBroadcast,
            "owner_gban" => Self::OwnerGban,
            "owner_post" => Self::OwnerPost,
            "owner_update" => Self::OwnerUpdate,
            "owner_logs" => Self::OwnerLogs,
            _ => return Self::parse_token(data),
        };
        Some(action)
    }

    fn parse_token(data: &str) -> Option<Self> {
        let (verb, rest) = data.split_once('_')?;
        let (kind, token) = rest.split_once('_')?;
        let kind = match kind {
            "broadcast" => FanoutKind::Broadcast,
            "post" => FanoutKind::Post,
            _ => return None,
        };
        if token.is_empty() {
            return None;
        }
        match verb {
            "confirm" => Some(Self::Confirm(kind, token.to_string())),
            "cancel" => Some(Self::Cancel(kind, token.to_string())),
            _ => None,
        }
    }

    /// Everything except start card navigation.
    pub fn owner_only(&self) -> bool {
        !matches!(self, Self::UserCommands | Self::BackToStart)
    }
}

/// Build the callback query handler.
pub fn handler() -> UpdateHandler<anyhow::Error> {
    Update::filter_callback_query()
        .filter_map(|q: CallbackQuery| q.data.as_deref().and_then(CallbackAction::parse))
        .endpoint(handle_callback)
}

async fn edit(
    bot: &ThrottledBot,
    at: (ChatId, MessageId),
    text: String,
    keyboard: Option<InlineKeyboardMarkup>,
) -> anyhow::Result<()> {
    let mut req = bot.edit_message_text(at.0, at.1, text).parse_mode(ParseMode::Html);
    if let Some(kb) = keyboard {
        req = req.reply_markup(kb);
    }
    req.await?;
    Ok(())
}

async fn handle_callback(
    bot: ThrottledBot,
    q: CallbackQuery,
    state: AppState,
    action: CallbackAction,
) -> anyhow::Result<()> {
    let is_owner = state.is_owner(q.from.id);

    if action.owner_only() && !is_owner {
        debug!("Owner button {:?} pressed by {}", action, q.from.id);
        bot.answer_callback_query(&q.id)
            .text("⚠️ This command is only for the bot owner.")
            .show_alert(true)
            .await?;
        return Ok(());
    }

    let Some(message) = q.message.as_ref() else {
        bot.answer_callback_query(&q.id).await?;
        return Ok(());
    };
    let at = (message.chat().id, message.id());
    let in_dm = message.chat().is_private();

    if let CallbackAction::Confirm(kind, token) = &action {
        let Some(pending) = state.pending.confirm(*kind, token) else {
            bot.answer_callback_query(&q.id)
                .text("This confirmation has expired.")
                .show_alert(true)
                .await?;
            return Ok(());
        };

        bot.answer_callback_query(&q.id).await?;
        info!("Owner confirmed {}", kind.as_str());
        edit(&bot, at, "⏳ Sending...".to_string(), None).await?;
        let summary = broadcast::execute(&bot, &state, &pending).await?;
        return edit(&bot, at, summary, Some(owner::back_to_panel_keyboard())).await;
    }

    bot.answer_callback_query(&q.id).await?;

    let hint = |text: &str| (html_escape(text), Some(owner::back_to_panel_keyboard()));

    let (text, keyboard) = match action {
        CallbackAction::UserCommands => {
            (start::help_text(&state.config), Some(start::back_to_start_keyboard()))
        }
        CallbackAction::BackToStart => (
            start::start_text(&state.config),
            Some(start::start_keyboard(&state, is_owner && in_dm)?),
        ),
        CallbackAction::OwnerPanel | CallbackAction::OwnerBack if !in_dm => {
            ("⚠️ Owner panel is only available in DMs.".to_string(), None)
        }
        CallbackAction::OwnerPanel | CallbackAction::OwnerBack => {
            (owner::panel_text(&state), Some(owner::panel_keyboard()))
        }
        CallbackAction::OwnerStats => {
            (owner::stats_text(&state).await?, Some(owner::back_to_panel_keyboard()))
        }
        CallbackAction::OwnerUpdate => {
            let report = owner::refresh_chats(&bot, &state).await?;
            (owner::refresh_text(report), Some(owner::back_to_panel_keyboard()))
        }
        CallbackAction::OwnerBroadcast => hint(owner::BROADCAST_HINT),
        CallbackAction::OwnerGban => hint(owner::GBAN_HINT),
        CallbackAction::OwnerPost => hint(owner::POST_HINT),
        CallbackAction::OwnerLogs => hint(owner::LOGS_TEXT),
        CallbackAction::Cancel(kind, token) => {
            let dropped = state.pending.cancel(&token);
            debug!("Cancelled {} (live: {})", kind.as_str(), dropped);
            let text = match kind {
                FanoutKind::Broadcast => "❌ Broadcast cancelled.",
                FanoutKind::Post => "❌ Post cancelled.",
            };
            (text.to_string(), None)
        }
        CallbackAction::Confirm(..) => return Ok(()),
    };

    edit(&bot, at, text, keyboard).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation() {
        assert_eq!(CallbackAction::parse("user_commands"), Some(CallbackAction::UserCommands));
        assert_eq!(CallbackAction::parse("owner_back"), Some(CallbackAction::OwnerBack));
        assert_eq!(CallbackAction::parse("owner_unknown"), None);
        assert_eq!(CallbackAction::parse(""), None);
    }

    #[test]
    fn test_parse_tokens() {
        let token = "0b5e2a3c-1d2e-4f5a-8b9c-0d1e2f3a4b5c";
        assert_eq!(
            CallbackAction::parse(&format!("confirm_broadcast_{}", token)),
            Some(CallbackAction::Confirm(FanoutKind::Broadcast, token.to_string()))
        );
        assert_eq!(
            CallbackAction::parse(&format!("cancel_post_{}", token)),
            Some(CallbackAction::Cancel(FanoutKind::Post, token.to_string()))
        );
        assert_eq!(CallbackAction::parse("confirm_broadcast_"), None);
        assert_eq!(CallbackAction::parse("cancel_broadcast"), None);
        assert_eq!(CallbackAction::parse("confirm_gban_abc"), None);
    }

    #[test]
    fn test_owner_only() {
        assert!(!CallbackAction::UserCommands.owner_only());
        assert!(!CallbackAction::BackToStart.owner_only());
        assert!(CallbackAction::OwnerStats.owner_only());
        assert!(CallbackAction::Cancel(FanoutKind::Post, "t".to_string()).owner_only());
    }
}
