//! Bulk message deletion.
//!
//! Deletions go out one by one; messages that are already gone or too old
//! are skipped.

use std::ops::Range;

use teloxide::prelude::*;
use teloxide::types::MessageId;
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::error::CommandError;
use crate::utils::{FanoutReport, command_args, fanout, reply_error, reply_text};

/// Most messages /clean removes in one go.
pub const MAX_CLEAN: i32 = 100;

/// Ids of the `amount` messages sent right before `command_id`.
pub fn clean_range(command_id: i32, amount: i32) -> Range<i32> {
    (command_id - amount).max(1)..command_id
}

async fn delete_ids(bot: &ThrottledBot, chat_id: ChatId, ids: impl IntoIterator<Item = i32>) -> FanoutReport {
    fanout(ids, |id| async move {
        bot.delete_message(chat_id, MessageId(id)).await.map(|_| ())
    })
    .await
}

/// Handle /clean command.
///
/// Usage: /clean <amount> (at most 100)
pub async fn clean_command(bot: ThrottledBot, msg: Message, _state: AppState) -> anyhow::Result<()> {
    let Some(arg) = command_args(msg.text().unwrap_or_default()).first().copied() else {
        return reply_error(&bot, &msg, CommandError::Usage("/clean <amount>")).await;
    };

    let Ok(amount) = arg.parse::<i32>() else {
        return reply_text(&bot, &msg, "Please provide a valid number.").await;
    };
    if amount > MAX_CLEAN {
        return reply_text(&bot, &msg, "You can only clean up to 100 messages at a time.").await;
    }
    if amount <= 0 {
        return reply_text(&bot, &msg, "Please provide a valid number.").await;
    }

    let report = delete_ids(&bot, msg.chat.id, clean_range(msg.id.0, amount)).await;
    info!(
        "Cleaned {} message(s) in chat {} ({} failed)",
        report.success, msg.chat.id, report.failed
    );

    reply_text(&bot, &msg, format!("🧹 Cleaned {} messages.", amount)).await
}

/// Handle /purge command.
///
/// Deletes everything from the replied message through the command itself.
pub async fn purge_command(bot: ThrottledBot, msg: Message, _state: AppState) -> anyhow::Result<()> {
    let Some(reply) = msg.reply_to_message() else {
        return reply_text(&bot, &msg, "Please reply to a message to start purging from there.").await;
    };

    let report = delete_ids(&bot, msg.chat.id, reply.id.0..=msg.id.0).await;
    info!(
        "Purged {} message(s) in chat {} ({} failed)",
        report.success, msg.chat.id, report.failed
    );

    bot.send_message(msg.chat.id, "🧹 Messages purged successfully.").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_range_stops_before_command() {
        assert_eq!(clean_range(500, 3), 497..500);
        assert_eq!(clean_range(500, 3).count(), 3);
    }

    #[test]
    fn test_clean_range_clamps_at_first_message() {
        assert_eq!(clean_range(5, 100), 1..5);
    }
}
