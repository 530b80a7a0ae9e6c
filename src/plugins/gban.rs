//! Global bans: one ban applied across every known chat.

use teloxide::prelude::*;
use teloxide::types::UserId;
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::error::CommandError;
use crate::database::GlobalBan;
use crate::utils::{command_args, fanout, html_escape, reply_error, reply_html, reply_text};

/// `<user_id> <reason...>`
fn parse_gban_args(text: &str) -> Result<(u64, String), CommandError> {
    const USAGE: CommandError = CommandError::Usage("/gban <user_id> <reason>");

    let args = command_args(text);
    if args.len() < 2 {
        return Err(USAGE);
    }
    let user_id = args[0].parse::<u64>().map_err(|_| CommandError::InvalidUserId)?;
    Ok((user_id, args[1..].join(" ")))
}

fn parse_ungban_args(text: &str) -> Result<u64, CommandError> {
    let args = command_args(text);
    let raw = args.first().ok_or(CommandError::Usage("/ungban <user_id>"))?;
    raw.parse::<u64>().map_err(|_| CommandError::InvalidUserId)
}

async fn known_chats(state: &AppState) -> anyhow::Result<Vec<i64>> {
    Ok(state.chats.all().await?.iter().map(|c| c.chat_id).collect())
}

/// Handle /gban command.
pub async fn gban_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let (user_id, reason) = match parse_gban_args(msg.text().unwrap_or_default()) {
        Ok(parsed) => parsed,
        Err(e) => return reply_error(&bot, &msg, e).await,
    };
    let target = UserId(user_id);

    if target == state.bot_id {
        return reply_error(&bot, &msg, CommandError::BotTarget("gban")).await;
    }
    if state.is_owner(target) {
        return reply_error(&bot, &msg, CommandError::SelfTarget("gban")).await;
    }
    if state.users.get_by_id(user_id).await?.is_none() {
        return reply_text(&bot, &msg, "User not found in database.").await;
    }

    let issuer = msg.from.as_ref().map(|u| u.id.0).unwrap_or_default();
    state.gbans.add(&GlobalBan::new(user_id, reason.clone(), issuer)).await?;

    let report = fanout(known_chats(&state).await?, |chat| {
        let bot = bot.clone();
        async move { bot.ban_chat_member(ChatId(chat), target).await.map(|_| ()) }
    })
    .await;

    info!(
        "User {} globally banned, enforced in {}/{} chats",
        user_id,
        report.success,
        report.attempted()
    );
    reply_html(
        &bot,
        &msg,
        format!(
            "🚫 User <code>{}</code> has been globally banned.\n📝 Reason: <code>{}</code>\n🌐 Enforced in {} of {} groups.",
            user_id,
            html_escape(&reason),
            report.success,
            report.attempted()
        ),
    )
    .await
}

/// Handle /ungban command.
pub async fn ungban_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let user_id = match parse_ungban_args(msg.text().unwrap_or_default()) {
        Ok(id) => id,
        Err(e) => return reply_error(&bot, &msg, e).await,
    };
    let target = UserId(user_id);

    if !state.gbans.remove(user_id).await? {
        return reply_text(&bot, &msg, "This user is not globally banned.").await;
    }

    let report = fanout(known_chats(&state).await?, |chat| {
        let bot = bot.clone();
        async move {
            bot.unban_chat_member(ChatId(chat), target)
                .only_if_banned(true)
                .await
                .map(|_| ())
        }
    })
    .await;

    info!("User {} globally unbanned, lifted in {}/{} chats", user_id, report.success, report.attempted());
    reply_html(
        &bot,
        &msg,
        format!("✅ User <code>{}</code> has been removed from global ban list.", user_id),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gban_args() {
        assert_eq!(
            parse_gban_args("/gban 42 spamming links"),
            Ok((42, "spamming links".to_string()))
        );
        assert_eq!(
            parse_gban_args("/gban 42"),
            Err(CommandError::Usage("/gban <user_id> <reason>"))
        );
        assert_eq!(parse_gban_args("/gban bob spam"), Err(CommandError::InvalidUserId));
    }

    #[test]
    fn test_ungban_args() {
        assert_eq!(parse_ungban_args("/ungban 7"), Ok(7));
        assert_eq!(parse_ungban_args("/ungban"), Err(CommandError::Usage("/ungban <user_id>")));
        assert_eq!(parse_ungban_args("/ungban -1"), Err(CommandError::InvalidUserId));
    }
}
