//! Plugin system for command handlers.
//!
//! Add new plugins by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_plugin;` below
//! 3. Adding a `Command` variant and its branch in `command_handler()`

pub mod admin;
pub mod afk;
pub mod ban;
pub mod broadcast;
pub mod callbacks;
pub mod filters;
pub mod gban;
pub mod info;
pub mod lock;
pub mod mute;
pub mod notes;
pub mod owner;
pub mod pin;
pub mod purge;
pub mod report;
pub mod rules;
pub mod start;
pub mod warn;
pub mod welcome;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::warn;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::permissions::guards;
use crate::utils::reply_text;

/// All bot commands.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start(String),
    #[command(description = "Show the help menu")]
    Help,
    #[command(description = "Info about a user")]
    Info,
    #[command(description = "Chat and user IDs")]
    Id,
    #[command(description = "List group admins")]
    Admins,
    #[command(description = "Check if the bot is online")]
    Ping,
    #[command(description = "Set your AFK status")]
    Afk,
    #[command(description = "Remove your AFK status")]
    Endafk,
    #[command(description = "Report a message to admins")]
    Report,
    #[command(description = "View group rules")]
    Rules,
    #[command(description = "List saved notes")]
    Notes,
    #[command(description = "List active filters")]
    Filters,
    #[command(description = "Retrieve a saved note")]
    Get,

    // Moderation
    #[command(description = "Warn a user")]
    Warn,
    #[command(description = "Remove a user's warnings")]
    Unwarn,
    #[command(description = "Ban a user")]
    Ban,
    #[command(description = "Unban a user")]
    Unban,
    #[command(description = "Mute a user")]
    Mute,
    #[command(description = "Unmute a user")]
    Unmute,
    #[command(description = "Kick a user")]
    Kick,

    // Group administration
    #[command(description = "Pin the replied message")]
    Pin,
    #[command(description = "Unpin the pinned message")]
    Unpin,
    #[command(description = "Set the welcome message")]
    Setwelcome,
    #[command(description = "Set the goodbye message")]
    Setgoodbye,
    #[command(description = "Delete recent messages")]
    Clean,
    #[command(description = "Set group rules")]
    Setrules,
    #[command(description = "Save a note")]
    Save,
    #[command(description = "Delete a note")]
    Clear,
    #[command(description = "Add a filter")]
    Filter,
    #[command(description = "Remove a filter")]
    Stop,
    #[command(description = "Lock a chat feature")]
    Lock,
    #[command(description = "Unlock a chat feature")]
    Unlock,
    #[command(description = "Promote a user to admin")]
    Promote,
    #[command(description = "Demote an admin")]
    Demote,
    #[command(description = "Delete messages from the replied one")]
    Purge,

    // Owner
    #[command(description = "Bot statistics")]
    Stats,
    #[command(description = "Broadcast to all users and groups")]
    Broadcast,
    #[command(description = "Globally ban a user")]
    Gban,
    #[command(description = "Lift a global ban")]
    Ungban,
    #[command(description = "Post to all groups")]
    Post,
    #[command(description = "Refresh known chats")]
    Update,
    #[command(description = "About error logs")]
    Logs,
}

/// Tell the invoker their command failed, then let the error reach the
/// dispatcher's error handler.
async fn apologize(bot: &ThrottledBot, msg: &Message) {
    if let Err(e) = reply_text(bot, msg, "❌ Something went wrong while processing that command.").await {
        warn!("Failed to report command failure in chat {}: {}", msg.chat.id, e);
    }
}

/// Wrap a `(bot, msg, state)` handler so failures are acknowledged in chat.
macro_rules! reported {
    ($handler:path) => {
        |bot: ThrottledBot, msg: Message, state: AppState| async move {
            let result = $handler(bot.clone(), msg.clone(), state).await;
            if result.is_err() {
                apologize(&bot, &msg).await;
            }
            result
        }
    };
}

async fn start_entry(bot: ThrottledBot, msg: Message, state: AppState, payload: String) -> anyhow::Result<()> {
    let result = start::start_command(bot.clone(), msg.clone(), state, payload).await;
    if result.is_err() {
        apologize(&bot, &msg).await;
    }
    result
}

/// Build the combined command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    // Anywhere
    let open = dptree::entry()
        .branch(case![Command::Start(payload)].endpoint(start_entry))
        .branch(case![Command::Help].endpoint(reported!(start::help_command)))
        .branch(case![Command::Ping].endpoint(reported!(start::ping_command)))
        .branch(case![Command::Info].endpoint(reported!(info::info_command)))
        .branch(case![Command::Id].endpoint(reported!(info::id_command)));

    // Groups, any member
    let group = dptree::entry()
        .branch(case![Command::Admins].endpoint(reported!(info::admins_command)))
        .branch(case![Command::Report].endpoint(reported!(report::report_command)))
        .branch(case![Command::Rules].endpoint(reported!(rules::rules_command)))
        .branch(case![Command::Notes].endpoint(reported!(notes::notes_command)))
        .branch(case![Command::Filters].endpoint(reported!(filters::filters_command)))
        .branch(case![Command::Get].endpoint(reported!(notes::get_command)))
        .branch(case![Command::Afk].endpoint(reported!(afk::afk_command)))
        .branch(case![Command::Endafk].endpoint(reported!(afk::endafk_command)));

    // Groups, admins only
    let admin = dptree::entry()
        .branch(case![Command::Warn].endpoint(reported!(warn::warn_command)))
        .branch(case![Command::Unwarn].endpoint(reported!(warn::unwarn_command)))
        .branch(case![Command::Ban].endpoint(reported!(ban::ban_command)))
        .branch(case![Command::Unban].endpoint(reported!(ban::unban_command)))
        .branch(case![Command::Kick].endpoint(reported!(ban::kick_command)))
        .branch(case![Command::Mute].endpoint(reported!(mute::mute_command)))
        .branch(case![Command::Unmute].endpoint(reported!(mute::unmute_command)))
        .branch(case![Command::Pin].endpoint(reported!(pin::pin_command)))
        .branch(case![Command::Unpin].endpoint(reported!(pin::unpin_command)))
        .branch(case![Command::Setwelcome].endpoint(reported!(welcome::setwelcome_command)))
        .branch(case![Command::Setgoodbye].endpoint(reported!(welcome::setgoodbye_command)))
        .branch(case![Command::Setrules].endpoint(reported!(rules::setrules_command)))
        .branch(case![Command::Clean].endpoint(reported!(purge::clean_command)))
        .branch(case![Command::Purge].endpoint(reported!(purge::purge_command)))
        .branch(case![Command::Save].endpoint(reported!(notes::save_command)))
        .branch(case![Command::Clear].endpoint(reported!(notes::clear_command)))
        .branch(case![Command::Filter].endpoint(reported!(filters::filter_command)))
        .branch(case![Command::Stop].endpoint(reported!(filters::stop_command)))
        .branch(case![Command::Lock].endpoint(reported!(lock::lock_command)))
        .branch(case![Command::Unlock].endpoint(reported!(lock::unlock_command)))
        .branch(case![Command::Promote].endpoint(reported!(admin::promote_command)))
        .branch(case![Command::Demote].endpoint(reported!(admin::demote_command)));

    // Owner, in DM
    let owner = dptree::entry()
        .branch(case![Command::Stats].endpoint(reported!(owner::stats_command)))
        .branch(case![Command::Update].endpoint(reported!(owner::update_command)))
        .branch(case![Command::Logs].endpoint(reported!(owner::logs_command)))
        .branch(case![Command::Broadcast].endpoint(reported!(broadcast::broadcast_command)))
        .branch(case![Command::Post].endpoint(reported!(broadcast::post_command)))
        .branch(case![Command::Gban].endpoint(reported!(gban::gban_command)))
        .branch(case![Command::Ungban].endpoint(reported!(gban::ungban_command)));

    teloxide::filter_command::<Command, _>()
        .branch(open)
        .branch(dptree::filter(is_group_command).chain(guards::group_only()).chain(group))
        .branch(
            dptree::filter(is_admin_command)
                .chain(guards::group_only())
                .chain(guards::admin_only())
                .chain(admin),
        )
        .branch(dptree::filter(is_owner_command).chain(guards::owner_dm_only()).chain(owner))
}

fn is_group_command(cmd: Command) -> bool {
    matches!(
        cmd,
        Command::Admins
            | Command::Report
            | Command::Rules
            | Command::Notes
            | Command::Filters
            | Command::Get
            | Command::Afk
            | Command::Endafk
    )
}

fn is_owner_command(cmd: Command) -> bool {
    matches!(
        cmd,
        Command::Stats
            | Command::Update
            | Command::Logs
            | Command::Broadcast
            | Command::Post
            | Command::Gban
            | Command::Ungban
    )
}

fn is_admin_command(cmd: Command) -> bool {
    matches!(
        cmd,
        Command::Warn
            | Command::Unwarn
            | Command::Ban
            | Command::Unban
            | Command::Kick
            | Command::Mute
            | Command::Unmute
            | Command::Pin
            | Command::Unpin
            | Command::Setwelcome
            | Command::Setgoodbye
            | Command::Setrules
            | Command::Clean
            | Command::Purge
            | Command::Save
            | Command::Clear
            | Command::Filter
            | Command::Stop
            | Command::Lock
            | Command::Unlock
            | Command::Promote
            | Command::Demote
    )
}

/// Build the callback query handler.
pub fn callback_handler() -> UpdateHandler<anyhow::Error> {
    callbacks::handler()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_classes_are_disjoint() {
        let all = [
            Command::Help,
            Command::Admins,
            Command::Warn,
            Command::Stats,
            Command::Get,
            Command::Purge,
            Command::Ungban,
        ];
        for cmd in all {
            let classes = [
                is_group_command(cmd.clone()),
                is_admin_command(cmd.clone()),
                is_owner_command(cmd.clone()),
            ];
            assert!(classes.iter().filter(|c| **c).count() <= 1);
        }
    }

    #[test]
    fn test_afk_is_group_only() {
        assert!(is_group_command(Command::Afk));
        assert!(is_group_command(Command::Endafk));
        assert!(!is_admin_command(Command::Afk));
    }

    #[test]
    fn test_command_parsing() {
        assert!(matches!(
            Command::parse("/start rules_-1001", "moon_bot"),
            Ok(Command::Start(payload)) if payload == "rules_-1001"
        ));
        assert!(matches!(Command::parse("/endafk", "moon_bot"), Ok(Command::Endafk)));
        assert!(matches!(Command::parse("/ungban 5", "moon_bot"), Ok(Command::Ungban)));
    }
}
