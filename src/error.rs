//! User-facing command errors.
//!
//! Anything a handler can reject with before touching the platform or the
//! database. These render as a single line of text in the invoking chat;
//! persistence and network failures stay in `anyhow` and reach the
//! dispatcher's error handler instead.

use thiserror::Error;

/// Why a command was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Missing or malformed arguments. Carries the usage line.
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("User not found.")]
    UserNotFound,

    #[error("Invalid user ID.")]
    InvalidUserId,

    #[error("You can't {0} yourself!")]
    SelfTarget(&'static str),

    #[error("I can't {0} myself!")]
    BotTarget(&'static str),

    #[error("Invalid time format. Use: 30m, 1h, 1d")]
    InvalidDuration,

    #[error("Invalid lock type. Use: messages, media, stickers, polls, links, bots")]
    InvalidLockType,

    #[error("This command can only be used in groups!")]
    NotInGroup,

    #[error("You need to be an admin to use this command!")]
    NotAdmin,

    #[error("This command is only for the bot owner!")]
    NotOwner,

    #[error("⚠️ Owner commands are only available in my DM.")]
    OwnerDmOnly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            CommandError::Usage("/get <name>").to_string(),
            "Usage: /get <name>"
        );
        assert_eq!(CommandError::SelfTarget("warn").to_string(), "You can't warn yourself!");
        assert_eq!(CommandError::BotTarget("ban").to_string(), "I can't ban myself!");
    }
}
