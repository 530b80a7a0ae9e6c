//! Configuration module for MoonBot.
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_BOT_NAME: &str = "MoonBot";
const DEFAULT_WELCOME: &str = "Hey {first_name}, welcome to {chat_title}!";
const DEFAULT_GOODBYE: &str = "Goodbye {first_name}, we'll miss you in {chat_title}!";
const DEFAULT_SUPPORT_LINK: &str = "https://t.me/";
const DEFAULT_AFK_TIMEOUT_SECS: u64 = 3600;

/// Errors raised while reading the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not a valid {expected}: {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,

    /// Bot username (without @) for deep link construction.
    /// Optional - will be fetched via getMe if not set.
    pub bot_username: Option<String>,

    /// Display name used in start/help texts.
    pub bot_name: String,

    /// The single bot owner.
    pub owner_id: u64,

    pub default_welcome: String,
    pub default_goodbye: String,
    pub support_chat_link: String,

    /// AFK records older than this are no longer announced and get swept.
    pub afk_timeout: Duration,

    // MongoDB
    pub mongodb_uri: String,
    pub mongodb_database: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let owner_raw = required("OWNER_ID")?;
        let owner_id = owner_raw.parse::<u64>().map_err(|_| ConfigError::Invalid {
            name: "OWNER_ID",
            expected: "user id",
            value: owner_raw.clone(),
        })?;

        let afk_timeout = match get("AFK_TIMEOUT") {
            // Stored timestamps are i64, so the timeout must fit one
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .and_then(|secs| u64::try_from(secs).ok())
                .ok_or_else(|| ConfigError::Invalid {
                    name: "AFK_TIMEOUT",
                    expected: "number of seconds",
                    value: raw.clone(),
                })?,
            None => DEFAULT_AFK_TIMEOUT_SECS,
        };

        // Strip @ if present
        let bot_username = get("BOT_USERNAME").map(|s| s.trim_start_matches('@').to_string());

        Ok(Self {
            bot_token: required("BOT_TOKEN")?,
            bot_username,
            bot_name: get("BOT_NAME").unwrap_or_else(|| DEFAULT_BOT_NAME.to_string()),
            owner_id,
            default_welcome: get("DEFAULT_WELCOME").unwrap_or_else(|| DEFAULT_WELCOME.to_string()),
            default_goodbye: get("DEFAULT_GOODBYE").unwrap_or_else(|| DEFAULT_GOODBYE.to_string()),
            support_chat_link: get("SUPPORT_CHAT_LINK")
                .unwrap_or_else(|| DEFAULT_SUPPORT_LINK.to_string()),
            afk_timeout: Duration::from_secs(afk_timeout),
            mongodb_uri: required("MONGODB_URI")?,
            mongodb_database: get("MONGODB_DATABASE").unwrap_or_else(|| "MoonBot".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup(&[
            ("BOT_TOKEN", "123:abc"),
            ("OWNER_ID", "42"),
            ("MONGODB_URI", "mongodb://localhost"),
            ("BOT_USERNAME", "@moon_bot"),
        ]))
        .unwrap();

        assert_eq!(config.owner_id, 42);
        assert_eq!(config.bot_username.as_deref(), Some("moon_bot"));
        assert_eq!(config.bot_name, "MoonBot");
        assert_eq!(config.mongodb_database, "MoonBot");
        assert_eq!(config.afk_timeout, Duration::from_secs(3600));
        assert!(config.default_welcome.contains("{first_name}"));
    }

    #[test]
    fn test_missing_token() {
        let err = Config::from_lookup(lookup(&[("OWNER_ID", "1"), ("MONGODB_URI", "x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("BOT_TOKEN")));
    }

    #[test]
    fn test_invalid_owner() {
        let err = Config::from_lookup(lookup(&[
            ("BOT_TOKEN", "t"),
            ("OWNER_ID", "someone"),
            ("MONGODB_URI", "x"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "OWNER_ID", .. }));
    }

    #[test]
    fn test_afk_timeout_override() {
        let config = Config::from_lookup(lookup(&[
            ("BOT_TOKEN", "t"),
            ("OWNER_ID", "1"),
            ("MONGODB_URI", "x"),
            ("AFK_TIMEOUT", "120"),
        ]))
        .unwrap();
        assert_eq!(config.afk_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_afk_timeout_out_of_range() {
        for raw in ["9223372036854775808", "18446744073709551615", "-5"] {
            let err = Config::from_lookup(lookup(&[
                ("BOT_TOKEN", "t"),
                ("OWNER_ID", "1"),
                ("MONGODB_URI", "x"),
                ("AFK_TIMEOUT", raw),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { name: "AFK_TIMEOUT", .. }));
        }
    }
}
