//! Utility functions.
//!
//! Collection of helpers used across the bot.

pub mod content;
pub mod fanout;
pub mod parser;
pub mod reply;
pub mod target;

pub use content::{send_stored, send_stored_to};
pub use fanout::{FanoutReport, fanout};
pub use parser::{
    command_args, command_tail, format_minutes, format_template, html_escape, mention_html,
    message_link, parse_duration,
};
pub use reply::{reply_error, reply_html, reply_text, reply_with_keyboard};
pub use target::{SelfCheck, Target, reason_after, require_target, resolve_target};
