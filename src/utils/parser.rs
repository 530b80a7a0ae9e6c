//! Text parsing and formatting helpers.

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Clickable HTML mention of a user.
pub fn mention_html(user_id: u64, name: &str) -> String {
    format!(
        "<a href=\"tg://user?id={}\">{}</a>",
        user_id,
        html_escape(name)
    )
}

/// Arguments after the command word, split on whitespace.
pub fn command_args(text: &str) -> Vec<&str> {
    text.split_whitespace().skip(1).collect()
}

/// Everything after the command word, with the original spacing kept.
pub fn command_tail(text: &str) -> &str {
    text.split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())
        .unwrap_or("")
}

/// Longest restriction Telegram honours; anything above counts as forever.
pub const MAX_DURATION_SECS: u64 = 366 * 86_400;

/// Parse a duration token into seconds, up to [`MAX_DURATION_SECS`].
///
/// Supported forms:
/// - `30m` minutes
/// - `2h` hours
/// - `1d` days
/// - `45` bare seconds
pub fn parse_duration(input: &str) -> Option<u64> {
    let input = input.trim();
    let last = input.chars().last()?;

    let (digits, multiplier) = match last {
        'm' => (&input[..input.len() - 1], 60),
        'h' => (&input[..input.len() - 1], 3600),
        'd' => (&input[..input.len() - 1], 86400),
        _ => (input, 1),
    };

    let amount: u64 = digits.parse().ok()?;
    if amount == 0 {
        return None;
    }
    amount
        .checked_mul(multiplier)
        .filter(|secs| *secs <= MAX_DURATION_SECS)
}

/// Whole minutes, as shown in AFK messages.
pub fn format_minutes(secs: u64) -> String {
    format!("{} minute(s)", secs / 60)
}

/// Fill a welcome/goodbye template.
///
/// `{first_name}` becomes a mention, `{chat_title}` the escaped title.
pub fn format_template(template: &str, user_id: u64, first_name: &str, chat_title: &str) -> String {
    template
        .replace("{first_name}", &mention_html(user_id, first_name))
        .replace("{chat_title}", &html_escape(chat_title))
}

/// `t.me/c/...` link to a message in a supergroup.
///
/// Supergroup ids look like `-100xxxxxxxxxx`; the link uses the part after
/// the `-100` prefix.
pub fn message_link(chat_id: i64, message_id: i32) -> String {
    let raw = chat_id.to_string();
    let internal = raw.strip_prefix("-100").unwrap_or(raw.trim_start_matches('-'));
    format!("https://t.me/c/{}/{}", internal, message_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30m"), Some(1800));
        assert_eq!(parse_duration("2h"), Some(7200));
        assert_eq!(parse_duration("1d"), Some(86400));
        assert_eq!(parse_duration("45"), Some(45));
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration("m"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("0h"), None);
        assert_eq!(parse_duration("5w"), None);
    }

    #[test]
    fn test_parse_duration_upper_bound() {
        assert_eq!(parse_duration("366d"), Some(MAX_DURATION_SECS));
        assert_eq!(parse_duration("367d"), None);
        assert_eq!(parse_duration("100000000000000"), None);
        assert_eq!(parse_duration("18446744073709551615d"), None);
    }

    #[test]
    fn test_command_args_and_tail() {
        let text = "/warn @bob   spamming  links";
        assert_eq!(command_args(text), vec!["@bob", "spamming", "links"]);
        assert_eq!(command_tail("/afk  gone fishing "), "gone fishing");
        assert_eq!(command_tail("/afk"), "");
    }

    #[test]
    fn test_mention_escapes_name() {
        assert_eq!(
            mention_html(7, "<b>"),
            "<a href=\"tg://user?id=7\">&lt;b&gt;</a>"
        );
    }

    #[test]
    fn test_format_template() {
        let text = format_template("Hi {first_name}, welcome to {chat_title}!", 5, "Ann", "R&D");
        assert_eq!(
            text,
            "Hi <a href=\"tg://user?id=5\">Ann</a>, welcome to R&amp;D!"
        );
    }

    #[test]
    fn test_message_link() {
        assert_eq!(message_link(-1001234567890, 42), "https://t.me/c/1234567890/42");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(59), "0 minute(s)");
        assert_eq!(format_minutes(3_600), "60 minute(s)");
    }
}
