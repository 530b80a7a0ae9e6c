//! Filter model.

use serde::{Deserialize, Serialize};

use super::{StoredContent, normalize_key};

/// A keyword-triggered auto reply (stored in `filters` collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
    pub chat_id: i64,
    /// Lowercased trigger, unique per chat.
    pub keyword: String,
    #[serde(flatten)]
    pub body: StoredContent,
    pub timestamp: i64,
}

impl Filter {
    pub fn new(chat_id: i64, keyword: impl Into<String>, body: StoredContent) -> Self {
        Self {
            chat_id,
            keyword: normalize_key(&keyword.into()),
            body,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Substring match against already-lowercased text.
    pub fn matches(&self, text_lower: &str) -> bool {
        !self.keyword.is_empty() && text_lower.contains(&self.keyword)
    }
}

/// First filter, in the given order, whose keyword occurs in `text`.
pub fn first_match<'a>(filters: &'a [Filter], text: &str) -> Option<&'a Filter> {
    let text_lower = text.to_lowercase();
    filters.iter().find(|f| f.matches(&text_lower))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(keyword: &str, reply: &str) -> Filter {
        Filter::new(-100, keyword, StoredContent::text(reply))
    }

    #[test]
    fn test_case_insensitive_substring() {
        let filters = vec![filter("hello", "hi!")];
        let hit = first_match(&filters, "Hello there").map(|f| f.body.content.as_str());
        assert_eq!(hit, Some("hi!"));
        assert!(first_match(&filters, "goodbye").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let filters = vec![filter("cat", "first"), filter("category", "second")];
        let hit = first_match(&filters, "A CATEGORY question").unwrap();
        assert_eq!(hit.body.content, "first");
    }

    #[test]
    fn test_empty_keyword_never_matches() {
        let filters = vec![filter("", "never")];
        assert!(first_match(&filters, "anything").is_none());
    }

    #[test]
    fn test_keyword_is_stored_lowercase() {
        let f = filter("HeLLo", "hi");
        assert_eq!(f.keyword, "hello");
        assert!(first_match(&[f], "well hello").is_some());
    }
}
