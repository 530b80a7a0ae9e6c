//! Saved message payloads shared by notes and filters.

use serde::{Deserialize, Serialize};
use teloxide::types::Message;

/// Kind of message a note or filter replays.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MsgType {
    #[default]
    Text,
    Photo,
    Video,
    Animation,
    Sticker,
    Document,
    Audio,
    Voice,
    VideoNote,
}

impl MsgType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Animation => "animation",
            Self::Sticker => "sticker",
            Self::Document => "document",
            Self::Audio => "audio",
            Self::Voice => "voice",
            Self::VideoNote => "video_note",
        }
    }
}

/// Text plus an optional platform file reference.
///
/// For media the text is the caption (possibly empty).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredContent {
    pub content: String,
    pub msgtype: MsgType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

impl StoredContent {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            msgtype: MsgType::Text,
            file_id: None,
        }
    }

    pub fn media(msgtype: MsgType, file_id: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            content: caption.into(),
            msgtype,
            file_id: Some(file_id.into()),
        }
    }

    /// Capture whatever a message carries.
    ///
    /// Returns `None` for messages with neither text nor a supported file.
    pub fn from_message(msg: &Message) -> Option<Self> {
        if let Some(text) = msg.text() {
            return Some(Self::text(text));
        }

        let caption = msg.caption().unwrap_or_default();

        let (msgtype, file_id) = if let Some(photo) = msg.photo() {
            let largest = photo.iter().max_by_key(|p| p.width * p.height)?;
            (MsgType::Photo, largest.file.id.clone())
        } else if let Some(video) = msg.video() {
            (MsgType::Video, video.file.id.clone())
        } else if let Some(animation) = msg.animation() {
            (MsgType::Animation, animation.file.id.clone())
        } else if let Some(sticker) = msg.sticker() {
            (MsgType::Sticker, sticker.file.id.clone())
        } else if let Some(document) = msg.document() {
            (MsgType::Document, document.file.id.clone())
        } else if let Some(audio) = msg.audio() {
            (MsgType::Audio, audio.file.id.clone())
        } else if let Some(voice) = msg.voice() {
            (MsgType::Voice, voice.file.id.clone())
        } else if let Some(note) = msg.video_note() {
            (MsgType::VideoNote, note.file.id.clone())
        } else {
            return None;
        };

        Some(Self::media(msgtype, file_id, caption))
    }
}

/// Note names and filter keywords are case-insensitive.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Foo"), "foo");
        assert_eq!(normalize_key("  HeLLo "), "hello");
    }

    #[test]
    fn test_msgtype_serde_names() {
        assert_eq!(MsgType::VideoNote.as_str(), "video_note");
        let content = StoredContent::media(MsgType::Photo, "file-1", "cap");
        assert_eq!(content.msgtype, MsgType::Photo);
        assert_eq!(content.file_id.as_deref(), Some("file-1"));
        assert_eq!(StoredContent::text("hi").msgtype, MsgType::Text);
    }
}
