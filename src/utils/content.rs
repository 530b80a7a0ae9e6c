//! Replaying saved notes, filter replies and owner posts.

use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId, ReplyParameters};

use crate::bot::dispatcher::ThrottledBot;
use crate::database::{MsgType, StoredContent};

/// Send saved content as a reply to `msg`.
pub async fn send_stored(bot: &ThrottledBot, msg: &Message, stored: &StoredContent) -> anyhow::Result<()> {
    send_stored_to(bot, msg.chat.id, Some(msg.id), stored).await
}

/// Send saved content to a chat, optionally as a reply.
///
/// Text goes out verbatim; media is re-sent by file id with the stored text
/// as caption (stickers and video notes carry no caption).
pub async fn send_stored_to(
    bot: &ThrottledBot,
    chat_id: ChatId,
    reply_to: Option<MessageId>,
    stored: &StoredContent,
) -> anyhow::Result<()> {
    let caption = stored.content.as_str();

    macro_rules! replying {
        ($req:expr) => {{
            let req = $req;
            match reply_to {
                Some(id) => req.reply_parameters(ReplyParameters::new(id)),
                None => req,
            }
        }};
    }

    macro_rules! with_caption {
        ($req:expr) => {{
            let req = replying!($req);
            if caption.is_empty() {
                req.await?;
            } else {
                req.caption(caption).await?;
            }
        }};
    }

    match (stored.msgtype, stored.file_id.clone()) {
        (MsgType::Photo, Some(id)) => with_caption!(bot.send_photo(chat_id, InputFile::file_id(id))),
        (MsgType::Video, Some(id)) => with_caption!(bot.send_video(chat_id, InputFile::file_id(id))),
        (MsgType::Animation, Some(id)) => {
            with_caption!(bot.send_animation(chat_id, InputFile::file_id(id)))
        }
        (MsgType::Document, Some(id)) => {
            with_caption!(bot.send_document(chat_id, InputFile::file_id(id)))
        }
        (MsgType::Audio, Some(id)) => with_caption!(bot.send_audio(chat_id, InputFile::file_id(id))),
        (MsgType::Voice, Some(id)) => with_caption!(bot.send_voice(chat_id, InputFile::file_id(id))),
        (MsgType::Sticker, Some(id)) => {
            replying!(bot.send_sticker(chat_id, InputFile::file_id(id))).await?;
        }
        (MsgType::VideoNote, Some(id)) => {
            replying!(bot.send_video_note(chat_id, InputFile::file_id(id))).await?;
        }
        _ => {
            replying!(bot.send_message(chat_id, caption)).await?;
        }
    }

    Ok(())
}
