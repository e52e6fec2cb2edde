//! Telegram long-polling loop driving the dialogue.
//!
//! Each update is translated into a platform-neutral [`Event`], handed to
//! the [`Dialogue`], and the resulting replies are sent back through the
//! Bot API. Transport failures are logged and never stop the loop.

use std::time::Duration;

use courier_core::bot::api::MessageApi;
use courier_core::bot::dialogue::{Author, Dialogue, Event, Incoming, Reply};
use courier_core::bot::session::SessionStore;
use courier_infra::telegram::TelegramClient;
use courier_infra::telegram::types::{InlineKeyboardMarkup, Update, User};
use courier_types::conversation::ConversationId;
use courier_types::error::TransportError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Seconds Telegram holds a `getUpdates` request open.
const POLL_TIMEOUT_SECS: u64 = 30;

/// Pause after a failed poll before trying again.
const RETRY_PAUSE: Duration = Duration::from_secs(5);

/// A dialogue event plus the callback query to acknowledge, if any.
#[derive(Debug)]
pub struct Inbound {
    pub event: Event,
    pub callback_id: Option<String>,
}

/// Poll for updates until `cancel` fires.
///
/// Any webhook is removed first and updates queued while the bot was
/// offline are dropped.
pub async fn run_bot<A, S>(
    telegram: &TelegramClient,
    dialogue: &Dialogue<A, S>,
    cancel: CancellationToken,
) -> Result<(), TransportError>
where
    A: MessageApi,
    S: SessionStore,
{
    telegram.delete_webhook(true).await?;
    info!("Bot started, polling for updates");

    let mut offset: Option<i64> = None;
    loop {
        let polled = tokio::select! {
            _ = cancel.cancelled() => break,
            polled = telegram.get_updates(offset, POLL_TIMEOUT_SECS) => polled,
        };

        let updates = match polled {
            Ok(updates) => updates,
            Err(e) => {
                warn!(error = %e, "Polling for updates failed, retrying");
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(RETRY_PAUSE) => continue,
                }
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);
            handle_update(telegram, dialogue, update).await;
        }
    }

    info!("Bot stopped");
    Ok(())
}

async fn handle_update<A, S>(telegram: &TelegramClient, dialogue: &Dialogue<A, S>, update: Update)
where
    A: MessageApi,
    S: SessionStore,
{
    let update_id = update.update_id;
    let Some(inbound) = event_from_update(update) else {
        debug!(update_id, "Ignoring update without text or button data");
        return;
    };

    if let Some(callback_id) = &inbound.callback_id {
        if let Err(e) = telegram.answer_callback_query(callback_id).await {
            warn!(error = %e, "Failed to answer callback query");
        }
    }

    let chat_id = inbound.event.conversation.0;
    for reply in dialogue.handle(inbound.event).await {
        if let Err(e) = deliver(telegram, chat_id, &reply).await {
            warn!(chat_id, error = %e, "Failed to deliver reply");
        }
    }
}

async fn deliver(
    telegram: &TelegramClient,
    chat_id: i64,
    reply: &Reply,
) -> Result<(), TransportError> {
    match reply {
        Reply::Send { text, keyboard } => {
            let markup = InlineKeyboardMarkup::from_rows(keyboard);
            telegram.send_message(chat_id, text, markup.as_ref()).await
        }
        Reply::Edit {
            message_id,
            text,
            keyboard,
        } => {
            let markup = InlineKeyboardMarkup::from_rows(keyboard);
            telegram
                .edit_message_text(chat_id, *message_id, text, markup.as_ref())
                .await
        }
    }
}

/// Translate a Telegram update into a dialogue event.
///
/// Returns `None` for updates the bot does not react to: non-text messages,
/// and button presses whose message or payload is no longer available.
pub fn event_from_update(update: Update) -> Option<Inbound> {
    if let Some(query) = update.callback_query {
        let message = query.message?;
        let data = query.data?;
        return Some(Inbound {
            event: Event {
                conversation: ConversationId(message.chat.id),
                author: author_of(&query.from),
                incoming: Incoming::Callback {
                    data,
                    message_id: message.message_id,
                },
            },
            callback_id: Some(query.id),
        });
    }

    let message = update.message?;
    let text = message.text?;
    let author = match &message.from {
        Some(user) => author_of(user),
        None => Author {
            id: message.chat.id,
            username: None,
            first_name: None,
        },
    };

    let incoming = if is_start_command(&text) {
        Incoming::Start
    } else {
        Incoming::Text(text)
    };

    Some(Inbound {
        event: Event {
            conversation: ConversationId(message.chat.id),
            author,
            incoming,
        },
        callback_id: None,
    })
}

fn author_of(user: &User) -> Author {
    Author {
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
    }
}

/// `/start`, optionally addressed as `/start@botname` and with arguments.
fn is_start_command(text: &str) -> bool {
    match text.split_whitespace().next() {
        Some(command) => command == "/start" || command.starts_with("/start@"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<Inbound> {
        event_from_update(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_start_command() {
        let inbound = parse(
            r#"{"update_id": 1, "message": {"message_id": 3, "chat": {"id": 42},
                "from": {"id": 7, "first_name": "Alice", "username": "alice"},
                "text": "/start"}}"#,
        )
        .unwrap();
        assert_eq!(inbound.event.incoming, Incoming::Start);
        assert_eq!(inbound.event.conversation, ConversationId(42));
        assert_eq!(inbound.event.author.display_name(), "alice");
        assert!(inbound.callback_id.is_none());
    }

    #[test]
    fn test_start_command_variants() {
        assert!(is_start_command("/start"));
        assert!(is_start_command("/start@courier_bot"));
        assert!(is_start_command("  /start payload"));
        assert!(!is_start_command("/started"));
        assert!(!is_start_command("start"));
        assert!(!is_start_command(""));
    }

    #[test]
    fn test_plain_text() {
        let inbound = parse(
            r#"{"update_id": 2, "message": {"message_id": 4, "chat": {"id": 42},
                "from": {"id": 7, "first_name": "Alice"}, "text": "hello there"}}"#,
        )
        .unwrap();
        assert_eq!(
            inbound.event.incoming,
            Incoming::Text("hello there".to_string())
        );
        assert_eq!(inbound.event.author.display_name(), "Alice");
    }

    #[test]
    fn test_callback_query() {
        let inbound = parse(
            r#"{"update_id": 3, "callback_query": {"id": "cb-1",
                "from": {"id": 7, "first_name": "Alice"},
                "message": {"message_id": 9, "chat": {"id": 42}},
                "data": "next_page:1"}}"#,
        )
        .unwrap();
        assert_eq!(inbound.callback_id.as_deref(), Some("cb-1"));
        assert_eq!(
            inbound.event.incoming,
            Incoming::Callback {
                data: "next_page:1".to_string(),
                message_id: 9,
            }
        );
    }

    #[test]
    fn test_ignored_updates() {
        // Photo without caption text.
        assert!(parse(r#"{"update_id": 4, "message": {"message_id": 5, "chat": {"id": 42}}}"#).is_none());
        // Button press on a message that is no longer accessible.
        assert!(parse(
            r#"{"update_id": 5, "callback_query": {"id": "cb-2",
                "from": {"id": 7}, "data": "read_messages"}}"#
        )
        .is_none());
        assert!(parse(r#"{"update_id": 6}"#).is_none());
    }

    #[test]
    fn test_message_without_sender_uses_chat_id() {
        let inbound = parse(
            r#"{"update_id": 7, "message": {"message_id": 6, "chat": {"id": -100}, "text": "hi"}}"#,
        )
        .unwrap();
        assert_eq!(inbound.event.author.display_name(), "user-100");
    }
}
