//! Telegram Bot API wire types (the subset the bot uses).

use courier_core::bot::dialogue::Button;
use serde::{Deserialize, Serialize};

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
pub struct TelegramResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboardMarkup {
    /// Convert dialogue button rows; `None` when there are no buttons.
    pub fn from_rows(rows: &[Vec<Button>]) -> Option<Self> {
        if rows.iter().all(Vec::is_empty) {
            return None;
        }
        Some(Self {
            inline_keyboard: rows
                .iter()
                .filter(|row| !row.is_empty())
                .map(|row| {
                    row.iter()
                        .map(|b| InlineKeyboardButton {
                            text: b.label.clone(),
                            callback_data: b.data.clone(),
                        })
                        .collect()
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_text_update() {
        let json = r#"{
            "update_id": 10,
            "message": {
                "message_id": 3,
                "date": 1700000000,
                "chat": {"id": 42, "type": "private"},
                "from": {"id": 42, "is_bot": false, "first_name": "Alice", "username": "alice"},
                "text": "/start"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.text.as_deref(), Some("/start"));
        assert_eq!(message.from.unwrap().username.as_deref(), Some("alice"));
        assert!(update.callback_query.is_none());
    }

    #[test]
    fn test_deserialize_callback_update() {
        let json = r#"{
            "update_id": 11,
            "callback_query": {
                "id": "abc",
                "from": {"id": 42, "is_bot": false, "first_name": "Alice"},
                "message": {"message_id": 8, "chat": {"id": 42}, "text": "..."},
                "chat_instance": "x",
                "data": "next_page:1"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let query = update.callback_query.unwrap();
        assert_eq!(query.data.as_deref(), Some("next_page:1"));
        assert_eq!(query.message.unwrap().message_id, 8);
        assert!(query.from.username.is_none());
    }

    #[test]
    fn test_keyboard_from_rows() {
        let rows = vec![vec![
            Button {
                label: "Next page".to_string(),
                data: "next_page:1".to_string(),
            },
        ]];
        let markup = InlineKeyboardMarkup::from_rows(&rows).unwrap();
        assert_eq!(
            serde_json::to_value(&markup).unwrap(),
            serde_json::json!({
                "inline_keyboard": [[{"text": "Next page", "callback_data": "next_page:1"}]]
            })
        );
        assert!(InlineKeyboardMarkup::from_rows(&[]).is_none());
    }
}
