//! TelegramClient -- minimal Telegram Bot API client over reqwest.
//!
//! The bot token is part of every request URL, so it is kept in a
//! [`SecretString`] and stripped from reqwest errors before they are
//! reported.

use std::time::Duration;

use courier_types::error::TransportError;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::types::{InlineKeyboardMarkup, TelegramResponse, Update};

#[derive(Serialize)]
struct SendMessageBody<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Serialize)]
struct EditMessageTextBody<'a> {
    chat_id: i64,
    message_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a InlineKeyboardMarkup>,
}

/// Telegram Bot API client.
pub struct TelegramClient {
    client: reqwest::Client,
    token: SecretString,
    base_url: String,
}

impl TelegramClient {
    /// Create a new client.
    ///
    /// The HTTP timeout must exceed the long-polling timeout used with
    /// [`TelegramClient::get_updates`].
    pub fn new(token: SecretString) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self {
            client,
            token,
            base_url: "https://api.telegram.org".to_string(),
        })
    }

    /// Override the base URL (useful for testing or a local Bot API server).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token.expose_secret(), method)
    }

    /// Call a Bot API method with a JSON body and unwrap the `result`.
    async fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.without_url().to_string()))?;

        let envelope: TelegramResponse<T> = response
            .json()
            .await
            .map_err(|e| TransportError::Request(e.without_url().to_string()))?;

        match (envelope.ok, envelope.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TransportError::Rejected(
                envelope
                    .description
                    .unwrap_or_else(|| format!("{method} failed")),
            )),
        }
    }

    /// Remove any webhook so that long polling works.
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<(), TransportError> {
        let _: bool = self
            .call(
                "deleteWebhook",
                &json!({ "drop_pending_updates": drop_pending_updates }),
            )
            .await?;
        Ok(())
    }

    /// Long-poll for updates with `update_id >= offset`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TransportError> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), TransportError> {
        let body = SendMessageBody {
            chat_id,
            text,
            reply_markup: keyboard,
        };
        let _: serde_json::Value = self.call("sendMessage", &body).await?;
        Ok(())
    }

    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), TransportError> {
        let body = EditMessageTextBody {
            chat_id,
            message_id,
            text,
            reply_markup: keyboard,
        };
        let _: serde_json::Value = self.call("editMessageText", &body).await?;
        Ok(())
    }

    /// Stop the client-side loading indicator on a pressed button.
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TransportError> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &json!({ "callback_query_id": callback_query_id }),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let client = TelegramClient::new(SecretString::from("123:abc"))
            .unwrap()
            .with_base_url("http://localhost:8081".to_string());
        assert_eq!(
            client.method_url("getUpdates"),
            "http://localhost:8081/bot123:abc/getUpdates"
        );
    }

    #[tokio::test]
    async fn test_transport_error_hides_token() {
        let client = TelegramClient::new(SecretString::from("123:secret-token"))
            .unwrap()
            .with_base_url("http://127.0.0.1:9".to_string());

        let err = client.delete_webhook(true).await.unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
        assert!(!err.to_string().contains("secret-token"));
    }
}
