//! HTTP client for the message service.
//!
//! Implements `MessageApi` from `courier-core` over the REST endpoints
//! `GET /api/v1/messages` and `POST /api/v1/message`.

use std::time::Duration;

use courier_core::bot::api::MessageApi;
use courier_types::error::ClientError;
use courier_types::message::{Message, NewMessage};

/// reqwest-backed message service client.
#[derive(Clone)]
pub struct HttpMessageApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMessageApi {
    /// Create a client for the service at `base_url` (e.g. `http://api:8000`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }
}

impl MessageApi for HttpMessageApi {
    async fn list_messages(&self) -> Result<Vec<Message>, ClientError> {
        let response = self
            .client
            .get(self.url("messages"))
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "Message service refused list request");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let messages: Vec<Message> = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        tracing::debug!(count = messages.len(), "Messages received from service");
        Ok(messages)
    }

    async fn append_message(&self, message: &NewMessage) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.url("message"))
            .json(message)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK && status != reqwest::StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "Message service refused message");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("Message sent to service");
        Ok(())
    }
}
