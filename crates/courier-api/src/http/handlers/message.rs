//! Message handlers for the REST API.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde_json::json;

use courier_types::message::{Message, NewMessage};

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /api/v1/messages - Recent messages, oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = state.message_service.list_messages().await?;
    Ok(Json(messages))
}

/// POST /api/v1/message - Append a message stamped with the server time.
pub async fn create_message(
    State(state): State<AppState>,
    payload: Result<Json<NewMessage>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let message = state.message_service.append_message(body).await?;
    tracing::debug!(username = %message.username, "Message appended over HTTP");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Message added successfully" })),
    ))
}
