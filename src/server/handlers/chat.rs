use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatBody>,
) -> Result<impl IntoResponse, ApiError> {
    let message = body
        .message
        .as_deref()
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Tin nhắn không được để trống".to_string()))?;

    let outcome = match state.chat.chat(body.session_id.as_deref(), message).await {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!("Chat request failed: {}", err);
            return Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Không thể xử lý tin nhắn của bạn",
                    "errorMessage": err.to_string(),
                    "suggestion": "Vui lòng thử lại sau hoặc liên hệ hỗ trợ",
                })),
            ));
        }
    };

    tracing::info!(
        "Chat message handled in {}ms (status: {})",
        outcome.processing_time_ms,
        outcome.status
    );

    // Response fields stay at the top level; delivery metadata rides along
    // under `_meta`, the shape the web client expects.
    let mut payload = serde_json::to_value(&outcome.response).map_err(ApiError::internal)?;
    if let Value::Object(ref mut map) = payload {
        map.insert(
            "_meta".to_string(),
            json!({
                "sessionId": outcome.session_id,
                "processingTime": outcome.processing_time_ms as u64,
                "status": outcome.status,
            }),
        );
    }

    Ok((StatusCode::OK, Json(payload)))
}
