//! Moderation submissions. The handler validates, acknowledges with 202 and
//! hands the work to the background dispatcher; the verdict is never part of
//! the synchronous response.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::core::errors::ApiError;
use crate::moderation::{spawn_moderation, ModerationRequest};
use crate::state::AppState;

/// Fixed acknowledgement returned before moderation runs.
pub const ACK_MESSAGE: &str =
    "Cảm ơn rất nhiều vì bạn đã gửi đánh giá. Chúng tôi sẽ sớm kiểm duyệt đánh giá của bạn";

pub async fn moderate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let request = validate(&headers, &body)?;

    // Acknowledge now; the pipeline runs detached with its own error
    // boundary and reports nothing back to this caller.
    spawn_moderation(state.moderation.clone(), state.feedback.clone(), request);

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "success": true,
            "message": ACK_MESSAGE,
        })),
    ))
}

fn validate(headers: &HeaderMap, body: &Value) -> Result<ModerationRequest, ApiError> {
    let id = body
        .get("id")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| {
            ApiError::BadRequest("Trường 'id' là bắt buộc và phải là một số.".to_string())
        })?;

    if let Some(rating) = body.get("rating") {
        if !rating.is_null() && !rating.is_number() {
            return Err(ApiError::BadRequest(
                "Trường 'rating' phải là một số.".to_string(),
            ));
        }
    }
    let rating = body.get("rating").and_then(|v| v.as_f64());

    let comment = body
        .get("comment")
        .and_then(|v| v.as_str())
        .filter(|comment| !comment.is_empty())
        .ok_or_else(|| {
            ApiError::BadRequest(
                "Trường 'comment' là bắt buộc và phải là một chuỗi".to_string(),
            )
        })?;

    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            ApiError::Unauthorized("Yêu cầu thiếu Authorization header.".to_string())
        })?;

    Ok(ModerationRequest {
        id,
        comment: comment.to_string(),
        rating,
        authorization: authorization.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_auth() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer token-123".parse().unwrap());
        headers
    }

    #[test]
    fn accepts_a_complete_submission() {
        let body = json!({ "id": 42, "comment": "Hàng oke, ship nhanh vcl", "rating": 5 });
        let request = validate(&headers_with_auth(), &body).unwrap();

        assert_eq!(request.id, 42);
        assert_eq!(request.comment, "Hàng oke, ship nhanh vcl");
        assert_eq!(request.rating, Some(5.0));
        assert_eq!(request.authorization, "Bearer token-123");
    }

    #[test]
    fn rating_is_optional() {
        let body = json!({ "id": 1, "comment": "ổn" });
        let request = validate(&headers_with_auth(), &body).unwrap();
        assert!(request.rating.is_none());
    }

    #[test]
    fn missing_id_is_rejected() {
        let body = json!({ "comment": "ổn" });
        assert!(matches!(
            validate(&headers_with_auth(), &body),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn string_id_is_rejected() {
        let body = json!({ "id": "42", "comment": "ổn" });
        assert!(matches!(
            validate(&headers_with_auth(), &body),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn non_numeric_rating_is_rejected() {
        let body = json!({ "id": 1, "comment": "ổn", "rating": "năm sao" });
        assert!(matches!(
            validate(&headers_with_auth(), &body),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn empty_comment_is_rejected() {
        let body = json!({ "id": 1, "comment": "" });
        assert!(matches!(
            validate(&headers_with_auth(), &body),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn missing_credential_is_unauthorized() {
        let body = json!({ "id": 1, "comment": "ổn" });
        assert!(matches!(
            validate(&HeaderMap::new(), &body),
            Err(ApiError::Unauthorized(_))
        ));
    }
}
