use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;

use crate::core::errors::ApiError;

/// Payload for the store backend's feedback-update endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackUpdate {
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub is_blocked: bool,
    pub block_reason: Option<String>,
}

/// Client for the remote feedback records owned by the store backend. The
/// caller's credential is forwarded verbatim; this service holds no
/// credentials of its own for that API.
#[derive(Clone)]
pub struct FeedbackClient {
    base_url: String,
    client: Client,
}

impl FeedbackClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub async fn update(
        &self,
        id: i64,
        update: &FeedbackUpdate,
        authorization: &str,
    ) -> Result<(), ApiError> {
        let url = format!("{}/feedback/update/{}", self.base_url, id);
        tracing::info!("Updating feedback record at {}", url);

        let res = self
            .client
            .put(&url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/json")
            .json(update)
            .send()
            .await
            .map_err(ApiError::internal)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Internal(format!(
                "Feedback update failed ({}): {}",
                status, text
            )));
        }

        Ok(())
    }
}
