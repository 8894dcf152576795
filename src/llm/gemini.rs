use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::LlmProvider;
use crate::core::errors::ApiError;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini over the REST generative-language API.
#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    chat_model: String,
    embedding_model: String,
    temperature: f64,
    max_output_tokens: u32,
    client: Client,
}

impl GeminiProvider {
    pub fn new(
        api_key: String,
        chat_model: String,
        embedding_model: String,
        temperature: f64,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            api_key,
            chat_model,
            embedding_model,
            temperature,
            max_output_tokens,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String, ApiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            GEMINI_API_BASE, self.chat_model, self.api_key
        );

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_output_tokens,
            },
        });

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::internal)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Internal(format!(
                "Gemini completion error ({}): {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(ApiError::internal)?;
        extract_completion_text(&payload)
            .ok_or_else(|| ApiError::Internal("Gemini response contained no text".to_string()))
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/models/{}:batchEmbedContents?key={}",
            GEMINI_API_BASE, self.embedding_model, self.api_key
        );

        let requests: Vec<Value> = inputs
            .iter()
            .map(|input| {
                json!({
                    "model": format!("models/{}", self.embedding_model),
                    "content": { "parts": [{ "text": input }] },
                })
            })
            .collect();

        let res = self
            .client
            .post(&url)
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(ApiError::internal)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Internal(format!(
                "Gemini embedding error ({}): {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(ApiError::internal)?;
        let mut embeddings = Vec::new();
        if let Some(data) = payload["embeddings"].as_array() {
            for item in data {
                if let Some(values) = item["values"].as_array() {
                    let vector: Vec<f32> = values
                        .iter()
                        .filter_map(|v| v.as_f64().map(|f| f as f32))
                        .collect();
                    embeddings.push(vector);
                }
            }
        }

        if embeddings.len() != inputs.len() {
            return Err(ApiError::Internal(format!(
                "Gemini embedding count mismatch: {} != {}",
                embeddings.len(),
                inputs.len()
            )));
        }

        Ok(embeddings)
    }
}

/// Gemini may return multiple parts; join the text parts in order.
fn extract_completion_text(payload: &Value) -> Option<String> {
    let parts = payload["candidates"][0]["content"]["parts"].as_array()?;
    let text: Vec<&str> = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    if text.is_empty() {
        return None;
    }

    Some(text.join(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_part_text() {
        let payload = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "SAFE" }] }
            }]
        });
        assert_eq!(extract_completion_text(&payload).as_deref(), Some("SAFE"));
    }

    #[test]
    fn joins_multiple_parts() {
        let payload = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"pass\":" }, { "text": " true}" }] }
            }]
        });
        assert_eq!(
            extract_completion_text(&payload).as_deref(),
            Some("{\"pass\": true}")
        );
    }

    #[test]
    fn missing_candidates_yields_none() {
        let payload = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(extract_completion_text(&payload).is_none());
    }
}
