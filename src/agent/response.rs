//! Structured chat responses and the parsing boundary that protects the API
//! from free-form model output.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown when the model's reply cannot be decoded into a structured response.
pub const FALLBACK_ANSWER: &str =
    "Oh oh, tôi đói bụng quá nên lỡ ăn mất câu trả lời rồi. Bạn hỏi lại được hông!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    ProductDetail,
    ProductList,
    GeneralInfo,
    NoInfo,
    Greeting,
    Clarification,
    OrderSupport,
    TechnicalSupport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfo {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Link,
    QuickReply,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub text: String,
    pub value: String,
}

/// The contract the chat model is instructed to produce. `response_type` is
/// mandatory so the UI always knows how to render the reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotResponse {
    pub answer: String,
    pub response_type: ResponseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_products: Option<Vec<ProductInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followup_questions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_actions: Option<Vec<SuggestedAction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalate_to_human: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl ChatbotResponse {
    pub fn fallback() -> Self {
        Self {
            answer: FALLBACK_ANSWER.to_string(),
            response_type: ResponseType::NoInfo,
            related_products: None,
            followup_questions: None,
            suggested_actions: None,
            escalate_to_human: None,
            metadata: None,
        }
    }
}

static FENCE: OnceLock<Regex> = OnceLock::new();

fn fence_regex() -> &'static Regex {
    FENCE.get_or_init(|| {
        Regex::new(r"```(?:json)?\s*(\{[\s\S]*?\})\s*```").expect("fence regex is valid")
    })
}

/// Decode the model's raw reply. Tries a fenced ```json block first, then
/// the whole text. `None` means the caller should fall back.
pub fn extract_structured_response(content: &str) -> Option<ChatbotResponse> {
    let candidate = fence_regex()
        .captures(content)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str())
        .unwrap_or(content);

    serde_json::from_str::<ChatbotResponse>(candidate.trim()).ok()
}
