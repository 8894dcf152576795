use serde::{Deserialize, Serialize};

/// Terminal pass/fail judgment for a comment. `reason` is present exactly
/// when the comment is blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub pass: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Fixed reason attached when the block-list matches.
pub const REGIONAL_BLOCK_REASON: &str =
    "Bình luận có sử dụng từ ngữ mang tính phân biệt vùng miền";

/// Fixed reason attached when triage classifies the comment as toxic.
pub const TOXIC_REASON: &str =
    "Bình luận chứa nội dung rõ ràng độc hại, toxic hoặc tiêu cực";

/// Fixed reason for the fail-closed verdict when the final classifier output
/// cannot be decoded.
pub const ANALYSIS_ERROR_REASON: &str = "Lỗi trong việc phân tích bình luận";

impl Verdict {
    pub fn passed() -> Self {
        Self {
            pass: true,
            reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            pass: false,
            reason: Some(reason.into()),
        }
    }
}

/// Decode the final classifier's raw output into a verdict.
///
/// The model is asked for a bare JSON object but routinely wraps it in prose
/// or a markdown fence, so the outermost `{`...`}` substring is cut out first
/// and then decoded strictly. Anything that does not decode fails closed:
/// an unreadable judgment must never let a comment through.
pub fn parse_verdict(raw: &str) -> Verdict {
    extract_json_object(raw)
        .and_then(|candidate| serde_json::from_str::<Verdict>(candidate).ok())
        .unwrap_or_else(|| Verdict::failed(ANALYSIS_ERROR_REASON))
}

fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json_object() {
        let verdict = parse_verdict(r#"{"pass": true, "reason": null}"#);
        assert_eq!(verdict, Verdict::passed());
    }

    #[test]
    fn parses_fail_verdict_with_reason() {
        let verdict = parse_verdict(r#"{"pass": false, "reason": "từ lóng xúc phạm"}"#);
        assert!(!verdict.pass);
        assert_eq!(verdict.reason.as_deref(), Some("từ lóng xúc phạm"));
    }

    #[test]
    fn extracts_json_from_markdown_fence() {
        let raw = "Đây là đánh giá:\n```json\n{\"pass\": true, \"reason\": null}\n```\nHết.";
        assert_eq!(parse_verdict(raw), Verdict::passed());
    }

    #[test]
    fn extracts_json_from_surrounding_prose() {
        let raw = "Sau khi phân tích, kết quả là {\"pass\": false, \"reason\": \"phân biệt vùng miền\"} như trên.";
        let verdict = parse_verdict(raw);
        assert!(!verdict.pass);
        assert_eq!(verdict.reason.as_deref(), Some("phân biệt vùng miền"));
    }

    #[test]
    fn missing_reason_field_is_tolerated() {
        let verdict = parse_verdict(r#"{"pass": true}"#);
        assert!(verdict.pass);
        assert!(verdict.reason.is_none());
    }

    #[test]
    fn no_json_fails_closed() {
        let verdict = parse_verdict("Tôi không chắc chắn về bình luận này.");
        assert_eq!(verdict, Verdict::failed(ANALYSIS_ERROR_REASON));
    }

    #[test]
    fn invalid_json_fails_closed() {
        let verdict = parse_verdict("{pass: yes, reason: no}");
        assert_eq!(verdict, Verdict::failed(ANALYSIS_ERROR_REASON));
    }

    #[test]
    fn missing_pass_field_fails_closed() {
        let verdict = parse_verdict(r#"{"reason": "thiếu trường pass"}"#);
        assert_eq!(verdict, Verdict::failed(ANALYSIS_ERROR_REASON));
    }

    #[test]
    fn malformed_reason_type_fails_closed() {
        let verdict = parse_verdict(r#"{"pass": true, "reason": 42}"#);
        assert_eq!(verdict, Verdict::failed(ANALYSIS_ERROR_REASON));
    }

    #[test]
    fn empty_input_fails_closed() {
        assert_eq!(parse_verdict(""), Verdict::failed(ANALYSIS_ERROR_REASON));
    }
}
