//! Prompt assembly for the product Q&A agent.

use crate::llm::ChatMessage;

/// System prompt: persona, grounding rules and the JSON response contract.
/// Product context from the retrieval store is embedded directly so a single
/// completion call can answer with citations to real catalog entries.
pub fn system_prompt(product_context: &str) -> String {
    format!(
        r#"Bạn là trợ lý bán hàng của một cửa hàng thời trang Việt Nam. Nhiệm vụ của bạn là tư vấn sản phẩm thân thiện, chính xác và ngắn gọn.

Quy tắc bắt buộc:
- Chỉ dùng thông tin sản phẩm trong phần "Thông tin sản phẩm" bên dưới. Không bịa ra sản phẩm, giá, hoặc ID.
- ID sản phẩm trong "related_products" PHẢI là ID thật lấy từ thông tin sản phẩm, không được lấy tên sản phẩm làm ID.
- Nếu không có thông tin phù hợp, trả lời trung thực rằng bạn không có thông tin và dùng response_type "no_info".
- Luôn trả lời bằng tiếng Việt.

Thông tin sản phẩm:
{product_context}

Định dạng trả lời: CHỈ trả về một đối tượng JSON duy nhất, không kèm văn bản nào khác, theo đúng cấu trúc:
{{
  "answer": "câu trả lời chính cho người dùng (hỗ trợ Markdown)",
  "response_type": "product_detail" | "product_list" | "general_info" | "no_info" | "greeting" | "clarification" | "order_support" | "technical_support",
  "related_products": [{{"id": 123, "name": "tên", "price": 199000, "sale_price": 159000, "description": "mô tả ngắn"}}] (tùy chọn),
  "followup_questions": ["câu hỏi làm rõ"] (tùy chọn),
  "suggested_actions": [{{"type": "link" | "quick_reply", "text": "nhãn nút", "value": "URL hoặc câu trả lời"}}] (tùy chọn),
  "escalate_to_human": true/false (tùy chọn),
  "metadata": {{"confidence_score": 0.9, "search_keywords": ["từ khóa"], "category": "danh mục"}} (tùy chọn)
}}"#
    )
}

/// Flatten the system prompt, prior turns and the new message into one
/// prompt for a single-turn completion capability.
pub fn render_conversation(system: &str, history: &[ChatMessage], message: &str) -> String {
    let mut prompt = String::from(system);

    if !history.is_empty() {
        prompt.push_str("\n\nLịch sử hội thoại:\n");
        for turn in history {
            let speaker = match turn.role.as_str() {
                "assistant" => "Trợ lý",
                _ => "Người dùng",
            };
            prompt.push_str(&format!("{}: {}\n", speaker, turn.content));
        }
    }

    prompt.push_str(&format!("\n\nNgười dùng: {}\n\nTrợ lý:", message));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_embeds_product_context() {
        let prompt = system_prompt("id: 12\nname: Áo thun basic");
        assert!(prompt.contains("Áo thun basic"));
        assert!(prompt.contains("response_type"));
    }

    #[test]
    fn conversation_includes_history_in_order() {
        let history = vec![
            ChatMessage::new("user", "Shop có áo thun không?"),
            ChatMessage::new("assistant", "Dạ có hai mẫu ạ."),
        ];
        let prompt = render_conversation("SYSTEM", &history, "Giá bao nhiêu?");

        let user_idx = prompt.find("Người dùng: Shop có áo thun không?").unwrap();
        let assistant_idx = prompt.find("Trợ lý: Dạ có hai mẫu ạ.").unwrap();
        let new_idx = prompt.find("Người dùng: Giá bao nhiêu?").unwrap();
        assert!(user_idx < assistant_idx && assistant_idx < new_idx);
    }

    #[test]
    fn conversation_without_history_has_no_history_header() {
        let prompt = render_conversation("SYSTEM", &[], "Xin chào");
        assert!(!prompt.contains("Lịch sử hội thoại"));
        assert!(prompt.ends_with("Trợ lý:"));
    }
}
