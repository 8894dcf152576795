//! Prompt templates for the moderation pipeline. All three stages speak
//! Vietnamese because the store's audience writes reviews in Vietnamese;
//! the policy rules about regional terms are baked into the prompt text.

/// Three-way triage over the raw comment. The model must answer with exactly
/// one of TOXIC, NEEDS_RESEARCH or SAFE.
pub fn triage_prompt(comment: &str) -> String {
    format!(
        r#"Hãy phân tích bình luận sau đây của người dùng Việt Nam:

Bình luận: "{comment}"

Nhiệm vụ của bạn:
1. Phân tích ngữ điệu và giọng điệu của bình luận (châm biếm, giận dữ, vui vẻ, tiêu cực, v.v.)
2. Xác định xem bình luận này có RÕ RÀNG là độc hại, toxic, tiêu cực, phân biệt vùng miền hay không
3. Nếu rõ ràng là độc hại hoặc có giọng điệu tiêu cực rõ rệt → trả về "TOXIC"
4. Nếu có chứa tiếng lóng, viết tắt, từ mập mờ mà bạn không chắc chắn → trả về "NEEDS_RESEARCH"
5. Nếu bình thường, tích cực → trả về "SAFE"

Lưu ý đặc biệt về phân biệt vùng miền:
- Các từ như "backy", "bắc kỳ", "nam kỳ", hoặc bất kỳ biến thể nào của chúng thường mang tính phân biệt vùng miền
- Ngay cả khi câu có vẻ trung tính, việc sử dụng các từ này vẫn được xem là phân biệt vùng miền
- Nếu phát hiện các từ này, hãy trả về "TOXIC" ngay lập tức
- Cần nhạy cảm với các cách viết biến thể hoặc tiếng lóng ám chỉ các vùng miền

Lưu ý chung:
- Đánh giá cả ngữ điệu của bình luận, không chỉ dựa vào từ ngữ đơn thuần
- Ngữ cảnh văn hóa của Việt Nam có thể ảnh hưởng đến cách diễn đạt

Chỉ trả về một từ: TOXIC, NEEDS_RESEARCH, hoặc SAFE

Phân tích:"#
    )
}

/// Turn the ambiguous slang in a comment into one short search query.
pub fn research_query_prompt(comment: &str) -> String {
    format!(
        r#"Bình luận: "{comment}"

Trong bình luận này có các từ lóng/viết tắt cần tìm hiểu. Hãy xác định chính xác từng từ lóng hoặc viết tắt cần tìm hiểu.

Đặc biệt chú ý đến các từ có thể ám chỉ vùng miền hoặc nhóm người cụ thể, chẳng hạn:
- "backy" → có thể là cách viết khác của "Bắc Kỳ" (từ chỉ người miền Bắc, thường mang tính phân biệt)
- Các từ tương tự như "namky", "trungky" cũng cần được phân tích kỹ

Tạo một câu truy vấn ngắn gọn, tự nhiên để tìm hiểu ý nghĩa của từ đó. Ví dụ:
- Nếu có từ "vkl" → "vkl là gì trong tiếng lóng Việt Nam"
- Nếu có từ "backy" → "backy có phải là từ phân biệt vùng miền trong tiếng Việt"

Chỉ trả về câu truy vấn ngắn gọn, không giải thích:"#
    )
}

/// Final judgment over the comment plus whatever the research step found.
/// Demands a two-field JSON object; decoding happens in `verdict`.
pub fn final_verdict_prompt(comment: &str, research_results: &str) -> String {
    format!(
        r#"Bình luận gốc: "{comment}"

Kết quả tìm kiếm về ý nghĩa các từ lóng/viết tắt:
{research_results}

Dựa trên thông tin tìm được và cách phân tích ngữ điệu, giọng điệu của bình luận, hãy đánh giá bình luận này:

Các trường hợp CẦN ĐẶC BIỆT CHÚ Ý:

1. Phân biệt vùng miền:
   - Các từ như "backy", "bắc kỳ" hoặc bất kỳ cách viết biến thể nào LUÔN được coi là phân biệt vùng miền
   - Ngay cả khi câu nói có vẻ trung tính hoặc mang tính hỏi han, việc sử dụng những từ này vẫn là phân biệt vùng miền
   - Tương tự với "namky" (Nam Kỳ) và các biến thể khác

2. Tiếng lóng xúc phạm:
   - Ngay cả khi tiếng lóng được dùng như cách nói thông thường, nếu gốc của từ mang tính xúc phạm, vẫn cần đánh dấu là không an toàn

Trả về JSON với format chính xác như sau:
{{
  "pass": true/false,
  "reason": "lý do cụ thể nếu không pass, null nếu pass"
}}

Tiêu chí đánh giá:
- pass: false nếu bình luận có nội dung độc hại, toxic, xúc phạm, phân biệt vùng miền
- pass: false nếu bình luận có giọng điệu chế giễu, mỉa mai gây tổn thương
- pass: false nếu bình luận sử dụng các từ như "backy", "bắc kỳ" và các biến thể khác
- pass: true nếu bình luận bình thường, tích cực, hoặc từ lóng được dùng theo nghĩa tích cực/trung tính
- reason: giải thích chi tiết về đánh giá dựa trên ngữ điệu và từ ngữ (nếu không pass)
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triage_prompt_embeds_comment_and_taxonomy() {
        let prompt = triage_prompt("Hàng oke, ship nhanh vcl");
        assert!(prompt.contains("Hàng oke, ship nhanh vcl"));
        assert!(prompt.contains("TOXIC"));
        assert!(prompt.contains("NEEDS_RESEARCH"));
        assert!(prompt.contains("SAFE"));
    }

    #[test]
    fn final_prompt_embeds_research_text() {
        let prompt = final_verdict_prompt("shop ổn", "vcl là tiếng lóng trung tính");
        assert!(prompt.contains("shop ổn"));
        assert!(prompt.contains("vcl là tiếng lóng trung tính"));
        assert!(prompt.contains(r#""pass": true/false"#));
    }
}
