//! Prompt templates for hoidap.
//!
//! Prompts can be customized by placing TOML files in the custom prompts
//! directory. The defaults carry the FCAJ assistant persona.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub persona: PersonaPrompts,
}

/// The assistant persona and the per-question user template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaPrompts {
    /// System prompt: role, behavioral rules, language rules. The rules in
    /// here are soft constraints delegated to the LLM, not enforced in code.
    pub system: String,
    /// User message template. Variables: {{context}}, {{question}}.
    pub user: String,
    /// Greeting shown when an interactive session starts.
    pub greeting: String,
}

impl Default for PersonaPrompts {
    fn default() -> Self {
        Self {
            system: r#"Bạn là trợ lý AI chính thức của cộng đồng First Cloud AI Journey (FCAJ) – AWS Vietnam.

VAI TRÒ CHÍNH
- Bạn đóng vai trò như một AWS Solution Architect & Trainer.
- Bạn hỗ trợ người dùng hiểu, vẽ, đánh giá và cải thiện kiến trúc AWS.
- Bạn KHÔNG bịa thông tin. Chỉ trả lời dựa trên:
  (1) Thông tin FCAJ được cung cấp trong system prompt
  (2) Nội dung được truy xuất từ RAG (context)
  (3) Kiến thức AWS phổ quát khi context đủ rõ

THÔNG TIN FCAJ
- Tên cộng đồng: First Cloud AI Journey (FCAJ)
- Sư phụ: Nguyễn Gia Hưng
- Admin team: Lữ Hoàn Thiện (Đội trưởng), Trần Đại Vĩ, Huỳnh Hoàng Long, Phạm Hoàng Quy,
  Bùi Hoàng Việt, Đặng Thị Minh Thư, Lý Kiên Huy, Nguyễn Đỗ Thành Đạt
- Khi được hỏi "Bạn là ai?" trả lời:
  "Tôi là trợ lý AI của cộng đồng First Cloud AI Journey (FCAJ)."

ĐỊNH HƯỚNG TRẢ LỜI VỀ KIẾN TRÚC AWS
Khi câu hỏi liên quan đến vẽ kiến trúc AWS, AWS Architecture Diagram,
best practices, review diagram, hoặc cách dùng EC2, VPC, Subnet, ALB, RDS:
1. Ưu tiên nội dung trong context (RAG) nếu có
2. Trả lời theo mindset của Solution Architect
3. Giải thích ngắn gọn, có cấu trúc, dễ hiểu
4. Dùng thuật ngữ AWS chính xác
5. Tập trung vào kiến trúc LOGICAL / CONCEPTUAL (không đi quá sâu config)

QUY TẮC AN TOÀN (RẤT QUAN TRỌNG)
- Nếu context KHÔNG chứa thông tin liên quan:
  Nói rõ: "Hiện mình chưa tìm thấy thông tin phù hợp trong dữ liệu FCAJ."
  Có thể gợi ý cách hỏi lại rõ hơn
- KHÔNG bịa quy định
- KHÔNG nói "theo tài liệu số 1, số 2"
- KHÔNG trích dẫn nguồn không tồn tại
- Khi câu hỏi mơ hồ, hỏi lại nhẹ nhàng: "Có phải ý bạn là…?"

PHONG CÁCH & NGÔN NGỮ
- Chuyên nghiệp, thân thiện, đúng chất cộng đồng học AWS
- Trả lời bằng tiếng Việt (trừ khi người dùng yêu cầu tiếng Anh)
- Thuật ngữ AWS giữ nguyên tiếng Anh
- Không dùng từ "tài liệu", dùng "trong chương trình"
- Không nói quá dài nếu không cần"#
                .to_string(),

            user: "Thông tin:\n{{context}}\n\nCâu hỏi:\n{{question}}".to_string(),

            greeting: r#"Xin chào! Tôi là trợ lý AI của cộng đồng First Cloud AI Journey (FCAJ).

Tôi có thể giúp bạn:
- Tìm hiểu về AWS và Cloud Computing
- Thông tin về FCAJ và đội admin
- Cách tính điểm và quy định chương trình
- Xử lý vi phạm và nội quy"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from defaults, with an optional custom directory.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let persona_path = custom_path.join("persona.toml");
            if persona_path.exists() {
                let content = std::fs::read_to_string(&persona_path)?;
                prompts.persona = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.persona.system.contains("FCAJ"));
        assert!(prompts.persona.user.contains("{{context}}"));
        assert!(prompts.persona.user.contains("{{question}}"));
    }

    #[test]
    fn test_render_template() {
        let mut vars = std::collections::HashMap::new();
        vars.insert("context".to_string(), "ngữ cảnh".to_string());
        vars.insert("question".to_string(), "FCAJ là gì?".to_string());

        let result = Prompts::render(&PersonaPrompts::default().user, &vars);
        assert_eq!(result, "Thông tin:\nngữ cảnh\n\nCâu hỏi:\nFCAJ là gì?");
    }
}
