//! Chat-completion request body.

use serde::Serialize;

/// Persona sent as the system message on every call.
pub const SYSTEM_PROMPT: &str =
    "你是一位擅长分析微信公众号文章的专家，能够进行深入的语义分析、观点提取和结构分析。";

/// A single chat message.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`.
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system", content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user", content: content.into() }
    }
}

/// Non-streaming `POST /chat/completions` body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

impl ChatRequest {
    /// System persona plus one user prompt.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            max_tokens,
            temperature,
            stream: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let req = ChatRequest::new("glm-4", "请总结", 1500, 0.3);
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["model"], "glm-4");
        assert_eq!(json["max_tokens"], 1500);
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "请总结");
    }
}
