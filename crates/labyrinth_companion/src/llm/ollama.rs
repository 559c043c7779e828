//! Ollama chat client (`POST /api/chat`, non-streaming)

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{DecisionError, DecisionSource};
use crate::ai::prompt::ChatMessage;

/// Default Ollama base URL.
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Default model для companion (маленькая модель, быстрый ответ).
pub const DEFAULT_OLLAMA_MODEL: &str = "gemma3:4b";

/// Настройки подключения к Ollama
#[derive(Debug, Clone, PartialEq)]
pub struct OllamaSettings {
    pub base_url: String,
    pub model: String,
    /// Timeout самого HTTP запроса (stop timeout companion тут ни при чём)
    pub timeout: Duration,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl OllamaSettings {
    /// `OLLAMA_BASE_URL` и `OLLAMA_MODEL`, иначе defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("OLLAMA_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("OLLAMA_MODEL").unwrap_or(defaults.model),
            timeout: defaults.timeout,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Decision source поверх локального Ollama
#[derive(Clone)]
pub struct OllamaDecisionSource {
    client: Client,
    chat_url: String,
    model: String,
}

impl OllamaDecisionSource {
    pub fn new(settings: &OllamaSettings) -> Result<Self, DecisionError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| DecisionError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            chat_url: chat_url(&settings.base_url),
            model: settings.model.clone(),
        })
    }

    pub fn from_env() -> Result<Self, DecisionError> {
        Self::new(&OllamaSettings::from_env())
    }
}

fn chat_url(base_url: &str) -> String {
    format!("{}/api/chat", base_url.trim_end_matches('/'))
}

impl DecisionSource for OllamaDecisionSource {
    fn request(&self, messages: &[ChatMessage]) -> Result<String, DecisionError> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        let response = self
            .client
            .post(&self.chat_url)
            .json(&body)
            .send()
            .map_err(|e| DecisionError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .map_err(|e| DecisionError::RequestFailed(e.to_string()))?;
            return Err(DecisionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .map_err(|e| DecisionError::RequestFailed(e.to_string()))?;

        parse_chat_response(&text)
    }
}

fn parse_chat_response(text: &str) -> Result<String, DecisionError> {
    let parsed: ChatResponse =
        serde_json::from_str(text).map_err(|e| DecisionError::InvalidPayload(e.to_string()))?;

    Ok(strip_wrapping_quotes(parsed.message.content.trim()).to_string())
}

/// Модель иногда оборачивает весь ответ в кавычки (как в примерах persona).
/// Снимаем только парные кавычки вокруг всего ответа.
fn strip_wrapping_quotes(reply: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = reply
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::prompt::ChatRole;

    #[test]
    fn test_chat_url_trims_slash() {
        assert_eq!(chat_url("http://localhost:11434/"), "http://localhost:11434/api/chat");
        assert_eq!(chat_url("http://host:1"), "http://host:1/api/chat");
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![
            ChatMessage::new(ChatRole::System, "persona"),
            ChatMessage::new(ChatRole::User, "far"),
        ];
        let body = ChatRequest {
            model: "gemma3:4b",
            messages: &messages,
            stream: false,
        };

        let json: serde_json::Value = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gemma3:4b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "far");
    }

    #[test]
    fn test_parse_chat_response() {
        let text = r#"{"model":"gemma3:4b","message":{"role":"assistant","content":" '3,t,Wait for me!'\n"},"done":true}"#;
        assert_eq!(parse_chat_response(text).unwrap(), "3,t,Wait for me!");

        let quoted = r#"{"message":{"role":"assistant","content":"\"2,a,Run!\""}}"#;
        assert_eq!(parse_chat_response(quoted).unwrap(), "2,a,Run!");

        let err = parse_chat_response(r#"{"error":"model not found"}"#).unwrap_err();
        assert!(matches!(err, DecisionError::InvalidPayload(_)));
    }

    #[test]
    fn test_inner_quotes_survive() {
        let text = r#"{"message":{"role":"assistant","content":"3,t,He said \"run\""}}"#;
        assert_eq!(parse_chat_response(text).unwrap(), r#"3,t,He said "run""#);

        assert_eq!(strip_wrapping_quotes(r#""4,t,Hi""#), "4,t,Hi");
        assert_eq!(strip_wrapping_quotes(r#"'4,t,Hi""#), r#"'4,t,Hi""#);
        assert_eq!(strip_wrapping_quotes("\""), "\"");
    }
}
