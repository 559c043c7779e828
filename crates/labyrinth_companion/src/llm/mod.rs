//! Decision source — внешний LLM, который выбирает поведение companion
//!
//! Трейт синхронный: запрос выполняется на AsyncComputeTaskPool,
//! результат забирает система на simulation schedule (см. ai::systems::decision).

use std::sync::Arc;

use bevy::prelude::*;
use thiserror::Error;

use crate::ai::prompt::ChatMessage;

pub mod ollama;
pub mod scripted;

pub use ollama::{OllamaDecisionSource, OllamaSettings};
pub use scripted::ScriptedDecisionSource;

/// Ошибки транспорта (сам ответ может быть любым текстом — его судьбу решает парсер)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecisionError {
    #[error("Decision request failed: {0}")]
    RequestFailed(String),
    #[error("Decision service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid decision payload: {0}")]
    InvalidPayload(String),
    #[error("Decision source exhausted")]
    Exhausted,
}

/// Внешний собеседник: messages (persona + history + situation) → одна строка ответа
pub trait DecisionSource: Send + Sync + 'static {
    fn request(&self, messages: &[ChatMessage]) -> Result<String, DecisionError>;
}

/// Активный decision source. Без этого resource запросы не отправляются.
#[derive(Resource, Clone)]
pub struct DecisionBackend(pub Arc<dyn DecisionSource>);

impl DecisionBackend {
    pub fn new(source: impl DecisionSource) -> Self {
        Self(Arc::new(source))
    }
}
