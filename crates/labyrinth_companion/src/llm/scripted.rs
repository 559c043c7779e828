//! Scripted decision source — заранее заданные ответы
//!
//! Для headless прогонов и тестов (без сети и без модели).

use std::sync::atomic::{AtomicUsize, Ordering};

use super::{DecisionError, DecisionSource};
use crate::ai::prompt::ChatMessage;

pub struct ScriptedDecisionSource {
    responses: Vec<String>,
    cursor: AtomicUsize,
    repeat: bool,
}

impl ScriptedDecisionSource {
    /// Ответы по кругу
    pub fn cycle<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            cursor: AtomicUsize::new(0),
            repeat: true,
        }
    }

    /// Каждый ответ один раз, дальше `DecisionError::Exhausted`
    pub fn once<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            repeat: false,
            ..Self::cycle(responses)
        }
    }

    /// Сколько запросов уже обслужено
    pub fn served(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl DecisionSource for ScriptedDecisionSource {
    fn request(&self, _messages: &[ChatMessage]) -> Result<String, DecisionError> {
        if self.responses.is_empty() {
            return Err(DecisionError::Exhausted);
        }

        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        if self.repeat {
            Ok(self.responses[index % self.responses.len()].clone())
        } else {
            self.responses
                .get(index)
                .cloned()
                .ok_or(DecisionError::Exhausted)
        }
    }
}
