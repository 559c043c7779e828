//! Парсер LLM ответа
//!
//! Wire формат (одна строка): `speed,direction,message`
//! - speed: число, clamp в [0, max_speed] делает DecisionState
//! - direction: первая буква `t` (к игроку), `a` (от игрока), `p` (на месте)
//! - message: свободный текст, может содержать запятые

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::components::Directive;

/// Минимальное число полей в ответе
pub const RESPONSE_FIELD_COUNT: usize = 3;

/// Ответ не соответствует формату `speed,direction,message`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseFormatError {
    #[error("AI response format incorrect (got {fields} field(s)). Expected: speed,direction,message")]
    TooFewFields { fields: usize },
}

/// Разобранный ответ (живёт один apply, history не хранится)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResponse {
    /// None — поле 0 не парсится как число (speed не трогаем)
    pub speed: Option<f32>,
    /// None — поле 1 пустое (directive не трогаем)
    pub directive: Option<Directive>,
    /// Реплика companion (только для UI/лога)
    pub message: String,
}

impl ParsedResponse {
    pub fn parse(raw: &str) -> Result<Self, ResponseFormatError> {
        let fields: Vec<&str> = raw.split(',').collect();
        if fields.len() < RESPONSE_FIELD_COUNT {
            return Err(ResponseFormatError::TooFewFields {
                fields: fields.len(),
            });
        }

        Ok(Self {
            speed: parse_speed(fields[0]),
            directive: parse_directive(fields[1]),
            message: fields[2..].join(","),
        })
    }
}

/// NaN считаем нечисловым: его нельзя clamp'нуть в диапазон
fn parse_speed(field: &str) -> Option<f32> {
    field
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|speed| !speed.is_nan())
}

/// Смотрим только первую букву. Незнакомая буква = Hold.
fn parse_directive(field: &str) -> Option<Directive> {
    let letter = field.trim().chars().next()?;

    let directive = match letter.to_ascii_lowercase() {
        't' => Directive::Toward,
        'a' => Directive::Away,
        _ => Directive::Hold,
    };

    Some(directive)
}
