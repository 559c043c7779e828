//! Параметры companion AI (фиксируются при spawn)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::prompt::DEFAULT_PERSONA;

/// Ошибки загрузки конфигурации
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Параметры companion AI
///
/// Все поля имеют defaults, JSON override может задать любое подмножество.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct CompanionConfig {
    /// Верхняя граница скорости из LLM ответа (m/s)
    pub max_speed: f32,
    /// Радиус обнаружения (зарезервировано, логика не использует)
    pub detection_range: f32,
    /// Интервал между LLM запросами (секунды)
    pub ai_update_interval: f32,
    /// Максимальное время остановки до автоматического recovery (секунды)
    pub stop_timeout: f32,
    /// Радиус генерации patrol точки вокруг spawn позиции
    pub patrol_range: f32,
    /// System prompt (характер companion)
    pub persona: String,
    /// Сколько пар situation/reply хранить в chat history
    pub history_limit: usize,
    /// Отбрасывать ответы на запросы старше последнего применённого
    pub discard_stale_responses: bool,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            max_speed: 7.0,
            detection_range: 10.0,
            ai_update_interval: 5.0,
            stop_timeout: 10.0,
            patrol_range: 5.0,
            persona: DEFAULT_PERSONA.to_string(),
            history_limit: 10,
            discard_stale_responses: true,
        }
    }
}

impl CompanionConfig {
    /// JSON override поверх defaults + валидация
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_speed.is_finite() || self.max_speed < 0.0 {
            return Err(ConfigError::Invalid {
                field: "max_speed",
                reason: format!("must be finite and >= 0, got {}", self.max_speed),
            });
        }

        if !self.ai_update_interval.is_finite() || self.ai_update_interval <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "ai_update_interval",
                reason: format!("must be finite and > 0, got {}", self.ai_update_interval),
            });
        }

        if !self.stop_timeout.is_finite() || self.stop_timeout <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "stop_timeout",
                reason: format!("must be finite and > 0, got {}", self.stop_timeout),
            });
        }

        if !self.patrol_range.is_finite() || self.patrol_range < 0.0 {
            return Err(ConfigError::Invalid {
                field: "patrol_range",
                reason: format!("must be finite and >= 0, got {}", self.patrol_range),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CompanionConfig::default();
        assert_eq!(config.max_speed, 7.0);
        assert_eq!(config.detection_range, 10.0);
        assert_eq!(config.ai_update_interval, 5.0);
        assert_eq!(config.stop_timeout, 10.0);
        assert_eq!(config.patrol_range, 5.0);
        assert!(config.discard_stale_responses);
    }

    #[test]
    fn test_partial_json_override() {
        let config = CompanionConfig::from_json(r#"{ "max_speed": 4.5, "stop_timeout": 3 }"#)
            .expect("valid config");

        assert_eq!(config.max_speed, 4.5);
        assert_eq!(config.stop_timeout, 3.0);
        // Остальное — defaults
        assert_eq!(config.ai_update_interval, 5.0);
        assert_eq!(config.persona, DEFAULT_PERSONA);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = CompanionConfig::from_json(r#"{ "ai_update_interval": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "ai_update_interval", .. }));

        let err = CompanionConfig::from_json(r#"{ "max_speed": -1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_speed", .. }));

        let err = CompanionConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
