//! Decision state companion AI
//!
//! Две оси состояния:
//! - Directive: Toward / Away / Hold (куда двигаться относительно игрока)
//! - Stop flag: speed == 0, с таймером для автоматического recovery
//!
//! Меняется ТОЛЬКО через transition методы (apply_response, apply_fallback,
//! tick_stop_timeout), прямой записи в поля нет.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::response::{ParsedResponse, ResponseFormatError};

/// Скорость "normal following": начальная, fallback и после stop timeout
pub const DEFAULT_SPEED: f32 = 3.0;

/// Намерение движения относительно игрока
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum Directive {
    /// Следовать за игроком (держим 2-4 метра)
    Toward,
    /// Убегать от игрока
    Away,
    /// Стоять на месте (подтягиваемся только если игрок далеко)
    #[default]
    Hold,
}

/// Результат применения одного LLM ответа
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    /// Ответ разобран и применён
    Applied(ParsedResponse),
    /// Формат неверный — применён fallback (speed 3, Hold)
    Fallback(ResponseFormatError),
}

/// Текущее решение companion
///
/// Инварианты:
/// - 0 ≤ speed ≤ max_speed
/// - is_stopped ⇒ speed == 0
/// - stop_elapsed сбрасывается в 0 при каждом входе в Stopped
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DecisionState {
    speed: f32,
    directive: Directive,
    is_stopped: bool,
    stop_elapsed: f32,
}

impl Default for DecisionState {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            directive: Directive::Hold,
            is_stopped: false,
            stop_elapsed: 0.0,
        }
    }
}

impl DecisionState {
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn directive(&self) -> Directive {
        self.directive
    }

    pub fn is_stopped(&self) -> bool {
        self.is_stopped
    }

    pub fn stop_elapsed(&self) -> f32 {
        self.stop_elapsed
    }

    /// Двигаемся в этом тике?
    pub fn can_move(&self) -> bool {
        !self.is_stopped && self.speed > 0.0
    }

    /// Разобрать сырой ответ и применить. Ошибки не пробрасываются:
    /// неверный формат → fallback.
    pub fn apply_response(&mut self, raw: &str, max_speed: f32) -> ResponseOutcome {
        match ParsedResponse::parse(raw) {
            Ok(parsed) => {
                self.apply_parsed(&parsed, max_speed);
                ResponseOutcome::Applied(parsed)
            }
            Err(error) => {
                self.apply_fallback();
                ResponseOutcome::Fallback(error)
            }
        }
    }

    pub fn apply_parsed(&mut self, parsed: &ParsedResponse, max_speed: f32) {
        if let Some(speed) = parsed.speed {
            self.set_speed(speed, max_speed);
        }

        if let Some(directive) = parsed.directive {
            self.directive = directive;
        }
    }

    /// Fallback triple: speed 3, Hold, движение разрешено
    pub fn apply_fallback(&mut self) {
        self.speed = DEFAULT_SPEED;
        self.directive = Directive::Hold;
        self.is_stopped = false;
    }

    /// Stop timeout. Возвращает true если сработал recovery в этом тике.
    pub fn tick_stop_timeout(&mut self, delta: f32, stop_timeout: f32) -> bool {
        if !self.is_stopped {
            return false;
        }

        self.stop_elapsed += delta;
        if self.stop_elapsed < stop_timeout {
            return false;
        }

        self.speed = DEFAULT_SPEED;
        self.directive = Directive::Hold;
        self.is_stopped = false;
        self.stop_elapsed = 0.0;
        true
    }

    fn set_speed(&mut self, speed: f32, max_speed: f32) {
        let clamped = speed.clamp(0.0, max_speed.max(0.0));

        if clamped == 0.0 {
            // -0.0 тоже сюда
            self.speed = 0.0;
            self.is_stopped = true;
            self.stop_elapsed = 0.0;
        } else {
            self.speed = clamped;
            self.is_stopped = false;
        }
    }
}
