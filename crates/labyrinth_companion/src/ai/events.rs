//! AI Events — события companion для host'а (dialogue UI, звук, debug overlay)

use bevy::prelude::*;

use crate::ai::components::Directive;

/// Companion что-то сказал (message часть применённого LLM ответа)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CompanionSpoke {
    pub entity: Entity,
    pub message: String,
}

/// Изменение decision state (для debug overlay / телеметрии)
#[derive(Event, Debug, Clone, PartialEq)]
pub enum CompanionDecisionEvent {
    /// Ответ применён (speed/directive после apply)
    Applied {
        entity: Entity,
        seq: u64,
        speed: f32,
        directive: Directive,
    },
    /// Неверный формат — применён fallback
    Fallback { entity: Entity, seq: u64 },
    /// Ответ на устаревший запрос отброшен
    StaleDropped { entity: Entity, seq: u64 },
    /// Stop timeout — companion снова двигается
    StopTimeoutRecovered { entity: Entity },
}
