//! Companion AI: LLM decision cycle → bounded movement command
//!
//! Поток данных:
//! decision timer → situation encoder → LLM (async task) → response parser →
//! DecisionState → movement controller → Transform.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod prompt;
pub mod response;
pub mod situation;
pub mod systems;

// Re-export основных типов
pub use components::{CompanionConfig, DecisionState, Directive};
pub use events::{CompanionDecisionEvent, CompanionSpoke};

use crate::components::{AnimationSpeed, Companion, CompanionTarget, PatrolArea};
use crate::physics::StaticObstacles;

/// Откуда steering берёт препятствия
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObstacleBackend {
    /// StaticObstacles resource (headless)
    #[default]
    Static,
    /// Rapier ray cast (host должен добавить RapierPhysicsPlugin)
    Rapier,
}

/// Companion AI Plugin
///
/// Регистрирует системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. sync_chat_sessions — persona/history limit из config для новых companion
/// 2. resolve_companion_target — найти Player
/// 3. apply_decision_responses — применить пришедшие LLM ответы
/// 4. tick_decision_timers — новый запрос по интервалу + stop timeout
/// 5. companion_movement — target + steering
#[derive(Default)]
pub struct CompanionPlugin {
    pub obstacles: ObstacleBackend,
}

impl Plugin for CompanionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CompanionSpoke>()
            .add_event::<CompanionDecisionEvent>()
            .init_resource::<StaticObstacles>()
            .register_type::<Companion>()
            .register_type::<CompanionConfig>()
            .register_type::<DecisionState>()
            .register_type::<CompanionTarget>()
            .register_type::<AnimationSpeed>()
            .register_type::<PatrolArea>();

        match self.obstacles {
            ObstacleBackend::Static => {
                app.add_systems(
                    FixedUpdate,
                    (
                        systems::sync_chat_sessions,
                        systems::resolve_companion_target,
                        systems::apply_decision_responses,
                        systems::tick_decision_timers,
                        systems::companion_movement,
                    )
                        .chain(), // Последовательное выполнение для детерминизма
                );
            }
            ObstacleBackend::Rapier => {
                app.add_systems(
                    FixedUpdate,
                    (
                        systems::sync_chat_sessions,
                        systems::resolve_companion_target,
                        systems::apply_decision_responses,
                        systems::tick_decision_timers,
                        systems::companion_movement_rapier,
                    )
                        .chain(),
                );
            }
        }
    }
}
