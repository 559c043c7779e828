//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - companion: LLM-driven спутник (Companion, CompanionTarget, AnimationSpeed, PatrolArea)
//! - player: player marker (Player)
//!
//! Decision state и config companion живут в `ai::components`.

pub mod companion;
pub mod player;

// Re-exports для удобного импорта
pub use companion::*;
pub use player::*;
