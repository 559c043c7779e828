//! Player marker component
//!
//! Отмечает entity игрока. Companion следует за ним (или убегает от него).

use bevy::prelude::Component;

/// Marker component для player-controlled entity
///
/// Companion без явно назначенного target находит entity с этим компонентом
/// автоматически (см. `resolve_companion_target`).
///
/// # Single-player
/// В single-player режиме только один entity имеет этот компонент.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
