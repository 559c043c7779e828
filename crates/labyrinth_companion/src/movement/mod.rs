//! Movement controller companion
//!
//! Два шага каждый тик:
//! 1. target: куда идти (зависит от Directive и позиции игрока)
//! 2. steering: поворот + шаг к target с обходом препятствий (ray probes)
//!
//! Pathfinding нет — только локальное реактивное уклонение.

pub mod steering;
pub mod target;

pub use steering::{steer_towards, StepOutcome};
pub use target::movement_target;
