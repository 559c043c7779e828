//! Companion компоненты: marker, target, animation, patrol

use bevy::prelude::*;
use rand::Rng;

use crate::ai::components::{CompanionConfig, DecisionState, DecisionTimer, PendingDecisions};
use crate::ai::prompt::ChatSession;

/// Companion NPC (LLM-driven спутник игрока)
///
/// Автоматически добавляет decision state, timers и chat session через Required Components.
/// Persona и history limit session берёт из CompanionConfig (sync_chat_sessions).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    CompanionConfig,
    DecisionState,
    DecisionTimer,
    PendingDecisions,
    ChatSession,
    CompanionTarget,
    AnimationSpeed
)]
pub struct Companion;

/// За кем следует companion
///
/// None — target ещё не найден (или despawned), ищем entity с `Player`.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CompanionTarget(pub Option<Entity>);

/// Параметр "Speed" для animator (host читает каждый кадр)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnimationSpeed(pub f32);

/// Patrol область вокруг spawn позиции
///
/// Зарезервировано: точка генерируется при spawn, control flow её не использует.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PatrolArea {
    pub origin: Vec3,
    pub range: f32,
    pub target: Vec3,
}

impl PatrolArea {
    /// Случайная точка в круге радиуса `range` вокруг `origin` (плоскость XZ)
    pub fn generate(origin: Vec3, range: f32, rng: &mut impl Rng) -> Self {
        let mut area = Self {
            origin,
            range,
            target: origin,
        };
        area.pick_new_target(rng);
        area
    }

    pub fn pick_new_target(&mut self, rng: &mut impl Rng) {
        if self.range <= 0.0 {
            self.target = self.origin;
            return;
        }

        // sqrt — равномерное распределение по площади круга
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let radius = rng.gen::<f32>().sqrt() * self.range;
        self.target = self.origin + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_patrol_target_within_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let origin = Vec3::new(3.0, 1.0, -2.0);

        for _ in 0..200 {
            let area = PatrolArea::generate(origin, 5.0, &mut rng);
            let offset = area.target - origin;
            assert!(offset.length() <= 5.0 + 1e-4, "offset = {:?}", offset);
            assert_eq!(offset.y, 0.0);
        }
    }

    #[test]
    fn test_patrol_deterministic_for_seed() {
        let a = PatrolArea::generate(Vec3::ZERO, 5.0, &mut ChaCha8Rng::seed_from_u64(42));
        let b = PatrolArea::generate(Vec3::ZERO, 5.0, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_range_stays_at_origin() {
        let area = PatrolArea::generate(Vec3::ONE, 0.0, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(area.target, Vec3::ONE);
    }
}
