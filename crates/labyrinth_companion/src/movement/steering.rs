//! Steering: поворот + шаг к target с обходом препятствий
//!
//! Алгоритм (один тик):
//! - dead zone 0.5м: уже на месте → ничего не делаем (без дрожания)
//! - slerp поворот к target, t = 5·dt (ограничен, не мгновенный)
//! - probe вперёд (1м, с высоты 0.5м): чисто → шаг speed·dt
//! - заблокировано → probe ±45° (сначала вправо), шаг на половинной скорости
//! - всё заблокировано → ждём на месте

use std::f32::consts::FRAC_PI_4;

use bevy::prelude::*;

use crate::physics::ObstacleProbe;

/// Ближе этого к target не двигаемся
pub const ARRIVE_DEAD_ZONE: f32 = 0.5;
/// Допуск dead zone: back-off шаг (ровно 0.5м) после округления float
/// бывает 0.49999997 и не должен считаться "на месте"
pub const ARRIVE_TOLERANCE: f32 = 1e-4;
/// Скорость поворота (множитель dt для slerp)
pub const TURN_RATE: f32 = 5.0;
/// Длина probe луча
pub const PROBE_LENGTH: f32 = 1.0;
/// Высота начала probe над позицией (луч не цепляет пол)
pub const PROBE_HEIGHT: f32 = 0.5;
/// Угол обходных probe
pub const DETOUR_ANGLE: f32 = FRAC_PI_4;
/// Обход идёт на половинной скорости
pub const DETOUR_SPEED_FACTOR: f32 = 0.5;

/// Что произошло в этом тике
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// В dead zone target, не двигались
    Arrived,
    /// Прямой шаг к target
    Advanced { direction: Vec3 },
    /// Обход препятствия под ±45°
    Detoured { direction: Vec3 },
    /// Все три probe заблокированы — стоим
    Blocked,
}

/// Один тик движения к `target`
pub fn steer_towards(
    transform: &mut Transform,
    target: Vec3,
    speed: f32,
    delta: f32,
    probe: &impl ObstacleProbe,
) -> StepOutcome {
    let to_target = target - transform.translation;
    if to_target.length() < ARRIVE_DEAD_ZONE - ARRIVE_TOLERANCE {
        return StepOutcome::Arrived;
    }

    let direction = to_target.normalize_or_zero();
    face_towards(transform, direction, delta);

    let origin = transform.translation + Vec3::Y * PROBE_HEIGHT;

    if !probe.is_blocked(origin, direction, PROBE_LENGTH) {
        transform.translation += direction * speed * delta;
        return StepOutcome::Advanced { direction };
    }

    // Bevy: forward = -Z, поворот вокруг Y на отрицательный угол = направо
    for angle in [-DETOUR_ANGLE, DETOUR_ANGLE] {
        let detour = Quat::from_rotation_y(angle) * direction;
        if !probe.is_blocked(origin, detour, PROBE_LENGTH) {
            transform.translation += detour * speed * DETOUR_SPEED_FACTOR * delta;
            return StepOutcome::Detoured { direction: detour };
        }
    }

    StepOutcome::Blocked
}

/// Плавный поворот (slerp) к направлению движения
fn face_towards(transform: &mut Transform, direction: Vec3, delta: f32) {
    if direction == Vec3::ZERO {
        return;
    }

    let target_rotation = Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation;
    let t = (delta * TURN_RATE).clamp(0.0, 1.0);
    transform.rotation = transform.rotation.slerp(target_rotation, t);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::StaticObstacles;

    const DT: f32 = 1.0 / 60.0;

    fn clear() -> StaticObstacles {
        StaticObstacles::default()
    }

    #[test]
    fn test_dead_zone_no_movement() {
        let mut transform = Transform::from_translation(Vec3::ZERO);
        let outcome = steer_towards(&mut transform, Vec3::new(0.3, 0.0, 0.0), 3.0, DT, &clear());

        assert_eq!(outcome, StepOutcome::Arrived);
        assert_eq!(transform.translation, Vec3::ZERO);
        assert_eq!(transform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_clear_path_advances_speed_dt() {
        let mut transform = Transform::from_translation(Vec3::ZERO);
        let outcome = steer_towards(&mut transform, Vec3::new(10.0, 0.0, 0.0), 3.0, 0.1, &clear());

        assert!(matches!(outcome, StepOutcome::Advanced { .. }));
        assert!((transform.translation - Vec3::new(0.3, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_rotation_is_bounded() {
        let mut transform = Transform::from_translation(Vec3::ZERO);
        // Target справа: полный поворот на 90°
        steer_towards(&mut transform, Vec3::new(10.0, 0.0, 0.0), 3.0, DT, &clear());

        let facing = transform.forward().as_vec3();
        let full = Transform::IDENTITY.looking_to(Vec3::X, Vec3::Y).rotation;
        assert!(facing.dot(Vec3::X) < 0.5, "rotated too far in one tick: {:?}", facing);
        assert!(transform.rotation.angle_between(full) > 0.1);

        // Большой dt — t clamp к 1, смотрим точно на target
        steer_towards(&mut transform, Vec3::new(10.0, 0.0, 0.0), 3.0, 0.5, &clear());
        assert!(transform.forward().as_vec3().dot(Vec3::X) > 0.999);
    }

    #[test]
    fn test_probe_starts_above_ground() {
        let mut transform = Transform::from_translation(Vec3::new(1.0, 0.0, 1.0));
        let probe = |origin: Vec3, _: Vec3, max_distance: f32| {
            assert!((origin.y - PROBE_HEIGHT).abs() < 1e-6);
            assert_eq!(max_distance, PROBE_LENGTH);
            false
        };

        steer_towards(&mut transform, Vec3::new(5.0, 0.0, 1.0), 3.0, DT, &probe);
    }

    #[test]
    fn test_blocked_forward_detours_right_at_half_speed() {
        let mut transform = Transform::from_translation(Vec3::ZERO);
        // Блокируем только прямое направление (+X)
        let probe = |_: Vec3, direction: Vec3, _: f32| direction.dot(Vec3::X) > 0.99;

        let outcome = steer_towards(&mut transform, Vec3::new(10.0, 0.0, 0.0), 4.0, 0.1, &probe);

        let StepOutcome::Detoured { direction } = outcome else {
            panic!("expected detour, got {:?}", outcome);
        };
        // Направо от +X (Y вверх) — это +Z
        assert!(direction.z > 0.5, "direction = {:?}", direction);
        assert!((transform.translation.length() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_blocked_forward_and_right_detours_left() {
        let mut transform = Transform::from_translation(Vec3::ZERO);
        let probe = |_: Vec3, direction: Vec3, _: f32| direction.z >= -0.01;

        let outcome = steer_towards(&mut transform, Vec3::new(10.0, 0.0, 0.0), 4.0, 0.1, &probe);

        let StepOutcome::Detoured { direction } = outcome else {
            panic!("expected detour, got {:?}", outcome);
        };
        assert!(direction.z < -0.5, "direction = {:?}", direction);
    }

    #[test]
    fn test_all_probes_blocked_no_movement() {
        let start = Vec3::new(2.0, 0.0, -3.0);
        let mut transform = Transform::from_translation(start);
        let walled = |_: Vec3, _: Vec3, _: f32| true;

        let outcome = steer_towards(&mut transform, Vec3::new(10.0, 0.0, 0.0), 7.0, 0.1, &walled);

        assert_eq!(outcome, StepOutcome::Blocked);
        assert_eq!(transform.translation, start);
    }
}
