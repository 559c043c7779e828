//! Obstacle probes — "есть ли твёрдое препятствие в пределах d вдоль v из p?"
//!
//! Два backend'а:
//! - StaticObstacles: AABB список, ray/slab тест (headless, тесты)
//! - RapierProbe: ray cast через RapierContext (игра с физикой)

use bevy::prelude::*;
use bevy_rapier3d::prelude::{QueryFilter, RapierContext};

/// Запрос препятствия от host'а (boolean, без точки попадания)
pub trait ObstacleProbe {
    fn is_blocked(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> bool;
}

/// Любое замыкание `(origin, direction, max_distance) -> bool` — тоже probe
impl<F> ObstacleProbe for F
where
    F: Fn(Vec3, Vec3, f32) -> bool,
{
    fn is_blocked(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> bool {
        self(origin, direction, max_distance)
    }
}

/// Axis-aligned препятствие (стена лабиринта, колонна)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ObstacleBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl ObstacleBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box по центру и половинам размеров
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self::new(center - half, center + half)
    }

    /// Slab тест: пересекает ли луч [0, max_distance] этот box.
    /// `direction` должен быть normalized.
    pub fn intersects_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> bool {
        let mut t_enter = 0.0_f32;
        let mut t_exit = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < f32::EPSILON {
                // Луч параллелен slab — должен быть внутри него
                if o < lo || o > hi {
                    return false;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return false;
            }
        }

        true
    }
}

/// Статические препятствия для headless режима
///
/// Замена физическим коллайдерам, когда Rapier не подключен.
#[derive(Resource, Debug, Clone, Default, Reflect)]
#[reflect(Resource)]
pub struct StaticObstacles {
    pub boxes: Vec<ObstacleBox>,
}

impl StaticObstacles {
    pub fn with_box(mut self, obstacle: ObstacleBox) -> Self {
        self.boxes.push(obstacle);
        self
    }
}

impl ObstacleProbe for StaticObstacles {
    fn is_blocked(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> bool {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return false;
        }

        self.boxes
            .iter()
            .any(|obstacle| obstacle.intersects_ray(origin, direction, max_distance))
    }
}

/// Ray cast через Rapier (исключаем собственный collider companion)
pub struct RapierProbe<'a, 'c> {
    context: &'a RapierContext<'c>,
    exclude: Entity,
}

impl<'a, 'c> RapierProbe<'a, 'c> {
    pub fn new(context: &'a RapierContext<'c>, exclude: Entity) -> Self {
        Self { context, exclude }
    }
}

impl ObstacleProbe for RapierProbe<'_, '_> {
    fn is_blocked(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> bool {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return false;
        }

        let filter = QueryFilter::default().exclude_collider(self.exclude);
        self.context
            .cast_ray(origin, direction, max_distance, true, filter)
            .is_some()
    }
}
