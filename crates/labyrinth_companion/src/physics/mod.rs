//! Physics seam: obstacle probes для steering
//!
//! Сама физика (коллайдеры, гравитация) живёт у host'а,
//! companion только спрашивает "заблокировано ли направление".

pub mod probe;

// Re-export основных типов
pub use probe::{ObstacleBox, ObstacleProbe, RapierProbe, StaticObstacles};
