//! Situation encoder: дистанция до игрока → narrative для LLM
//!
//! Шесть фиксированных полос (≤2, ≤3, ≤5, ≤10, ≤15, >15 метров).
//! Полосы упорядочены и не пересекаются, любая дистанция попадает ровно в одну.

use serde::{Deserialize, Serialize};

/// Полоса дистанции до игрока
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceBand {
    /// ≤ 2 — паника, слишком близко
    TooClose,
    /// ≤ 3 — рядом
    RightNext,
    /// ≤ 5 — комфортная дистанция
    GoodDistance,
    /// ≤ 10 — начинаем нервничать
    GettingFar,
    /// ≤ 15 — страшно
    QuiteFar,
    /// > 15 — почти потеряли игрока
    BarelyVisible,
}

impl DistanceBand {
    pub fn from_distance(distance: f32) -> Self {
        if distance <= 2.0 {
            Self::TooClose
        } else if distance <= 3.0 {
            Self::RightNext
        } else if distance <= 5.0 {
            Self::GoodDistance
        } else if distance <= 10.0 {
            Self::GettingFar
        } else if distance <= 15.0 {
            Self::QuiteFar
        } else {
            Self::BarelyVisible
        }
    }

    /// Текст от первого лица, дистанция с одним знаком после запятой
    pub fn narrative(self, distance: f32) -> String {
        match self {
            Self::TooClose => format!(
                "AAAAHH I am way too close to my companion ({:.1} units away). I feel scared and trapped! I need to run away as far as I can!",
                distance
            ),
            Self::RightNext => format!(
                "I'm right next to my companion ({:.1} units away). I feel safer being close to them, but maybe I'm too close?",
                distance
            ),
            Self::GoodDistance => format!(
                "I'm following my companion at a good distance ({:.1} units away). This feels like a safe distance to travel together.",
                distance
            ),
            Self::GettingFar => format!(
                "My companion is getting a bit far away ({:.1} units). I'm starting to feel nervous being this far apart in this spooky labyrinth.",
                distance
            ),
            Self::QuiteFar => format!(
                "Oh no! My companion is quite far away ({:.1} units)! I'm getting scared being alone in this dark labyrinth. Should I hurry to catch up?",
                distance
            ),
            Self::BarelyVisible => format!(
                "I can barely see my companion anymore ({:.1} units away)! I'm terrified of being alone in this maze. What if something happens to me?",
                distance
            ),
        }
    }
}

pub fn describe_situation(distance: f32) -> String {
    DistanceBand::from_distance(distance).narrative(distance)
}
