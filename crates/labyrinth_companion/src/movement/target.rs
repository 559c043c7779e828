//! Target point из Directive

use bevy::prelude::*;

use crate::ai::components::Directive;

/// Toward: ближе этого — чуть отступаем (дальше — идём к игроку, и догоняя, и следуя)
pub const FOLLOW_NEAR: f32 = 2.0;
/// Toward: шаг отступления от игрока
pub const BACK_OFF_STEP: f32 = 0.5;
/// Away: насколько далеко убегаем (пересчитывается каждый тик)
pub const FLEE_DISTANCE: f32 = 8.0;
/// Hold: дальше этого — всё равно подтягиваемся к игроку
pub const HOLD_RECOVER_DISTANCE: f32 = 6.0;

/// Куда companion хочет попасть в этом тике
///
/// Без игрока — стоим на месте.
pub fn movement_target(directive: Directive, position: Vec3, player: Option<Vec3>) -> Vec3 {
    let Some(player) = player else {
        return position;
    };

    let distance = position.distance(player);

    match directive {
        Directive::Toward => {
            if distance < FOLLOW_NEAR {
                // Держим дистанцию 2-4 метра без отдельного controller'а
                let to_player = (player - position).normalize_or_zero();
                position - to_player * BACK_OFF_STEP
            } else {
                player
            }
        }

        Directive::Away => {
            let away = (position - player).normalize_or_zero();
            position + away * FLEE_DISTANCE
        }

        Directive::Hold => {
            if distance > HOLD_RECOVER_DISTANCE {
                player
            } else {
                position
            }
        }
    }
}
