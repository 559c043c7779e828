//! Companion movement systems.

use bevy::prelude::*;
use bevy_rapier3d::prelude::ReadRapierContext;

use crate::ai::components::DecisionState;
use crate::components::{AnimationSpeed, Companion, CompanionTarget};
use crate::movement::{movement_target, steer_towards, StepOutcome};
use crate::physics::{ObstacleProbe, RapierProbe, StaticObstacles};

/// Система: movement (headless, StaticObstacles)
pub fn companion_movement(
    time: Res<Time<Fixed>>,
    obstacles: Res<StaticObstacles>,
    mut companions: Query<
        (&DecisionState, &CompanionTarget, &mut Transform, &mut AnimationSpeed),
        With<Companion>,
    >,
    players: Query<&Transform, Without<Companion>>,
) {
    let delta = time.delta_secs();

    for (state, target, mut transform, mut animation) in companions.iter_mut() {
        let Some(player) = player_position(target, &players) else {
            continue;
        };

        animation.set_if_neq(AnimationSpeed(state.speed()));
        drive_companion(state, &mut transform, player, delta, &*obstacles);
    }
}

/// Система: movement с Rapier ray cast (игра с физикой)
pub fn companion_movement_rapier(
    time: Res<Time<Fixed>>,
    rapier: ReadRapierContext,
    mut companions: Query<
        (
            Entity,
            &DecisionState,
            &CompanionTarget,
            &mut Transform,
            &mut AnimationSpeed,
        ),
        With<Companion>,
    >,
    players: Query<&Transform, Without<Companion>>,
) {
    let Ok(context) = rapier.single() else {
        return;
    };
    let delta = time.delta_secs();

    for (entity, state, target, mut transform, mut animation) in companions.iter_mut() {
        let Some(player) = player_position(target, &players) else {
            continue;
        };

        animation.set_if_neq(AnimationSpeed(state.speed()));
        let probe = RapierProbe::new(&context, entity);
        drive_companion(state, &mut transform, player, delta, &probe);
    }
}

fn player_position(target: &CompanionTarget, players: &Query<&Transform, Without<Companion>>) -> Option<Vec3> {
    let player = target.0?;
    players.get(player).ok().map(|transform| transform.translation)
}

/// Один тик движения. None — stopped (или speed 0), не двигались.
pub fn drive_companion(
    state: &DecisionState,
    transform: &mut Transform,
    player: Vec3,
    delta: f32,
    probe: &impl ObstacleProbe,
) -> Option<StepOutcome> {
    if !state.can_move() {
        return None;
    }

    let goal = movement_target(state.directive(), transform.translation, Some(player));
    Some(steer_towards(transform, goal, state.speed(), delta, probe))
}
