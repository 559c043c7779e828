//! Decision systems: target lookup, LLM запросы, применение ответов, stop timeout.

use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::{block_on, futures_lite::future, AsyncComputeTaskPool};

use crate::ai::components::{
    CompanionConfig, DecisionState, DecisionTimer, PendingDecision, PendingDecisions,
    ResponseOutcome,
};
use crate::ai::events::{CompanionDecisionEvent, CompanionSpoke};
use crate::ai::prompt::ChatSession;
use crate::ai::situation::describe_situation;
use crate::components::{Companion, CompanionTarget, Player};
use crate::llm::DecisionBackend;

/// Система: chat session нового companion берёт persona и history limit из config
///
/// `#[require(ChatSession)]` даёт default session; если companion spawned
/// без `companion_bundle`, config применяется здесь.
pub fn sync_chat_sessions(
    mut companions: Query<(Entity, &CompanionConfig, &mut ChatSession), Added<Companion>>,
) {
    for (entity, config, mut session) in companions.iter_mut() {
        if session.persona() == config.persona && session.history_limit() == config.history_limit {
            continue;
        }
        if session.exchange_count() > 0 {
            crate::log_warning(&format!(
                "Companion {:?}: chat session already has history, config persona ignored",
                entity
            ));
            continue;
        }

        *session = ChatSession::new(config.persona.clone(), config.history_limit);
        crate::log(&format!("Companion {:?}: chat session synced from config", entity));
    }
}

/// Система: поиск игрока для companion без target
///
/// Если назначенный target despawned — ищем заново.
pub fn resolve_companion_target(
    mut companions: Query<(Entity, &mut CompanionTarget), With<Companion>>,
    players: Query<Entity, With<Player>>,
    alive: Query<(), With<Transform>>,
) {
    for (entity, mut target) in companions.iter_mut() {
        if let Some(current) = target.0 {
            if alive.contains(current) {
                continue;
            }
            crate::log(&format!(
                "Companion {:?}: target {:?} despawned, searching for Player",
                entity, current
            ));
        }

        let found = players.iter().next();
        if target.0 != found {
            if let Some(player) = found {
                crate::log_info(&format!("Companion {:?}: following Player {:?}", entity, player));
            }
            target.0 = found;
        }
    }
}

/// Система: забрать завершённые LLM запросы и применить ответы
///
/// Запускается на simulation schedule — ответ всегда применяется
/// в том же потоке, что и тик (никаких locks на DecisionState).
pub fn apply_decision_responses(
    mut companions: Query<
        (
            Entity,
            &CompanionConfig,
            &mut DecisionState,
            &mut PendingDecisions,
            &mut ChatSession,
        ),
        With<Companion>,
    >,
    mut spoke: EventWriter<CompanionSpoke>,
    mut decisions: EventWriter<CompanionDecisionEvent>,
) {
    for (entity, config, mut state, mut pending, mut session) in companions.iter_mut() {
        if pending.in_flight() == 0 {
            continue;
        }

        let finished = pending.drain_finished(|task| block_on(future::poll_once(task)));

        for decision in finished {
            let reply = match decision.result {
                Ok(reply) => reply,
                Err(error) => {
                    crate::log_error(&format!(
                        "Companion {:?}: decision request #{} failed: {}",
                        entity, decision.seq, error
                    ));
                    continue;
                }
            };

            if !pending.accept(decision.seq, config.discard_stale_responses) {
                crate::log_info(&format!(
                    "Companion {:?}: dropped stale response #{} (last applied #{:?}): {}",
                    entity,
                    decision.seq,
                    pending.last_applied(),
                    reply
                ));
                decisions.write(CompanionDecisionEvent::StaleDropped {
                    entity,
                    seq: decision.seq,
                });
                continue;
            }

            crate::log(&format!("AI Response #{}: {}", decision.seq, reply));

            match state.apply_response(&reply, config.max_speed) {
                ResponseOutcome::Applied(parsed) => {
                    decisions.write(CompanionDecisionEvent::Applied {
                        entity,
                        seq: decision.seq,
                        speed: state.speed(),
                        directive: state.directive(),
                    });

                    let message = parsed.message.trim();
                    if !message.is_empty() {
                        spoke.write(CompanionSpoke {
                            entity,
                            message: message.to_string(),
                        });
                    }
                }
                ResponseOutcome::Fallback(error) => {
                    crate::log_warning(&format!("Companion {:?}: {}", entity, error));
                    decisions.write(CompanionDecisionEvent::Fallback {
                        entity,
                        seq: decision.seq,
                    });
                }
            }

            session.record_exchange(decision.situation, reply);
        }
    }
}

/// Система: decision timer + stop timeout
///
/// Каждые `ai_update_interval` секунд отправляем situation (fire-and-forget).
/// Stop timeout тикает даже без игрока — companion не может стоять вечно.
pub fn tick_decision_timers(
    time: Res<Time<Fixed>>,
    backend: Option<Res<DecisionBackend>>,
    mut companions: Query<
        (
            Entity,
            &Transform,
            &CompanionConfig,
            &CompanionTarget,
            &ChatSession,
            &mut DecisionTimer,
            &mut DecisionState,
            &mut PendingDecisions,
        ),
        With<Companion>,
    >,
    targets: Query<&Transform, Without<Companion>>,
    mut decisions: EventWriter<CompanionDecisionEvent>,
) {
    let delta = time.delta_secs();

    for (entity, transform, config, target, session, mut timer, mut state, mut pending) in
        companions.iter_mut()
    {
        let player_position = target
            .0
            .and_then(|player| targets.get(player).ok())
            .map(|player_transform| player_transform.translation);

        if timer.tick(delta, config.ai_update_interval) {
            match (player_position, backend.as_deref()) {
                (Some(player), Some(backend)) => {
                    let distance = transform.translation.distance(player);
                    let situation = describe_situation(distance);
                    let seq = dispatch_query(backend, session, &mut pending, situation);
                    crate::log(&format!(
                        "Companion {:?}: query #{} sent (distance {:.1}, {} in flight)",
                        entity,
                        seq,
                        distance,
                        pending.in_flight()
                    ));
                }
                (None, _) => {}
                (_, None) => {
                    crate::log(&format!(
                        "Companion {:?}: no DecisionBackend, skipping query",
                        entity
                    ));
                }
            }
        }

        if state.tick_stop_timeout(delta, config.stop_timeout) {
            crate::log_info(&format!(
                "Companion {:?}: stop timeout reached, resuming normal following",
                entity
            ));
            decisions.write(CompanionDecisionEvent::StopTimeoutRecovered { entity });
        }
    }
}

/// Отправить situation в decision source (не блокирует тик)
fn dispatch_query(
    backend: &DecisionBackend,
    session: &ChatSession,
    pending: &mut PendingDecisions,
    situation: String,
) -> u64 {
    let seq = pending.issue_seq();
    let messages = session.outbound(&situation);
    let source = Arc::clone(&backend.0);

    let task = AsyncComputeTaskPool::get().spawn(async move { source.request(&messages) });

    pending.push(PendingDecision {
        seq,
        situation,
        task,
    });
    seq
}
