//! In-flight LLM запросы companion
//!
//! Запросы fire-and-forget: новый запрос не отменяет предыдущий.
//! Каждый запрос получает sequence number — ответ на запрос старше
//! последнего применённого можно отбросить (CompanionConfig::discard_stale_responses).

use bevy::prelude::*;
use bevy::tasks::Task;

use crate::llm::DecisionError;

/// Один отправленный запрос
pub struct PendingDecision {
    pub seq: u64,
    /// Situation, которую отправили (уйдёт в chat history вместе с ответом)
    pub situation: String,
    pub task: Task<Result<String, DecisionError>>,
}

/// Завершённый запрос, готовый к применению
#[derive(Debug)]
pub struct FinishedDecision {
    pub seq: u64,
    pub situation: String,
    pub result: Result<String, DecisionError>,
}

/// Timer между запросами
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct DecisionTimer {
    pub elapsed: f32,
}

impl DecisionTimer {
    /// true — интервал прошёл, пора отправлять запрос (таймер сброшен)
    pub fn tick(&mut self, delta: f32, interval: f32) -> bool {
        self.elapsed += delta;
        if self.elapsed >= interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
}

#[derive(Component, Default)]
pub struct PendingDecisions {
    next_seq: u64,
    last_applied: Option<u64>,
    in_flight: Vec<PendingDecision>,
}

impl PendingDecisions {
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn last_applied(&self) -> Option<u64> {
        self.last_applied
    }

    /// Следующий sequence number (монотонно растёт)
    pub fn issue_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    pub fn push(&mut self, pending: PendingDecision) {
        self.in_flight.push(pending);
    }

    /// Забирает завершённые запросы через `poll`, отсортированные по seq
    /// (если в одном тике пришло несколько — новейший применяется последним).
    pub fn drain_finished(
        &mut self,
        mut poll: impl FnMut(&mut Task<Result<String, DecisionError>>) -> Option<Result<String, DecisionError>>,
    ) -> Vec<FinishedDecision> {
        let mut finished = Vec::new();
        let mut index = 0;

        while index < self.in_flight.len() {
            match poll(&mut self.in_flight[index].task) {
                Some(result) => {
                    let pending = self.in_flight.swap_remove(index);
                    finished.push(FinishedDecision {
                        seq: pending.seq,
                        situation: pending.situation,
                        result,
                    });
                }
                None => index += 1,
            }
        }

        finished.sort_by_key(|decision| decision.seq);
        finished
    }

    /// Решает судьбу ответа с данным seq. true — применяем.
    pub fn accept(&mut self, seq: u64, discard_stale: bool) -> bool {
        if discard_stale && self.last_applied.is_some_and(|last| seq < last) {
            return false;
        }

        self.last_applied = Some(self.last_applied.map_or(seq, |last| last.max(seq)));
        true
    }
}
