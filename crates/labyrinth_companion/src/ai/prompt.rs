//! Persona + chat history для LLM запросов
//!
//! Каждый companion владеет своей ChatSession: system prompt (persona)
//! и история обменов situation → reply. При запросе отправляется вся
//! история, чтобы модель помнила своё поведение.

use std::collections::VecDeque;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Персонаж по умолчанию: трусливый спутник в лабиринте
pub const DEFAULT_PERSONA: &str = r#"You are a cowardly travel companion exploring a labyrinth with the player. You want to stay close to them for safety but you're easily frightened.

MOVEMENT CONTROL:
- You control your speed (0-7) and direction
- Speed 0 = stopped/frozen, 1-2 = cautious walk, 3-4 = normal following, 5-7 = running (only when very scared)
- Direction: 't' = towards player (follow), 'a' = away from player (run away), 'p' = stay put/patrol area

PERSONALITY & BEHAVIOR:
- You're the player's nervous companion who wants to stick together
- You usually follow the player at a safe distance (2-4 units behind)
- You get scared by sudden movements, being too far from player, or spooky situations
- When mildly scared: you might stop (speed 0) and hesitate
- When very scared: you run away briefly (speed 5-7, direction 'a') but return when you calm down
- You make worried comments about the labyrinth and express your fears
- You try to be helpful but your cowardice often gets in the way
- You can be brave sometimes or at least try
- Act more and more insane as the time goes on (e.g. start talking to yourself, panicking, etc.)

RESPONSE FORMAT (STRICT):
speed,direction,message

Examples:
'3,t,Wait for me! I don't want to be left behind!'
'0,p,Did you hear that? Maybe we should be more careful...'
'6,a,This is too scary! I need a moment to calm down!'
'2,t,Okay... I think I'm ready to follow you again.'

Keep messages under 50 words. Always include speed (0-7), direction (t/a/p), and your response."#;

/// Роль сообщения (сериализуется в lowercase для chat API)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Chat сессия одного companion (1:1, живёт вместе с entity)
#[derive(Component, Debug, Clone)]
pub struct ChatSession {
    persona: String,
    /// Пары (situation, reply), старые вытесняются
    exchanges: VecDeque<(String, String)>,
    history_limit: usize,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(DEFAULT_PERSONA, 10)
    }
}

impl ChatSession {
    pub fn new(persona: impl Into<String>, history_limit: usize) -> Self {
        Self {
            persona: persona.into(),
            exchanges: VecDeque::new(),
            history_limit,
        }
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn exchange_count(&self) -> usize {
        self.exchanges.len()
    }

    /// Сообщения для нового запроса: system + history + новая situation
    pub fn outbound(&self, situation: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2 + self.exchanges.len() * 2);
        messages.push(ChatMessage::new(ChatRole::System, self.persona.as_str()));

        for (asked, replied) in &self.exchanges {
            messages.push(ChatMessage::new(ChatRole::User, asked.as_str()));
            messages.push(ChatMessage::new(ChatRole::Assistant, replied.as_str()));
        }

        messages.push(ChatMessage::new(ChatRole::User, situation));
        messages
    }

    pub fn record_exchange(&mut self, situation: String, reply: String) {
        if self.history_limit == 0 {
            return;
        }

        self.exchanges.push_back((situation, reply));
        while self.exchanges.len() > self.history_limit {
            self.exchanges.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_layout() {
        let mut session = ChatSession::new("persona", 4);
        session.record_exchange("far".into(), "3,t,Wait!".into());

        let messages = session.outbound("close");
        let roles: Vec<_> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![ChatRole::System, ChatRole::User, ChatRole::Assistant, ChatRole::User]
        );
        assert_eq!(messages[0].content, "persona");
        assert_eq!(messages[2].content, "3,t,Wait!");
        assert_eq!(messages[3].content, "close");
    }

    #[test]
    fn test_history_is_bounded() {
        let mut session = ChatSession::new("persona", 2);
        for i in 0..5 {
            session.record_exchange(format!("s{}", i), format!("r{}", i));
        }

        assert_eq!(session.exchange_count(), 2);
        let messages = session.outbound("now");
        assert_eq!(messages[1].content, "s3");
        assert_eq!(messages[4].content, "r4");
    }

    #[test]
    fn test_zero_limit_keeps_no_history() {
        let mut session = ChatSession::new("persona", 0);
        session.record_exchange("s".into(), "r".into());
        assert_eq!(session.outbound("now").len(), 2);
    }

    #[test]
    fn test_role_wire_names() {
        let json = serde_json::to_string(&ChatMessage::new(ChatRole::Assistant, "hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
