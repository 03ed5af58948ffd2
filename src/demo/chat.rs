//! Scripted chat for step 3.
//!
//! The child's message is appended synchronously; the companion's canned
//! reply arrives through the panel's timer scope after `chat_reply_ms`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::config::TimingConfig;
use crate::timers::{TimerEvents, TimerScope};

pub const GREETING: &str = "Hello! I am so happy to meet you. What should we do today?";

/// Quick-reply buttons offered under the transcript.
pub const QUICK_REPLIES: [&str; 4] = [
    "Say Hi 👋",
    "Tell me a story 📖",
    "I feel sad 😢",
    "Let's play! 🎮",
];

/// Reply rules, checked in order; the first substring that matches wins.
const REPLY_RULES: [(&str, &str); 3] = [
    ("Hi", "Hi there! *Waves happily*"),
    ("sad", "Oh no, don't be sad. I am here with you. Would a high-five help?"),
    ("story", "Once upon a time, there was a drawing that came to life... that's me!"),
];

const FALLBACK_REPLY: &str = "That sounds wonderful! Tell me more!";

/// The companion's answer to `text`. Matching is case-sensitive.
pub fn canned_reply(text: &str) -> &'static str {
    REPLY_RULES
        .iter()
        .find(|(needle, _)| text.contains(needle))
        .map(|(_, reply)| *reply)
        .unwrap_or(FALLBACK_REPLY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Child,
    Character,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// Deferred work of the chat panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    Reply(&'static str),
}

pub struct ChatPanel {
    transcript: Vec<ChatMessage>,
    next_id: u64,
    timers: TimerScope<ChatEvent>,
    events: TimerEvents<ChatEvent>,
    timing: TimingConfig,
    /// Replies scheduled but not yet in the transcript.
    awaiting: usize,
}

impl ChatPanel {
    pub fn new(runtime: Handle, timing: TimingConfig) -> Self {
        let (timers, events) = TimerScope::new(runtime);
        let mut panel = Self {
            transcript: Vec::new(),
            next_id: 1,
            timers,
            events,
            timing,
            awaiting: 0,
        };
        panel.push(Role::Character, GREETING.to_string());
        panel
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Whether a companion reply is still on its way.
    pub fn is_typing(&self) -> bool {
        self.awaiting > 0
    }

    /// Append the child's message and schedule the companion's reply.
    pub fn send(&mut self, text: &str) {
        self.push(Role::Child, text.to_string());
        let reply = canned_reply(text);
        debug!(target: "chat", %text, reply, "reply scheduled");
        self.timers.after(self.timing.chat_reply_delay(), ChatEvent::Reply(reply));
        self.awaiting += 1;
    }

    /// Leave the chat; replies still in flight are dropped.
    pub fn skip(&mut self) {
        info!(target: "chat", pending = self.awaiting, "chat skipped");
        self.timers.cancel_all();
        self.awaiting = 0;
    }

    /// Apply every event that has already arrived. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.events.try_next() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next scheduled event and apply it.
    pub async fn process_next(&mut self) -> bool {
        match self.events.next().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::Reply(text) => {
                self.awaiting = self.awaiting.saturating_sub(1);
                self.push(Role::Character, text.to_string());
            }
        }
    }

    fn push(&mut self, role: Role, text: String) {
        let id = self.next_id.to_string();
        self.next_id += 1;
        self.transcript.push(ChatMessage {
            id,
            role,
            text,
            sent_at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn panel() -> ChatPanel {
        ChatPanel::new(Handle::current(), TimingConfig::default())
    }

    #[test]
    fn reply_rules_follow_listed_precedence() {
        assert_eq!(canned_reply("Say Hi 👋"), "Hi there! *Waves happily*");
        assert_eq!(
            canned_reply("I feel sad 😢"),
            "Oh no, don't be sad. I am here with you. Would a high-five help?"
        );
        assert_eq!(
            canned_reply("Tell me a story 📖"),
            "Once upon a time, there was a drawing that came to life... that's me!"
        );
        assert_eq!(canned_reply("Let's play! 🎮"), FALLBACK_REPLY);
        // First listed rule wins when several match.
        assert_eq!(canned_reply("Hi, I am sad"), "Hi there! *Waves happily*");
        // Case-sensitive.
        assert_eq!(canned_reply("hi"), FALLBACK_REPLY);
        assert_eq!(canned_reply("SAD"), FALLBACK_REPLY);
    }

    #[tokio::test(start_paused = true)]
    async fn starts_with_single_greeting() {
        let chat = panel();
        assert_eq!(chat.transcript().len(), 1);
        assert_eq!(chat.transcript()[0].id, "1");
        assert_eq!(chat.transcript()[0].role, Role::Character);
        assert_eq!(chat.transcript()[0].text, GREETING);
    }

    #[tokio::test(start_paused = true)]
    async fn child_message_is_immediate_reply_is_delayed() {
        let mut chat = panel();
        let start = tokio::time::Instant::now();
        chat.send("I feel sad 😢");

        assert_eq!(chat.transcript().len(), 2);
        assert_eq!(chat.transcript()[1].role, Role::Child);
        assert!(chat.is_typing());

        assert!(chat.process_next().await);
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert_eq!(chat.transcript().len(), 3);
        assert_eq!(chat.transcript()[2].role, Role::Character);
        assert_eq!(chat.transcript()[2].text, canned_reply("sad"));
    }

    #[tokio::test(start_paused = true)]
    async fn typing_lasts_until_reply_is_shown() {
        let mut chat = panel();
        chat.send("Say Hi 👋");
        // The reply has fired but the transcript has not caught up yet.
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(chat.is_typing());
        assert_eq!(chat.transcript().len(), 2);

        assert_eq!(chat.pump(), 1);
        assert!(!chat.is_typing());
        assert_eq!(chat.transcript().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn second_message_gets_its_own_reply() {
        let mut chat = panel();
        chat.send("Say Hi 👋");
        assert!(chat.process_next().await);
        chat.send("I feel sad 😢");
        assert!(chat.is_typing());
        assert!(chat.process_next().await);

        let last = chat.transcript().last().expect("reply");
        assert_eq!(last.role, Role::Character);
        assert_eq!(last.text, canned_reply("sad"));
        assert!(!chat.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn ids_are_unique_and_ordered() {
        let mut chat = panel();
        chat.send("Say Hi 👋");
        chat.send("Tell me a story 📖");
        while chat.process_next().await {}

        let ids: Vec<&str> = chat.transcript().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5"]);
        let roles: Vec<Role> = chat.transcript().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            [Role::Character, Role::Child, Role::Child, Role::Character, Role::Character]
        );
        assert!(chat.transcript().windows(2).all(|w| w[0].sent_at <= w[1].sent_at));
    }

    #[tokio::test(start_paused = true)]
    async fn skip_discards_pending_reply() {
        let mut chat = panel();
        chat.send("Say Hi 👋");
        chat.skip();
        assert!(!chat.is_typing());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(chat.pump(), 0);
        assert_eq!(chat.transcript().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn messages_serialize_with_lowercase_roles() {
        let chat = panel();
        let json = serde_json::to_value(&chat.transcript()[0]).expect("serialize");
        assert_eq!(json["role"], "character");
        assert_eq!(json["id"], "1");
    }
}
