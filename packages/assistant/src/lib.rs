#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Portfolio chat assistant.
//!
//! Only a simulated assistant ships: [`MockAssistant`] waits a fixed latency
//! and answers every prompt with the same canned reply. The
//! [`ChatAssistant`] trait is the seam a real provider would plug into.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

/// Default simulated reply latency.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1000);

/// Starter prompts offered before the first message.
pub const SUGGESTED_PROMPTS: &[&str] = &[
    "What farms need immediate attention for TNFD compliance?",
    "What environmental scheme opportunities are available?",
];

const DEMO_CONTENT: &str =
    "This is a demo response. To enable AI assistance, please configure your API key.";
const DEMO_ACTION_ITEMS: &[&str] = &["Configure API credentials", "Review TNFD documentation"];
const DEMO_SCHEME_OPPORTUNITIES: &[&str] = &["SFI enrollment available"];

/// Who authored a chat message.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    /// The person using the dashboard.
    User,
    /// The portfolio assistant.
    Assistant,
}

/// A reply produced by an assistant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    /// Free-text answer.
    pub content: String,
    /// Suggested follow-up actions.
    pub action_items: Vec<String>,
    /// Environmental schemes worth looking at.
    pub scheme_opportunities: Vec<String>,
    /// Risks the assistant wants to flag.
    pub risk_alerts: Vec<String>,
}

impl AssistantReply {
    /// The fixed reply returned while no real provider is configured.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            content: DEMO_CONTENT.to_string(),
            action_items: DEMO_ACTION_ITEMS.iter().map(ToString::to_string).collect(),
            scheme_opportunities: DEMO_SCHEME_OPPORTUNITIES
                .iter()
                .map(ToString::to_string)
                .collect(),
            risk_alerts: Vec::new(),
        }
    }
}

/// One entry in a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Author.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
    /// Follow-up actions (assistant messages only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_items: Vec<String>,
    /// Scheme suggestions (assistant messages only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scheme_opportunities: Vec<String>,
    /// Flagged risks (assistant messages only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub risk_alerts: Vec<String>,
}

impl ChatMessage {
    /// A message typed by the user.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            action_items: Vec::new(),
            scheme_opportunities: Vec::new(),
            risk_alerts: Vec::new(),
        }
    }
}

impl From<AssistantReply> for ChatMessage {
    fn from(reply: AssistantReply) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: reply.content,
            action_items: reply.action_items,
            scheme_opportunities: reply.scheme_opportunities,
            risk_alerts: reply.risk_alerts,
        }
    }
}

/// Something that can answer a portfolio question.
#[async_trait::async_trait]
pub trait ChatAssistant: Send + Sync {
    /// Produces a reply to `prompt`.
    async fn reply(&self, prompt: &str) -> AssistantReply;
}

/// Assistant that sleeps a fixed latency and returns [`AssistantReply::demo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockAssistant {
    latency: Duration,
}

impl Default for MockAssistant {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY)
    }
}

impl MockAssistant {
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }

    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }

    /// Runs [`ChatAssistant::reply`] on a background task.
    ///
    /// The task is single-shot: it is never retried and nothing cancels it
    /// short of dropping the runtime.
    #[must_use]
    pub fn spawn_reply(&self, prompt: String) -> JoinHandle<AssistantReply> {
        let assistant = *self;
        tokio::spawn(async move { assistant.reply(&prompt).await })
    }
}

#[async_trait::async_trait]
impl ChatAssistant for MockAssistant {
    async fn reply(&self, prompt: &str) -> AssistantReply {
        log::debug!(
            "Simulating assistant reply in {}ms for {} char prompt",
            self.latency.as_millis(),
            prompt.chars().count()
        );
        tokio::time::sleep(self.latency).await;
        AssistantReply::demo()
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn reply_waits_configured_latency() {
        let assistant = MockAssistant::default();
        let started = Instant::now();

        let reply = assistant.reply("anything").await;

        assert!(started.elapsed() >= DEFAULT_LATENCY);
        assert_eq!(reply, AssistantReply::demo());
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_reply_completes_once() {
        let assistant = MockAssistant::new(Duration::from_millis(250));
        let started = Instant::now();

        let reply = assistant
            .spawn_reply("What farms need attention?".to_string())
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(250));
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(reply.action_items.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn reply_is_independent_of_prompt() {
        let assistant = MockAssistant::new(Duration::ZERO);
        let a = assistant.reply("").await;
        let b = assistant.reply(SUGGESTED_PROMPTS[1]).await;
        assert_eq!(a, b);
    }

    #[test]
    fn demo_reply_contents() {
        let reply = AssistantReply::demo();
        assert!(reply.content.starts_with("This is a demo response."));
        assert_eq!(
            reply.action_items,
            ["Configure API credentials", "Review TNFD documentation"]
        );
        assert_eq!(reply.scheme_opportunities, ["SFI enrollment available"]);
        assert!(reply.risk_alerts.is_empty());
    }

    #[test]
    fn reply_converts_to_assistant_message() {
        let message = ChatMessage::from(AssistantReply::demo());
        assert_eq!(message.role, ChatRole::Assistant);
        assert_eq!(message.scheme_opportunities.len(), 1);
    }

    #[test]
    fn user_message_serializes_without_empty_lists() {
        let json = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "user", "content": "hi" }));
    }
}
