//! Chat sessions and delayed coach replies
//!
//! The coach simulates "thinking" with a fixed delay before a reply
//! resolves. The delay is a tokio timer inside a spawned task, so waiting
//! never blocks a thread, and the task can be aborted while it sleeps.
//! Dropping a `PendingReply` aborts the task as well.

use super::responder::respond;
use crate::config::ForgeConfig;
use crate::error::ForgeError;
use crate::types::{ConversationTurn, MetricsFrame, Role, UserContext};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};

pub const WELCOME_MESSAGE: &str = "Hey! 👋 I'm your WellnessForge Coach. Ask me anything about your health, energy, sleep, or workout plan.";

/// Everything the coach needs to answer one message
#[derive(Debug, Clone)]
pub struct CoachRequest {
    pub text: String,
    pub frame: MetricsFrame,
    pub user: Option<UserContext>,
    pub hour: u8,
}

/// Rule-based responder with a simulated thinking delay
#[derive(Debug, Clone)]
pub struct Coach {
    thinking_delay: Duration,
}

impl Default for Coach {
    fn default() -> Self {
        Self::from_config(&ForgeConfig::default())
    }
}

impl Coach {
    pub fn new(thinking_delay: Duration) -> Self {
        Self { thinking_delay }
    }

    pub fn from_config(config: &ForgeConfig) -> Self {
        Self::new(config.thinking_delay)
    }

    pub fn thinking_delay(&self) -> Duration {
        self.thinking_delay
    }

    /// Start answering a request on the current tokio runtime.
    ///
    /// Fails with `NoRuntime` when called outside one.
    pub fn reply(&self, request: CoachRequest) -> Result<PendingReply, ForgeError> {
        let runtime = Handle::try_current().map_err(|_| ForgeError::NoRuntime)?;
        let delay = self.thinking_delay;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            respond(
                &request.text,
                &request.frame,
                request.user.as_ref(),
                request.hour,
            )
        });

        Ok(PendingReply {
            handle: Some(handle),
        })
    }
}

/// A coach reply that has not resolved yet
#[derive(Debug)]
pub struct PendingReply {
    handle: Option<JoinHandle<String>>,
}

impl PendingReply {
    /// Abort the reply. Awaiting it afterwards yields `ReplyCancelled`.
    pub fn cancel(&self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }

    /// Handle that can cancel this reply from elsewhere
    pub fn canceller(&self) -> Option<ReplyCanceller> {
        self.handle.as_ref().map(|handle| ReplyCanceller {
            abort: handle.abort_handle(),
        })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the reply text
    pub async fn wait(mut self) -> Result<String, ForgeError> {
        let handle = self.handle.take().ok_or(ForgeError::ReplyCancelled)?;
        match handle.await {
            Ok(reply) => Ok(reply),
            Err(e) if e.is_cancelled() => Err(ForgeError::ReplyCancelled),
            Err(e) => Err(ForgeError::ReplyFailed(e.to_string())),
        }
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Cloneable cancellation handle for a pending reply
#[derive(Debug, Clone)]
pub struct ReplyCanceller {
    abort: AbortHandle,
}

impl ReplyCanceller {
    pub fn cancel(&self) {
        self.abort.abort();
    }
}

/// Clears a session's thinking flag when dropped, including when the future
/// awaiting the reply is dropped mid-flight
struct ThinkingFlag<'a>(&'a mut bool);

impl Drop for ThinkingFlag<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Append-only chat history plus the in-flight flag the host renders
#[derive(Debug, Clone)]
pub struct ChatSession {
    turns: Vec<ConversationTurn>,
    thinking: bool,
}

impl ChatSession {
    /// New session seeded with the welcome message
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            turns: vec![ConversationTurn::new(
                Role::Assistant,
                WELCOME_MESSAGE,
                started_at,
            )],
            thinking: false,
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    /// Record a user message. Returns the trimmed text to answer.
    pub fn submit(&mut self, text: &str, at: DateTime<Utc>) -> Result<String, ForgeError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ForgeError::EmptyMessage);
        }

        self.turns
            .push(ConversationTurn::new(Role::User, trimmed, at));
        self.thinking = true;
        Ok(trimmed.to_string())
    }

    /// Record the assistant's reply
    pub fn complete(&mut self, reply: impl Into<String>, at: DateTime<Utc>) {
        self.turns
            .push(ConversationTurn::new(Role::Assistant, reply, at));
        self.thinking = false;
    }

    /// Clear the in-flight flag after a reply was cancelled
    pub fn abandon(&mut self) {
        self.thinking = false;
    }

    /// Submit a message and wait for the coach's answer.
    ///
    /// `now` stamps both turns. If the reply is cancelled, or the returned
    /// future is dropped before it resolves, nothing is appended for the
    /// assistant and the session stops thinking.
    pub async fn send<F>(
        &mut self,
        coach: &Coach,
        text: &str,
        frame: MetricsFrame,
        user: Option<UserContext>,
        hour: u8,
        now: F,
    ) -> Result<&ConversationTurn, ForgeError>
    where
        F: Fn() -> DateTime<Utc>,
    {
        let text = self.submit(text, now())?;

        let outcome = {
            let _thinking = ThinkingFlag(&mut self.thinking);
            match coach.reply(CoachRequest {
                text,
                frame,
                user,
                hour,
            }) {
                Ok(pending) => pending.wait().await,
                Err(e) => Err(e),
            }
        };

        match outcome {
            Ok(reply) => {
                self.complete(reply, now());
                debug!(turns = self.turns.len(), "coach replied");
                self.turns.last().ok_or(ForgeError::ReplyCancelled)
            }
            Err(e) => {
                warn!(error = %e, "coach reply dropped");
                Err(e)
            }
        }
    }
}
