//! Conversational coach
//!
//! A rule-based responder: free text is classified by a keyword precedence
//! cascade, then answered from templates over the current metrics and user
//! context. Classification is single-turn; chat history is kept only for
//! display.
//!
//! Flow: text → intent → templated reply → (optional) simulated thinking delay

pub mod intent;
pub mod responder;
pub mod session;

pub use intent::{classify_intent, Intent};
pub use responder::{respond, DaySegment};
pub use session::{ChatSession, Coach, CoachRequest, PendingReply, ReplyCanceller};
