//! WellnessForge - On-device wellness scoring and coaching engine
//!
//! WellnessForge turns a snapshot of biometric, activity and nutrition data
//! into a wellness score, a fatigue forecast, a daily oracle reading and
//! coach replies. Every engine is a deterministic function of its inputs;
//! time of day is always passed in explicitly.
//!
//! ## Modules
//!
//! - **Engines**: [`score`], [`forecast`], [`oracle`], [`coach`]
//! - **Inputs**: [`nutrition`] aggregation and food lookup, [`plan`] progress
//! - **Host integration**: [`pipeline`] briefings, [`snapshot`] score board, [`ffi`]

pub mod coach;
pub mod config;
pub mod error;
pub mod forecast;
pub mod nutrition;
pub mod oracle;
pub mod pipeline;
pub mod plan;
pub mod score;
pub mod snapshot;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use coach::{classify_intent, respond, ChatSession, Coach, Intent};
pub use config::ForgeConfig;
pub use error::ForgeError;
pub use forecast::predict_slump;
pub use oracle::generate_oracle;
pub use pipeline::{briefing_from_json, daily_briefing, BriefingRequest, DailyBriefing, ForgeProcessor};
pub use score::wellness_score;
pub use snapshot::{ScoreBoard, ScoreSnapshot};

/// Engine version reported by the CLI
pub const FORGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for briefing reports
pub const PRODUCER_NAME: &str = "wellness-forge";
