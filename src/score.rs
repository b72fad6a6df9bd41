//! Wellness scoring
//!
//! Maps a metrics frame to a single 0-100 score. Four components, each
//! clamped to its weight before summing:
//! - Steps: up to 30 points, full at 10,000 steps
//! - Sleep: up to 30 points, full at 8 hours
//! - Heart rate: 20 points inside (40, 100) bpm, otherwise 10
//! - HRV: up to 20 points, full at 50 ms
//!
//! The sum is truncated, not rounded.

use crate::types::MetricsFrame;
use tracing::trace;

/// Steps needed for the full step component
pub const STEP_TARGET: f64 = 10_000.0;
/// Sleep hours needed for the full sleep component
pub const SLEEP_TARGET_HOURS: f64 = 8.0;
/// HRV needed for the full HRV component (ms)
pub const HRV_TARGET_MS: f64 = 50.0;

const STEP_WEIGHT: f64 = 30.0;
const SLEEP_WEIGHT: f64 = 30.0;
const HR_IN_RANGE: f64 = 20.0;
const HR_OUT_OF_RANGE: f64 = 10.0;
const HRV_WEIGHT: f64 = 20.0;

/// Per-component contributions to a wellness score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub steps: f64,
    pub sleep: f64,
    pub heart_rate: f64,
    pub hrv: f64,
}

impl ScoreBreakdown {
    /// Compute each component for a frame
    pub fn of(frame: &MetricsFrame) -> Self {
        let steps = (frame.steps as f64 / STEP_TARGET * STEP_WEIGHT).min(STEP_WEIGHT);
        let sleep = (frame.sleep_hours / SLEEP_TARGET_HOURS * SLEEP_WEIGHT).min(SLEEP_WEIGHT);
        let heart_rate = if frame.heart_rate_bpm > 40.0 && frame.heart_rate_bpm < 100.0 {
            HR_IN_RANGE
        } else {
            HR_OUT_OF_RANGE
        };
        let hrv = (frame.hrv_ms / HRV_TARGET_MS * HRV_WEIGHT).min(HRV_WEIGHT);

        Self {
            steps,
            sleep,
            heart_rate,
            hrv,
        }
    }

    /// Untruncated component sum
    pub fn total(&self) -> f64 {
        self.steps + self.sleep + self.heart_rate + self.hrv
    }
}

/// Compute the wellness score for a frame
pub fn wellness_score(frame: &MetricsFrame) -> u8 {
    let breakdown = ScoreBreakdown::of(frame);
    trace!(?breakdown, "score components");

    // `as` truncates toward zero; clamping keeps negative sensor noise at 0
    breakdown.total().clamp(0.0, 100.0) as u8
}
