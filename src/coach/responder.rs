//! Templated replies
//!
//! Each intent maps to a fixed template filled from the metrics frame and
//! user context. Recommendations combine a time-of-day routine with goal
//! advice and a status suffix derived from the wellness score.

use super::intent::{classify_lowercased, Intent, SOMATIC_KEYWORDS};
use crate::score::wellness_score;
use crate::types::{FitnessGoal, MetricsFrame, UserContext};
use tracing::debug;

/// Score above which the user is reported as optimised
pub const OPTIMISED_SCORE: u8 = 75;

const UNKNOWN_REPLY: &str = "I'm here to help you forge a better version of yourself. I can help with routines, health data analysis, or recovery advice.";
const SUPPORT_REPLY: &str =
    "I'm here to support your journey. Your data suggests you might benefit from a lighter schedule today.";

/// Day segment used to pick a routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySegment {
    Morning,
    Midday,
    Evening,
}

impl DaySegment {
    pub fn for_hour(hour: u8) -> Self {
        if hour < 11 {
            DaySegment::Morning
        } else if hour > 20 {
            DaySegment::Evening
        } else {
            DaySegment::Midday
        }
    }

    fn routine(&self) -> &'static str {
        match self {
            DaySegment::Morning => "Morning Forge Routine: 1. Hydrate (500ml) 2. Sunlight exposure (10 mins) 3. Light stretching.",
            DaySegment::Midday => "Mid-day Focus: Stay active and hydrated.",
            DaySegment::Evening => "Evening Restoration: 1. Digital sunset (screens off) 2. Magnesium-rich snack 3. 5-min guided meditation.",
        }
    }
}

fn goal_advice(goal: FitnessGoal) -> &'static str {
    match goal {
        FitnessGoal::WeightLoss => {
            "To support your weight loss goal, aim for a 30-min steady-state cardio session today."
        }
        FitnessGoal::MuscleGain => {
            "Prioritize a high-protein meal and moderate resistance training."
        }
        FitnessGoal::Maintenance => "Focus on movement variety and consistent hydration.",
        FitnessGoal::Performance => {
            "High-intensity interval training (HIIT) is recommended for your performance goal."
        }
    }
}

/// Classify and answer a message. Never fails; unrecognised input gets the
/// fallback template.
pub fn respond(text: &str, frame: &MetricsFrame, user: Option<&UserContext>, hour: u8) -> String {
    let lower = text.to_lowercase();
    let intent = classify_lowercased(&lower);
    debug!(?intent, hour, "coach reply");
    build_reply(intent, &lower, frame, user, hour)
}

fn build_reply(
    intent: Intent,
    lower: &str,
    frame: &MetricsFrame,
    user: Option<&UserContext>,
    hour: u8,
) -> String {
    match intent {
        Intent::Greeting => {
            // Without a profile the goal reads as plain "wellness"
            let goal = user.map(|u| u.fitness_goal.label()).unwrap_or("wellness");
            format!(
                "Hello {}! 👋 I'm your WellnessForge Coach. I've analyzed your current vitals: {} steps and {} BPM. Given your goal of {}, what's on your mind?",
                UserContext::name_of(user),
                group_thousands(frame.steps),
                frame.heart_rate_bpm as i64,
                goal
            )
        }
        Intent::HealthInquiry if lower.contains("sleep") => format!(
            "Your analysis shows {:.1}h of sleep. This is {} your baseline.",
            frame.sleep_hours,
            if frame.sleep_hours < 7.0 {
                "below"
            } else {
                "optimal for"
            }
        ),
        Intent::HealthInquiry => format!(
            "Current Metric Snapshot: Steps ({}), HR ({} BPM), HRV ({}ms). Ask me to deep-dive into any of these.",
            frame.steps, frame.heart_rate_bpm as i64, frame.hrv_ms as i64
        ),
        Intent::Recommendation => contextual_routine(frame, UserContext::goal_of(user), hour),
        Intent::EmotionalSupport if SOMATIC_KEYWORDS.iter().any(|kw| lower.contains(kw)) => {
            format!(
                "I've detected a high somatic load (HRV: {}ms). It's okay to feel this way. I recommend a 5-minute coherence breathing session right now to reset.",
                frame.hrv_ms as i64
            )
        }
        Intent::EmotionalSupport => SUPPORT_REPLY.to_string(),
        Intent::Unknown => UNKNOWN_REPLY.to_string(),
    }
}

/// Routine for the hour plus goal advice and today's status
pub fn contextual_routine(frame: &MetricsFrame, goal: FitnessGoal, hour: u8) -> String {
    let status = if wellness_score(frame) > OPTIMISED_SCORE {
        "optimised"
    } else {
        "recovering"
    };

    format!(
        "{} {} Your vitals show you are {} today.",
        DaySegment::for_hour(hour).routine(),
        goal_advice(goal),
        status
    )
}

/// Format an integer with comma thousands separators
fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
