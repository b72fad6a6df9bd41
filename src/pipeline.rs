//! Pipeline orchestration
//!
//! This module provides the public API for WellnessForge.
//! It runs the scoring, forecast and oracle engines over one request and
//! bundles their outputs into a daily briefing.

use crate::error::ForgeError;
use crate::forecast::predict_slump;
use crate::oracle::generate_oracle;
use crate::score::wellness_score;
use crate::snapshot::{ScoreBoard, ScoreSnapshot};
use crate::types::{
    MealEntry, MetricsFrame, NutritionTotals, OracleReading, SlumpPrediction, UserContext,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Inputs for one briefing. Meals are expected to be filtered to the day
/// already; an absent user falls back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefingRequest {
    #[serde(default)]
    pub metrics: MetricsFrame,
    #[serde(default)]
    pub meals: Vec<MealEntry>,
    #[serde(default)]
    pub user: Option<UserContext>,
    /// Local hour of day (0-23)
    pub hour: u8,
}

/// Combined engine output for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBriefing {
    pub score: u8,
    pub forecast: SlumpPrediction,
    pub oracle: OracleReading,
    pub nutrition: NutritionTotals,
}

/// Validate an hour coming from an untyped source
pub fn checked_hour(hour: i64) -> Result<u8, ForgeError> {
    match u8::try_from(hour) {
        Ok(h) if h < 24 => Ok(h),
        _ => {
            warn!(hour, "rejected hour of day");
            Err(ForgeError::InvalidHour(hour))
        }
    }
}

/// Run every engine over a request.
///
/// Pipeline stages:
/// 1. Nutrition totals over the day's meals
/// 2. Wellness score
/// 3. Fatigue forecast
/// 4. Oracle reading
pub fn daily_briefing(request: &BriefingRequest) -> DailyBriefing {
    let nutrition = NutritionTotals::from_meals(&request.meals);
    let score = wellness_score(&request.metrics);
    let goal = UserContext::goal_of(request.user.as_ref());
    let forecast = predict_slump(&request.metrics, request.hour, goal);
    let oracle = generate_oracle(&request.metrics, &nutrition, request.hour);

    debug!(score, meals = request.meals.len(), "daily briefing");

    DailyBriefing {
        score,
        forecast,
        oracle,
        nutrition,
    }
}

/// Parse a JSON briefing request, rejecting hours outside 0-23
pub fn parse_request(raw_json: &str) -> Result<BriefingRequest, ForgeError> {
    let value: serde_json::Value = serde_json::from_str(raw_json)?;
    let hour = value
        .get("hour")
        .ok_or_else(|| ForgeError::ParseError("missing field `hour`".to_string()))?
        .as_i64()
        .ok_or_else(|| ForgeError::ParseError("`hour` must be an integer".to_string()))?;
    checked_hour(hour)?;

    Ok(serde_json::from_value(value)?)
}

/// Convert a JSON briefing request into a JSON daily briefing.
///
/// # Example
/// ```ignore
/// let briefing = briefing_from_json(
///     r#"{"metrics": {"steps": 5000, "heart_rate_bpm": 70.0, "sleep_hours": 7.0, "hrv_ms": 50.0}, "hour": 9}"#
///         .to_string(),
/// )?;
/// ```
pub fn briefing_from_json(raw_json: String) -> Result<String, ForgeError> {
    let request = parse_request(&raw_json)?;
    let briefing = daily_briefing(&request);
    Ok(serde_json::to_string(&briefing)?)
}

/// Score a JSON metrics frame
pub fn score_from_json(raw_json: &str) -> Result<u8, ForgeError> {
    let frame: MetricsFrame = serde_json::from_str(raw_json)?;
    Ok(wellness_score(&frame))
}

/// Stateful processor that publishes each briefing's score.
///
/// Use this when secondary surfaces read the latest score through a shared
/// [`ScoreBoard`].
#[derive(Debug, Clone, Default)]
pub struct ForgeProcessor {
    scoreboard: ScoreBoard,
}

impl ForgeProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Processor publishing into an existing board
    pub fn with_scoreboard(scoreboard: ScoreBoard) -> Self {
        Self { scoreboard }
    }

    pub fn scoreboard(&self) -> &ScoreBoard {
        &self.scoreboard
    }

    /// Build a briefing and publish its score stamped `at`
    pub fn process(&self, request: &BriefingRequest, at: DateTime<Utc>) -> DailyBriefing {
        let briefing = daily_briefing(request);
        self.scoreboard
            .publish(ScoreSnapshot::new(briefing.score, at));
        briefing
    }

    /// JSON variant of [`ForgeProcessor::process`]
    pub fn process_json(&self, raw_json: &str, at: DateTime<Utc>) -> Result<String, ForgeError> {
        let request = parse_request(raw_json)?;
        let briefing = self.process(&request, at);
        Ok(serde_json::to_string(&briefing)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FitnessGoal, Mood, SlumpState};
    use chrono::TimeZone;

    fn sample_request_json() -> &'static str {
        r#"{
            "metrics": {
                "steps": 5000,
                "heart_rate_bpm": 70.0,
                "active_calories": 300.0,
                "sleep_hours": 7.0,
                "hrv_ms": 50.0
            },
            "meals": [
                {
                    "name": "Chicken Breast (100g)",
                    "calories": 165,
                    "protein": 31,
                    "carbs": 0,
                    "fats": 4,
                    "timestamp": "2024-01-15T12:30:00Z"
                },
                {
                    "name": "Banana",
                    "calories": 105,
                    "protein": 1,
                    "carbs": 27,
                    "fats": 0,
                    "timestamp": "2024-01-15T15:00:00Z"
                }
            ],
            "user": { "name": "Rae", "fitness_goal": "performance" },
            "hour": 15
        }"#
    }

    #[test]
    fn test_briefing_from_json() {
        let result = briefing_from_json(sample_request_json().to_string());
        assert!(result.is_ok());

        let payload: serde_json::Value = serde_json::from_str(&result.unwrap()).unwrap();
        assert_eq!(payload["score"], 81);
        assert_eq!(payload["nutrition"]["calories"], 270);
        assert_eq!(payload["nutrition"]["protein"], 32);
        assert_eq!(payload["oracle"]["mood"], "steady");
        assert_eq!(payload["oracle"]["greeting"], "Good Afternoon");
        assert_eq!(payload["forecast"]["confidence"], 0.92);
    }

    #[test]
    fn test_briefing_uses_user_goal() {
        // base = 12 + 50 / 1.5 + 15 = 60.33
        let request = BriefingRequest {
            metrics: MetricsFrame {
                steps: 3000,
                heart_rate_bpm: 75.0,
                active_calories: 120.0,
                sleep_hours: 7.0,
                hrv_ms: 50.0,
            },
            meals: vec![],
            user: Some(UserContext::new("Rae", FitnessGoal::Performance)),
            hour: 15,
        };
        assert_eq!(
            daily_briefing(&request).forecast.state,
            SlumpState::ImpendingSlump
        );

        let request = BriefingRequest {
            user: None,
            ..request
        };
        assert_eq!(
            daily_briefing(&request).forecast.state,
            SlumpState::CriticalFatigue
        );
    }

    #[test]
    fn test_minimal_request_defaults() {
        let briefing: DailyBriefing =
            serde_json::from_str(&briefing_from_json(r#"{"hour": 3}"#.to_string()).unwrap())
                .unwrap();

        assert_eq!(briefing.score, 10);
        assert_eq!(briefing.nutrition, NutritionTotals::default());
        assert_eq!(briefing.oracle.mood, Mood::Rest);
        assert_eq!(briefing.oracle.directives.len(), 1);
        assert_eq!(briefing.oracle.directives[0].title, "Protein Focus");
        assert_eq!(briefing.forecast.state, SlumpState::CriticalFatigue);
    }

    #[test]
    fn test_invalid_hour_rejected() {
        for raw in [r#"{"hour": 24}"#, r#"{"hour": -1}"#, r#"{"hour": 9.5}"#, r#"{}"#] {
            assert!(briefing_from_json(raw.to_string()).is_err(), "{raw}");
        }
        assert!(matches!(
            briefing_from_json(r#"{"hour": 30}"#.to_string()),
            Err(ForgeError::InvalidHour(30))
        ));
    }

    #[test]
    fn test_invalid_json() {
        let result = briefing_from_json("not valid json".to_string());
        assert!(matches!(result, Err(ForgeError::JsonError(_))));
    }

    #[test]
    fn test_score_from_json() {
        assert_eq!(score_from_json(r#"{"steps": 10000, "heart_rate_bpm": 60, "sleep_hours": 8, "hrv_ms": 50}"#).unwrap(), 100);
        assert_eq!(score_from_json("{}").unwrap(), 10);
    }

    #[test]
    fn test_processor_publishes_score() {
        let processor = ForgeProcessor::new();
        let widget = processor.scoreboard().clone();
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 15, 0, 0).unwrap();

        assert!(widget.latest().is_none());
        processor.process_json(sample_request_json(), at).unwrap();

        let snapshot = widget.latest().unwrap();
        assert_eq!(snapshot.score, 81);
        assert_eq!(snapshot.published_at, at);
    }

    #[test]
    fn test_briefing_is_deterministic() {
        let first = briefing_from_json(sample_request_json().to_string()).unwrap();
        let second = briefing_from_json(sample_request_json().to_string()).unwrap();
        assert_eq!(first, second);
    }
}
