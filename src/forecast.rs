//! Fatigue forecasting
//!
//! Predicts an energy slump from sleep debt, somatic load (inverse HRV) and
//! circadian timing, scaled by the user's goal. The fatigue index is a
//! weighted linear combination bucketed by fixed thresholds.

use crate::types::{FitnessGoal, MetricsFrame, SlumpPrediction, SlumpState};
use tracing::debug;

/// Placeholder confidence attached to every forecast. Not calibrated.
pub const FORECAST_CONFIDENCE: f64 = 0.92;

/// Index above which fatigue is critical
pub const CRITICAL_THRESHOLD: f64 = 70.0;
/// Index above which a slump is expected
pub const SLUMP_THRESHOLD: f64 = 45.0;
/// Index below which high energy is possible
pub const HIGH_ENERGY_THRESHOLD: f64 = 25.0;
/// HRV required alongside a low index for high energy (ms)
pub const HIGH_ENERGY_MIN_HRV_MS: f64 = 55.0;

const SLEEP_NEED_HOURS: f64 = 8.0;
const SLEEP_DEBT_WEIGHT: f64 = 12.0;
const SOMATIC_DIVISOR: f64 = 1.5;

const CRITICAL_MESSAGE: &str = "Critical fatigue imminent. Your body needs deep recovery. Avoid intense physical or cognitive stress.";
const EARLY_SLUMP_MESSAGE: &str =
    "Early fatigue detected. Consider a protein-rich snack and light movement.";
const AFTERNOON_SLUMP_MESSAGE: &str =
    "Afternoon slump predicted. A 10-minute digital detox or hydration is recommended.";
const HIGH_ENERGY_MESSAGE: &str = "Optimal state detected! Your baseline and current vitals suggest you are ready for a high-intensity 'Forge' session.";
const STEADY_MESSAGE: &str = "Your energy levels are predicted to be stable.";

/// Circadian load for an hour of day: the late-evening dip outweighs the
/// early-afternoon one.
pub fn circadian_load(hour: u8) -> f64 {
    match hour {
        21..=23 => 25.0,
        14..=16 => 15.0,
        _ => 0.0,
    }
}

/// Goal scaling: performance-oriented users tolerate more load
pub fn goal_multiplier(goal: FitnessGoal) -> f64 {
    match goal {
        FitnessGoal::Performance => 0.8,
        _ => 1.2,
    }
}

/// Compute the fatigue index
pub fn fatigue_index(frame: &MetricsFrame, hour: u8, goal: FitnessGoal) -> f64 {
    let sleep_debt = (SLEEP_NEED_HOURS - frame.sleep_hours).max(0.0);
    // Unclamped: HRV above 100 ms reduces the index
    let somatic_load = 100.0 - frame.hrv_ms;

    (sleep_debt * SLEEP_DEBT_WEIGHT + somatic_load / SOMATIC_DIVISOR + circadian_load(hour))
        * goal_multiplier(goal)
}

/// Bucket a fatigue index into a state and message. First match wins and all
/// comparisons are strict.
pub fn classify(index: f64, hrv_ms: f64, hour: u8) -> (SlumpState, &'static str) {
    if index > CRITICAL_THRESHOLD {
        (SlumpState::CriticalFatigue, CRITICAL_MESSAGE)
    } else if index > SLUMP_THRESHOLD {
        let message = if hour < 12 {
            EARLY_SLUMP_MESSAGE
        } else {
            AFTERNOON_SLUMP_MESSAGE
        };
        (SlumpState::ImpendingSlump, message)
    } else if index < HIGH_ENERGY_THRESHOLD && hrv_ms > HIGH_ENERGY_MIN_HRV_MS {
        (SlumpState::HighEnergy, HIGH_ENERGY_MESSAGE)
    } else {
        (SlumpState::Steady, STEADY_MESSAGE)
    }
}

/// Predict the user's energy state at the given hour
pub fn predict_slump(frame: &MetricsFrame, hour: u8, goal: FitnessGoal) -> SlumpPrediction {
    let index = fatigue_index(frame, hour, goal);
    let (state, message) = classify(index, frame.hrv_ms, hour);
    debug!(fatigue_index = index, ?state, hour, "fatigue forecast");

    SlumpPrediction {
        state,
        confidence: FORECAST_CONFIDENCE,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(sleep_hours: f64, hrv_ms: f64) -> MetricsFrame {
        MetricsFrame {
            steps: 6000,
            heart_rate_bpm: 65.0,
            active_calories: 250.0,
            sleep_hours,
            hrv_ms,
        }
    }

    #[test]
    fn test_late_evening_rested_is_steady() {
        // (0 * 12 + 0 / 1.5 + 25) * 1.2 = 30
        let f = frame(8.0, 100.0);
        let index = fatigue_index(&f, 22, FitnessGoal::Maintenance);
        assert!((index - 30.0).abs() < 1e-9);

        let prediction = predict_slump(&f, 22, FitnessGoal::Maintenance);
        assert_eq!(prediction.state, SlumpState::Steady);
        assert_eq!(prediction.confidence, FORECAST_CONFIDENCE);
    }

    #[test]
    fn test_threshold_boundaries_are_exclusive() {
        assert_eq!(classify(45.0, 30.0, 15).0, SlumpState::Steady);
        assert_eq!(classify(45.000001, 30.0, 15).0, SlumpState::ImpendingSlump);
        assert_eq!(classify(70.0, 30.0, 15).0, SlumpState::ImpendingSlump);
        assert_eq!(classify(70.000001, 30.0, 15).0, SlumpState::CriticalFatigue);
        assert_eq!(classify(25.0, 80.0, 9).0, SlumpState::Steady);
        assert_eq!(classify(24.9, 80.0, 9).0, SlumpState::HighEnergy);
        assert_eq!(classify(10.0, 55.0, 9).0, SlumpState::Steady);
    }

    #[test]
    fn test_slump_wording_depends_on_hour() {
        let (_, morning) = classify(50.0, 40.0, 11);
        let (_, afternoon) = classify(50.0, 40.0, 12);
        assert_eq!(morning, EARLY_SLUMP_MESSAGE);
        assert_eq!(afternoon, AFTERNOON_SLUMP_MESSAGE);
    }

    #[test]
    fn test_sleep_debt_drives_critical_fatigue() {
        // (4 * 12 + 60 / 1.5 + 15) * 1.2 = 123.6
        let prediction = predict_slump(&frame(4.0, 40.0), 15, FitnessGoal::WeightLoss);
        assert_eq!(prediction.state, SlumpState::CriticalFatigue);
        assert_eq!(prediction.message, CRITICAL_MESSAGE);
    }

    #[test]
    fn test_performance_goal_tolerates_more_load() {
        // base = 1 * 12 + 54 / 1.5 + 0 = 48
        let f = frame(7.0, 46.0);
        assert_eq!(
            predict_slump(&f, 10, FitnessGoal::Maintenance).state,
            SlumpState::ImpendingSlump
        );
        assert_eq!(
            predict_slump(&f, 10, FitnessGoal::Performance).state,
            SlumpState::Steady
        );
    }

    #[test]
    fn test_high_energy_requires_hrv() {
        // (0 + 20 / 1.5 + 0) * 1.2 = 16
        let prediction = predict_slump(&frame(9.0, 80.0), 9, FitnessGoal::Maintenance);
        assert_eq!(prediction.state, SlumpState::HighEnergy);
    }

    #[test]
    fn test_high_hrv_makes_somatic_load_negative() {
        let index = fatigue_index(&frame(8.0, 130.0), 9, FitnessGoal::Maintenance);
        assert!(index < 0.0);
    }

    #[test]
    fn test_circadian_load_bands() {
        assert_eq!(circadian_load(13), 0.0);
        assert_eq!(circadian_load(14), 15.0);
        assert_eq!(circadian_load(16), 15.0);
        assert_eq!(circadian_load(17), 0.0);
        assert_eq!(circadian_load(21), 25.0);
        assert_eq!(circadian_load(23), 25.0);
        assert_eq!(circadian_load(0), 0.0);
    }

    #[test]
    fn test_forecast_is_deterministic() {
        let f = frame(6.5, 48.0);
        assert_eq!(
            predict_slump(&f, 15, FitnessGoal::MuscleGain),
            predict_slump(&f, 15, FitnessGoal::MuscleGain)
        );
    }
}
