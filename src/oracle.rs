//! Daily oracle readings
//!
//! An oracle reading combines a score-bracket narrative with directives
//! produced by cross-metric correlation rules. Rules are independent boolean
//! triggers; any number may fire and they are appended in evaluation order.

use crate::score::wellness_score;
use crate::types::{
    ColorTag, Directive, IconTag, MetricsFrame, Mood, NutritionTotals, OracleReading,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Time-of-day salutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayGreeting {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayGreeting {
    pub fn for_hour(hour: u8) -> Self {
        match hour {
            5..=11 => DayGreeting::Morning,
            12..=17 => DayGreeting::Afternoon,
            18..=21 => DayGreeting::Evening,
            _ => DayGreeting::Night,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            DayGreeting::Morning => "Good Morning",
            DayGreeting::Afternoon => "Good Afternoon",
            DayGreeting::Evening => "Good Evening",
            DayGreeting::Night => "Good Night",
        }
    }
}

struct Narrative {
    headline: &'static str,
    body: &'static str,
    action_tip: &'static str,
}

/// Mood bracket for a wellness score
pub fn mood_for_score(score: u8) -> Mood {
    match score {
        85..=u8::MAX => Mood::Peak,
        65..=84 => Mood::Steady,
        40..=64 => Mood::Recovery,
        _ => Mood::Rest,
    }
}

fn narrative(mood: Mood) -> Narrative {
    match mood {
        Mood::Peak => Narrative {
            headline: "Peak Performance Day ⚡",
            body: "Your vitals are aligned for an exceptional day. HRV is high, sleep was restorative, and your energy reserves are full. Push hard today, your body is ready.",
            action_tip: "Tackle your most demanding task in the first 90 minutes of your day.",
        },
        Mood::Steady => Narrative {
            headline: "Steady State Today 🌿",
            body: "You're in a good place. Not your best day, not your worst. Moderate exercise and keeping stress low will preserve your energy through the afternoon.",
            action_tip: "A 20-min walk after lunch will prevent the afternoon slump.",
        },
        Mood::Recovery => Narrative {
            headline: "Recovery Mode 🧘",
            body: "Your body is signaling it needs support today. Lower HRV and reduced sleep quality mean your nervous system is under stress. Be gentle with yourself.",
            action_tip: "Opt for light movement such as yoga or a short walk. Prioritize sleep tonight.",
        },
        Mood::Rest => Narrative {
            headline: "Rest & Restore 🌙",
            body: "Your metrics suggest significant fatigue. Pushing hard today could deepen the deficit. A real rest day is the smartest performance decision you can make.",
            action_tip: "No intense exercise. Focus on hydration, nutrition, and 9+ hours of sleep tonight.",
        },
    }
}

/// A correlation rule: a trigger over the day's signals and the directive it emits
struct CorrelationRule {
    name: &'static str,
    fires: fn(&MetricsFrame, &NutritionTotals, u8) -> bool,
    title: &'static str,
    subtitle: &'static str,
    icon: IconTag,
    color_tag: ColorTag,
}

impl CorrelationRule {
    fn directive(&self) -> Directive {
        Directive {
            title: self.title.to_string(),
            subtitle: self.subtitle.to_string(),
            icon: self.icon,
            color_tag: self.color_tag,
        }
    }
}

fn low_hrv_low_protein(frame: &MetricsFrame, nutrition: &NutritionTotals, _score: u8) -> bool {
    frame.hrv_ms < 40.0 && nutrition.protein < 50
}

fn short_sleep_high_carbs(frame: &MetricsFrame, nutrition: &NutritionTotals, _score: u8) -> bool {
    frame.sleep_hours < 6.0 && nutrition.carbs > 200
}

fn primed(_frame: &MetricsFrame, _nutrition: &NutritionTotals, score: u8) -> bool {
    score > 85
}

/// Evaluation order is the order directives are reported in
const RULES: [CorrelationRule; 3] = [
    CorrelationRule {
        name: "protein_focus",
        fires: low_hrv_low_protein,
        title: "Protein Focus",
        subtitle: "Low HRV + Low Protein detected. Critical for repair.",
        icon: IconTag::Leaf,
        color_tag: ColorTag::Orange,
    },
    CorrelationRule {
        name: "carb_adjustment",
        fires: short_sleep_high_carbs,
        title: "Carb Adjustment",
        subtitle: "High carbs with low sleep may cause energy crashes.",
        icon: IconTag::ChartBar,
        color_tag: ColorTag::Blue,
    },
    CorrelationRule {
        name: "forge_intensity",
        fires: primed,
        title: "Forge Intensity",
        subtitle: "Biology is primed. Level up your training today.",
        icon: IconTag::Bolt,
        color_tag: ColorTag::Purple,
    },
];

/// Directives for a day's signals. May be empty.
pub fn correlate(frame: &MetricsFrame, nutrition: &NutritionTotals, score: u8) -> Vec<Directive> {
    RULES
        .iter()
        .filter(|rule| {
            let fired = (rule.fires)(frame, nutrition, score);
            trace!(rule = rule.name, fired, "correlation rule");
            fired
        })
        .map(CorrelationRule::directive)
        .collect()
}

/// Generate the oracle reading for a frame, the day's nutrition and the hour
pub fn generate_oracle(frame: &MetricsFrame, nutrition: &NutritionTotals, hour: u8) -> OracleReading {
    let score = wellness_score(frame);
    let mood = mood_for_score(score);
    let Narrative {
        headline,
        body,
        action_tip,
    } = narrative(mood);
    let directives = correlate(frame, nutrition, score);

    debug!(score, ?mood, directives = directives.len(), "oracle reading");

    OracleReading {
        greeting: DayGreeting::for_hour(hour).text().to_string(),
        headline: headline.to_string(),
        body: body.to_string(),
        action_tip: action_tip.to_string(),
        mood,
        directives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frame(steps: u32, sleep_hours: f64, hrv_ms: f64) -> MetricsFrame {
        MetricsFrame {
            steps,
            heart_rate_bpm: 62.0,
            active_calories: 400.0,
            sleep_hours,
            hrv_ms,
        }
    }

    fn nutrition(protein: u32, carbs: u32) -> NutritionTotals {
        NutritionTotals {
            calories: 1800,
            protein,
            carbs,
            fats: 60,
        }
    }

    fn titles(reading: &OracleReading) -> Vec<&str> {
        reading.directives.iter().map(|d| d.title.as_str()).collect()
    }

    #[test]
    fn test_mood_brackets() {
        assert_eq!(mood_for_score(100), Mood::Peak);
        assert_eq!(mood_for_score(85), Mood::Peak);
        assert_eq!(mood_for_score(84), Mood::Steady);
        assert_eq!(mood_for_score(65), Mood::Steady);
        assert_eq!(mood_for_score(64), Mood::Recovery);
        assert_eq!(mood_for_score(40), Mood::Recovery);
        assert_eq!(mood_for_score(39), Mood::Rest);
        assert_eq!(mood_for_score(0), Mood::Rest);
    }

    #[test]
    fn test_protein_focus_requires_low_protein() {
        let tired = frame(5000, 7.0, 35.0);

        let reading = generate_oracle(&tired, &nutrition(40, 150), 9);
        assert_eq!(titles(&reading), vec!["Protein Focus"]);

        let reading = generate_oracle(&tired, &nutrition(60, 150), 9);
        assert!(titles(&reading).is_empty());
    }

    #[test]
    fn test_carb_adjustment() {
        let short_sleep = frame(5000, 5.5, 45.0);
        let reading = generate_oracle(&short_sleep, &nutrition(80, 240), 13);
        assert_eq!(titles(&reading), vec!["Carb Adjustment"]);
        assert_eq!(reading.directives[0].color_tag, ColorTag::Blue);
        assert_eq!(reading.directives[0].icon, IconTag::ChartBar);

        let reading = generate_oracle(&short_sleep, &nutrition(80, 200), 13);
        assert!(reading.directives.is_empty());
    }

    #[test]
    fn test_directives_keep_evaluation_order() {
        let drained = frame(1000, 4.0, 20.0);
        let reading = generate_oracle(&drained, &nutrition(20, 260), 20);

        // 3 + 15 + 20 + 8 = 46
        assert_eq!(titles(&reading), vec!["Protein Focus", "Carb Adjustment"]);
        assert_eq!(reading.mood, Mood::Recovery);
    }

    #[test]
    fn test_peak_day_adds_forge_intensity() {
        let primed = frame(12_000, 8.5, 70.0);
        let reading = generate_oracle(&primed, &nutrition(120, 180), 7);

        assert_eq!(reading.mood, Mood::Peak);
        assert_eq!(reading.headline, "Peak Performance Day ⚡");
        assert_eq!(titles(&reading), vec!["Forge Intensity"]);
        assert_eq!(reading.greeting, "Good Morning");
    }

    #[test]
    fn test_score_of_exactly_85_is_peak_without_intensity() {
        // 30 + 30 + 20 + 5 = 85
        let f = frame(10_000, 8.0, 12.5);
        assert_eq!(wellness_score(&f), 85);

        let reading = generate_oracle(&f, &nutrition(100, 100), 10);
        assert_eq!(reading.mood, Mood::Peak);
        assert!(!titles(&reading).contains(&"Forge Intensity"));
    }

    #[test]
    fn test_greeting_by_hour() {
        assert_eq!(DayGreeting::for_hour(4), DayGreeting::Night);
        assert_eq!(DayGreeting::for_hour(5), DayGreeting::Morning);
        assert_eq!(DayGreeting::for_hour(12), DayGreeting::Afternoon);
        assert_eq!(DayGreeting::for_hour(18), DayGreeting::Evening);
        assert_eq!(DayGreeting::for_hour(22), DayGreeting::Night);
    }

    #[test]
    fn test_reading_is_deterministic() {
        let f = frame(7000, 6.5, 38.0);
        let n = nutrition(45, 210);
        assert_eq!(generate_oracle(&f, &n, 15), generate_oracle(&f, &n, 15));
    }
}
