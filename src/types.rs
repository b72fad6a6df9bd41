//! Core types for the WellnessForge engines
//!
//! This module defines the values that flow into and out of the engines:
//! metrics frames and meal entries in, scores, forecasts, oracle readings and
//! conversation turns out. Every output type carries plain data plus closed
//! enumerations for presentation hints; nothing here knows how it is rendered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of biometric and activity readings for one refresh cycle.
///
/// Sensor collaborators fill each field independently and fall back to zero
/// when a reading is unavailable. Zero is valid input, never a sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsFrame {
    /// Step count for the day
    pub steps: u32,
    /// Most recent heart rate (bpm)
    pub heart_rate_bpm: f64,
    /// Active energy burned (kcal)
    pub active_calories: f64,
    /// Sleep duration for the previous night (hours)
    pub sleep_hours: f64,
    /// Heart rate variability (ms)
    pub hrv_ms: f64,
}

/// A logged meal, owned by the host's nutrition store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealEntry {
    pub name: String,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fats: u32,
    pub timestamp: DateTime<Utc>,
}

/// Macro totals over a set of meal entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fats: u32,
}

/// User fitness goal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    WeightLoss,
    MuscleGain,
    #[default]
    Maintenance,
    Performance,
}

impl FitnessGoal {
    pub const ALL: [FitnessGoal; 4] = [
        FitnessGoal::WeightLoss,
        FitnessGoal::MuscleGain,
        FitnessGoal::Maintenance,
        FitnessGoal::Performance,
    ];

    /// Display label, as stored by the profile collaborator
    pub fn label(&self) -> &'static str {
        match self {
            FitnessGoal::WeightLoss => "Weight Loss",
            FitnessGoal::MuscleGain => "Muscle Gain",
            FitnessGoal::Maintenance => "Maintenance",
            FitnessGoal::Performance => "Performance",
        }
    }

    /// Parse a stored label. Unknown labels fall back to `Maintenance`.
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|goal| goal.label().eq_ignore_ascii_case(label.trim()))
            .unwrap_or_default()
    }
}

/// Optional user profile context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserContext {
    pub name: String,
    pub fitness_goal: FitnessGoal,
}

impl UserContext {
    pub fn new(name: impl Into<String>, fitness_goal: FitnessGoal) -> Self {
        Self {
            name: name.into(),
            fitness_goal,
        }
    }

    /// Goal for an optional profile, defaulting to `Maintenance`
    pub fn goal_of(user: Option<&UserContext>) -> FitnessGoal {
        user.map(|u| u.fitness_goal).unwrap_or_default()
    }

    /// Name for an optional profile, defaulting to empty
    pub fn name_of(user: Option<&UserContext>) -> &str {
        user.map(|u| u.name.as_str()).unwrap_or("")
    }
}

/// Predicted energy state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlumpState {
    HighEnergy,
    Steady,
    ImpendingSlump,
    CriticalFatigue,
}

/// Fatigue forecast output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlumpPrediction {
    pub state: SlumpState,
    /// Forecast confidence (0-1)
    pub confidence: f64,
    pub message: String,
}

/// Closed set of colour hints for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    Purple,
    Green,
    Orange,
    Blue,
}

/// Closed set of icon hints for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconTag {
    Bolt,
    Leaf,
    MindAndBody,
    MoonStars,
    ChartBar,
}

impl IconTag {
    /// Platform symbol name used by the reference host
    pub fn symbol_name(&self) -> &'static str {
        match self {
            IconTag::Bolt => "bolt.fill",
            IconTag::Leaf => "leaf.fill",
            IconTag::MindAndBody => "figure.mind.and.body",
            IconTag::MoonStars => "moon.stars.fill",
            IconTag::ChartBar => "chart.bar.fill",
        }
    }
}

/// Daily mood category, selected by score bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Peak,
    Steady,
    Recovery,
    Rest,
}

impl Mood {
    pub fn color(&self) -> ColorTag {
        match self {
            Mood::Peak => ColorTag::Purple,
            Mood::Steady => ColorTag::Green,
            Mood::Recovery => ColorTag::Orange,
            Mood::Rest => ColorTag::Blue,
        }
    }

    pub fn icon(&self) -> IconTag {
        match self {
            Mood::Peak => IconTag::Bolt,
            Mood::Steady => IconTag::Leaf,
            Mood::Recovery => IconTag::MindAndBody,
            Mood::Rest => IconTag::MoonStars,
        }
    }
}

/// Actionable recommendation triggered by a correlation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub title: String,
    pub subtitle: String,
    pub icon: IconTag,
    pub color_tag: ColorTag,
}

/// Daily forecast narrative plus directives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleReading {
    /// Time-of-day salutation for the reading's header
    pub greeting: String,
    pub headline: String,
    pub body: String,
    pub action_tip: String,
    pub mood: Mood,
    /// Directives in rule evaluation order (not ranked)
    pub directives: Vec<Directive>,
}

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in a chat history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp,
        }
    }
}
