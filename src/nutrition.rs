//! Nutrition aggregation and meal lookup
//!
//! Meal entries come from the host's nutrition store already logged; this
//! module only reads them. It sums macros over a day window and maps image
//! classifier labels onto a fixed table of nutrition facts.

use crate::config::ForgeConfig;
use crate::types::{MealEntry, NutritionTotals};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

impl NutritionTotals {
    /// Sum macros across meals
    pub fn from_meals<'a, I>(meals: I) -> Self
    where
        I: IntoIterator<Item = &'a MealEntry>,
    {
        meals
            .into_iter()
            .fold(NutritionTotals::default(), |totals, meal| NutritionTotals {
                calories: totals.calories.saturating_add(meal.calories),
                protein: totals.protein.saturating_add(meal.protein),
                carbs: totals.carbs.saturating_add(meal.carbs),
                fats: totals.fats.saturating_add(meal.fats),
            })
    }
}

/// UTC bounds `[start, end)` of a calendar day
pub fn day_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// Meals logged within `[start, end)`, preserving input order
pub fn meals_in_window(
    meals: &[MealEntry],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<&MealEntry> {
    meals
        .iter()
        .filter(|meal| meal.timestamp >= start && meal.timestamp < end)
        .collect()
}

/// Nutrition facts for a recognised food
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fats: u32,
}

impl FoodItem {
    fn new(name: &str, calories: u32, protein: u32, carbs: u32, fats: u32) -> Self {
        Self {
            name: name.to_string(),
            calories,
            protein,
            carbs,
            fats,
        }
    }

    /// Log this item as a meal
    pub fn to_meal(&self, timestamp: DateTime<Utc>) -> MealEntry {
        MealEntry {
            name: self.name.clone(),
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fats: self.fats,
            timestamp,
        }
    }
}

/// One label produced by the host's image classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub identifier: String,
    /// Classifier confidence (0-1)
    pub confidence: f32,
}

/// Fixed keyword to nutrition facts table
#[derive(Debug, Clone)]
pub struct FoodCatalog {
    entries: Vec<(String, FoodItem)>,
    min_confidence: f32,
    candidate_limit: usize,
}

impl Default for FoodCatalog {
    fn default() -> Self {
        Self::with_config(&ForgeConfig::default())
    }
}

impl FoodCatalog {
    /// Built-in table with matching thresholds taken from config
    pub fn with_config(config: &ForgeConfig) -> Self {
        let entries = vec![
            ("apple", FoodItem::new("Apple", 95, 0, 25, 0)),
            ("banana", FoodItem::new("Banana", 105, 1, 27, 0)),
            ("egg", FoodItem::new("Boiled Egg", 78, 6, 0, 5)),
            (
                "chicken_breast",
                FoodItem::new("Chicken Breast (100g)", 165, 31, 0, 4),
            ),
            ("salad", FoodItem::new("Garden Salad", 50, 2, 10, 0)),
            ("pizza", FoodItem::new("Pizza Slice", 285, 12, 36, 10)),
        ]
        .into_iter()
        .map(|(key, item)| (key.to_string(), item))
        .collect();

        Self {
            entries,
            min_confidence: config.food_min_confidence,
            candidate_limit: config.food_candidate_limit,
        }
    }

    /// Item whose keyword appears in the label, if any
    pub fn lookup(&self, label: &str) -> Option<&FoodItem> {
        let lower = label.to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| lower.contains(key.as_str()))
            .map(|(_, item)| item)
    }

    /// First confident catalog match among the top classifier observations.
    ///
    /// Observations are expected in descending confidence order, as the
    /// classifier reports them. A keyword match below the confidence floor is
    /// skipped and the scan continues.
    pub fn best_match(&self, observations: &[Classification]) -> Option<&FoodItem> {
        let found = observations
            .iter()
            .take(self.candidate_limit)
            .filter(|obs| obs.confidence > self.min_confidence)
            .find_map(|obs| self.lookup(&obs.identifier));

        debug!(
            candidates = observations.len().min(self.candidate_limit),
            matched = found.map(|item| item.name.as_str()),
            "food lookup"
        );
        found
    }

    /// Display label for the top observation, e.g. `"pizza (87%)"`
    pub fn describe_top(observations: &[Classification]) -> Option<String> {
        observations
            .first()
            .map(|top| format!("{} ({}%)", top.identifier, (top.confidence * 100.0) as i32))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn meal(name: &str, protein: u32, carbs: u32, hour: u32) -> MealEntry {
        MealEntry {
            name: name.to_string(),
            calories: protein * 4 + carbs * 4,
            protein,
            carbs,
            fats: 5,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 10, hour, 0, 0).unwrap(),
        }
    }

    fn obs(identifier: &str, confidence: f32) -> Classification {
        Classification {
            identifier: identifier.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_totals_sum_each_macro() {
        let meals = vec![meal("Oats", 10, 60, 8), meal("Chicken", 40, 5, 13)];
        let totals = NutritionTotals::from_meals(&meals);

        assert_eq!(
            totals,
            NutritionTotals {
                calories: 280 + 180,
                protein: 50,
                carbs: 65,
                fats: 10,
            }
        );
    }

    #[test]
    fn test_empty_meal_list_totals_zero() {
        let totals = NutritionTotals::from_meals(&Vec::<MealEntry>::new());
        assert_eq!(totals, NutritionTotals::default());
    }

    #[test]
    fn test_meals_in_day_window() {
        let mut meals = vec![meal("Breakfast", 10, 40, 7), meal("Dinner", 30, 50, 19)];
        meals.push(MealEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap(),
            ..meal("Midnight snack", 2, 20, 0)
        });

        let (start, end) = day_window(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        let today = meals_in_window(&meals, start, end);

        assert_eq!(today.len(), 2);
        assert_eq!(today[0].name, "Breakfast");
        assert_eq!(today[1].name, "Dinner");
    }

    #[test]
    fn test_lookup_matches_substring() {
        let catalog = FoodCatalog::default();
        assert_eq!(catalog.lookup("Granny Smith APPLE").unwrap().name, "Apple");
        assert_eq!(
            catalog.lookup("grilled chicken_breast").unwrap().calories,
            165
        );
        assert!(catalog.lookup("hamburger").is_none());
    }

    #[test]
    fn test_best_match_skips_low_confidence() {
        let catalog = FoodCatalog::default();
        let observations = vec![
            obs("plate", 0.9),
            obs("banana", 0.15),
            obs("pizza", 0.35),
        ];
        assert_eq!(catalog.best_match(&observations).unwrap().name, "Pizza Slice");
    }

    #[test]
    fn test_best_match_only_scans_top_candidates() {
        let catalog = FoodCatalog::default();
        let mut observations: Vec<Classification> =
            (0..10).map(|i| obs(&format!("object_{i}"), 0.5)).collect();
        observations.push(obs("salad", 0.5));

        assert!(catalog.best_match(&observations).is_none());
    }

    #[test]
    fn test_describe_top() {
        assert_eq!(
            FoodCatalog::describe_top(&[obs("pizza", 0.876)]).as_deref(),
            Some("pizza (87%)")
        );
        assert!(FoodCatalog::describe_top(&[]).is_none());
    }

    #[test]
    fn test_food_item_to_meal() {
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 12, 30, 0).unwrap();
        let catalog = FoodCatalog::default();
        let meal = catalog.lookup("egg").unwrap().to_meal(at);
        assert_eq!(meal.name, "Boiled Egg");
        assert_eq!(meal.protein, 6);
        assert_eq!(meal.timestamp, at);
    }
}
