//! Wellness plans
//!
//! A plan is a titled list of timed tasks. Completion progress is derived on
//! demand from the task flags.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Plan focus area
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanCategory {
    Recovery,
    #[default]
    Activity,
    Nutrition,
    Mindfulness,
}

impl PlanCategory {
    /// Parse a stored label. Unknown labels fall back to `Activity`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "recovery" => PlanCategory::Recovery,
            "nutrition" => PlanCategory::Nutrition,
            "mindfulness" => PlanCategory::Mindfulness,
            _ => PlanCategory::Activity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellnessTask {
    pub id: Uuid,
    pub title: String,
    pub is_completed: bool,
    /// Wall-clock time the task is due, "HH:MM"
    pub due_time: String,
}

impl WellnessTask {
    pub fn new(title: impl Into<String>, due_time: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            is_completed: false,
            due_time: due_time.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellnessPlan {
    pub id: Uuid,
    pub title: String,
    pub details: String,
    pub category: PlanCategory,
    pub tasks: Vec<WellnessTask>,
}

impl WellnessPlan {
    pub fn new(
        title: impl Into<String>,
        details: impl Into<String>,
        category: PlanCategory,
        tasks: Vec<WellnessTask>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            details: details.into(),
            category,
            tasks,
        }
    }

    /// Starter recovery plan offered to new users
    pub fn vital_recovery() -> Self {
        Self::new(
            "Vital Recovery",
            "A gentle plan to restore your energy levels.",
            PlanCategory::Recovery,
            vec![
                WellnessTask::new("10 min Morning Stretch", "08:00"),
                WellnessTask::new("Hydrate: 500ml Water", "10:00"),
                WellnessTask::new("20 min Evening Walk", "18:00"),
            ],
        )
    }

    /// Flip a task's completion. Returns the new state, or `None` if the
    /// task is not part of this plan.
    pub fn toggle_task(&mut self, task_id: Uuid) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == task_id)?;
        task.is_completed = !task.is_completed;
        Some(task.is_completed)
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_completed).count()
    }

    /// Completed share of tasks (0-1). An empty plan has no progress.
    pub fn progress_fraction(&self) -> f64 {
        if self.tasks.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.tasks.len() as f64
    }
}
