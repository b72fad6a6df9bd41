//! Published score snapshots
//!
//! Secondary surfaces (voice shortcut, home-screen widget) show the most
//! recent wellness score without re-running the engines. The host publishes a
//! snapshot after each scoring pass; readers get a copy through `latest`.
//! Readers never write.

use crate::types::ColorTag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Score above which the widget tints the score green
pub const WIDGET_GOOD_SCORE: u8 = 80;

/// Read-only view of one scoring pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub score: u8,
    pub published_at: DateTime<Utc>,
}

impl ScoreSnapshot {
    pub fn new(score: u8, published_at: DateTime<Utc>) -> Self {
        Self {
            score: score.min(100),
            published_at,
        }
    }

    /// Spoken reply for the voice shortcut
    pub fn dialog(&self) -> String {
        format!("Your Wellness Forge Score is {}.", self.score)
    }

    /// Score tint for the widget
    pub fn tint(&self) -> ColorTag {
        if self.score > WIDGET_GOOD_SCORE {
            ColorTag::Green
        } else {
            ColorTag::Orange
        }
    }
}

/// Shared holder for the latest snapshot. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    latest: Arc<RwLock<Option<ScoreSnapshot>>>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot
    pub fn publish(&self, snapshot: ScoreSnapshot) {
        debug!(score = snapshot.score, "publishing score snapshot");
        // A poisoned lock still holds a valid Option; keep serving it
        let mut slot = self
            .latest
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(snapshot);
    }

    /// Most recently published snapshot, if any
    pub fn latest(&self) -> Option<ScoreSnapshot> {
        *self
            .latest
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_board() {
        assert!(ScoreBoard::new().latest().is_none());
    }

    #[test]
    fn test_publish_replaces_and_clones_share() {
        let board = ScoreBoard::new();
        let widget_view = board.clone();

        board.publish(ScoreSnapshot::new(72, at(8)));
        board.publish(ScoreSnapshot::new(88, at(12)));

        let latest = widget_view.latest().unwrap();
        assert_eq!(latest.score, 88);
        assert_eq!(latest.published_at, at(12));
    }

    #[test]
    fn test_dialog_and_tint() {
        let snapshot = ScoreSnapshot::new(81, at(9));
        assert_eq!(snapshot.dialog(), "Your Wellness Forge Score is 81.");
        assert_eq!(snapshot.tint(), ColorTag::Green);
        assert_eq!(ScoreSnapshot::new(80, at(9)).tint(), ColorTag::Orange);
    }

    #[test]
    fn test_snapshot_caps_score() {
        assert_eq!(ScoreSnapshot::new(250, at(9)).score, 100);
    }

    #[test]
    fn test_publish_from_threads() {
        let board = ScoreBoard::new();
        let handles: Vec<_> = (0..4u8)
            .map(|i| {
                let board = board.clone();
                std::thread::spawn(move || board.publish(ScoreSnapshot::new(60 + i, at(10))))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let score = board.latest().unwrap().score;
        assert!((60..64).contains(&score));
    }
}
