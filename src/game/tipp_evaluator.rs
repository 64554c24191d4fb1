use serde::{Deserialize, Serialize};

use crate::models::common::MatchOutcome;
use crate::models::game::PointSchedule;

/// Which rule a prediction satisfied, strongest first
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TippCategory {
    Exact,
    GoalDifference,
    Winner,
    Wrong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub home: i32,
    pub away: i32,
}

impl Score {
    pub fn new(home: i32, away: i32) -> Self {
        Self { home, away }
    }

    pub fn outcome(&self) -> MatchOutcome {
        MatchOutcome::from_goals(self.home, self.away)
    }

    pub fn difference(&self) -> i32 {
        self.home - self.away
    }
}

/// Classify a prediction against the actual score. An exactly predicted draw
/// is `Exact`; any other correct draw has a zero goal difference and lands in
/// `GoalDifference`.
pub fn categorize(predicted: Score, actual: Score) -> TippCategory {
    if predicted == actual {
        TippCategory::Exact
    } else if predicted.difference() == actual.difference() {
        TippCategory::GoalDifference
    } else if predicted.outcome() == actual.outcome() {
        TippCategory::Winner
    } else {
        TippCategory::Wrong
    }
}

pub fn award_points(predicted: Score, actual: Score, points: &PointSchedule) -> i32 {
    match categorize(predicted, actual) {
        TippCategory::Exact => points.exact,
        TippCategory::GoalDifference => points.difference,
        TippCategory::Winner => points.winner,
        TippCategory::Wrong => points.wrong,
    }
}
