//! Progress samples derived from completed sessions.
//!
//! # Invariants
//! - Points only come from workouts with `completed_at` set.
//! - Series are ordered by `date ASC`; same-day sessions are kept apart.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One sample of a named exercise in a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub weight: f64,
    pub sets: u32,
    pub reps: u32,
}

impl ProgressPoint {
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.sets) * f64::from(self.reps)
    }
}

/// Headline numbers for one exercise series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub sessions: usize,
    pub max_weight: f64,
    pub max_volume: f64,
    /// Last weight minus first weight; needs at least two points.
    pub weight_change: Option<f64>,
}

/// Summarizes a date-ordered series. Returns `None` for an empty series.
pub fn summarize_progress(points: &[ProgressPoint]) -> Option<ProgressSummary> {
    let first = points.first()?;
    let last = points.last()?;

    let max_weight = points
        .iter()
        .map(|point| point.weight)
        .fold(f64::MIN, f64::max);
    let max_volume = points
        .iter()
        .map(ProgressPoint::volume)
        .fold(f64::MIN, f64::max);
    let weight_change = (points.len() >= 2).then(|| last.weight - first.weight);

    Some(ProgressSummary {
        sessions: points.len(),
        max_weight,
        max_volume,
        weight_change,
    })
}
