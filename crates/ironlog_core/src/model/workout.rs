//! Workout session domain model.
//!
//! # Responsibility
//! - Define the dated, timed session and its exercise instances.
//! - Define the start/patch request shapes used by the workout service.
//!
//! # Invariants
//! - `completed_at = None` means the session is still in progress.
//! - Exercise instances are copies: editing one never touches the template
//!   it was started from.
//! - `template_id` is informational only; the template may no longer exist.

use crate::model::exercise::{validate_load, ExerciseValidationError, WeightUnit};
use crate::model::template::{TemplateExercise, TemplateId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a workout session.
pub type WorkoutId = Uuid;
/// Stable identifier of an exercise instance within a session.
pub type WorkoutExerciseId = Uuid;

/// Name given to ad-hoc sessions started without a template or a name.
pub const CUSTOM_WORKOUT_NAME: &str = "Custom Workout";

/// Workout session, hydrated with its ordered exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: WorkoutId,
    pub template_id: Option<TemplateId>,
    pub name: String,
    /// Local calendar day the session was started on.
    pub date: NaiveDate,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub exercises: Vec<WorkoutExercise>,
}

impl Workout {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Number of exercises already checked off.
    pub fn completed_exercise_count(&self) -> usize {
        self.exercises
            .iter()
            .filter(|exercise| exercise.completed)
            .count()
    }
}

/// Exercise instance within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub id: WorkoutExerciseId,
    pub workout_id: WorkoutId,
    pub name: String,
    pub weight: f64,
    pub weight_unit: WeightUnit,
    pub sets: u32,
    pub reps: u32,
    pub completed: bool,
    pub sort_order: i64,
}

impl WorkoutExercise {
    /// Copies a planned exercise into a fresh, not yet completed instance.
    ///
    /// The position is preserved; the identity is new.
    pub fn copied_from(planned: &TemplateExercise, workout_id: WorkoutId) -> Self {
        Self {
            id: Uuid::new_v4(),
            workout_id,
            name: planned.name.clone(),
            weight: planned.weight,
            weight_unit: planned.weight_unit,
            sets: planned.sets,
            reps: planned.reps,
            completed: false,
            sort_order: planned.sort_order,
        }
    }

    pub fn validate(&self) -> Result<(), ExerciseValidationError> {
        validate_load(self.weight, self.sets, self.reps)
    }

    /// Total load moved: `weight * sets * reps`.
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.sets) * f64::from(self.reps)
    }
}

/// Request payload for starting a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartWorkout {
    /// Template to copy exercises from; `None` starts an empty session.
    #[serde(default)]
    pub template_id: Option<TemplateId>,
    /// Session name; blank falls back to the template name or
    /// [`CUSTOM_WORKOUT_NAME`].
    #[serde(default)]
    pub name: Option<String>,
}

impl StartWorkout {
    pub fn from_template(template_id: TemplateId) -> Self {
        Self {
            template_id: Some(template_id),
            name: None,
        }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            template_id: None,
            name: Some(name.into()),
        }
    }
}

/// Field patch for a session. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutPatch {
    pub name: Option<String>,
    /// `Some(None)` re-opens a finished session.
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl WorkoutPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.completed_at.is_none()
    }
}

/// Exercise appended to a running session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkoutExercise {
    pub name: String,
    pub weight: f64,
    pub weight_unit: WeightUnit,
    pub sets: u32,
    pub reps: u32,
}

/// Field patch for one exercise instance. `None` leaves the field untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExercisePatch {
    pub completed: Option<bool>,
    pub weight: Option<f64>,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
}

impl ExercisePatch {
    pub fn completed(value: bool) -> Self {
        Self {
            completed: Some(value),
            ..Self::default()
        }
    }

    /// Applies the supplied fields onto `exercise`.
    pub fn apply_to(&self, exercise: &mut WorkoutExercise) {
        if let Some(completed) = self.completed {
            exercise.completed = completed;
        }
        if let Some(weight) = self.weight {
            exercise.weight = weight;
        }
        if let Some(sets) = self.sets {
            exercise.sets = sets;
        }
        if let Some(reps) = self.reps {
            exercise.reps = reps;
        }
    }
}

/// Filters for listing sessions. Results are always newest `started_at` first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkoutListQuery {
    /// Exact calendar-day match.
    pub date: Option<NaiveDate>,
    /// Truncates after filtering. `Some(0)` means unlimited.
    pub limit: Option<u32>,
    /// Keeps only sessions with `completed_at` set.
    pub completed_only: bool,
}
