//! Template domain model.
//!
//! # Responsibility
//! - Define the reusable workout plan and its planned exercises.
//! - Define the create/replace request shape.
//!
//! # Invariants
//! - `id`, `created_at` and `TemplateExercise::template_id` never change.
//! - `exercises` is ordered by `sort_order ASC`, zero-based and gap-free.

use crate::model::exercise::{validate_load, ExerciseInput, ExerciseValidationError, WeightUnit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a template.
pub type TemplateId = Uuid;
/// Stable identifier of a planned exercise row.
pub type TemplateExerciseId = Uuid;

/// Named, reusable workout plan, hydrated with its planned exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    /// Millisecond precision, as persisted.
    pub created_at: DateTime<Utc>,
    pub exercises: Vec<TemplateExercise>,
}

impl Template {
    /// Names of the planned exercises in display order.
    pub fn exercise_names(&self) -> impl Iterator<Item = &str> {
        self.exercises.iter().map(|exercise| exercise.name.as_str())
    }
}

/// Planned exercise within a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateExercise {
    pub id: TemplateExerciseId,
    pub template_id: TemplateId,
    pub name: String,
    pub weight: f64,
    pub weight_unit: WeightUnit,
    pub sets: u32,
    pub reps: u32,
    pub sort_order: i64,
}

impl TemplateExercise {
    /// Materializes one input row with a fresh id and a resolved position.
    pub fn from_input(template_id: TemplateId, sort_order: i64, input: &ExerciseInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            template_id,
            name: input.name.clone(),
            weight: input.resolved_weight(),
            weight_unit: input.resolved_unit(),
            sets: input.resolved_sets(),
            reps: input.resolved_reps(),
            sort_order,
        }
    }

    pub fn validate(&self) -> Result<(), ExerciseValidationError> {
        validate_load(self.weight, self.sets, self.reps)
    }
}

/// Request payload for template create and full replace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTemplate {
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<ExerciseInput>,
}

impl NewTemplate {
    pub fn new(name: impl Into<String>, exercises: Vec<ExerciseInput>) -> Self {
        Self {
            name: name.into(),
            exercises,
        }
    }
}
