//! Exercise fields shared by template and workout rows.
//!
//! # Responsibility
//! - Define the weight unit vocabulary and exercise defaults.
//! - Validate numeric load fields before persistence.
//! - Resolve caller-supplied ordering into gap-free `sort_order` values.
//!
//! # Invariants
//! - `weight` is finite and non-negative.
//! - `sets` and `reps` are strictly positive.
//! - Names are stored verbatim; emptiness is a caller-side concern.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Weight assumed when the caller omits it.
pub const DEFAULT_WEIGHT: f64 = 0.0;
/// Sets assumed when the caller omits them.
pub const DEFAULT_SETS: u32 = 3;
/// Reps assumed when the caller omits them.
pub const DEFAULT_REPS: u32 = 10;

/// Unit attached to an exercise weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightUnit {
    /// Pounds.
    #[default]
    #[serde(rename = "LB")]
    Lb,
    /// Kilograms.
    #[serde(rename = "KG")]
    Kg,
}

impl WeightUnit {
    /// Stable storage/wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lb => "LB",
            Self::Kg => "KG",
        }
    }

    /// Parses a stored unit value. Matching is exact.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LB" => Some(Self::Lb),
            "KG" => Some(Self::Kg),
            _ => None,
        }
    }
}

impl Display for WeightUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric field violations rejected before any write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExerciseValidationError {
    /// Weight is NaN or infinite.
    NonFiniteWeight,
    /// Weight is below zero.
    NegativeWeight(f64),
    /// Sets must be at least one.
    ZeroSets,
    /// Reps must be at least one.
    ZeroReps,
}

impl Display for ExerciseValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteWeight => write!(f, "weight must be a finite number"),
            Self::NegativeWeight(value) => write!(f, "weight must not be negative, got {value}"),
            Self::ZeroSets => write!(f, "sets must be greater than zero"),
            Self::ZeroReps => write!(f, "reps must be greater than zero"),
        }
    }
}

impl Error for ExerciseValidationError {}

/// Checks the numeric load triple shared by every exercise row.
pub fn validate_load(weight: f64, sets: u32, reps: u32) -> Result<(), ExerciseValidationError> {
    if !weight.is_finite() {
        return Err(ExerciseValidationError::NonFiniteWeight);
    }
    if weight < 0.0 {
        return Err(ExerciseValidationError::NegativeWeight(weight));
    }
    if sets == 0 {
        return Err(ExerciseValidationError::ZeroSets);
    }
    if reps == 0 {
        return Err(ExerciseValidationError::ZeroReps);
    }
    Ok(())
}

/// Caller-supplied exercise for template create/replace.
///
/// Omitted fields fall back to `DEFAULT_*` and to the input position for
/// `sort_order`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseInput {
    pub name: String,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub weight_unit: Option<WeightUnit>,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

impl ExerciseInput {
    /// Creates an input with only a name; every other field takes its default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Convenience for the common "weight x sets x reps" shape.
    pub fn with_load(name: impl Into<String>, weight: f64, sets: u32, reps: u32) -> Self {
        Self {
            name: name.into(),
            weight: Some(weight),
            sets: Some(sets),
            reps: Some(reps),
            ..Self::default()
        }
    }

    pub fn resolved_weight(&self) -> f64 {
        self.weight.unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn resolved_unit(&self) -> WeightUnit {
        self.weight_unit.unwrap_or_default()
    }

    pub fn resolved_sets(&self) -> u32 {
        self.sets.unwrap_or(DEFAULT_SETS)
    }

    pub fn resolved_reps(&self) -> u32 {
        self.reps.unwrap_or(DEFAULT_REPS)
    }
}

/// Orders inputs by requested `sort_order` (index when absent) and returns
/// them paired with gap-free zero-based positions.
///
/// Ties keep input order, so an all-default list is returned unchanged.
pub fn resolve_sort_orders(inputs: &[ExerciseInput]) -> Vec<(i64, &ExerciseInput)> {
    let mut keyed: Vec<(i64, usize, &ExerciseInput)> = inputs
        .iter()
        .enumerate()
        .map(|(index, input)| (input.sort_order.unwrap_or(index as i64), index, input))
        .collect();
    keyed.sort_by_key(|(requested, index, _)| (*requested, *index));

    keyed
        .into_iter()
        .enumerate()
        .map(|(position, (_, _, input))| (position as i64, input))
        .collect()
}
