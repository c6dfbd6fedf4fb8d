//! Workout session use-case service.
//!
//! # Responsibility
//! - Start sessions from templates or ad hoc, stamping date and start time.
//! - Patch sessions and their exercises; expose the calendar helpers used
//!   by history and streak views.
//!
//! # Invariants
//! - `date` and `started_at` are derived from the same instant.
//! - Absent or empty names fall back to the template name or
//!   `CUSTOM_WORKOUT_NAME`; any other name is stored verbatim.
//! - Mutations return hydrated read-backs.

use crate::model::template::TemplateId;
use crate::model::workout::{
    ExercisePatch, NewWorkoutExercise, StartWorkout, Workout, WorkoutExercise, WorkoutExerciseId,
    WorkoutId, WorkoutListQuery, WorkoutPatch, CUSTOM_WORKOUT_NAME,
};
use crate::repo::workout_repo::{DateRange, NewWorkoutRecord, WorkoutRepository};
use crate::repo::{RecordKind, RepoError};
use crate::service::now_millis;
use chrono::{Local, NaiveDate};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for workout use-cases.
#[derive(Debug)]
pub enum WorkoutServiceError {
    /// Target session does not exist.
    WorkoutNotFound(WorkoutId),
    /// Template referenced by a start request does not exist.
    TemplateNotFound(TemplateId),
    /// Exercise does not exist in the given session.
    ExerciseNotFound(WorkoutExerciseId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for WorkoutServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WorkoutNotFound(id) => write!(f, "workout not found: {id}"),
            Self::TemplateNotFound(id) => write!(f, "template not found: {id}"),
            Self::ExerciseNotFound(id) => write!(f, "workout exercise not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent workout state: {details}"),
        }
    }
}

impl Error for WorkoutServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for WorkoutServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { kind, id } => match kind {
                RecordKind::Template => Self::TemplateNotFound(id),
                RecordKind::Workout => Self::WorkoutNotFound(id),
                RecordKind::WorkoutExercise => Self::ExerciseNotFound(id),
            },
            other => Self::Repo(other),
        }
    }
}

/// Workout service facade over repository implementations.
pub struct WorkoutService<R: WorkoutRepository> {
    repo: R,
}

impl<R: WorkoutRepository> WorkoutService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists hydrated sessions newest first.
    pub fn list_workouts(
        &self,
        query: &WorkoutListQuery,
    ) -> Result<Vec<Workout>, WorkoutServiceError> {
        Ok(self.repo.list_workouts(query)?)
    }

    /// Gets one hydrated session.
    pub fn get_workout(&self, id: WorkoutId) -> Result<Workout, WorkoutServiceError> {
        self.repo
            .get_workout(id)?
            .ok_or(WorkoutServiceError::WorkoutNotFound(id))
    }

    /// Starts a session, copying the template's exercises when one is given.
    ///
    /// # Errors
    /// - `TemplateNotFound` when `template_id` does not exist; nothing is written.
    pub fn create_workout(&self, input: StartWorkout) -> Result<Workout, WorkoutServiceError> {
        let started_at = now_millis();
        let name = input.name.filter(|name| !name.is_empty());
        let name = match input.template_id {
            Some(_) => name,
            None => Some(name.unwrap_or_else(|| CUSTOM_WORKOUT_NAME.to_string())),
        };

        let record = NewWorkoutRecord {
            id: Uuid::new_v4(),
            template_id: input.template_id,
            name,
            date: started_at.with_timezone(&Local).date_naive(),
            started_at,
        };
        let id = self.repo.start_workout(&record)?;

        let workout = self
            .repo
            .get_workout(id)?
            .ok_or(WorkoutServiceError::InconsistentState(
                "started workout not found in read-back",
            ))?;
        info!(
            "event=workout_start module=service status=ok workout_id={} from_template={} exercise_count={}",
            workout.id,
            workout.template_id.is_some(),
            workout.exercises.len()
        );
        Ok(workout)
    }

    /// Patches the supplied session fields. An empty patch writes nothing.
    pub fn update_workout(
        &self,
        id: WorkoutId,
        patch: &WorkoutPatch,
    ) -> Result<Workout, WorkoutServiceError> {
        if patch.is_empty() {
            return self.get_workout(id);
        }

        self.repo.update_workout(id, patch)?;
        info!(
            "event=workout_update module=service status=ok workout_id={} renamed={} completion_changed={}",
            id,
            patch.name.is_some(),
            patch.completed_at.is_some()
        );

        self.repo
            .get_workout(id)?
            .ok_or(WorkoutServiceError::InconsistentState(
                "updated workout not found in read-back",
            ))
    }

    /// Marks a session completed now.
    pub fn finish_workout(&self, id: WorkoutId) -> Result<Workout, WorkoutServiceError> {
        let patch = WorkoutPatch {
            name: None,
            completed_at: Some(Some(now_millis())),
        };
        self.update_workout(id, &patch)
    }

    /// Appends one exercise after the current last position.
    pub fn add_workout_exercise(
        &self,
        workout_id: WorkoutId,
        exercise: &NewWorkoutExercise,
    ) -> Result<WorkoutExercise, WorkoutServiceError> {
        let created = self.repo.append_exercise(workout_id, exercise)?;
        info!(
            "event=workout_exercise_add module=service status=ok workout_id={} exercise_id={} sort_order={}",
            workout_id, created.id, created.sort_order
        );
        Ok(created)
    }

    /// Patches the supplied fields of one exercise within `workout_id`.
    pub fn patch_exercise(
        &self,
        workout_id: WorkoutId,
        exercise_id: WorkoutExerciseId,
        patch: &ExercisePatch,
    ) -> Result<WorkoutExercise, WorkoutServiceError> {
        Ok(self.repo.patch_exercise(workout_id, exercise_id, patch)?)
    }

    /// Distinct dates with a completed session, inclusive bounds, ascending.
    pub fn completed_dates(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<NaiveDate>, WorkoutServiceError> {
        Ok(self.repo.completed_dates(DateRange { from, to })?)
    }

    /// Number of distinct completed-session days on or after `start`.
    pub fn active_days_since(&self, start: NaiveDate) -> Result<usize, WorkoutServiceError> {
        Ok(self.completed_dates(Some(start), None)?.len())
    }
}
