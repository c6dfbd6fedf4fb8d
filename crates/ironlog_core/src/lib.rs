//! Core domain logic for IronLog.
//! This crate owns every persisted template, workout and exercise record.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::exercise::{ExerciseInput, ExerciseValidationError, WeightUnit};
pub use model::progress::{summarize_progress, ProgressPoint, ProgressSummary};
pub use model::template::{NewTemplate, Template, TemplateExercise, TemplateId};
pub use model::workout::{
    ExercisePatch, NewWorkoutExercise, StartWorkout, Workout, WorkoutExercise, WorkoutId,
    WorkoutListQuery, WorkoutPatch,
};
pub use repo::progress_repo::{ProgressRepository, SqliteProgressRepository};
pub use repo::template_repo::{SqliteTemplateRepository, TemplateRepository};
pub use repo::workout_repo::{SqliteWorkoutRepository, WorkoutRepository};
pub use repo::{RepoError, RepoResult};
pub use service::progress_service::ProgressService;
pub use service::seed::seed_if_empty;
pub use service::template_service::{TemplateService, TemplateServiceError};
pub use service::workout_service::{WorkoutService, WorkoutServiceError};
pub use store::{open_store, open_store_from_env, StoreInitError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
