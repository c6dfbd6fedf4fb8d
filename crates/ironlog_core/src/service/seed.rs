//! First-run demo data.

use crate::model::exercise::ExerciseInput;
use crate::model::template::NewTemplate;
use crate::repo::template_repo::SqliteTemplateRepository;
use crate::service::template_service::{TemplateService, TemplateServiceError};
use log::info;
use rusqlite::Connection;

/// Name of the template created on an empty store.
pub const SEED_TEMPLATE_NAME: &str = "Push Day";

/// Exercises of the seeded template as `(name, weight_lb, sets, reps)`.
const SEED_EXERCISES: &[(&str, f64, u32, u32)] = &[
    ("Machine Bench Press", 145.0, 5, 5),
    ("Machine Incline Press", 100.0, 3, 6),
    ("Dumbbell Shoulder Press", 40.0, 3, 10),
    ("Cable Lateral Raise", 15.0, 3, 15),
    ("Tricep Pushdown", 50.0, 3, 12),
];

/// Creates the demo template when the store holds no templates.
///
/// Returns `true` when the seed was written.
pub fn seed_if_empty(conn: &Connection) -> Result<bool, TemplateServiceError> {
    let service = TemplateService::new(SqliteTemplateRepository::try_new(conn)?);
    if service.count_templates()? > 0 {
        info!("event=store_seed module=service status=skipped reason=not_empty");
        return Ok(false);
    }

    let exercises = SEED_EXERCISES
        .iter()
        .map(|&(name, weight, sets, reps)| ExerciseInput::with_load(name, weight, sets, reps))
        .collect();
    let template = service.create_template(NewTemplate::new(SEED_TEMPLATE_NAME, exercises))?;
    info!(
        "event=store_seed module=service status=ok template_id={} exercise_count={}",
        template.id,
        template.exercises.len()
    );
    Ok(true)
}
