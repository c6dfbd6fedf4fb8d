//! Workout session repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist sessions together with their ordered exercise instances.
//! - Copy planned template exercises into a new session atomically.
//! - Apply field patches to sessions and exercise instances.
//!
//! # Invariants
//! - Listing order is `started_at DESC, uuid ASC`; exercises `sort_order ASC`.
//! - Appended exercises take `MAX(sort_order) + 1` (or `0`) inside the same
//!   transaction as the insert.
//! - Sessions are never deleted by this repository; template deletion does
//!   not reach them.

use crate::db::{with_read_snapshot, with_write_transaction};
use crate::model::template::TemplateId;
use crate::model::workout::{
    ExercisePatch, NewWorkoutExercise, Workout, WorkoutExercise, WorkoutExerciseId, WorkoutId,
    WorkoutListQuery, WorkoutPatch,
};
use crate::repo::template_repo::load_template_exercises;
use crate::repo::{
    bool_to_int, ensure_schema_ready, format_date, parse_count, parse_date, parse_epoch_ms,
    parse_uuid, parse_weight_unit, RecordKind, RepoError, RepoResult, TEMPLATE_TABLES,
    WORKOUT_TABLES,
};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

const WORKOUT_SELECT_SQL: &str = "SELECT
    uuid,
    template_uuid,
    name,
    date,
    started_at,
    completed_at
FROM workouts";

const WORKOUT_EXERCISE_SELECT_SQL: &str = "SELECT
    uuid,
    workout_uuid,
    name,
    weight,
    weight_unit,
    sets,
    reps,
    completed,
    sort_order
FROM workout_exercises";

/// Session row to insert; exercises are copied from `template_id` when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkoutRecord {
    pub id: WorkoutId,
    pub template_id: Option<TemplateId>,
    /// `None` takes the template name. Required when `template_id` is `None`.
    pub name: Option<String>,
    pub date: NaiveDate,
    pub started_at: DateTime<Utc>,
}

/// Inclusive calendar range; open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Repository interface for workout session persistence.
pub trait WorkoutRepository {
    /// Inserts a session and, for template-based sessions, copies every planned
    /// exercise in the same transaction.
    ///
    /// Fails with `NotFound(Template)` when the template does not exist.
    fn start_workout(&self, record: &NewWorkoutRecord) -> RepoResult<WorkoutId>;
    /// Loads one hydrated session.
    fn get_workout(&self, id: WorkoutId) -> RepoResult<Option<Workout>>;
    /// Lists hydrated sessions newest first.
    fn list_workouts(&self, query: &WorkoutListQuery) -> RepoResult<Vec<Workout>>;
    /// Patches supplied session fields.
    fn update_workout(&self, id: WorkoutId, patch: &WorkoutPatch) -> RepoResult<()>;
    /// Appends one exercise at the end of the session order.
    fn append_exercise(
        &self,
        workout_id: WorkoutId,
        exercise: &NewWorkoutExercise,
    ) -> RepoResult<WorkoutExercise>;
    /// Patches supplied fields of one exercise that belongs to `workout_id`.
    fn patch_exercise(
        &self,
        workout_id: WorkoutId,
        exercise_id: WorkoutExerciseId,
        patch: &ExercisePatch,
    ) -> RepoResult<WorkoutExercise>;
    /// Distinct dates with at least one completed session, ascending.
    fn completed_dates(&self, range: DateRange) -> RepoResult<Vec<NaiveDate>>;
}

/// SQLite-backed workout repository.
pub struct SqliteWorkoutRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkoutRepository<'conn> {
    /// Creates repository from a migrated connection.
    ///
    /// Template tables are required too, since sessions copy from them.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, WORKOUT_TABLES)?;
        ensure_schema_ready(conn, TEMPLATE_TABLES)?;
        Ok(Self { conn })
    }
}

impl WorkoutRepository for SqliteWorkoutRepository<'_> {
    fn start_workout(&self, record: &NewWorkoutRecord) -> RepoResult<WorkoutId> {
        with_write_transaction(self.conn, |tx| {
            let (name, planned) = match record.template_id {
                Some(template_id) => {
                    let template_name: Option<String> = tx
                        .query_row(
                            "SELECT name FROM templates WHERE uuid = ?1;",
                            [template_id.to_string()],
                            |row| row.get(0),
                        )
                        .optional()?;
                    let template_name = template_name.ok_or(RepoError::NotFound {
                        kind: RecordKind::Template,
                        id: template_id,
                    })?;
                    let planned = load_template_exercises(tx, template_id)?;
                    (record.name.clone().unwrap_or(template_name), planned)
                }
                None => {
                    let name = record.name.clone().ok_or_else(|| {
                        RepoError::InvalidData(
                            "ad-hoc workout requires an explicit name".to_string(),
                        )
                    })?;
                    (name, Vec::new())
                }
            };

            tx.execute(
                "INSERT INTO workouts (
                    uuid,
                    template_uuid,
                    name,
                    date,
                    started_at,
                    completed_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, NULL);",
                params![
                    record.id.to_string(),
                    record.template_id.map(|id| id.to_string()),
                    name,
                    format_date(record.date),
                    record.started_at.timestamp_millis(),
                ],
            )?;

            for planned_exercise in &planned {
                let copy = WorkoutExercise::copied_from(planned_exercise, record.id);
                insert_workout_exercise(tx, &copy)?;
            }

            Ok(record.id)
        })
    }

    fn get_workout(&self, id: WorkoutId) -> RepoResult<Option<Workout>> {
        with_read_snapshot(self.conn, |tx| load_workout(tx, id))
    }

    fn list_workouts(&self, query: &WorkoutListQuery) -> RepoResult<Vec<Workout>> {
        let mut sql = format!("{WORKOUT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(date) = query.date {
            sql.push_str(" AND date = ?");
            bind_values.push(Value::Text(format_date(date)));
        }
        if query.completed_only {
            sql.push_str(" AND completed_at IS NOT NULL");
        }

        sql.push_str(" ORDER BY started_at DESC, uuid ASC");

        if let Some(limit) = query.limit.filter(|limit| *limit > 0) {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        with_read_snapshot(self.conn, |tx| {
            let mut stmt = tx.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            let mut workouts = Vec::new();
            while let Some(row) = rows.next()? {
                let mut workout = parse_workout_row(row)?;
                workout.exercises = load_workout_exercises(tx, workout.id)?;
                workouts.push(workout);
            }
            Ok(workouts)
        })
    }

    fn update_workout(&self, id: WorkoutId, patch: &WorkoutPatch) -> RepoResult<()> {
        with_write_transaction(self.conn, |tx| {
            if !workout_exists(tx, id)? {
                return Err(RepoError::NotFound {
                    kind: RecordKind::Workout,
                    id,
                });
            }

            if let Some(name) = patch.name.as_deref() {
                tx.execute(
                    "UPDATE workouts SET name = ?2 WHERE uuid = ?1;",
                    params![id.to_string(), name],
                )?;
            }
            if let Some(completed_at) = patch.completed_at {
                tx.execute(
                    "UPDATE workouts SET completed_at = ?2 WHERE uuid = ?1;",
                    params![
                        id.to_string(),
                        completed_at.map(|value| value.timestamp_millis())
                    ],
                )?;
            }
            Ok(())
        })
    }

    fn append_exercise(
        &self,
        workout_id: WorkoutId,
        exercise: &NewWorkoutExercise,
    ) -> RepoResult<WorkoutExercise> {
        with_write_transaction(self.conn, |tx| {
            if !workout_exists(tx, workout_id)? {
                return Err(RepoError::NotFound {
                    kind: RecordKind::Workout,
                    id: workout_id,
                });
            }

            let record = WorkoutExercise {
                id: Uuid::new_v4(),
                workout_id,
                name: exercise.name.clone(),
                weight: exercise.weight,
                weight_unit: exercise.weight_unit,
                sets: exercise.sets,
                reps: exercise.reps,
                completed: false,
                sort_order: next_sort_order(tx, workout_id)?,
            };
            insert_workout_exercise(tx, &record)?;
            Ok(record)
        })
    }

    fn patch_exercise(
        &self,
        workout_id: WorkoutId,
        exercise_id: WorkoutExerciseId,
        patch: &ExercisePatch,
    ) -> RepoResult<WorkoutExercise> {
        with_write_transaction(self.conn, |tx| {
            let mut exercise = load_workout_exercise(tx, workout_id, exercise_id)?.ok_or(
                RepoError::NotFound {
                    kind: RecordKind::WorkoutExercise,
                    id: exercise_id,
                },
            )?;
            patch.apply_to(&mut exercise);
            exercise.validate()?;

            tx.execute(
                "UPDATE workout_exercises
                 SET
                    completed = ?3,
                    weight = ?4,
                    sets = ?5,
                    reps = ?6
                 WHERE uuid = ?1
                   AND workout_uuid = ?2;",
                params![
                    exercise_id.to_string(),
                    workout_id.to_string(),
                    bool_to_int(exercise.completed),
                    exercise.weight,
                    exercise.sets,
                    exercise.reps,
                ],
            )?;
            Ok(exercise)
        })
    }

    fn completed_dates(&self, range: DateRange) -> RepoResult<Vec<NaiveDate>> {
        let mut sql = String::from(
            "SELECT DISTINCT date
             FROM workouts
             WHERE completed_at IS NOT NULL",
        );
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(from) = range.from {
            sql.push_str(" AND date >= ?");
            bind_values.push(Value::Text(format_date(from)));
        }
        if let Some(to) = range.to {
            sql.push_str(" AND date <= ?");
            bind_values.push(Value::Text(format_date(to)));
        }
        sql.push_str(" ORDER BY date ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut dates = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            dates.push(parse_date(&value, "workouts.date")?);
        }
        Ok(dates)
    }
}

fn load_workout(conn: &Connection, id: WorkoutId) -> RepoResult<Option<Workout>> {
    let workout = conn
        .query_row(
            &format!("{WORKOUT_SELECT_SQL} WHERE uuid = ?1;"),
            [id.to_string()],
            |row| Ok(parse_workout_row(row)),
        )
        .optional()?
        .transpose()?;

    match workout {
        Some(mut workout) => {
            workout.exercises = load_workout_exercises(conn, workout.id)?;
            Ok(Some(workout))
        }
        None => Ok(None),
    }
}

fn load_workout_exercises(
    conn: &Connection,
    workout_id: WorkoutId,
) -> RepoResult<Vec<WorkoutExercise>> {
    let mut stmt = conn.prepare(&format!(
        "{WORKOUT_EXERCISE_SELECT_SQL}
         WHERE workout_uuid = ?1
         ORDER BY sort_order ASC, uuid ASC;"
    ))?;
    let mut rows = stmt.query([workout_id.to_string()])?;
    let mut exercises = Vec::new();
    while let Some(row) = rows.next()? {
        exercises.push(parse_workout_exercise_row(row)?);
    }
    Ok(exercises)
}

fn load_workout_exercise(
    conn: &Connection,
    workout_id: WorkoutId,
    exercise_id: WorkoutExerciseId,
) -> RepoResult<Option<WorkoutExercise>> {
    conn.query_row(
        &format!("{WORKOUT_EXERCISE_SELECT_SQL} WHERE uuid = ?1 AND workout_uuid = ?2;"),
        params![exercise_id.to_string(), workout_id.to_string()],
        |row| Ok(parse_workout_exercise_row(row)),
    )
    .optional()?
    .transpose()
}

fn insert_workout_exercise(conn: &Connection, exercise: &WorkoutExercise) -> RepoResult<()> {
    exercise.validate()?;
    conn.execute(
        "INSERT INTO workout_exercises (
            uuid,
            workout_uuid,
            name,
            weight,
            weight_unit,
            sets,
            reps,
            completed,
            sort_order
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
        params![
            exercise.id.to_string(),
            exercise.workout_id.to_string(),
            exercise.name.as_str(),
            exercise.weight,
            exercise.weight_unit.as_str(),
            exercise.sets,
            exercise.reps,
            bool_to_int(exercise.completed),
            exercise.sort_order,
        ],
    )?;
    Ok(())
}

fn workout_exists(conn: &Connection, id: WorkoutId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM workouts WHERE uuid = ?1);",
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn next_sort_order(conn: &Connection, workout_id: WorkoutId) -> RepoResult<i64> {
    let next: i64 = conn.query_row(
        "SELECT COALESCE(MAX(sort_order), -1) + 1
         FROM workout_exercises
         WHERE workout_uuid = ?1;",
        [workout_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(next)
}

fn parse_workout_row(row: &Row<'_>) -> RepoResult<Workout> {
    let uuid_text: String = row.get("uuid")?;
    let template_id = match row.get::<_, Option<String>>("template_uuid")? {
        Some(value) => Some(parse_uuid(&value, "workouts.template_uuid")?),
        None => None,
    };
    let date_text: String = row.get("date")?;
    let completed_at = match row.get::<_, Option<i64>>("completed_at")? {
        Some(value) => Some(parse_epoch_ms(value, "workouts.completed_at")?),
        None => None,
    };

    Ok(Workout {
        id: parse_uuid(&uuid_text, "workouts.uuid")?,
        template_id,
        name: row.get("name")?,
        date: parse_date(&date_text, "workouts.date")?,
        started_at: parse_epoch_ms(row.get("started_at")?, "workouts.started_at")?,
        completed_at,
        exercises: Vec::new(),
    })
}

fn parse_workout_exercise_row(row: &Row<'_>) -> RepoResult<WorkoutExercise> {
    let uuid_text: String = row.get("uuid")?;
    let workout_text: String = row.get("workout_uuid")?;
    let unit_text: String = row.get("weight_unit")?;
    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in workout_exercises.completed"
            )));
        }
    };

    Ok(WorkoutExercise {
        id: parse_uuid(&uuid_text, "workout_exercises.uuid")?,
        workout_id: parse_uuid(&workout_text, "workout_exercises.workout_uuid")?,
        name: row.get("name")?,
        weight: row.get("weight")?,
        weight_unit: parse_weight_unit(&unit_text, "workout_exercises.weight_unit")?,
        sets: parse_count(row.get("sets")?, "workout_exercises.sets")?,
        reps: parse_count(row.get("reps")?, "workout_exercises.reps")?,
        completed,
        sort_order: row.get("sort_order")?,
    })
}
