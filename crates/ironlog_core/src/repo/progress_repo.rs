//! Read-only progress and exercise-name queries.
//!
//! # Invariants
//! - Only exercises of workouts with `completed_at` set contribute points.
//! - Name matching is exact and case-sensitive.

use crate::db::with_read_snapshot;
use crate::model::progress::ProgressPoint;
use crate::repo::{
    ensure_schema_ready, parse_count, parse_date, RepoResult, TEMPLATE_TABLES, WORKOUT_TABLES,
};
use rusqlite::Connection;

/// Repository interface for aggregate progress reads.
pub trait ProgressRepository {
    /// Per-session samples of one exercise, oldest first.
    fn exercise_progress(&self, name: &str) -> RepoResult<Vec<ProgressPoint>>;
    /// Sorted union of names used in templates and workouts.
    fn exercise_names(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed progress repository.
pub struct SqliteProgressRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProgressRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, TEMPLATE_TABLES)?;
        ensure_schema_ready(conn, WORKOUT_TABLES)?;
        Ok(Self { conn })
    }
}

impl ProgressRepository for SqliteProgressRepository<'_> {
    fn exercise_progress(&self, name: &str) -> RepoResult<Vec<ProgressPoint>> {
        with_read_snapshot(self.conn, |tx| {
            let mut stmt = tx.prepare(
                "SELECT
                    w.date,
                    e.weight,
                    e.sets,
                    e.reps
                 FROM workout_exercises e
                 JOIN workouts w ON w.uuid = e.workout_uuid
                 WHERE e.name = ?1
                   AND w.completed_at IS NOT NULL
                 ORDER BY w.date ASC, w.started_at ASC, e.sort_order ASC;",
            )?;
            let mut rows = stmt.query([name])?;
            let mut points = Vec::new();
            while let Some(row) = rows.next()? {
                let date_text: String = row.get(0)?;
                points.push(ProgressPoint {
                    date: parse_date(&date_text, "workouts.date")?,
                    weight: row.get(1)?,
                    sets: parse_count(row.get(2)?, "workout_exercises.sets")?,
                    reps: parse_count(row.get(3)?, "workout_exercises.reps")?,
                });
            }
            Ok(points)
        })
    }

    fn exercise_names(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM template_exercises
             UNION
             SELECT name FROM workout_exercises
             ORDER BY name ASC;",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}
