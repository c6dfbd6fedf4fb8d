//! Template repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist templates together with their ordered planned exercises.
//! - Own the atomic full-replace of a template's exercise list.
//!
//! # Invariants
//! - Template reads are hydrated inside one read snapshot.
//! - `replace_template` deletes and re-inserts all exercise rows in a single
//!   immediate transaction; readers observe the old or the new list only.
//! - Listing order is `created_at DESC, uuid ASC`; exercises `sort_order ASC`.

use crate::db::{with_read_snapshot, with_write_transaction};
use crate::model::template::{Template, TemplateExercise, TemplateId};
use crate::repo::{
    ensure_schema_ready, parse_count, parse_epoch_ms, parse_uuid, parse_weight_unit, RecordKind,
    RepoError, RepoResult, TEMPLATE_TABLES,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TEMPLATE_EXERCISE_SELECT_SQL: &str = "SELECT
    uuid,
    template_uuid,
    name,
    weight,
    weight_unit,
    sets,
    reps,
    sort_order
FROM template_exercises";

/// Repository interface for template persistence.
pub trait TemplateRepository {
    /// Inserts the template row and all of its exercises atomically.
    fn create_template(&self, template: &Template) -> RepoResult<TemplateId>;
    /// Loads one hydrated template.
    fn get_template(&self, id: TemplateId) -> RepoResult<Option<Template>>;
    /// Loads every hydrated template, newest first.
    fn list_templates(&self) -> RepoResult<Vec<Template>>;
    /// Renames a template and replaces its full exercise list in one transaction.
    fn replace_template(
        &self,
        id: TemplateId,
        name: &str,
        exercises: &[TemplateExercise],
    ) -> RepoResult<()>;
    /// Deletes exercises then the template row. Returns whether the template existed.
    fn delete_template(&self, id: TemplateId) -> RepoResult<bool>;
    /// Number of stored templates.
    fn count_templates(&self) -> RepoResult<u64>;
}

/// SQLite-backed template repository.
pub struct SqliteTemplateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTemplateRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, TEMPLATE_TABLES)?;
        Ok(Self { conn })
    }
}

impl TemplateRepository for SqliteTemplateRepository<'_> {
    fn create_template(&self, template: &Template) -> RepoResult<TemplateId> {
        for exercise in &template.exercises {
            exercise.validate()?;
        }

        with_write_transaction(self.conn, |tx| {
            tx.execute(
                "INSERT INTO templates (uuid, name, created_at) VALUES (?1, ?2, ?3);",
                params![
                    template.id.to_string(),
                    template.name.as_str(),
                    template.created_at.timestamp_millis(),
                ],
            )?;
            insert_template_exercises(tx, template.id, &template.exercises)
        })?;

        Ok(template.id)
    }

    fn get_template(&self, id: TemplateId) -> RepoResult<Option<Template>> {
        with_read_snapshot(self.conn, |tx| load_template(tx, id))
    }

    fn list_templates(&self) -> RepoResult<Vec<Template>> {
        with_read_snapshot(self.conn, |tx| {
            let mut stmt = tx.prepare(
                "SELECT uuid, name, created_at
                 FROM templates
                 ORDER BY created_at DESC, uuid ASC;",
            )?;
            let mut rows = stmt.query([])?;
            let mut templates = Vec::new();
            while let Some(row) = rows.next()? {
                let mut template = parse_template_row(row)?;
                template.exercises = load_template_exercises(tx, template.id)?;
                templates.push(template);
            }
            Ok(templates)
        })
    }

    fn replace_template(
        &self,
        id: TemplateId,
        name: &str,
        exercises: &[TemplateExercise],
    ) -> RepoResult<()> {
        for exercise in exercises {
            exercise.validate()?;
        }

        with_write_transaction(self.conn, |tx| {
            let changed = tx.execute(
                "UPDATE templates SET name = ?2 WHERE uuid = ?1;",
                params![id.to_string(), name],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    kind: RecordKind::Template,
                    id,
                });
            }

            tx.execute(
                "DELETE FROM template_exercises WHERE template_uuid = ?1;",
                [id.to_string()],
            )?;
            insert_template_exercises(tx, id, exercises)
        })
    }

    fn delete_template(&self, id: TemplateId) -> RepoResult<bool> {
        with_write_transaction(self.conn, |tx| {
            tx.execute(
                "DELETE FROM template_exercises WHERE template_uuid = ?1;",
                [id.to_string()],
            )?;
            let removed = tx.execute("DELETE FROM templates WHERE uuid = ?1;", [id.to_string()])?;
            Ok(removed > 0)
        })
    }

    fn count_templates(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM templates;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative template count `{count}`")))
    }
}

/// Loads one hydrated template on an existing connection or transaction.
pub(crate) fn load_template(conn: &Connection, id: TemplateId) -> RepoResult<Option<Template>> {
    let template = conn
        .query_row(
            "SELECT uuid, name, created_at FROM templates WHERE uuid = ?1;",
            [id.to_string()],
            |row| Ok(parse_template_row(row)),
        )
        .optional()?
        .transpose()?;

    match template {
        Some(mut template) => {
            template.exercises = load_template_exercises(conn, template.id)?;
            Ok(Some(template))
        }
        None => Ok(None),
    }
}

/// Loads a template's planned exercises ordered by `sort_order ASC`.
pub(crate) fn load_template_exercises(
    conn: &Connection,
    template_id: TemplateId,
) -> RepoResult<Vec<TemplateExercise>> {
    let mut stmt = conn.prepare(&format!(
        "{TEMPLATE_EXERCISE_SELECT_SQL}
         WHERE template_uuid = ?1
         ORDER BY sort_order ASC, uuid ASC;"
    ))?;
    let mut rows = stmt.query([template_id.to_string()])?;
    let mut exercises = Vec::new();
    while let Some(row) = rows.next()? {
        exercises.push(parse_template_exercise_row(row)?);
    }
    Ok(exercises)
}

fn insert_template_exercises(
    conn: &Connection,
    template_id: TemplateId,
    exercises: &[TemplateExercise],
) -> RepoResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO template_exercises (
            uuid,
            template_uuid,
            name,
            weight,
            weight_unit,
            sets,
            reps,
            sort_order
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
    )?;
    for exercise in exercises {
        stmt.execute(params![
            exercise.id.to_string(),
            template_id.to_string(),
            exercise.name.as_str(),
            exercise.weight,
            exercise.weight_unit.as_str(),
            exercise.sets,
            exercise.reps,
            exercise.sort_order,
        ])?;
    }
    Ok(())
}

fn parse_template_row(row: &Row<'_>) -> RepoResult<Template> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Template {
        id: parse_uuid(&uuid_text, "templates.uuid")?,
        name: row.get("name")?,
        created_at: parse_epoch_ms(row.get("created_at")?, "templates.created_at")?,
        exercises: Vec::new(),
    })
}

fn parse_template_exercise_row(row: &Row<'_>) -> RepoResult<TemplateExercise> {
    let uuid_text: String = row.get("uuid")?;
    let template_text: String = row.get("template_uuid")?;
    let unit_text: String = row.get("weight_unit")?;

    Ok(TemplateExercise {
        id: parse_uuid(&uuid_text, "template_exercises.uuid")?,
        template_id: parse_uuid(&template_text, "template_exercises.template_uuid")?,
        name: row.get("name")?,
        weight: row.get("weight")?,
        weight_unit: parse_weight_unit(&unit_text, "template_exercises.weight_unit")?,
        sets: parse_count(row.get("sets")?, "template_exercises.sets")?,
        reps: parse_count(row.get("reps")?, "template_exercises.reps")?,
        sort_order: row.get("sort_order")?,
    })
}
