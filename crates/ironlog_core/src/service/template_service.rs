//! Template use-case service.
//!
//! # Responsibility
//! - Turn caller input into persisted templates (ids, defaults, ordering).
//! - Map repository `NotFound` into template-specific errors.
//!
//! # Invariants
//! - Create and update return the hydrated read-back, never the input echo.
//! - Update is a full replace; omitted exercises are removed.

use crate::model::exercise::{resolve_sort_orders, ExerciseInput};
use crate::model::template::{NewTemplate, Template, TemplateExercise, TemplateId};
use crate::repo::template_repo::TemplateRepository;
use crate::repo::{RecordKind, RepoError};
use crate::service::now_millis;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for template use-cases.
#[derive(Debug)]
pub enum TemplateServiceError {
    /// Target template does not exist.
    TemplateNotFound(TemplateId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TemplateServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TemplateNotFound(id) => write!(f, "template not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent template state: {details}"),
        }
    }
}

impl Error for TemplateServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TemplateServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                kind: RecordKind::Template,
                id,
            } => Self::TemplateNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Template service facade over repository implementations.
pub struct TemplateService<R: TemplateRepository> {
    repo: R,
}

impl<R: TemplateRepository> TemplateService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every template newest first, exercises in plan order.
    pub fn list_templates(&self) -> Result<Vec<Template>, TemplateServiceError> {
        Ok(self.repo.list_templates()?)
    }

    /// Gets one hydrated template.
    pub fn get_template(&self, id: TemplateId) -> Result<Template, TemplateServiceError> {
        self.repo
            .get_template(id)?
            .ok_or(TemplateServiceError::TemplateNotFound(id))
    }

    /// Creates a template with fresh ids, defaults applied and positions resolved.
    pub fn create_template(&self, input: NewTemplate) -> Result<Template, TemplateServiceError> {
        let id = Uuid::new_v4();
        let template = Template {
            id,
            name: input.name,
            created_at: now_millis(),
            exercises: materialize_exercises(id, &input.exercises),
        };

        let id = self.repo.create_template(&template)?;
        info!(
            "event=template_create module=service status=ok template_id={} exercise_count={}",
            id,
            template.exercises.len()
        );

        self.repo
            .get_template(id)?
            .ok_or(TemplateServiceError::InconsistentState(
                "created template not found in read-back",
            ))
    }

    /// Renames a template and replaces its whole exercise list atomically.
    pub fn update_template(
        &self,
        id: TemplateId,
        input: NewTemplate,
    ) -> Result<Template, TemplateServiceError> {
        let exercises = materialize_exercises(id, &input.exercises);
        self.repo
            .replace_template(id, input.name.as_str(), &exercises)?;
        info!(
            "event=template_replace module=service status=ok template_id={} exercise_count={}",
            id,
            exercises.len()
        );

        self.repo
            .get_template(id)?
            .ok_or(TemplateServiceError::InconsistentState(
                "updated template not found in read-back",
            ))
    }

    /// Deletes a template and its exercises. Absent ids succeed silently.
    pub fn delete_template(&self, id: TemplateId) -> Result<(), TemplateServiceError> {
        let existed = self.repo.delete_template(id)?;
        info!(
            "event=template_delete module=service status=ok template_id={} existed={}",
            id, existed
        );
        Ok(())
    }

    pub fn count_templates(&self) -> Result<u64, TemplateServiceError> {
        Ok(self.repo.count_templates()?)
    }
}

fn materialize_exercises(
    template_id: TemplateId,
    inputs: &[ExerciseInput],
) -> Vec<TemplateExercise> {
    resolve_sort_orders(inputs)
        .into_iter()
        .map(|(sort_order, input)| TemplateExercise::from_input(template_id, sort_order, input))
        .collect()
}
