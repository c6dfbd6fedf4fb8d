//! Progress and catalog reads.

use crate::model::progress::{summarize_progress, ProgressPoint, ProgressSummary};
use crate::repo::progress_repo::ProgressRepository;
use crate::repo::RepoResult;

/// Progress service facade over repository implementations.
pub struct ProgressService<R: ProgressRepository> {
    repo: R,
}

impl<R: ProgressRepository> ProgressService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Per-session samples of `name` from completed workouts, oldest first.
    ///
    /// Same-day sessions each contribute their own point.
    pub fn exercise_progress(&self, name: &str) -> RepoResult<Vec<ProgressPoint>> {
        self.repo.exercise_progress(name)
    }

    /// Sorted, de-duplicated names from templates and workouts.
    pub fn exercise_names(&self) -> RepoResult<Vec<String>> {
        self.repo.exercise_names()
    }

    /// Headline numbers for `name`; `None` when it was never completed.
    pub fn exercise_summary(&self, name: &str) -> RepoResult<Option<ProgressSummary>> {
        let points = self.repo.exercise_progress(name)?;
        Ok(summarize_progress(&points))
    }
}
