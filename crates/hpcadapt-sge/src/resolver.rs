//! Resolve a job's state by consulting sources in priority order.

use crate::backend::{SgeConfig, SgeQuery};
use crate::source::JobStateSource;
use crate::types::JobState;
use std::future::Future;

/// Walks the source cascade for a job id.
///
/// The first source that knows the job decides its state. A source that
/// errors is treated as having no record. When no source knows the job it is
/// assumed to be too new to show up anywhere yet, and reported as running.
pub struct JobStateResolver<Q> {
    backend: Q,
    sources: Vec<JobStateSource>,
}

impl<Q: SgeQuery> JobStateResolver<Q> {
    /// Resolver over the standard cascade with the configured tail window.
    pub fn new(backend: Q, config: &SgeConfig) -> Self {
        Self::with_sources(backend, JobStateSource::cascade(config.tail_lines))
    }

    pub fn with_sources(backend: Q, sources: Vec<JobStateSource>) -> Self {
        Self { backend, sources }
    }

    /// Determine the state of `job_id`. Sources are queried one at a time.
    pub async fn resolve(&self, job_id: &str) -> JobState {
        for source in &self.sources {
            match source.query(&self.backend, job_id).await {
                Ok(Some(state)) => {
                    tracing::debug!("{} reports job {} as {:?}", source.name(), job_id, state);
                    return state;
                }
                Ok(None) => {
                    tracing::debug!("{} has no record of job {}", source.name(), job_id);
                }
                Err(e) => {
                    tracing::warn!("Skipping {} for job {}: {}", source.name(), job_id, e);
                }
            }
        }

        tracing::debug!(
            "No source knows job {}, assuming it is still pending",
            job_id
        );
        JobState::Running
    }

    /// Like [`resolve`](Self::resolve), but report `Failed` if `interrupt`
    /// completes before an answer is reached.
    pub async fn resolve_or_interrupt<F: Future>(&self, job_id: &str, interrupt: F) -> JobState {
        tokio::select! {
            biased;
            _ = interrupt => {
                tracing::warn!("Status check for job {} interrupted", job_id);
                JobState::Failed
            }
            state = self.resolve(job_id) => state,
        }
    }
}
