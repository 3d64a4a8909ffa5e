//! Persistence layer for run history

#[cfg(feature = "sqlite")]
pub mod store;

#[cfg(feature = "sqlite")]
pub use store::SqliteRunStore;

pub use crate::core::RunStatus;
use crate::core::{Job, PushEvent};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary of a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique run ID
    pub run_id: Uuid,

    /// Job name
    pub job_name: String,

    /// Source repository
    pub repository: String,

    /// Branch the triggering push landed on
    pub branch: String,

    /// Commit SHA, if the event pinned one
    pub commit: Option<String>,

    /// Run status
    pub status: RunStatus,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run completed (if it did)
    pub completed_at: Option<DateTime<Utc>>,

    /// Progress (0.0 to 1.0)
    pub progress: f64,

    /// Number of completed stages
    pub completed_stages: usize,

    /// Total number of stages
    pub total_stages: usize,
}

/// Build a summary of the job's current run for a push event
pub fn create_summary(job: &Job, event: &PushEvent) -> RunSummary {
    RunSummary {
        run_id: job.state.run_id,
        job_name: job.name.clone(),
        repository: job.source.repository.clone(),
        branch: event.branch.clone(),
        commit: event.commit.clone(),
        status: job.state.status,
        started_at: job.state.started_at.unwrap_or_else(Utc::now),
        completed_at: job.state.completed_at,
        progress: job.state.progress(),
        completed_stages: job.state.completed_stages,
        total_stages: job.state.total_stages,
    }
}

/// Trait for persistence backends
#[async_trait::async_trait]
pub trait PersistenceBackend: Send + Sync {
    /// Save a run
    async fn save_run(&self, run: &RunSummary) -> Result<()>;

    /// Load a run by ID
    async fn load_run(&self, run_id: Uuid) -> Result<Option<RunSummary>>;

    /// List all runs for a job, newest first
    async fn list_runs(&self, job_name: &str) -> Result<Vec<RunSummary>>;

    /// Get the most recent run for a job
    async fn latest_run(&self, job_name: &str) -> Result<Option<RunSummary>>;

    /// Delete a run by ID
    async fn delete_run(&self, run_id: Uuid) -> Result<()>;

    /// List all job names with recorded runs
    async fn list_jobs(&self) -> Result<Vec<String>>;
}

/// In-memory persistence (for `--no-history` or tests)
pub struct InMemoryPersistence {
    runs: tokio::sync::RwLock<std::collections::HashMap<Uuid, RunSummary>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self {
            runs: tokio::sync::RwLock::new(std::collections::HashMap::new()),
        }
    }
}

impl Default for InMemoryPersistence {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PersistenceBackend for InMemoryPersistence {
    async fn save_run(&self, run: &RunSummary) -> Result<()> {
        self.runs.write().await.insert(run.run_id, run.clone());
        Ok(())
    }

    async fn load_run(&self, run_id: Uuid) -> Result<Option<RunSummary>> {
        Ok(self.runs.read().await.get(&run_id).cloned())
    }

    async fn list_runs(&self, job_name: &str) -> Result<Vec<RunSummary>> {
        let mut runs: Vec<_> = self
            .runs
            .read()
            .await
            .values()
            .filter(|r| r.job_name == job_name)
            .cloned()
            .collect();
        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(runs)
    }

    async fn latest_run(&self, job_name: &str) -> Result<Option<RunSummary>> {
        Ok(self.list_runs(job_name).await?.into_iter().next())
    }

    async fn delete_run(&self, run_id: Uuid) -> Result<()> {
        self.runs.write().await.remove(&run_id);
        Ok(())
    }

    async fn list_jobs(&self) -> Result<Vec<String>> {
        let mut names: Vec<_> = self
            .runs
            .read()
            .await
            .values()
            .map(|r| r.job_name.clone())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}
