//! Execution state models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run has not started
    Pending,
    /// Run is currently executing stages
    Running,
    /// All stages completed successfully
    Completed,
    /// A stage failed and the run was aborted
    Failed,
    /// The push event did not match the trigger gate; nothing ran
    Skipped,
}

/// State of a single stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageState {
    /// Stage has not run yet
    Pending,
    /// Stage is currently running
    Running {
        started_at: DateTime<Utc>,
    },
    /// Stage completed successfully
    Completed {
        detail: String,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    },
    /// Stage failed; the run aborts here
    Failed {
        error: String,
        started_at: DateTime<Utc>,
        failed_at: DateTime<Utc>,
    },
    /// Stage never ran (trigger mismatch or an earlier stage aborted the run)
    Skipped {
        reason: String,
    },
}

impl StageState {
    /// Check if the stage is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StageState::Completed { .. } | StageState::Failed { .. } | StageState::Skipped { .. }
        )
    }
}

/// Overall state of a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Unique run ID
    pub run_id: Uuid,

    /// Current run status
    pub status: RunStatus,

    /// When the run started
    pub started_at: Option<DateTime<Utc>>,

    /// When the run completed, failed, or was skipped
    pub completed_at: Option<DateTime<Utc>>,

    /// Total number of stages
    pub total_stages: usize,

    /// Number of completed stages
    pub completed_stages: usize,

    /// Number of failed stages
    pub failed_stages: usize,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            status: RunStatus::Pending,
            started_at: None,
            completed_at: None,
            total_stages: 0,
            completed_stages: 0,
            failed_stages: 0,
        }
    }

    /// Mark the run as started
    pub fn start(&mut self, total_stages: usize) {
        self.status = RunStatus::Running;
        self.started_at = Some(Utc::now());
        self.total_stages = total_stages;
    }

    /// Mark the run as completed
    pub fn complete(&mut self) {
        self.status = RunStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the run as failed
    pub fn fail(&mut self) {
        self.status = RunStatus::Failed;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the run as skipped (trigger mismatch)
    pub fn skip(&mut self) {
        self.status = RunStatus::Skipped;
        self.completed_at = Some(Utc::now());
    }

    /// Update stage counts
    pub fn update_counts(&mut self, total: usize, completed: usize, failed: usize) {
        self.total_stages = total;
        self.completed_stages = completed;
        self.failed_stages = failed;
    }

    /// Calculate progress (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.total_stages == 0 {
            return 0.0;
        }
        (self.completed_stages + self.failed_stages) as f64 / self.total_stages as f64
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
