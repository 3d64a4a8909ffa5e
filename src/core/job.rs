//! Job domain model

use crate::core::{
    config::{DocsConfig, JobConfig, PublishConfig, SourceConfig, ToolchainConfig},
    stage::{Stage, StageKind},
    state::{RunState, RunStatus, StageState},
    trigger::TriggerGate,
};
use anyhow::Result;

const DEFAULT_STAGE_TIMEOUT_SECS: u64 = 600;

/// A runnable pipeline: resolved configuration plus the ordered stages
#[derive(Debug, Clone)]
pub struct Job {
    /// Job name
    pub name: String,

    /// Source repository configuration
    pub source: SourceConfig,

    /// Toolchain configuration
    pub toolchain: ToolchainConfig,

    /// Documentation generation configuration
    pub docs: DocsConfig,

    /// Publish configuration
    pub publish: PublishConfig,

    /// The four stages, in execution order
    pub stages: Vec<Stage>,

    /// Run state
    pub state: RunState,

    /// Compiled trigger gate
    gate: TriggerGate,
}

impl Job {
    /// Create a job from configuration
    pub fn from_config(config: &JobConfig) -> Result<Self> {
        let gate = config.compile_gate()?;
        let timeout = config
            .default_timeout_secs
            .unwrap_or(DEFAULT_STAGE_TIMEOUT_SECS);

        let stages = StageKind::ORDER
            .iter()
            .map(|kind| Stage::new(*kind, timeout))
            .collect();

        Ok(Job {
            name: config.name.clone(),
            source: config.source.clone(),
            toolchain: config.toolchain.clone(),
            docs: config.docs.clone(),
            publish: config.publish.clone(),
            stages,
            state: RunState::new(),
            gate,
        })
    }

    /// The trigger gate for this job
    pub fn gate(&self) -> &TriggerGate {
        &self.gate
    }

    /// Get a stage by kind
    pub fn stage(&self, kind: StageKind) -> Option<&Stage> {
        self.stages.iter().find(|s| s.kind == kind)
    }

    /// Get a mutable stage by kind
    pub fn stage_mut(&mut self, kind: StageKind) -> Option<&mut Stage> {
        self.stages.iter_mut().find(|s| s.kind == kind)
    }

    /// Check if every stage is in a terminal state
    pub fn is_complete(&self) -> bool {
        self.stages.iter().all(|s| s.state.is_terminal())
    }

    /// Check if the run has failed
    pub fn has_failed(&self) -> bool {
        self.state.status == RunStatus::Failed
    }

    /// Recompute run-state stage counts from the current stages
    pub fn update_counts(&mut self) {
        let completed = self
            .stages
            .iter()
            .filter(|s| matches!(s.state, StageState::Completed { .. }))
            .count();
        let failed = self
            .stages
            .iter()
            .filter(|s| matches!(s.state, StageState::Failed { .. }))
            .count();
        self.state.update_counts(self.stages.len(), completed, failed);
    }
}
