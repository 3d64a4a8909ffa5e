//! Stage executor - runs individual stages against the tool layer

use crate::{
    core::{Job, PushEvent, Stage, StageKind},
    execution::workspace::Workspace,
    publish::{PagesPublisher, PublishError, PublishRequest},
    tools::{CommandRunner, DocGenerator, GitClient, ToolchainInstaller},
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info};

/// Result of executing a stage
#[derive(Debug, Clone)]
pub enum StageOutcome {
    /// Stage completed; detail is a one-line summary for logs/events
    Success { detail: String },
    /// Stage failed; the run aborts here
    Failure { error: String },
}

/// Executes a single stage
pub struct StageExecutor<R> {
    git: GitClient<R>,
    toolchain: ToolchainInstaller<R>,
    docs: DocGenerator<R>,
    publisher: PagesPublisher<R>,
}

impl<R: CommandRunner> StageExecutor<R> {
    pub fn new(runner: Arc<R>) -> Self {
        Self {
            git: GitClient::new(runner.clone()),
            toolchain: ToolchainInstaller::new(runner.clone()),
            docs: DocGenerator::new(runner.clone()),
            publisher: PagesPublisher::new(runner),
        }
    }

    /// Execute a stage under its timeout and return the outcome
    pub async fn execute(
        &self,
        job: &Job,
        stage: &Stage,
        event: &PushEvent,
        workspace: &Workspace,
    ) -> StageOutcome {
        info!("Executing stage: {}", stage.kind);

        let timeout_duration = Duration::from_secs(stage.timeout_secs);
        match timeout(
            timeout_duration,
            self.run_stage(job, stage.kind, event, workspace),
        )
        .await
        {
            Ok(Ok(detail)) => {
                debug!("Stage {} finished: {}", stage.kind, detail);
                StageOutcome::Success { detail }
            }
            Ok(Err(e)) => {
                error!("Stage {} failed: {:#}", stage.kind, e);
                StageOutcome::Failure {
                    error: format!("{:#}", e),
                }
            }
            Err(_) => {
                error!("Stage {} timed out after {}s", stage.kind, stage.timeout_secs);
                StageOutcome::Failure {
                    error: format!("Timeout after {} seconds", stage.timeout_secs),
                }
            }
        }
    }

    async fn run_stage(
        &self,
        job: &Job,
        kind: StageKind,
        event: &PushEvent,
        workspace: &Workspace,
    ) -> Result<String> {
        match kind {
            StageKind::Fetch => self.fetch(job, event, workspace).await,
            StageKind::Toolchain => self.install_toolchain(job, workspace).await,
            StageKind::GenerateDocs => self.generate_docs(job, workspace).await,
            StageKind::Publish => self.publish(job, workspace).await,
        }
    }

    async fn fetch(&self, job: &Job, event: &PushEvent, workspace: &Workspace) -> Result<String> {
        let checkout = workspace.checkout_dir();

        // A fixed workdir may hold a previous run's checkout
        if checkout.exists() {
            debug!("Removing stale checkout at {}", checkout.display());
            std::fs::remove_dir_all(&checkout).context("Failed to remove stale checkout")?;
        }

        self.git
            .clone_at(&job.source.repository, event.commit.as_deref(), &checkout)
            .await
            .context("Failed to fetch source")?;

        Ok(match &event.commit {
            Some(commit) => format!("checked out {}", commit),
            None => format!("checked out head of {}", event.branch),
        })
    }

    async fn install_toolchain(&self, job: &Job, workspace: &Workspace) -> Result<String> {
        self.toolchain
            .ensure(&job.toolchain, &workspace.checkout_dir())
            .await
            .context("Failed to install toolchain")
    }

    async fn generate_docs(&self, job: &Job, workspace: &Workspace) -> Result<String> {
        let output_dir = self
            .docs
            .generate(
                &workspace.checkout_dir(),
                &job.docs,
                &job.toolchain.channel,
            )
            .await
            .context("Failed to generate documentation")?;
        Ok(format!("generated {}", output_dir.display()))
    }

    async fn publish(&self, job: &Job, workspace: &Workspace) -> Result<String> {
        let token = std::env::var(&job.publish.token_env)
            .map_err(|_| PublishError::MissingCredential(job.publish.token_env.clone()))?;

        let output_dir = workspace.checkout_dir().join(&job.docs.output_dir);
        let message = format!("Publish docs for {}", job.name);
        let request = PublishRequest {
            output_dir: &output_dir,
            repo_url: &job.source.repository,
            branch: &job.publish.branch,
            token: &token,
            keep_files: job.publish.keep_files,
            message: &message,
        };

        let outcome = self
            .publisher
            .publish(&request, &workspace.staging_dir())
            .await
            .context("Failed to publish documentation")?;

        Ok(if outcome.pushed {
            format!(
                "pushed to {} ({} copied, {} removed)",
                job.publish.branch, outcome.stats.copied, outcome.stats.removed
            )
        } else {
            format!("{} already up to date", job.publish.branch)
        })
    }
}
