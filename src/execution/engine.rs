//! Main execution engine - orchestrates the entire run

use crate::{
    core::{Job, PushEvent, RunStatus, StageKind, StageState},
    execution::{executor::StageOutcome, workspace::Workspace, StageExecutor},
    tools::CommandRunner,
};
use chrono::Utc;
use std::sync::{Arc, Mutex};
use tracing::{error, info};
use uuid::Uuid;

/// Events that can occur during a run
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted {
        run_id: Uuid,
        job_name: String,
    },
    /// The push event did not match the trigger gate; nothing ran
    RunSkipped {
        run_id: Uuid,
        branch: String,
    },
    StageStarted {
        kind: StageKind,
    },
    StageCompleted {
        kind: StageKind,
        detail: String,
    },
    StageFailed {
        kind: StageKind,
        error: String,
    },
    RunCompleted {
        run_id: Uuid,
        status: RunStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

/// Main run execution engine.
///
/// Strictly sequential: stages run in their fixed order and the first
/// failure aborts the run. Remaining stages are marked skipped and the
/// publish step is never reached after a generation failure.
pub struct ExecutionEngine<R> {
    executor: StageExecutor<R>,
    event_handlers: Mutex<Vec<EventHandler>>,
}

impl<R: CommandRunner> ExecutionEngine<R> {
    pub fn new(runner: Arc<R>) -> Self {
        Self {
            executor: StageExecutor::new(runner),
            event_handlers: Mutex::new(Vec::new()),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&self, handler: F)
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.lock().unwrap().push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: ExecutionEvent) {
        let handlers = self.event_handlers.lock().unwrap();
        for handler in handlers.iter() {
            handler(event.clone());
        }
    }

    /// Execute the run for a push event
    pub async fn execute(&self, job: &mut Job, event: &PushEvent) -> Result<RunStatus, String> {
        let run_id = job.state.run_id;

        if !job.gate().allows(event) {
            info!(
                "Push on '{}' does not match the trigger gate for {}, ignoring",
                event.branch, job.name
            );
            job.state.skip();
            self.emit_event(ExecutionEvent::RunSkipped {
                run_id,
                branch: event.branch.clone(),
            });
            self.emit_event(ExecutionEvent::RunCompleted {
                run_id,
                status: RunStatus::Skipped,
            });
            return Ok(RunStatus::Skipped);
        }

        info!("Starting run: {} ({})", job.name, run_id);
        self.emit_event(ExecutionEvent::RunStarted {
            run_id,
            job_name: job.name.clone(),
        });
        job.state.start(job.stages.len());

        let workspace = Workspace::create(job.source.workdir.as_deref())
            .map_err(|e| format!("Failed to create workspace: {}", e))?;

        for index in 0..job.stages.len() {
            let stage = job.stages[index].clone();
            let started_at = Utc::now();

            if let Some(s) = job.stage_mut(stage.kind) {
                s.state = StageState::Running { started_at };
            }
            self.emit_event(ExecutionEvent::StageStarted { kind: stage.kind });

            let outcome = self.executor.execute(job, &stage, event, &workspace).await;

            match outcome {
                StageOutcome::Success { detail } => {
                    if let Some(s) = job.stage_mut(stage.kind) {
                        s.state = StageState::Completed {
                            detail: detail.clone(),
                            started_at,
                            completed_at: Utc::now(),
                        };
                    }
                    job.update_counts();
                    self.emit_event(ExecutionEvent::StageCompleted {
                        kind: stage.kind,
                        detail,
                    });
                }
                StageOutcome::Failure { error: stage_error } => {
                    if let Some(s) = job.stage_mut(stage.kind) {
                        s.state = StageState::Failed {
                            error: stage_error.clone(),
                            started_at,
                            failed_at: Utc::now(),
                        };
                    }
                    // Abort: everything downstream never runs
                    for remaining in job.stages.iter_mut().skip(index + 1) {
                        remaining.state = StageState::Skipped {
                            reason: "run aborted".to_string(),
                        };
                    }
                    job.state.fail();
                    job.update_counts();

                    self.emit_event(ExecutionEvent::StageFailed {
                        kind: stage.kind,
                        error: stage_error.clone(),
                    });
                    self.emit_event(ExecutionEvent::RunCompleted {
                        run_id,
                        status: RunStatus::Failed,
                    });
                    error!("Run {} failed at {}: {}", run_id, stage.kind, stage_error);
                    return Err(stage_error);
                }
            }
        }

        job.state.complete();
        info!("Run finished: {} - {:?}", job.name, job.state.status);
        self.emit_event(ExecutionEvent::RunCompleted {
            run_id,
            status: RunStatus::Completed,
        });

        Ok(RunStatus::Completed)
    }
}
