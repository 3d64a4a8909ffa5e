//! CLI output formatting

use crate::{
    core::{RunStatus, StageState},
    execution::ExecutionEvent,
    persistence::RunSummary,
};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a progress bar across the pipeline stages
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Format a stage state for display
pub fn format_stage_state(state: &StageState) -> String {
    match state {
        StageState::Pending => style("PENDING").dim().to_string(),
        StageState::Running { .. } => style("RUNNING").yellow().to_string(),
        StageState::Completed { .. } => style("COMPLETED").green().to_string(),
        StageState::Failed { .. } => style("FAILED").red().to_string(),
        StageState::Skipped { .. } => style("SKIPPED").dim().to_string(),
    }
}

/// Format a run status for display
pub fn format_status(status: RunStatus) -> String {
    match status {
        RunStatus::Pending => style("PENDING").dim().to_string(),
        RunStatus::Running => style("RUNNING").yellow().to_string(),
        RunStatus::Completed => style("COMPLETED").green().to_string(),
        RunStatus::Failed => style("FAILED").red().to_string(),
        RunStatus::Skipped => style("SKIPPED").dim().to_string(),
    }
}

/// Format a run summary for display
pub fn format_run_summary(summary: &RunSummary) -> String {
    let status_icon = match summary.status {
        RunStatus::Completed => CHECK,
        RunStatus::Failed => CROSS,
        RunStatus::Running => SPINNER,
        _ => INFO,
    };

    let commit = summary
        .commit
        .as_deref()
        .map(|c| c.chars().take(8).collect::<String>())
        .unwrap_or_else(|| "HEAD".to_string());

    format!(
        "{} {} - {} - {} ({}/{}) - {}@{}",
        status_icon,
        style(&summary.run_id.to_string()[..8]).dim(),
        style(&summary.job_name).bold(),
        format_status(summary.status),
        summary.completed_stages,
        summary.total_stages,
        style(&summary.branch).cyan(),
        style(commit).dim()
    )
}

/// Format an execution event for console display
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::RunStarted { job_name, run_id } => format!(
            "{} Starting {} ({})",
            ROCKET,
            style(job_name).bold(),
            style(&run_id.to_string()[..8]).dim()
        ),
        ExecutionEvent::RunSkipped { branch, .. } => format!(
            "{} Push on '{}' does not match the trigger gate, ignoring",
            INFO,
            style(branch).cyan()
        ),
        ExecutionEvent::StageStarted { kind } => {
            format!("{} {}...", SPINNER, kind.label())
        }
        ExecutionEvent::StageCompleted { kind, detail } => format!(
            "{} {}: {}",
            CHECK,
            kind.label(),
            style(detail).dim()
        ),
        ExecutionEvent::StageFailed { kind, error } => format!(
            "{} {}: {}",
            CROSS,
            kind.label(),
            style(error).red()
        ),
        ExecutionEvent::RunCompleted { status, .. } => {
            format!("{} Run {}", INFO, format_status(*status))
        }
    }
}
