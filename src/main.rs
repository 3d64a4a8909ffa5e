use anyhow::{Context, Result};
use docship::cli::commands::{HistoryCommand, ListCommand, RunCommand, ValidateCommand};
use docship::cli::output::*;
use docship::cli::{Cli, Command};
use docship::core::config::JobConfig;
use docship::core::{PushEvent, RunStatus};
use docship::execution::{ExecutionEngine, ExecutionEvent};
use docship::persistence::{create_summary, InMemoryPersistence, PersistenceBackend, RunSummary};
use docship::tools::SystemRunner;
use std::sync::Arc;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Run(cmd) => run_job(cmd).await?,
        Command::Validate(cmd) => validate_job(cmd)?,
        Command::List(cmd) => list_jobs(cmd).await?,
        Command::History(cmd) => show_history(cmd).await?,
    }

    Ok(())
}

/// Open the run-history backend
async fn open_store(no_history: bool) -> Result<Arc<dyn PersistenceBackend>> {
    if no_history {
        return Ok(Arc::new(InMemoryPersistence::new()));
    }

    #[cfg(feature = "sqlite")]
    {
        Ok(Arc::new(
            docship::persistence::SqliteRunStore::with_default_path().await?,
        ))
    }
    #[cfg(not(feature = "sqlite"))]
    {
        Ok(Arc::new(InMemoryPersistence::new()))
    }
}

async fn run_job(cmd: &RunCommand) -> Result<()> {
    // Load job config
    let config = JobConfig::from_file(&cmd.file).context("Failed to load job config")?;

    println!("{} Loaded job: {}", INFO, style(&config.name).bold());

    let mut job = config.to_job()?;
    let event = PushEvent::new(cmd.branch.clone(), cmd.commit.clone());

    // Set up persistence
    let store = open_store(cmd.no_history).await?;

    // Create execution engine against the real system tools
    let engine = ExecutionEngine::new(Arc::new(SystemRunner::new()));

    // Console output: one progress tick per finished stage
    let bar = create_progress_bar(job.stages.len());
    let bar_handle = bar.clone();
    engine.add_event_handler(move |event| {
        bar_handle.println(format_execution_event(&event));
        if matches!(
            event,
            ExecutionEvent::StageCompleted { .. } | ExecutionEvent::StageFailed { .. }
        ) {
            bar_handle.inc(1);
        }
    });

    // Execute the run
    println!();
    let result = engine.execute(&mut job, &event).await;
    bar.finish_and_clear();

    // Save to history
    if !cmd.no_history {
        let summary = create_summary(&job, &event);
        store.save_run(&summary).await?;
        println!(
            "\n{} Run saved to history (ID: {})",
            INFO,
            style(&summary.run_id.to_string()[..8]).dim()
        );
    }

    // Print final status
    match result {
        Ok(RunStatus::Skipped) => {
            println!(
                "\n{} {} {}",
                INFO,
                style(&job.name).bold(),
                style("ignored (branch not in trigger gate)").dim()
            );
        }
        Ok(_) => {
            println!(
                "\n{} {} completed {}",
                CHECK,
                style(&job.name).bold(),
                style("successfully").green()
            );
        }
        Err(e) => {
            println!(
                "\n{} {} {}",
                CROSS,
                style(&job.name).bold(),
                style("failed").red()
            );
            error!("{}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn validate_job(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating job...", INFO);

    let result = JobConfig::from_file(&cmd.file);

    match result {
        Ok(config) => {
            println!("{} Job configuration is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            println!(
                "  Trigger branches: {}",
                style(config.trigger.branches.join(", ")).cyan()
            );
            println!("  Repository: {}", style(&config.source.repository).cyan());
            println!(
                "  Publish: {} (keep_files: {})",
                style(&config.publish.branch).cyan(),
                style(config.publish.keep_files).dim()
            );

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}

async fn list_jobs(cmd: &ListCommand) -> Result<()> {
    let store = open_store(false).await?;
    let jobs = store.list_jobs().await?;

    if jobs.is_empty() {
        println!("{} No jobs found in history", INFO);
        return Ok(());
    }

    println!("{} Jobs in history:", INFO);

    for job_name in &jobs {
        let runs = store.list_runs(job_name).await?;

        if cmd.with_counts {
            let completed = runs
                .iter()
                .filter(|r| r.status == RunStatus::Completed)
                .count();
            let failed = runs.iter().filter(|r| r.status == RunStatus::Failed).count();
            let skipped = runs
                .iter()
                .filter(|r| r.status == RunStatus::Skipped)
                .count();
            println!(
                "  {} ({} runs: {} succeeded, {} failed, {} ignored)",
                style(job_name).bold(),
                style(runs.len()).cyan(),
                style(completed).green(),
                style(failed).red(),
                style(skipped).dim()
            );
        } else {
            println!("  {}", style(job_name).bold());
        }
    }

    if cmd.json {
        let mut json_data = Vec::new();
        for job in &jobs {
            let runs = store.list_runs(job).await.ok();
            json_data.push(serde_json::json!({
                "name": job,
                "run_count": runs.as_ref().map(|r| r.len()).unwrap_or(0)
            }));
        }
        let data = serde_json::json!({ "jobs": json_data });
        println!("\n{}", serde_json::to_string_pretty(&data)?);
    }

    Ok(())
}

async fn show_history(cmd: &HistoryCommand) -> Result<()> {
    let store = open_store(false).await?;

    // If a specific run ID is requested
    if let Some(run_id_str) = &cmd.run_id {
        let run_id = uuid::Uuid::parse_str(run_id_str).context("Invalid run ID format")?;
        let summary = store.load_run(run_id).await?;

        match summary {
            Some(summary) => {
                print_run_details(&summary, cmd.verbose)?;
            }
            None => {
                println!("{} Run not found", WARN);
            }
        }
        return Ok(());
    }

    // List runs for a job or all jobs
    let runs = if let Some(job_name) = &cmd.job {
        store.list_runs(job_name).await?
    } else {
        let jobs = store.list_jobs().await?;
        let mut all_runs = Vec::new();
        for job in &jobs {
            all_runs.extend(store.list_runs(job).await?);
        }
        // Sort by started_at descending
        all_runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        all_runs.into_iter().take(cmd.limit).collect()
    };

    if runs.is_empty() {
        println!("{} No runs found", INFO);
        return Ok(());
    }

    println!("{} Run history (showing latest {}):", INFO, cmd.limit);

    if cmd.json {
        let data = serde_json::json!({ "runs": runs });
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        for summary in &runs {
            println!("  {}", format_run_summary(summary));
        }
    }

    Ok(())
}

fn print_run_details(summary: &RunSummary, verbose: bool) -> Result<()> {
    println!("{} Run Details", INFO);
    println!("  ID: {}", style(summary.run_id).cyan());
    println!("  Job: {}", style(&summary.job_name).bold());
    println!("  Repository: {}", style(&summary.repository).cyan());
    println!(
        "  Event: push on {} ({})",
        style(&summary.branch).cyan(),
        style(summary.commit.as_deref().unwrap_or("HEAD")).dim()
    );
    println!("  Status: {}", format_status(summary.status));
    println!("  Started: {}", style(summary.started_at.to_rfc3339()).dim());
    if let Some(completed) = summary.completed_at {
        println!("  Completed: {}", style(completed.to_rfc3339()).dim());
        if let Ok(duration) = completed.signed_duration_since(summary.started_at).to_std() {
            println!("  Duration: {}", style(format_duration(duration)).dim());
        }
    }
    println!(
        "  Progress: {} ({}/{})",
        style(format!("{:.0}%", summary.progress * 100.0)).cyan(),
        summary.completed_stages,
        summary.total_stages
    );

    if verbose {
        println!("\n  {}", style("Full details:").bold());
        let json = serde_json::to_string_pretty(summary)?;
        for line in json.lines() {
            println!("    {}", line);
        }
    }

    Ok(())
}

fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
