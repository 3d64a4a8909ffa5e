//! CLI command definitions

use clap::Args;

/// Run the pipeline for a push event
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to the job YAML file
    #[arg(short, long)]
    pub file: String,

    /// Branch the push landed on (evaluated against the trigger gate)
    #[arg(short, long)]
    pub branch: String,

    /// Commit SHA to check out (default: branch head)
    #[arg(long)]
    pub commit: Option<String>,

    /// Don't save the run to history
    #[arg(long)]
    pub no_history: bool,
}

/// Validate a job configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to the job YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// List jobs with recorded runs
#[derive(Debug, Args, Clone)]
pub struct ListCommand {
    /// Show run counts
    #[arg(long)]
    pub with_counts: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Show run history
#[derive(Debug, Args, Clone)]
pub struct HistoryCommand {
    /// Job name to filter by
    #[arg(short, long)]
    pub job: Option<String>,

    /// Number of recent runs to show
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,

    /// Show full details
    #[arg(long)]
    pub verbose: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show a specific run by ID
    #[arg(long)]
    pub run_id: Option<String>,
}
