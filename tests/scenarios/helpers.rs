//! Test utility functions for docship scenarios

use docship::core::config::JobConfig;
use docship::core::{Job, PushEvent, RunStatus, StageKind};
use docship::execution::{ExecutionEngine, ExecutionEvent};
use docship::tools::{CommandOutput, CommandRunner, Invocation, ToolError};

use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Known tool subcommands, used to label recorded calls
const SUBCOMMANDS: &[&str] = &[
    "clone",
    "checkout",
    "ls-remote",
    "add",
    "status",
    "commit",
    "push",
    "init",
    "toolchain",
    "override",
    "doc",
];

/// Mock for the external tools (git, rustup, cargo).
///
/// Records every invocation as "program subcommand" and simulates the
/// filesystem side effects the real tools would have: `cargo doc`
/// populates the output directory and the staging clone materializes the
/// previously published files.
pub struct MockTools {
    calls: Mutex<Vec<String>>,
    fail_on: Option<String>,
    pages_branch_exists: bool,
    previous_published: Vec<(String, String)>,
    doc_files: Vec<(String, String)>,
}

impl MockTools {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: None,
            pages_branch_exists: true,
            previous_published: Vec::new(),
            doc_files: vec![("index.html".to_string(), "<html></html>".to_string())],
        }
    }

    /// Fail the invocation labelled "program subcommand" (e.g. "cargo doc")
    pub fn fail_on(mut self, call: &str) -> Self {
        self.fail_on = Some(call.to_string());
        self
    }

    /// Whether the remote pages branch already exists
    pub fn pages_branch_exists(mut self, exists: bool) -> Self {
        self.pages_branch_exists = exists;
        self
    }

    /// Files the previous publication holds (seeded into the staging clone)
    pub fn previous_published(mut self, files: &[(&str, &str)]) -> Self {
        self.previous_published = files
            .iter()
            .map(|(n, c)| (n.to_string(), c.to_string()))
            .collect();
        self
    }

    /// Files `cargo doc` produces in the output directory
    pub fn doc_files(mut self, files: &[(&str, &str)]) -> Self {
        self.doc_files = files
            .iter()
            .map(|(n, c)| (n.to_string(), c.to_string()))
            .collect();
        self
    }

    /// Recorded invocations, as "program subcommand"
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Index of the first call with this label, if any
    pub fn call_position(&self, call: &str) -> Option<usize> {
        self.calls().iter().position(|c| c == call)
    }

    fn label(invocation: &Invocation) -> String {
        let subcommand = invocation
            .args
            .iter()
            .find(|arg| SUBCOMMANDS.contains(&arg.as_str()))
            .cloned()
            .unwrap_or_default();
        format!("{} {}", invocation.program, subcommand)
    }

    fn write_files(dir: &Path, files: &[(String, String)]) {
        for (name, contents) in files {
            let path = dir.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
    }
}

impl Default for MockTools {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for MockTools {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, ToolError> {
        let label = Self::label(invocation);
        self.calls.lock().unwrap().push(label.clone());

        if self.fail_on.as_deref() == Some(label.as_str()) {
            return Err(ToolError::CommandFailed {
                program: invocation.program.clone(),
                code: 1,
                stderr: "mock failure".to_string(),
            });
        }

        let mut stdout = String::new();
        match label.as_str() {
            "cargo doc" => {
                // Populate the output directory contract
                let checkout = invocation.cwd.clone().expect("cargo doc runs in the checkout");
                let output = checkout.join("target/doc");
                fs::create_dir_all(&output).unwrap();
                Self::write_files(&output, &self.doc_files);
            }
            "git ls-remote" => {
                if self.pages_branch_exists {
                    stdout = "deadbeef\trefs/heads/gh-pages\n".to_string();
                }
            }
            "git clone" => {
                // Last argument is the destination directory
                let dest = Path::new(invocation.args.last().unwrap());
                fs::create_dir_all(dest).unwrap();
                if invocation.args.iter().any(|a| a == "--branch") {
                    // Staging clone of the pages branch
                    Self::write_files(dest, &self.previous_published);
                }
            }
            "git status" => {
                stdout = "A  index.html\n".to_string();
            }
            _ => {}
        }

        Ok(CommandOutput {
            stdout,
            stderr: String::new(),
        })
    }
}

/// Result of running a scenario
pub struct ScenarioResult {
    pub status: Result<RunStatus, String>,
    pub job: Job,
    pub events: Vec<ExecutionEvent>,
}

impl ScenarioResult {
    /// Stage kinds in the order they started
    pub fn started_stages(&self) -> Vec<StageKind> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ExecutionEvent::StageStarted { kind } => Some(*kind),
                _ => None,
            })
            .collect()
    }
}

/// Run a job against the mock tools and collect events
pub async fn run_job_with_mock(
    yaml: &str,
    event: PushEvent,
    tools: Arc<MockTools>,
) -> ScenarioResult {
    let config = JobConfig::from_yaml(yaml).expect("scenario YAML should parse");
    let mut job = config.to_job().expect("scenario job should build");

    let engine = ExecutionEngine::new(tools);
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    engine.add_event_handler(move |event| sink.lock().unwrap().push(event));

    let status = engine.execute(&mut job, &event).await;
    let events = events.lock().unwrap().clone();

    ScenarioResult { status, job, events }
}

/// Assert the run completed successfully
pub fn assert_run_completed(result: &ScenarioResult) {
    assert_eq!(result.status, Ok(RunStatus::Completed));
    assert_eq!(result.job.state.status, RunStatus::Completed);
    assert!(result.job.is_complete());
}

/// Assert stages started in exactly this order
pub fn assert_stage_order(result: &ScenarioResult, expected: &[StageKind]) {
    assert_eq!(result.started_stages(), expected.to_vec());
}
