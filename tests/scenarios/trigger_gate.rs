//! Test: Trigger Gate - pushes on other branches are ignored

use crate::helpers::*;
use docship::core::{PushEvent, RunStatus, StageState};
use docship::execution::ExecutionEvent;
use std::sync::Arc;

const YAML: &str = r#"
name: "Trigger Gate"
trigger:
  branches: ["main"]
source:
  repository: "https://github.com/acme/widget.git"
publish:
  token_env: "DOCSHIP_TEST_TOKEN_GATE"
"#;

/// A push on a non-allowed branch performs zero stages
#[tokio::test]
async fn test_non_matching_branch_is_noop() {
    let tools = Arc::new(MockTools::new());
    let result = run_job_with_mock(YAML, PushEvent::new("develop", None), tools.clone()).await;

    assert_eq!(result.status, Ok(RunStatus::Skipped));
    assert_eq!(result.job.state.status, RunStatus::Skipped);

    // No external tool was ever invoked
    assert!(tools.calls().is_empty());

    // No stage started; all are still pending
    assert!(result.started_stages().is_empty());
    for stage in &result.job.stages {
        assert!(matches!(stage.state, StageState::Pending));
    }

    // The skip is observable as an event
    assert!(result
        .events
        .iter()
        .any(|e| matches!(e, ExecutionEvent::RunSkipped { .. })));
}

/// Regex allow-lists gate on the whole pattern
#[tokio::test]
async fn test_regex_gate() {
    let yaml = r#"
name: "Trigger Gate Regex"
trigger:
  branches: ["^release/\\d+\\.\\d+$"]
  use_regex: true
source:
  repository: "https://github.com/acme/widget.git"
publish:
  token_env: "DOCSHIP_TEST_TOKEN_GATE_RE"
"#;
    std::env::set_var("DOCSHIP_TEST_TOKEN_GATE_RE", "tok123");

    let tools = Arc::new(MockTools::new());
    let matching =
        run_job_with_mock(yaml, PushEvent::new("release/1.2", None), tools.clone()).await;
    assert_run_completed(&matching);

    let other_tools = Arc::new(MockTools::new());
    let ignored =
        run_job_with_mock(yaml, PushEvent::new("release/notes", None), other_tools.clone()).await;
    assert_eq!(ignored.status, Ok(RunStatus::Skipped));
    assert!(other_tools.calls().is_empty());
}
