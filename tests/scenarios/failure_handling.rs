//! Test: Failure Handling - any stage failure aborts the run

use crate::helpers::*;
use docship::core::{PushEvent, RunStatus, StageKind, StageState};
use std::sync::Arc;

const YAML: &str = r#"
name: "Failure Handling"
trigger:
  branches: ["main"]
source:
  repository: "https://github.com/acme/widget.git"
publish:
  token_env: "DOCSHIP_TEST_TOKEN_FAIL"
"#;

/// If generation fails, publish is never invoked
#[tokio::test]
async fn test_generation_failure_never_publishes() {
    std::env::set_var("DOCSHIP_TEST_TOKEN_FAIL", "tok123");

    let tools = Arc::new(MockTools::new().fail_on("cargo doc"));
    let result = run_job_with_mock(YAML, PushEvent::new("main", None), tools.clone()).await;

    assert!(result.status.is_err());
    assert_eq!(result.job.state.status, RunStatus::Failed);

    // Publish never started: no git traffic after the failed build
    let calls = tools.calls();
    assert!(!calls.contains(&"git ls-remote".to_string()));
    assert!(!calls.contains(&"git push".to_string()));

    assert!(matches!(
        result.job.stage(StageKind::GenerateDocs).unwrap().state,
        StageState::Failed { .. }
    ));
    assert!(matches!(
        result.job.stage(StageKind::Publish).unwrap().state,
        StageState::Skipped { .. }
    ));
}

/// A fetch failure aborts before anything else runs
#[tokio::test]
async fn test_fetch_failure_aborts_everything() {
    let tools = Arc::new(MockTools::new().fail_on("git clone"));
    let result = run_job_with_mock(YAML, PushEvent::new("main", None), tools.clone()).await;

    assert!(result.status.is_err());
    assert_eq!(result.started_stages(), vec![StageKind::Fetch]);

    let calls = tools.calls();
    assert!(!calls.iter().any(|c| c.starts_with("rustup")));
    assert!(!calls.iter().any(|c| c.starts_with("cargo")));

    for kind in [StageKind::Toolchain, StageKind::GenerateDocs, StageKind::Publish] {
        assert!(matches!(
            result.job.stage(kind).unwrap().state,
            StageState::Skipped { .. }
        ));
    }
}

/// A toolchain install failure aborts before generation
#[tokio::test]
async fn test_toolchain_failure_aborts_before_generation() {
    let tools = Arc::new(MockTools::new().fail_on("rustup toolchain"));
    let result = run_job_with_mock(YAML, PushEvent::new("main", None), tools.clone()).await;

    assert!(result.status.is_err());
    assert!(!tools.calls().iter().any(|c| c.starts_with("cargo")));
}

/// A missing credential fails the publish stage and the run
#[tokio::test]
async fn test_missing_credential_fails_publish() {
    let yaml = r#"
name: "Failure Handling"
trigger:
  branches: ["main"]
source:
  repository: "https://github.com/acme/widget.git"
publish:
  token_env: "DOCSHIP_TEST_TOKEN_UNSET"
"#;
    std::env::remove_var("DOCSHIP_TEST_TOKEN_UNSET");

    let tools = Arc::new(MockTools::new());
    let result = run_job_with_mock(yaml, PushEvent::new("main", None), tools.clone()).await;

    let error = result.status.unwrap_err();
    assert!(error.contains("DOCSHIP_TEST_TOKEN_UNSET"));
    assert_eq!(result.job.state.status, RunStatus::Failed);

    assert!(matches!(
        result.job.stage(StageKind::Publish).unwrap().state,
        StageState::Failed { .. }
    ));
    // Nothing was pushed
    assert!(!tools.calls().contains(&"git push".to_string()));
}

/// A rejected push surfaces as a failed run
#[tokio::test]
async fn test_push_failure_fails_run() {
    std::env::set_var("DOCSHIP_TEST_TOKEN_FAIL", "tok123");

    let tools = Arc::new(MockTools::new().fail_on("git push"));
    let result = run_job_with_mock(YAML, PushEvent::new("main", None), tools.clone()).await;

    assert!(result.status.is_err());
    assert_eq!(result.job.state.status, RunStatus::Failed);
    assert!(matches!(
        result.job.stage(StageKind::Publish).unwrap().state,
        StageState::Failed { .. }
    ));
}
