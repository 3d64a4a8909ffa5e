//! Test: Success Chain - the four stages run in order

use crate::helpers::*;
use docship::core::{PushEvent, StageKind, StageState};
use std::sync::Arc;

const YAML: &str = r#"
name: "Success Chain"
trigger:
  branches: ["main"]
source:
  repository: "https://github.com/acme/widget.git"
publish:
  token_env: "DOCSHIP_TEST_TOKEN_SUCCESS"
"#;

/// A push on the allowed branch executes fetch → toolchain → generate →
/// publish, in exactly that order
#[tokio::test]
async fn test_success_chain() {
    std::env::set_var("DOCSHIP_TEST_TOKEN_SUCCESS", "tok123");

    let tools = Arc::new(MockTools::new());
    let result = run_job_with_mock(
        YAML,
        PushEvent::new("main", Some("abc123".to_string())),
        tools.clone(),
    )
    .await;

    assert_run_completed(&result);
    assert_stage_order(
        &result,
        &[
            StageKind::Fetch,
            StageKind::Toolchain,
            StageKind::GenerateDocs,
            StageKind::Publish,
        ],
    );

    // Every stage ended up completed
    for kind in StageKind::ORDER {
        let stage = result.job.stage(kind).unwrap();
        assert!(
            matches!(stage.state, StageState::Completed { .. }),
            "stage {} should be completed, was {:?}",
            kind,
            stage.state
        );
    }

    // The external tools were invoked in pipeline order
    let clone = tools.call_position("git clone").unwrap();
    let toolchain = tools.call_position("rustup toolchain").unwrap();
    let doc = tools.call_position("cargo doc").unwrap();
    let push = tools.call_position("git push").unwrap();
    assert!(clone < toolchain);
    assert!(toolchain < doc);
    assert!(doc < push);
}

/// The pinned commit is checked out after the clone
#[tokio::test]
async fn test_success_chain_checks_out_commit() {
    std::env::set_var("DOCSHIP_TEST_TOKEN_SUCCESS", "tok123");

    let tools = Arc::new(MockTools::new());
    let result = run_job_with_mock(
        YAML,
        PushEvent::new("main", Some("abc123".to_string())),
        tools.clone(),
    )
    .await;

    assert_run_completed(&result);
    let clone = tools.call_position("git clone").unwrap();
    let checkout = tools.call_position("git checkout").unwrap();
    assert!(clone < checkout);

    let fetch = result.job.stage(StageKind::Fetch).unwrap();
    match &fetch.state {
        StageState::Completed { detail, .. } => assert!(detail.contains("abc123")),
        other => panic!("Expected completed fetch, got {:?}", other),
    }
}

/// A first publish bootstraps the missing pages branch
#[tokio::test]
async fn test_success_chain_bootstraps_pages_branch() {
    std::env::set_var("DOCSHIP_TEST_TOKEN_SUCCESS", "tok123");

    let tools = Arc::new(MockTools::new().pages_branch_exists(false));
    let result = run_job_with_mock(YAML, PushEvent::new("main", None), tools.clone()).await;

    assert_run_completed(&result);
    let calls = tools.calls();
    assert!(calls.contains(&"git init".to_string()));
    assert!(calls.contains(&"git push".to_string()));
}
