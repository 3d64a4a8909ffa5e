//! Push events and the branch trigger gate

use regex::Regex;

/// A push event delivered to the pipeline
///
/// The branch is the ref that was pushed; the commit pins the exact
/// revision to fetch. Without a commit the fetch stage checks out the
/// branch head.
#[derive(Debug, Clone)]
pub struct PushEvent {
    /// Branch the push landed on
    pub branch: String,

    /// Commit SHA to check out, if pinned
    pub commit: Option<String>,
}

impl PushEvent {
    pub fn new(branch: impl Into<String>, commit: Option<String>) -> Self {
        Self {
            branch: branch.into(),
            commit,
        }
    }
}

/// Pattern for matching a pushed branch name
#[derive(Debug, Clone)]
pub enum BranchPattern {
    /// Exact branch name match
    Exact(String),
    /// Regular expression match (anchored by the caller's pattern)
    Regex(Regex),
}

impl BranchPattern {
    /// Check if the pattern matches the given branch name
    pub fn matches(&self, branch: &str) -> bool {
        match self {
            BranchPattern::Exact(name) => name == branch,
            BranchPattern::Regex(regex) => regex.is_match(branch),
        }
    }
}

/// Branch allow-list evaluated against incoming push events
///
/// A non-matching event is not an error: the run is a no-op.
#[derive(Debug, Clone)]
pub struct TriggerGate {
    patterns: Vec<BranchPattern>,
}

impl TriggerGate {
    pub fn new(patterns: Vec<BranchPattern>) -> Self {
        Self { patterns }
    }

    /// Whether the event's branch is on the allow-list
    pub fn allows(&self, event: &PushEvent) -> bool {
        self.patterns.iter().any(|p| p.matches(&event.branch))
    }
}
