//! Stage domain model

use crate::core::state::StageState;

/// The four fixed stages of a run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Clone the repository at the triggering commit
    Fetch,
    /// Install the configured toolchain
    Toolchain,
    /// Build the documentation output directory
    GenerateDocs,
    /// Upload the output directory to the pages branch
    Publish,
}

impl StageKind {
    /// All stages in execution order
    pub const ORDER: [StageKind; 4] = [
        StageKind::Fetch,
        StageKind::Toolchain,
        StageKind::GenerateDocs,
        StageKind::Publish,
    ];

    /// Short identifier used in logs and history
    pub fn id(&self) -> &'static str {
        match self {
            StageKind::Fetch => "fetch",
            StageKind::Toolchain => "toolchain",
            StageKind::GenerateDocs => "generate-docs",
            StageKind::Publish => "publish",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            StageKind::Fetch => "Fetch source",
            StageKind::Toolchain => "Install toolchain",
            StageKind::GenerateDocs => "Generate docs",
            StageKind::Publish => "Publish",
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// A single stage in a run
#[derive(Debug, Clone)]
pub struct Stage {
    /// Which of the four pipeline stages this is
    pub kind: StageKind,

    /// Timeout in seconds
    pub timeout_secs: u64,

    /// Runtime state
    pub state: StageState,
}

impl Stage {
    pub fn new(kind: StageKind, timeout_secs: u64) -> Self {
        Self {
            kind,
            timeout_secs,
            state: StageState::Pending,
        }
    }
}
