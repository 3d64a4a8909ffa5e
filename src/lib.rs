//! docship - builds rustdoc and ships it to a pages branch

pub mod cli;
pub mod core;
pub mod execution;
pub mod persistence;
pub mod publish;
pub mod tools;

// Re-export commonly used types
pub use crate::core::{Job, PushEvent, RunState, RunStatus, Stage, StageKind, StageState};
pub use crate::core::config::JobConfig;
pub use crate::execution::{ExecutionEngine, ExecutionEvent, Workspace};
pub use crate::publish::{PagesPublisher, PublishError, SyncStats};
pub use crate::tools::{CommandRunner, Invocation, SystemRunner, ToolError};
