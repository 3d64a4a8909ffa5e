//! Run execution engine

pub mod engine;
pub mod executor;
pub mod workspace;

pub use engine::{EventHandler, ExecutionEngine, ExecutionEvent};
pub use executor::{StageExecutor, StageOutcome};
pub use workspace::Workspace;
