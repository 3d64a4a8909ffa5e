//! Subprocess clients for the external tools the pipeline drives
//!
//! git, rustup, and cargo are opaque collaborators: each stage shells out
//! to the real tool through the [`CommandRunner`] abstraction so tests can
//! substitute a mock.

pub mod cargo;
pub mod git;
pub mod runner;
pub mod rustup;

pub use cargo::DocGenerator;
pub use git::GitClient;
pub use runner::{CommandOutput, CommandRunner, Invocation, SystemRunner, ToolError};
pub use rustup::ToolchainInstaller;
