//! Documentation generation via cargo doc

use crate::core::config::DocsConfig;
use crate::tools::runner::{CommandRunner, Invocation, ToolError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Runs the toolchain's documentation command against a checkout
#[derive(Debug, Clone)]
pub struct DocGenerator<R> {
    runner: Arc<R>,
}

impl<R: CommandRunner> DocGenerator<R> {
    pub fn new(runner: Arc<R>) -> Self {
        Self { runner }
    }

    /// Generate documentation and return the output directory.
    ///
    /// The output path is the data contract with the publisher: it must
    /// exist and be non-empty after a successful build.
    pub async fn generate(
        &self,
        checkout: &Path,
        docs: &DocsConfig,
        channel: &str,
    ) -> Result<PathBuf, ToolError> {
        info!("Generating documentation in {}", checkout.display());

        let mut invocation = Invocation::new("cargo")
            .arg(format!("+{}", channel))
            .arg("doc")
            .cwd(checkout);
        if docs.no_deps {
            invocation = invocation.arg("--no-deps");
        }
        self.runner.run(&invocation).await?;

        let output_dir = checkout.join(&docs.output_dir);
        if !dir_has_entries(&output_dir) {
            return Err(ToolError::EmptyOutput(
                output_dir.to_string_lossy().into_owned(),
            ));
        }

        Ok(output_dir)
    }
}

fn dir_has_entries(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
