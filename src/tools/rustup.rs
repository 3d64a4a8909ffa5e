//! Toolchain installation via rustup

use crate::core::config::ToolchainConfig;
use crate::tools::runner::{CommandRunner, Invocation, ToolError};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Installs and activates the configured toolchain
#[derive(Debug, Clone)]
pub struct ToolchainInstaller<R> {
    runner: Arc<R>,
}

impl<R: CommandRunner> ToolchainInstaller<R> {
    pub fn new(runner: Arc<R>) -> Self {
        Self { runner }
    }

    /// Install the toolchain and, when configured, set it as the
    /// checkout's rustup override. Returns a summary for the stage log.
    pub async fn ensure(
        &self,
        toolchain: &ToolchainConfig,
        checkout: &Path,
    ) -> Result<String, ToolError> {
        info!(
            "Installing toolchain {} (profile {})",
            toolchain.channel,
            toolchain.profile.rustup_name()
        );
        self.runner
            .run(
                &Invocation::new("rustup")
                    .args(["toolchain", "install"])
                    .arg(toolchain.channel.as_str())
                    .args(["--profile", toolchain.profile.rustup_name()]),
            )
            .await?;

        if toolchain.override_default {
            self.runner
                .run(
                    &Invocation::new("rustup")
                        .args(["override", "set"])
                        .arg(toolchain.channel.as_str())
                        .cwd(checkout),
                )
                .await?;
            Ok(format!(
                "{} installed and set as override",
                toolchain.channel
            ))
        } else {
            Ok(format!("{} installed", toolchain.channel))
        }
    }
}
