//! Job configuration from YAML

use crate::core::trigger::{BranchPattern, TriggerGate};
use crate::core::Job;
use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// Top-level job configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Job name
    pub name: String,

    /// Trigger gate configuration
    pub trigger: TriggerConfig,

    /// Source repository configuration
    pub source: SourceConfig,

    /// Toolchain to install before generating docs
    #[serde(default)]
    pub toolchain: ToolchainConfig,

    /// Documentation generation options
    #[serde(default)]
    pub docs: DocsConfig,

    /// Publish destination and semantics
    #[serde(default)]
    pub publish: PublishConfig,

    /// Per-stage timeout ceiling in seconds
    #[serde(default)]
    pub default_timeout_secs: Option<u64>,
}

/// Which push events start a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Branch allow-list
    pub branches: Vec<String>,

    /// Whether branch entries are regular expressions
    #[serde(default)]
    pub use_regex: bool,
}

/// Where the source comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Repository URL to clone
    pub repository: String,

    /// Fixed checkout directory (default: a temp dir per run)
    #[serde(default)]
    pub workdir: Option<String>,
}

/// Toolchain install options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// Toolchain channel (e.g. "stable", "1.81.0")
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Component profile to install
    #[serde(default)]
    pub profile: ToolchainProfile,

    /// Set this toolchain as the checkout's rustup override
    #[serde(default = "default_true", rename = "override")]
    pub override_default: bool,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            profile: ToolchainProfile::default(),
            override_default: true,
        }
    }
}

/// Component profile for the toolchain install
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolchainProfile {
    /// Full component set
    #[default]
    Full,
    /// Minimal component set
    Minimal,
}

impl ToolchainProfile {
    /// The profile name rustup understands ("full" is rustup's "default")
    pub fn rustup_name(&self) -> &'static str {
        match self {
            ToolchainProfile::Full => "default",
            ToolchainProfile::Minimal => "minimal",
        }
    }
}

/// Documentation generation options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Skip documentation for dependencies
    #[serde(default = "default_true")]
    pub no_deps: bool,

    /// Output directory, relative to the checkout
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            no_deps: true,
            output_dir: default_output_dir(),
        }
    }
}

/// Publish destination and semantics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Pages-hosting branch to push to
    #[serde(default = "default_pages_branch")]
    pub branch: String,

    /// Name of the environment variable holding the credential
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Merge semantics: keep previously published files absent from the
    /// new output. False gives mirror semantics.
    #[serde(default)]
    pub keep_files: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            branch: default_pages_branch(),
            token_env: default_token_env(),
            keep_files: false,
        }
    }
}

fn default_channel() -> String {
    "stable".to_string()
}

fn default_output_dir() -> String {
    "target/doc".to_string()
}

fn default_pages_branch() -> String {
    "gh-pages".to_string()
}

fn default_token_env() -> String {
    "PUBLISH_TOKEN".to_string()
}

fn default_true() -> bool {
    true
}

impl JobConfig {
    /// Load job configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse job configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: JobConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the job configuration
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Job name must not be empty");
        }

        if self.trigger.branches.is_empty() {
            anyhow::bail!("Trigger must list at least one branch");
        }
        for branch in &self.trigger.branches {
            if branch.trim().is_empty() {
                anyhow::bail!("Trigger branch entries must not be empty");
            }
            if self.trigger.use_regex {
                Regex::new(branch).map_err(|e| {
                    anyhow::anyhow!("Invalid trigger branch pattern '{}': {}", branch, e)
                })?;
            }
        }

        if self.source.repository.trim().is_empty() {
            anyhow::bail!("Source repository must not be empty");
        }

        if self.toolchain.channel.trim().is_empty() {
            anyhow::bail!("Toolchain channel must not be empty");
        }

        Self::validate_output_dir(&self.docs.output_dir)?;

        if self.publish.branch.trim().is_empty() {
            anyhow::bail!("Publish branch must not be empty");
        }
        Self::validate_env_name(&self.publish.token_env)?;

        if let Some(0) = self.default_timeout_secs {
            anyhow::bail!("default_timeout_secs must be greater than zero");
        }

        Ok(())
    }

    /// The output dir is the data contract between the generate and
    /// publish stages; it must stay inside the checkout.
    fn validate_output_dir(output_dir: &str) -> Result<()> {
        if output_dir.trim().is_empty() {
            anyhow::bail!("docs.output_dir must not be empty");
        }
        let path = Path::new(output_dir);
        if path.is_absolute() {
            anyhow::bail!("docs.output_dir must be relative to the checkout: {}", output_dir);
        }
        for component in path.components() {
            if matches!(component, Component::ParentDir) {
                anyhow::bail!(
                    "docs.output_dir must not traverse out of the checkout: {}",
                    output_dir
                );
            }
        }
        Ok(())
    }

    fn validate_env_name(name: &str) -> Result<()> {
        let valid = !name.is_empty()
            && name
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            anyhow::bail!("publish.token_env is not a valid environment variable name: {}", name);
        }
        Ok(())
    }

    /// Compile the trigger allow-list into a gate
    pub fn compile_gate(&self) -> Result<TriggerGate> {
        let patterns = self
            .trigger
            .branches
            .iter()
            .map(|branch| {
                if self.trigger.use_regex {
                    Ok(BranchPattern::Regex(Regex::new(branch)?))
                } else {
                    Ok(BranchPattern::Exact(branch.clone()))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(TriggerGate::new(patterns))
    }

    /// Convert config to a Job domain model
    pub fn to_job(&self) -> Result<Job> {
        Job::from_config(self)
    }
}
