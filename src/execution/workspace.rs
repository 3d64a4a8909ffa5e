//! Per-run workspace on the worker filesystem

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Filesystem area owned by a single run.
///
/// Holds the source checkout and the publish staging directory. Temp
/// workspaces are discarded when the run ends, matching the ephemeral
/// worker the pipeline was designed for; a fixed workdir survives runs.
#[derive(Debug)]
pub struct Workspace {
    root: Root,
}

#[derive(Debug)]
enum Root {
    Temp(TempDir),
    Fixed(PathBuf),
}

impl Workspace {
    /// Create a workspace, in a temp dir unless a fixed workdir is set
    pub fn create(workdir: Option<&str>) -> io::Result<Self> {
        let root = match workdir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                Root::Fixed(PathBuf::from(dir))
            }
            None => Root::Temp(tempfile::tempdir()?),
        };
        Ok(Self { root })
    }

    fn root(&self) -> &Path {
        match &self.root {
            Root::Temp(dir) => dir.path(),
            Root::Fixed(path) => path,
        }
    }

    /// Where the source is cloned. Not created in advance; git creates it.
    pub fn checkout_dir(&self) -> PathBuf {
        self.root().join("checkout")
    }

    /// Where the pages branch is staged. Not created in advance.
    pub fn staging_dir(&self) -> PathBuf {
        self.root().join("staging")
    }
}
