//! Workspace packaging
//!
//! One archive per run: the whole workspace tree, entries relative to the
//! workspace root, written next to the workspace as `{reference}.tar.gz`.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::context::BuildReference;
use crate::error::{CourierError, CourierResult};

/// Packages the build workspace into a compressed tarball.
pub struct ArtifactBuilder;

impl ArtifactBuilder {
    /// Archive the workspace and return the resolved absolute archive path.
    ///
    /// `tar -C` keeps entries relative to the workspace without touching the
    /// process working directory.
    pub fn build(workspace: &Path, reference: &BuildReference) -> CourierResult<PathBuf> {
        let output_dir = workspace
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let archive = output_dir.join(reference.archive_name());

        let status = Command::new("tar")
            .arg("-czf")
            .arg(&archive)
            .arg("-C")
            .arg(workspace)
            .arg(".")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| CourierError::Packaging {
                message: format!("failed to invoke tar: {}", e),
            })?;

        if !status.success() {
            return Err(CourierError::Packaging {
                message: format!("tar exited with status {:?}", status.code()),
            });
        }

        Ok(archive.canonicalize()?)
    }
}
