//! Build context handed over by the upstream build system

use std::fmt;
use std::path::PathBuf;

/// Data the build system exposes for one deployment run. Read-only for the
/// whole run.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Build identifier
    pub build_id: String,
    /// Commit identifier
    pub commit_id: String,
    /// Source branch the build was made from
    pub branch: String,
    /// Local workspace tree produced by the build
    pub workspace: PathBuf,
    /// Pre-issued deploy credential (private key material)
    pub private_key: Vec<u8>,
    /// Operator username override from the build configuration
    pub operator_override: Option<String>,
}

impl BuildContext {
    /// Deterministic reference naming this build's remote directory.
    pub fn reference(&self) -> BuildReference {
        BuildReference::new(&self.build_id, &self.commit_id)
    }
}

/// Per-build remote directory name: `{buildId}-{commitId}`.
///
/// Deterministic on purpose: re-deploying the same build/commit pair reuses
/// the same directory instead of colliding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildReference(String);

impl BuildReference {
    pub fn new(build_id: &str, commit_id: &str) -> Self {
        Self(format!("{}-{}", build_id, commit_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the transferred archive for this build.
    pub fn archive_name(&self) -> String {
        format!("{}.tar.gz", self.0)
    }
}

impl fmt::Display for BuildReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
