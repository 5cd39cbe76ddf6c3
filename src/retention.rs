//! Build history retention
//!
//! After a target is activated, its transferred archives are removed and
//! only the most recent build directories are kept, ordered by modification
//! time. The `active` link target gets no special treatment; pruning is
//! purely mtime-based.

use crate::executor::{ExecutorError, RemoteExecutor};
use crate::resolver::Target;
use crate::shell::escape;

/// Build directories kept per host after cleanup
pub const DEFAULT_KEEP: usize = 3;

/// Removes transferred archives and prunes stale build directories.
#[derive(Debug, Clone, Copy)]
pub struct RetentionManager {
    keep: usize,
}

impl RetentionManager {
    pub fn new(keep: usize) -> Self {
        Self { keep }
    }

    pub fn keep(&self) -> usize {
        self.keep
    }

    /// Prune one target. Returns the remote command's outcome; the caller
    /// treats failures as non-fatal.
    pub fn prune(
        &self,
        executor: &dyn RemoteExecutor,
        target: &Target,
    ) -> Result<bool, ExecutorError> {
        executor.run(&target.host, &self.command(&target.builds_dir()))
    }

    /// One composed remote command: drop `*.gz` under `builds/`, then delete
    /// every build directory past the `keep` newest. Build references never
    /// contain whitespace, so the name pipeline is safe.
    fn command(&self, builds_dir: &str) -> String {
        format!(
            "cd {dir} || exit 1 ; rm -f -- *.gz ; \
             ls -1dt -- */ 2>/dev/null | tail -n +{skip} | xargs -r rm -rf --",
            dir = escape(builds_dir),
            skip = self.keep + 1,
        )
    }
}

impl Default for RetentionManager {
    fn default() -> Self {
        Self::new(DEFAULT_KEEP)
    }
}
