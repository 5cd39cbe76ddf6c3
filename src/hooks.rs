//! Lifecycle hooks
//!
//! Hooks ship inside the artifact. The runner checks the local workspace
//! for the script before issuing any remote command, so targets without the
//! hook never see a connection for it.

use std::fmt;
use std::path::PathBuf;

use crate::context::BuildReference;
use crate::error::{CourierError, CourierResult};
use crate::executor::RemoteExecutor;
use crate::resolver::Target;
use crate::shell::ShellLine;

/// The two lifecycle points around activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    PreActivation,
    PostActivation,
}

impl HookKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::PreActivation => "pre-activation",
            Self::PostActivation => "post-activation",
        }
    }

    fn script(self) -> String {
        format!("{}.sh", self.name())
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Conditionally executes named lifecycle scripts on a target.
pub struct HookRunner {
    workspace: PathBuf,
    hooks_path: Option<String>,
}

impl HookRunner {
    pub fn new(workspace: impl Into<PathBuf>, hooks_path: Option<String>) -> Self {
        Self {
            workspace: workspace.into(),
            hooks_path,
        }
    }

    /// Run one hook on a target, returning whether it actually ran.
    ///
    /// No configured hooks path, or no script in the artifact, is a quiet
    /// no-op. A script that runs and fails is a `Hook` error; the caller
    /// decides how fatal that is.
    pub fn run(
        &self,
        executor: &dyn RemoteExecutor,
        kind: HookKind,
        target: &Target,
        reference: &BuildReference,
    ) -> CourierResult<bool> {
        let Some(hooks_path) = self.hooks_path.as_deref() else {
            return Ok(false);
        };

        let script = format!("{}/{}", hooks_path.trim_end_matches('/'), kind.script());
        if !self.workspace.join(&script).is_file() {
            return Ok(false);
        }

        let command = ShellLine::new("cd")
            .arg(target.build_dir(reference))
            .and(ShellLine::new("chmod").lit("+x").arg(&script))
            .and(ShellLine::exec(&script))
            .render();

        match executor.run(&target.host, &command) {
            Ok(true) => Ok(true),
            Ok(false) | Err(_) => Err(CourierError::Hook {
                alias: target.alias.clone(),
                name: kind.name().to_string(),
            }),
        }
    }
}
