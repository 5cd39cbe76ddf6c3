//! Remote execution port
//!
//! Abstracts "run a command on host H" and "copy a file to host H" so the
//! orchestrator can be exercised without a network. The production
//! implementation shells out to the system ssh/scp binaries with every
//! interactive prompt disabled; a deployment must never block on input.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{CourierError, CourierResult};

/// Error during remote execution.
///
/// A command that runs and exits non-zero is not an error at this level;
/// that outcome is the `Ok(false)` case of the port methods.
#[derive(Debug, Clone)]
pub enum ExecutorError {
    /// Transport could not be spawned or reached
    Connection(String),
}

impl std::fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(msg) => write!(f, "connection error: {}", msg),
        }
    }
}

impl std::error::Error for ExecutorError {}

/// Trait for remote execution transports.
///
/// `Ok(true)` means the remote command ran and exited zero; `Ok(false)`
/// means it ran and failed. Transport-level problems are `Err`.
///
/// Commands are opaque shell strings; composition and quoting belong to the
/// caller (see [`crate::shell`]).
pub trait RemoteExecutor: Send + Sync {
    /// Run a command on the host as the configured operator.
    fn run(&self, host: &str, command: &str) -> Result<bool, ExecutorError>;

    /// Copy a local file to a path on the host as the configured operator.
    fn copy_to(&self, host: &str, local: &Path, remote: &str) -> Result<bool, ExecutorError>;
}

/// Remote executor backed by the system ssh/scp binaries.
///
/// Host-key prompts and password authentication are disabled, and the
/// per-run credential is forced with `IdentitiesOnly` so a stray agent key
/// can never be picked up instead.
#[derive(Debug)]
pub struct SshExecutor {
    operator: String,
    key_path: PathBuf,
}

impl SshExecutor {
    /// Create an executor for the run.
    ///
    /// Fails fast with `NoOperatorConfigured` when the username is empty,
    /// before any remote command is attempted.
    pub fn new(operator: impl Into<String>, key_path: impl Into<PathBuf>) -> CourierResult<Self> {
        let operator = operator.into();
        if operator.trim().is_empty() {
            return Err(CourierError::NoOperatorConfigured);
        }
        Ok(Self {
            operator,
            key_path: key_path.into(),
        })
    }

    fn non_interactive(&self, cmd: &mut Command) {
        cmd.arg("-o")
            .arg("BatchMode=yes")
            .arg("-o")
            .arg("StrictHostKeyChecking=accept-new")
            .arg("-o")
            .arg("PasswordAuthentication=no")
            .arg("-o")
            .arg("IdentitiesOnly=yes")
            .arg("-i")
            .arg(&self.key_path);
    }
}

impl RemoteExecutor for SshExecutor {
    fn run(&self, host: &str, command: &str) -> Result<bool, ExecutorError> {
        let mut cmd = Command::new("ssh");
        self.non_interactive(&mut cmd);
        cmd.arg("-l")
            .arg(&self.operator)
            .arg(host)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        let status = cmd
            .status()
            .map_err(|e| ExecutorError::Connection(e.to_string()))?;
        Ok(status.success())
    }

    fn copy_to(&self, host: &str, local: &Path, remote: &str) -> Result<bool, ExecutorError> {
        let mut cmd = Command::new("scp");
        self.non_interactive(&mut cmd);
        cmd.arg(local)
            .arg(format!("{}@{}:{}", self.operator, host, remote))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        let status = cmd
            .status()
            .map_err(|e| ExecutorError::Connection(e.to_string()))?;
        Ok(status.success())
    }
}
