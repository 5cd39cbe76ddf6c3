//! Shared helpers for courier integration tests.
//!
//! `LocalExecutor` satisfies the `RemoteExecutor` port by running commands
//! through `sh -c` on this machine, so a temp directory can stand in for a
//! remote host's filesystem and the whole rollout can be exercised without
//! a network.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;

use courier::context::BuildContext;
use courier::executor::{ExecutorError, RemoteExecutor};
use tempfile::TempDir;

/// Executes "remote" commands locally and records everything it was asked
/// to do.
pub struct LocalExecutor {
    commands: Mutex<Vec<(String, String)>>,
}

impl LocalExecutor {
    pub fn new() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn issued(&self) -> Vec<(String, String)> {
        self.commands.lock().unwrap().clone()
    }
}

impl RemoteExecutor for LocalExecutor {
    fn run(&self, host: &str, command: &str) -> Result<bool, ExecutorError> {
        self.commands
            .lock()
            .unwrap()
            .push((host.to_string(), command.to_string()));
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| ExecutorError::Connection(e.to_string()))?;
        Ok(status.success())
    }

    fn copy_to(&self, host: &str, local: &Path, remote: &str) -> Result<bool, ExecutorError> {
        self.commands
            .lock()
            .unwrap()
            .push((host.to_string(), format!("copy {} -> {}", local.display(), remote)));
        Ok(std::fs::copy(local, remote).is_ok())
    }
}

/// Wrapper that refuses file transfers to one host; everything else is
/// delegated.
pub struct FailingCopyExecutor {
    pub inner: LocalExecutor,
    pub fail_host: String,
}

impl RemoteExecutor for FailingCopyExecutor {
    fn run(&self, host: &str, command: &str) -> Result<bool, ExecutorError> {
        self.inner.run(host, command)
    }

    fn copy_to(&self, host: &str, local: &Path, remote: &str) -> Result<bool, ExecutorError> {
        if host == self.fail_host {
            return Ok(false);
        }
        self.inner.copy_to(host, local, remote)
    }
}

/// Wrapper that fails commands containing `needle` on one host.
pub struct DenyMatchingExecutor {
    pub inner: LocalExecutor,
    pub fail_host: String,
    pub needle: String,
}

impl RemoteExecutor for DenyMatchingExecutor {
    fn run(&self, host: &str, command: &str) -> Result<bool, ExecutorError> {
        if host == self.fail_host && command.contains(&self.needle) {
            return Ok(false);
        }
        self.inner.run(host, command)
    }

    fn copy_to(&self, host: &str, local: &Path, remote: &str) -> Result<bool, ExecutorError> {
        self.inner.copy_to(host, local, remote)
    }
}

/// Isolated deployment fixture: a workspace with a couple of files plus room
/// for per-host base directories.
pub struct DeployFixture {
    pub root: TempDir,
}

impl DeployFixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let workspace = root.path().join("workspace");
        std::fs::create_dir_all(workspace.join("public")).unwrap();
        std::fs::write(workspace.join("index.html"), "<html>deployed</html>").unwrap();
        std::fs::write(workspace.join("public/app.js"), "console.log(1)").unwrap();
        Self { root }
    }

    pub fn workspace(&self) -> PathBuf {
        self.root.path().join("workspace")
    }

    /// Base path standing in for one remote host. Created lazily by the
    /// orchestrator's own `mkdir -p` commands.
    pub fn host_base(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.root.path().join("build.json")
    }

    pub fn context(&self, commit_id: &str) -> BuildContext {
        BuildContext {
            build_id: "42".to_string(),
            commit_id: commit_id.to_string(),
            branch: "main".to_string(),
            workspace: self.workspace(),
            private_key: Vec::new(),
            operator_override: None,
        }
    }

    /// Drop a hook script into the workspace's `hooks/` directory.
    pub fn add_hook(&self, name: &str, body: &str) {
        let hooks = self.workspace().join("hooks");
        std::fs::create_dir_all(&hooks).unwrap();
        std::fs::write(hooks.join(name), format!("#!/bin/sh\n{}\n", body)).unwrap();
    }
}
