//! Courier - multi-target remote deployment orchestrator
//!
//! Courier packages a freshly built workspace, stages the archive on every
//! host of the resolved environment, links shared storage folders, runs
//! lifecycle hooks, atomically activates each host via the `active` symbolic
//! link, and prunes stale build history. A failure on any host halts
//! propagation before activation begins anywhere, so the fleet never ends up
//! in a mixed state.

pub mod artifact;
pub mod cli;
pub mod config;
pub mod context;
pub mod credential;
pub mod deploy;
pub mod error;
pub mod executor;
pub mod hooks;
pub mod ledger;
pub mod report;
pub mod resolver;
pub mod retention;
pub mod shell;

// Re-exports for convenience
pub use config::{DeploymentOptions, TargetSpec};
pub use context::{BuildContext, BuildReference};
pub use credential::CredentialFile;
pub use deploy::{DeployPhase, DeploySummary, DeploymentOrchestrator};
pub use error::{CourierError, CourierResult};
pub use executor::{ExecutorError, RemoteExecutor, SshExecutor};
pub use hooks::{HookKind, HookRunner};
pub use ledger::{BuildLedger, BuildRecord, BuildStatus, ErrorRecord, JsonLedger, Severity};
pub use report::{ConsoleEventSink, DeployEvent, DeployEventSink, NoopEventSink};
pub use resolver::{resolve, ResolvedEnvironment, Target};
pub use retention::{RetentionManager, DEFAULT_KEEP};
