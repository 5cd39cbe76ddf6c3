//! Deploy event reporting
//!
//! Typed events instead of free-form log lines, so a sink can render
//! progress for a terminal or a CI log without parsing strings.

use std::path::PathBuf;

/// Event emitted during a deployment run
#[derive(Debug, Clone)]
pub enum DeployEvent {
    /// Workspace packaged into the transfer archive
    Packaged { archive: PathBuf },

    /// Environment resolved, rollout starting
    Started {
        environment: String,
        reference: String,
        target_count: usize,
    },

    /// Artifact staged (transferred and extracted) on a target
    TargetStaged { alias: String },

    /// Storage folder linked into the staged build
    StorageLinked { alias: String, name: String },

    /// Storage linking failed; the run continues
    StorageLinkFailed {
        alias: String,
        name: String,
        error: String,
    },

    /// A lifecycle hook ran successfully
    HookRan { alias: String, name: String },

    /// A lifecycle hook failed; the run continues but is marked failed
    HookFailed { alias: String, name: String },

    /// The `active` link now points at this build
    TargetActivated { alias: String },

    /// History pruning failed on a target; never fatal
    CleanupFailed { alias: String, error: String },

    /// Rollout finished on every target
    Completed {
        environment: String,
        activated: usize,
    },
}

/// Trait for receiving deploy events
pub trait DeployEventSink: Send + Sync {
    fn on_event(&self, event: DeployEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {
        // Do nothing
    }
}

/// Renders events as single lines on stderr.
pub struct ConsoleEventSink {
    pub verbose: bool,
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        match event {
            DeployEvent::Packaged { archive } => {
                if self.verbose {
                    eprintln!("packaged {}", archive.display());
                }
            }
            DeployEvent::Started {
                environment,
                reference,
                target_count,
            } => {
                eprintln!(
                    "deploying {} to '{}' ({} target{})",
                    reference,
                    environment,
                    target_count,
                    if target_count == 1 { "" } else { "s" }
                );
            }
            DeployEvent::TargetStaged { alias } => {
                if self.verbose {
                    eprintln!("staged on {}", alias);
                }
            }
            DeployEvent::StorageLinked { alias, name } => {
                if self.verbose {
                    eprintln!("linked storage '{}' on {}", name, alias);
                }
            }
            DeployEvent::StorageLinkFailed { alias, name, error } => {
                eprintln!("warning: storage '{}' not linked on {}: {}", name, alias, error);
            }
            DeployEvent::HookRan { alias, name } => {
                if self.verbose {
                    eprintln!("hook '{}' ran on {}", name, alias);
                }
            }
            DeployEvent::HookFailed { alias, name } => {
                eprintln!("warning: hook '{}' failed on {}", name, alias);
            }
            DeployEvent::TargetActivated { alias } => {
                eprintln!("activated {}", alias);
            }
            DeployEvent::CleanupFailed { alias, error } => {
                eprintln!("warning: cleanup failed on {}: {}", alias, error);
            }
            DeployEvent::Completed {
                environment,
                activated,
            } => {
                eprintln!("deployed to '{}' ({} activated)", environment, activated);
            }
        }
    }
}
