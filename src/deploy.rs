//! Deployment orchestration
//!
//! Two-phase rollout: the artifact is staged on every target first, then
//! activation happens in the same order. A staging failure on any target
//! aborts the run before any activation begins; an activation failure aborts
//! the remaining targets but never rolls back hosts already activated.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::artifact::ArtifactBuilder;
use crate::config::DeploymentOptions;
use crate::context::{BuildContext, BuildReference};
use crate::error::{CourierError, CourierResult};
use crate::executor::RemoteExecutor;
use crate::hooks::{HookKind, HookRunner};
use crate::ledger::{BuildLedger, ErrorRecord, Severity};
use crate::report::{DeployEvent, DeployEventSink, NoopEventSink};
use crate::resolver::{self, Target};
use crate::retention::RetentionManager;
use crate::shell::ShellLine;

/// Orchestrator state machine phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployPhase {
    Idle,
    Packaging,
    Staging,
    Activating,
    Cleaning,
    Done,
    Failed,
}

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct DeploySummary {
    pub environment: String,
    pub reference: String,
    pub archive: PathBuf,
    pub staged: usize,
    pub activated: usize,
}

/// The deployment state machine.
///
/// Targets are resolved once into an ordered list consumed read-only by both
/// the staging and the activation pass.
pub struct DeploymentOrchestrator<'a, E: RemoteExecutor> {
    executor: &'a E,
    options: &'a DeploymentOptions,
    retention: RetentionManager,
    events: Arc<dyn DeployEventSink>,
    phase: DeployPhase,
}

impl<'a, E: RemoteExecutor> DeploymentOrchestrator<'a, E> {
    pub fn new(executor: &'a E, options: &'a DeploymentOptions) -> Self {
        Self {
            executor,
            options,
            retention: RetentionManager::default(),
            events: Arc::new(NoopEventSink),
            phase: DeployPhase::Idle,
        }
    }

    pub fn with_events(mut self, events: Arc<dyn DeployEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_retention(mut self, retention: RetentionManager) -> Self {
        self.retention = retention;
        self
    }

    pub fn phase(&self) -> DeployPhase {
        self.phase
    }

    /// Run the full deployment.
    ///
    /// Fatal errors are recorded on the ledger and persisted before they
    /// propagate, so the caller observes exactly one failure cause. Success
    /// stores `deployed=true` metadata and persists.
    pub fn execute(
        &mut self,
        context: &BuildContext,
        ledger: &mut dyn BuildLedger,
    ) -> CourierResult<DeploySummary> {
        match self.run(context) {
            Ok(summary) => {
                ledger.store_meta("deployed", "true");
                ledger.store_meta("environment", &summary.environment);
                ledger.store_meta("finished_at", &chrono::Utc::now().to_rfc3339());
                ledger.persist()?;
                Ok(summary)
            }
            Err(err) => {
                self.phase = DeployPhase::Failed;
                ledger.set_failed();
                ledger.record_error(ErrorRecord {
                    source: "courier".to_string(),
                    message: err.to_string(),
                    severity: Severity::Critical,
                    file: Some(file!().to_string()),
                    line: Some(line!()),
                });
                // best effort: the deployment error is what the caller needs
                let _ = ledger.persist();
                Err(err)
            }
        }
    }

    fn run(&mut self, context: &BuildContext) -> CourierResult<DeploySummary> {
        let reference = context.reference();

        self.phase = DeployPhase::Packaging;
        let archive = ArtifactBuilder::build(&context.workspace, &reference)?;
        self.events.on_event(DeployEvent::Packaged {
            archive: archive.clone(),
        });

        let environment = resolver::resolve(self.options, &context.branch)?;
        self.events.on_event(DeployEvent::Started {
            environment: environment.name.clone(),
            reference: reference.to_string(),
            target_count: environment.targets.len(),
        });

        let hooks = HookRunner::new(&context.workspace, self.options.hooks.clone());
        let mut hook_failures: Vec<CourierError> = Vec::new();

        self.phase = DeployPhase::Staging;
        for target in &environment.targets {
            self.stage(target, &archive, &reference)?;
            self.events.on_event(DeployEvent::TargetStaged {
                alias: target.alias.clone(),
            });
            self.link_storage(target, &reference);
            self.run_hook(&hooks, HookKind::PreActivation, target, &reference, &mut hook_failures);
        }

        self.phase = DeployPhase::Activating;
        let mut activated = 0;
        for target in &environment.targets {
            self.activate(target, &reference)?;
            activated += 1;
            self.events.on_event(DeployEvent::TargetActivated {
                alias: target.alias.clone(),
            });
            self.run_hook(&hooks, HookKind::PostActivation, target, &reference, &mut hook_failures);
        }

        self.phase = DeployPhase::Cleaning;
        for target in &environment.targets {
            let outcome = match self.retention.prune(self.executor, target) {
                Ok(true) => continue,
                Ok(false) => "cleanup command failed".to_string(),
                Err(err) => err.to_string(),
            };
            self.events.on_event(DeployEvent::CleanupFailed {
                alias: target.alias.clone(),
                error: outcome,
            });
        }

        // hook failures never stop the rollout, but the run is failed; the
        // first one becomes the single recorded cause
        if let Some(err) = hook_failures.into_iter().next() {
            return Err(err);
        }

        self.phase = DeployPhase::Done;
        self.events.on_event(DeployEvent::Completed {
            environment: environment.name.clone(),
            activated,
        });

        Ok(DeploySummary {
            environment: environment.name,
            reference: reference.to_string(),
            archive,
            staged: environment.targets.len(),
            activated,
        })
    }

    /// Stage one target: builds directory, archive transfer, build
    /// directory, extraction. Any failure removes the half-built directory
    /// best-effort and aborts the run.
    fn stage(
        &self,
        target: &Target,
        archive: &Path,
        reference: &BuildReference,
    ) -> CourierResult<()> {
        if let Err(message) = self.stage_steps(target, archive, reference) {
            let rollback = ShellLine::new("rm")
                .lit("-rf")
                .arg(target.build_dir(reference))
                .render();
            let _ = self.executor.run(&target.host, &rollback);
            return Err(CourierError::Staging {
                alias: target.alias.clone(),
                message,
            });
        }
        Ok(())
    }

    fn stage_steps(
        &self,
        target: &Target,
        archive: &Path,
        reference: &BuildReference,
    ) -> Result<(), String> {
        let builds_dir = target.builds_dir();
        let remote_archive = target.remote_archive(reference);
        let build_dir = target.build_dir(reference);

        let ensure_builds = ShellLine::new("mkdir").lit("-p").arg(&builds_dir).render();
        if !self.run_remote(&target.host, &ensure_builds)? {
            return Err(format!("could not create {}", builds_dir));
        }

        let copied = self
            .executor
            .copy_to(&target.host, archive, &remote_archive)
            .map_err(|e| e.to_string())?;
        if !copied {
            return Err(format!("archive transfer to {} failed", remote_archive));
        }

        let ensure_build = ShellLine::new("mkdir").lit("-p").arg(&build_dir).render();
        if !self.run_remote(&target.host, &ensure_build)? {
            return Err(format!("could not create {}", build_dir));
        }

        let extract = ShellLine::new("tar")
            .lit("-xzf")
            .arg(&remote_archive)
            .lit("-C")
            .arg(&build_dir)
            .render();
        if !self.run_remote(&target.host, &extract)? {
            return Err(format!("extraction into {} failed", build_dir));
        }

        Ok(())
    }

    /// Link every configured storage folder into the staged build. Links are
    /// created before activation so the link swap is the only activation
    /// step. Failures are reported, never fatal.
    fn link_storage(&self, target: &Target, reference: &BuildReference) {
        if self.options.storage.is_empty() {
            return;
        }

        let ensure_root = ShellLine::new("mkdir").lit("-p").arg(target.storage_root()).render();
        if let Ok(false) | Err(_) = self.executor.run(&target.host, &ensure_root) {
            self.events.on_event(DeployEvent::StorageLinkFailed {
                alias: target.alias.clone(),
                name: "storage".to_string(),
                error: "could not create storage root".to_string(),
            });
        }

        for (name, relative) in &self.options.storage {
            let storage_dir = target.storage_dir(name);
            let link = format!("{}/{}", target.build_dir(reference), relative);
            let command = ShellLine::new("mkdir")
                .lit("-p")
                .arg(&storage_dir)
                .and(ShellLine::new("rm").lit("-rf").arg(&link))
                .and(ShellLine::new("ln").lit("-s").arg(&storage_dir).arg(&link))
                .render();

            let outcome = match self.executor.run(&target.host, &command) {
                Ok(true) => {
                    self.events.on_event(DeployEvent::StorageLinked {
                        alias: target.alias.clone(),
                        name: name.clone(),
                    });
                    continue;
                }
                Ok(false) => "link command failed".to_string(),
                Err(err) => err.to_string(),
            };
            self.events.on_event(DeployEvent::StorageLinkFailed {
                alias: target.alias.clone(),
                name: name.clone(),
                error: outcome,
            });
        }
    }

    fn run_hook(
        &self,
        hooks: &HookRunner,
        kind: HookKind,
        target: &Target,
        reference: &BuildReference,
        failures: &mut Vec<CourierError>,
    ) {
        match hooks.run(self.executor, kind, target, reference) {
            Ok(true) => self.events.on_event(DeployEvent::HookRan {
                alias: target.alias.clone(),
                name: kind.name().to_string(),
            }),
            Ok(false) => {}
            Err(err) => {
                self.events.on_event(DeployEvent::HookFailed {
                    alias: target.alias.clone(),
                    name: kind.name().to_string(),
                });
                failures.push(err);
            }
        }
    }

    /// Link swap: drop the old `active` link, point it at this build.
    fn activate(&self, target: &Target, reference: &BuildReference) -> CourierResult<()> {
        let active = target.active_link();
        let command = ShellLine::new("rm")
            .lit("-f")
            .arg(&active)
            .and(
                ShellLine::new("ln")
                    .lit("-s")
                    .arg(target.build_dir(reference))
                    .arg(&active),
            )
            .render();

        match self.executor.run(&target.host, &command) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CourierError::Activation {
                alias: target.alias.clone(),
                message: "link swap failed".to_string(),
            }),
            Err(err) => Err(CourierError::Activation {
                alias: target.alias.clone(),
                message: err.to_string(),
            }),
        }
    }

    fn run_remote(&self, host: &str, command: &str) -> Result<bool, String> {
        self.executor.run(host, command).map_err(|e| e.to_string())
    }
}
