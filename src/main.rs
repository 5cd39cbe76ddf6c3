//! Courier CLI - multi-target remote deployment orchestrator
//!
//! Usage: courier <COMMAND>
//!
//! Commands:
//!   deploy   Package the workspace and roll it out to the resolved environment
//!   targets  Resolve and print the targets for a branch

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use courier::cli::{Cli, Commands};
use courier::config::DeploymentOptions;
use courier::context::BuildContext;
use courier::credential::CredentialFile;
use courier::deploy::DeploymentOrchestrator;
use courier::executor::SshExecutor;
use courier::ledger::JsonLedger;
use courier::report::ConsoleEventSink;
use courier::resolver;
use courier::retention::RetentionManager;

fn main() {
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {:#}", err);
            1
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Deploy {
            config,
            workspace,
            build_id,
            commit,
            branch,
            key_file,
            operator,
            ledger,
            keep,
        } => deploy(
            &config, workspace, build_id, commit, branch, &key_file, operator, ledger, keep,
            cli.verbose,
        ),
        Commands::Targets { config, branch } => targets(&config, &branch),
    }
}

#[allow(clippy::too_many_arguments)]
fn deploy(
    config: &Path,
    workspace: PathBuf,
    build_id: String,
    commit: String,
    branch: String,
    key_file: &Path,
    operator: Option<String>,
    ledger_path: PathBuf,
    keep: usize,
    verbose: u8,
) -> Result<()> {
    let options = DeploymentOptions::load(config)
        .with_context(|| format!("loading configuration {}", config.display()))?;
    let private_key =
        fs::read(key_file).with_context(|| format!("reading key file {}", key_file.display()))?;
    let workspace = workspace
        .canonicalize()
        .with_context(|| format!("resolving workspace {}", workspace.display()))?;

    let context = BuildContext {
        build_id,
        commit_id: commit,
        branch,
        workspace,
        private_key,
        operator_override: operator,
    };

    let key_dir = context
        .workspace
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let credential = CredentialFile::write(key_dir, &context.private_key)?;

    let operator_name = options.resolved_operator(context.operator_override.as_deref());
    let executor = SshExecutor::new(operator_name, credential.path())?;

    let mut ledger = JsonLedger::new(ledger_path, &context.build_id, &context.commit_id);
    let events = Arc::new(ConsoleEventSink {
        verbose: verbose > 0,
    });

    let mut orchestrator = DeploymentOrchestrator::new(&executor, &options)
        .with_events(events)
        .with_retention(RetentionManager::new(keep));

    let summary = orchestrator.execute(&context, &mut ledger)?;
    println!(
        "deployed {} to '{}' ({} of {} targets activated)",
        summary.reference, summary.environment, summary.activated, summary.staged
    );
    Ok(())
}

fn targets(config: &Path, branch: &str) -> Result<()> {
    let options = DeploymentOptions::load(config)
        .with_context(|| format!("loading configuration {}", config.display()))?;
    let environment = resolver::resolve(&options, branch)?;

    println!("environment: {}", environment.name);
    for target in &environment.targets {
        println!("  {} -> {}:{}", target.alias, target.host, target.base_path);
    }
    Ok(())
}
