//! Build ledger
//!
//! The upstream build system owns the build record; the orchestrator only
//! needs to mark failure, attach one structured error, stash metadata, and
//! persist the mutated record. `JsonLedger` is the file-backed
//! implementation the CLI uses.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How severe a recorded error is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

/// Structured error attached to a failed build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub source: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// Build status as far as the deployment is concerned.
///
/// Only failure is ever set here; a successful deployment is recorded as
/// `deployed=true` metadata, and the build system owns the rest of the
/// lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    #[default]
    Pending,
    Failed,
}

/// Port for the build-lifecycle contract of the host build system.
pub trait BuildLedger {
    /// Mark the upstream build failed.
    fn set_failed(&mut self);

    /// Attach a structured error record.
    fn record_error(&mut self, record: ErrorRecord);

    /// Store a metadata key/value pair on the build.
    fn store_meta(&mut self, key: &str, value: &str);

    /// Persist the mutated build record.
    fn persist(&mut self) -> std::io::Result<()>;
}

/// Serializable build record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRecord {
    pub build_id: String,
    pub commit_id: String,
    pub status: BuildStatus,
    #[serde(default)]
    pub errors: Vec<ErrorRecord>,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

/// JSON-file-backed build ledger
pub struct JsonLedger {
    path: PathBuf,
    record: BuildRecord,
}

impl JsonLedger {
    pub fn new(path: impl Into<PathBuf>, build_id: &str, commit_id: &str) -> Self {
        Self {
            path: path.into(),
            record: BuildRecord {
                build_id: build_id.to_string(),
                commit_id: commit_id.to_string(),
                status: BuildStatus::default(),
                errors: Vec::new(),
                meta: BTreeMap::new(),
            },
        }
    }

    pub fn record(&self) -> &BuildRecord {
        &self.record
    }
}

impl BuildLedger for JsonLedger {
    fn set_failed(&mut self) {
        self.record.status = BuildStatus::Failed;
    }

    fn record_error(&mut self, record: ErrorRecord) {
        self.record.errors.push(record);
    }

    fn store_meta(&mut self, key: &str, value: &str) {
        self.record.meta.insert(key.to_string(), value.to_string());
    }

    fn persist(&mut self) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.record)?;
        fs::write(&self.path, json)
    }
}
