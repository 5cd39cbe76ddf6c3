//! Deployment configuration
//!
//! Mirrors the deployment section of the CI configuration file: operator,
//! environment selection, targets, storage folders, and hooks. Map-valued
//! options keep declaration order because mask matching and target rollout
//! are order-sensitive.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::CourierResult;

/// Remote username used when the configuration does not name one
pub const DEFAULT_OPERATOR: &str = "courier";

/// Environment used when no mapping entry matches the branch
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Mask that matches any branch
pub const WILDCARD_MASK: &str = "*";

/// Options for one deployment run, parsed once from the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentOptions {
    /// Remote username for every ssh/scp invocation
    #[serde(default = "default_operator")]
    pub operator: String,

    /// Force the environment, bypassing branch mapping
    #[serde(default)]
    pub env: Option<String>,

    /// branch-or-`*` to environment, evaluated in declaration order
    #[serde(rename = "env-mapping", default)]
    pub env_mapping: IndexMap<String, String>,

    /// environment to alias-to-target-spec, in rollout order
    #[serde(default)]
    pub targets: IndexMap<String, IndexMap<String, TargetSpec>>,

    /// storage folder name to relative link path inside each build
    #[serde(default)]
    pub storage: IndexMap<String, String>,

    /// relative path (inside the artifact) of the hooks directory
    #[serde(default)]
    pub hooks: Option<String>,
}

fn default_operator() -> String {
    DEFAULT_OPERATOR.to_string()
}

impl Default for DeploymentOptions {
    fn default() -> Self {
        Self {
            operator: default_operator(),
            env: None,
            env_mapping: IndexMap::new(),
            targets: IndexMap::new(),
            storage: IndexMap::new(),
            hooks: None,
        }
    }
}

impl DeploymentOptions {
    /// Parse options from YAML content.
    pub fn from_yaml(content: &str) -> CourierResult<Self> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Load options from a YAML file.
    pub fn load(path: &Path) -> CourierResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Operator for the run: the build-level override wins over the
    /// configured (or default) username.
    pub fn resolved_operator<'a>(&'a self, build_override: Option<&'a str>) -> &'a str {
        build_override
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.operator)
    }
}

/// One remote destination entry within an environment.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetSpec {
    /// Remote hostname
    pub host: String,

    /// Remote base path. Sticky: when omitted, the alias inherits the most
    /// recently declared path in the same environment.
    #[serde(default)]
    pub path: Option<String>,
}
