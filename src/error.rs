//! Error types for Courier
//!
//! Uses `thiserror` for library errors. Every fatal deployment cause has
//! exactly one variant, so a failed run reports a single structured error.

use thiserror::Error;

/// Result type alias for Courier operations
pub type CourierResult<T> = Result<T, CourierError>;

/// Main error type for Courier operations
#[derive(Error, Debug)]
pub enum CourierError {
    /// Archiving the workspace failed; nothing remote was attempted
    #[error("packaging failed: {message}")]
    Packaging { message: String },

    /// The resolved environment has no targets section
    #[error("no targets configured for environment '{environment}'")]
    NoTargetsForEnvironment { environment: String },

    /// A target has no remote path and nothing earlier in the list to inherit
    #[error("no remote path for target '{alias}' in environment '{environment}'")]
    NoRemotePath { alias: String, environment: String },

    /// Remote execution requires an operator username
    #[error("no operator username configured for remote execution")]
    NoOperatorConfigured,

    /// Staging failed on one target; the half-built remote directory was
    /// removed best-effort and the rollout aborted before any activation
    #[error("staging failed on target '{alias}': {message}")]
    Staging { alias: String, message: String },

    /// The active-link swap failed; earlier targets stay activated
    #[error("activation failed on target '{alias}': {message}")]
    Activation { alias: String, message: String },

    /// A lifecycle hook failed; the rollout continued but the run is failed
    #[error("hook '{name}' failed on target '{alias}'")]
    Hook { alias: String, name: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}
