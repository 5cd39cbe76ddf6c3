//! Environment and target resolution
//!
//! Maps a branch (or an explicit override) to an environment and expands the
//! environment's target table into an ordered list of resolved targets. The
//! list is computed once and consumed read-only by both rollout passes.

use crate::config::{DeploymentOptions, DEFAULT_ENVIRONMENT, WILDCARD_MASK};
use crate::context::BuildReference;
use crate::error::{CourierError, CourierResult};

/// One deployable remote destination, in rollout order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub alias: String,
    pub host: String,
    /// Remote base path holding `builds/`, `active` and `storage/`
    pub base_path: String,
}

impl Target {
    /// `base/builds`, one subdirectory per build reference plus transient
    /// archives.
    pub fn builds_dir(&self) -> String {
        format!("{}/builds", self.base_path)
    }

    /// Directory a staged build lives in.
    pub fn build_dir(&self, reference: &BuildReference) -> String {
        format!("{}/builds/{}", self.base_path, reference)
    }

    /// Remote location the archive is copied to before extraction.
    pub fn remote_archive(&self, reference: &BuildReference) -> String {
        format!("{}/builds/{}", self.base_path, reference.archive_name())
    }

    /// Symbolic link pointing at the live build.
    pub fn active_link(&self) -> String {
        format!("{}/active", self.base_path)
    }

    /// Root of the persistent shared folders on this host.
    pub fn storage_root(&self) -> String {
        format!("{}/storage", self.base_path)
    }

    /// Persistent shared folder for one configured storage name.
    pub fn storage_dir(&self, name: &str) -> String {
        format!("{}/storage/{}", self.base_path, name)
    }
}

/// Result of resolving the active environment.
#[derive(Debug, Clone)]
pub struct ResolvedEnvironment {
    pub name: String,
    pub targets: Vec<Target>,
}

/// Resolve the environment for `branch` and its ordered target list.
pub fn resolve(options: &DeploymentOptions, branch: &str) -> CourierResult<ResolvedEnvironment> {
    let name = resolve_environment(options, branch);
    let specs = options
        .targets
        .get(&name)
        .ok_or_else(|| CourierError::NoTargetsForEnvironment {
            environment: name.clone(),
        })?;

    let mut targets = Vec::with_capacity(specs.len());
    let mut inherited: Option<String> = None;
    for (alias, spec) in specs {
        let path = match spec.path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => {
                inherited = Some(path.to_string());
                path.to_string()
            }
            None => inherited.clone().ok_or_else(|| CourierError::NoRemotePath {
                alias: alias.clone(),
                environment: name.clone(),
            })?,
        };
        targets.push(Target {
            alias: alias.clone(),
            host: spec.host.clone(),
            base_path: path,
        });
    }

    Ok(ResolvedEnvironment { name, targets })
}

/// An explicit `env` wins and the mapping is never consulted. Otherwise the
/// first mask equal to the branch, or equal to `*`, wins in declaration
/// order. Masks are exact strings, not globs. No match falls back to
/// "development".
fn resolve_environment(options: &DeploymentOptions, branch: &str) -> String {
    if let Some(env) = options.env.as_deref().filter(|e| !e.is_empty()) {
        return env.to_string();
    }

    for (mask, environment) in &options.env_mapping {
        if mask == branch || mask == WILDCARD_MASK {
            return environment.clone();
        }
    }

    DEFAULT_ENVIRONMENT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeploymentOptions;

    fn options(yaml: &str) -> DeploymentOptions {
        DeploymentOptions::from_yaml(yaml).unwrap()
    }

    #[test]
    fn explicit_env_never_consults_mapping() {
        let options = options(
            r#"
env: staging
env-mapping:
  "*": production
targets:
  staging:
    app: { host: s1, path: /srv }
"#,
        );
        let resolved = resolve(&options, "main").unwrap();
        assert_eq!(resolved.name, "staging");
    }

    #[test]
    fn first_matching_mask_wins_in_declaration_order() {
        let options = options(
            r#"
env-mapping:
  main: production
  "*": development
targets:
  production:
    app: { host: p1, path: /srv }
"#,
        );
        assert_eq!(resolve(&options, "main").unwrap().name, "production");
    }

    #[test]
    fn wildcard_matches_any_unmatched_branch() {
        let options = options(
            r#"
env-mapping:
  release/*: production
  "*": development
targets:
  development:
    app: { host: d1, path: /srv }
"#,
        );
        // "release/*" is an exact mask, not a glob: "hotfix" falls to "*"
        assert_eq!(resolve(&options, "hotfix").unwrap().name, "development");
    }

    #[test]
    fn no_mapping_match_defaults_to_development() {
        let options = options(
            r#"
env-mapping:
  main: production
targets:
  development:
    app: { host: d1, path: /srv }
"#,
        );
        assert_eq!(resolve(&options, "feature/x").unwrap().name, "development");
    }

    #[test]
    fn missing_environment_fails() {
        let options = options("env: production");
        let err = resolve(&options, "main").unwrap_err();
        assert!(
            matches!(err, CourierError::NoTargetsForEnvironment { environment } if environment == "production")
        );
    }

    #[test]
    fn paths_are_inherited_from_the_previous_alias() {
        let options = options(
            r#"
env: production
targets:
  production:
    a: { host: h1, path: /x }
    b: { host: h2 }
    c: { host: h3, path: /y }
"#,
        );
        let resolved = resolve(&options, "any").unwrap();
        let paths: Vec<&str> = resolved.targets.iter().map(|t| t.base_path.as_str()).collect();
        assert_eq!(paths, vec!["/x", "/x", "/y"]);
    }

    #[test]
    fn first_alias_without_a_path_fails() {
        let options = options(
            r#"
env: production
targets:
  production:
    a: { host: h1 }
    b: { host: h2, path: /x }
"#,
        );
        let err = resolve(&options, "any").unwrap_err();
        assert!(matches!(err, CourierError::NoRemotePath { alias, .. } if alias == "a"));
    }

    #[test]
    fn target_layout_follows_the_remote_convention() {
        let target = Target {
            alias: "web1".to_string(),
            host: "h1".to_string(),
            base_path: "/srv".to_string(),
        };
        let reference = BuildReference::new("42", "abc123");
        assert_eq!(target.builds_dir(), "/srv/builds");
        assert_eq!(target.build_dir(&reference), "/srv/builds/42-abc123");
        assert_eq!(target.remote_archive(&reference), "/srv/builds/42-abc123.tar.gz");
        assert_eq!(target.active_link(), "/srv/active");
        assert_eq!(target.storage_dir("uploads"), "/srv/storage/uploads");
    }
}
