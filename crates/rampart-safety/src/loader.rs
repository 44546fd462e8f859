//! Safety policy discovery and loading.
//!
//! Lookup order when no explicit path is given:
//! 1. `$RAMPART_SAFETY_POLICY`
//! 2. `./.rampart/safety-policy.toml`
//! 3. `./.rampart/safety-policy.json`
//! 4. `~/.rampart/safety-policy.toml`
//!
//! The first file that exists decides the outcome. A `.json` extension is
//! parsed as JSON, anything else as TOML. Every field present in the file
//! replaces its default wholesale; absent fields keep their defaults. Read
//! and parse failures fall back to [`SafetyPolicy::default`] with a warning.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{SafetyError, SafetyResult};
use crate::policy::SafetyPolicy;

/// Environment variable naming an explicit policy file.
pub const POLICY_ENV_VAR: &str = "RAMPART_SAFETY_POLICY";

/// Directory holding Rampart configuration, relative to cwd or home.
pub const POLICY_DIR: &str = ".rampart";

/// Maximum accepted policy file size (1 MB).
pub const MAX_POLICY_FILE_SIZE: u64 = 1_048_576;

/// Where the effective policy came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicySource {
    /// Built-in defaults (no file, or the file was unusable).
    Default,
    /// Loaded from a file.
    File(PathBuf),
}

impl fmt::Display for PolicySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("built-in defaults"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// On-disk policy document. Absent fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
struct PolicyDocument {
    #[serde(default, alias = "alwaysRequireApproval")]
    always_require_approval: Option<Vec<String>>,
    #[serde(default, alias = "protectedEnvironments")]
    protected_environments: Option<Vec<String>>,
    #[serde(default, alias = "skipSafetyFor")]
    skip_safety_for: Option<Vec<String>>,
    #[serde(default, alias = "costThreshold")]
    cost_threshold: Option<f64>,
}

impl PolicyDocument {
    fn into_policy(self) -> SafetyResult<SafetyPolicy> {
        let defaults = SafetyPolicy::default();
        let cost_threshold = self.cost_threshold.unwrap_or(defaults.cost_threshold);
        if !cost_threshold.is_finite() || cost_threshold < 0.0 {
            return Err(SafetyError::PolicyInvalid {
                field: "cost_threshold",
                reason: format!("must be a non-negative number, got {cost_threshold}"),
            });
        }
        Ok(SafetyPolicy {
            always_require_approval: self
                .always_require_approval
                .unwrap_or(defaults.always_require_approval),
            protected_environments: self
                .protected_environments
                .unwrap_or(defaults.protected_environments),
            skip_safety_for: self.skip_safety_for.unwrap_or(defaults.skip_safety_for),
            cost_threshold,
        })
    }
}

/// Load the effective safety policy. Never fails.
///
/// See [`load_safety_policy_with_source`].
#[must_use]
pub fn load_safety_policy(path: Option<&Path>) -> SafetyPolicy {
    load_safety_policy_with_source(path).0
}

/// Load the effective safety policy along with where it came from.
///
/// With `Some(path)` only that file is considered. With `None` the
/// conventional locations are searched in order.
#[must_use]
pub fn load_safety_policy_with_source(path: Option<&Path>) -> (SafetyPolicy, PolicySource) {
    let candidates = match path {
        Some(p) => vec![p.to_path_buf()],
        None => default_candidates(),
    };
    load_first(&candidates)
}

/// Read and parse one policy file, surfacing every failure.
///
/// # Errors
///
/// Returns a `Policy*` [`SafetyError`] if the file cannot be read, is too
/// large, does not parse, or carries an invalid value.
pub fn read_policy_file(path: &Path) -> SafetyResult<SafetyPolicy> {
    match try_read_policy_file(path)? {
        Some(policy) => Ok(policy),
        None => Err(SafetyError::PolicyRead {
            path: path.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }),
    }
}

/// Candidate paths in lookup order.
///
/// `env_override` is the value of [`POLICY_ENV_VAR`]; blank values are
/// ignored.
#[must_use]
pub fn candidate_paths(
    env_override: Option<&str>,
    cwd: &Path,
    home: Option<&Path>,
) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(4);
    if let Some(explicit) = env_override.map(str::trim).filter(|s| !s.is_empty()) {
        paths.push(PathBuf::from(explicit));
    }
    paths.push(cwd.join(POLICY_DIR).join("safety-policy.toml"));
    paths.push(cwd.join(POLICY_DIR).join("safety-policy.json"));
    if let Some(home) = home {
        paths.push(home.join(POLICY_DIR).join("safety-policy.toml"));
    }
    paths
}

fn default_candidates() -> Vec<PathBuf> {
    let env_override = std::env::var(POLICY_ENV_VAR).ok();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let home = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf());
    candidate_paths(env_override.as_deref(), &cwd, home.as_deref())
}

fn load_first(candidates: &[PathBuf]) -> (SafetyPolicy, PolicySource) {
    for path in candidates {
        match try_read_policy_file(path) {
            Ok(None) => {},
            Ok(Some(policy)) => {
                info!(path = %path.display(), "loaded safety policy");
                for gap in policy.invariant_gaps() {
                    warn!(path = %path.display(), missing = %gap, "safety policy drops a default entry");
                }
                return (policy, PolicySource::File(path.clone()));
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unusable safety policy, using defaults");
                return (SafetyPolicy::default(), PolicySource::Default);
            },
        }
    }
    debug!("no safety policy file found, using defaults");
    (SafetyPolicy::default(), PolicySource::Default)
}

/// Returns `Ok(None)` when the file does not exist.
fn try_read_policy_file(path: &Path) -> SafetyResult<Option<SafetyPolicy>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "safety policy file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(SafetyError::PolicyRead {
                path: path.to_path_buf(),
                source: e,
            });
        },
    };

    // Size is checked after the single read to avoid a stat/read race.
    let size = u64::try_from(content.len()).unwrap_or(u64::MAX);
    if size > MAX_POLICY_FILE_SIZE {
        return Err(SafetyError::PolicyTooLarge {
            path: path.to_path_buf(),
            size,
            limit: MAX_POLICY_FILE_SIZE,
        });
    }

    let document = parse_document(path, &content)?;
    document.into_policy().map(Some)
}

fn parse_document(path: &Path, content: &str) -> SafetyResult<PolicyDocument> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        serde_json::from_str(content).map_err(|e| e.to_string())
    } else {
        toml::from_str(content).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| SafetyError::PolicyParse {
        path: path.to_path_buf(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_test::{
        SAMPLE_POLICY_JSON_CAMEL, SAMPLE_POLICY_TOML, policy_file, test_dir, test_file_in_dir,
    };

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = test_dir();
        let path = dir.path().join("absent.toml");
        let (policy, source) = load_safety_policy_with_source(Some(&path));
        assert_eq!(policy, SafetyPolicy::default());
        assert_eq!(source, PolicySource::Default);
    }

    #[test]
    fn test_full_toml_document() {
        let (_dir, path) = policy_file("safety-policy.toml", SAMPLE_POLICY_TOML);
        let (policy, source) = load_safety_policy_with_source(Some(&path));
        assert_eq!(source, PolicySource::File(path.clone()));
        assert!(policy.requires_approval_for("kubectl scale deployment"));
        assert!(policy.is_protected_environment("live"));
        assert!(policy.skips_safety_for("kubectl get pods"));
        assert!((policy.cost_threshold - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_document_overrides_wholesale() {
        let (_dir, path) = policy_file(
            "safety-policy.toml",
            "always_require_approval = [\"destroy\"]\n",
        );
        let policy = load_safety_policy(Some(&path));
        // Present field replaces the default list entirely.
        assert_eq!(policy.always_require_approval, vec!["destroy"]);
        assert!(!policy.requires_approval_for("terraform apply"));
        // Absent fields keep their defaults.
        assert_eq!(policy.protected_environments, vec!["production", "prod"]);
        assert!((policy.cost_threshold - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_camel_case_json_aliases() {
        let (_dir, path) = policy_file("safety-policy.json", SAMPLE_POLICY_JSON_CAMEL);
        let policy = load_safety_policy(Some(&path));
        assert_eq!(policy.protected_environments, vec!["staging"]);
        assert!((policy.cost_threshold - 10.0).abs() < f64::EPSILON);
        assert_eq!(
            policy.always_require_approval,
            SafetyPolicy::default().always_require_approval
        );
    }

    #[test]
    fn test_integer_cost_threshold_in_toml() {
        let (_dir, path) = policy_file("p.toml", "cost_threshold = 500\n");
        let policy = load_safety_policy(Some(&path));
        assert!((policy.cost_threshold - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let (_dir, path) = policy_file("safety-policy.toml", "cost_threshold = [not valid");
        let (policy, source) = load_safety_policy_with_source(Some(&path));
        assert_eq!(policy, SafetyPolicy::default());
        assert_eq!(source, PolicySource::Default);

        let err = read_policy_file(&path).unwrap_err();
        assert!(matches!(err, SafetyError::PolicyParse { .. }));
    }

    #[test]
    fn test_wrong_type_yields_defaults() {
        let (_dir, path) = policy_file("p.json", r#"{"cost_threshold": "cheap"}"#);
        assert_eq!(load_safety_policy(Some(&path)), SafetyPolicy::default());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let (_dir, path) = policy_file("p.toml", "cost_threshold = -1.0\n");
        assert!(matches!(
            read_policy_file(&path),
            Err(SafetyError::PolicyInvalid { field: "cost_threshold", .. })
        ));
        assert_eq!(load_safety_policy(Some(&path)), SafetyPolicy::default());
    }

    #[test]
    fn test_oversized_file_rejected() {
        let padding = "#".repeat(1_048_577);
        let (_dir, path) = policy_file("big.toml", &padding);
        assert!(matches!(
            read_policy_file(&path),
            Err(SafetyError::PolicyTooLarge { .. })
        ));
        assert_eq!(load_safety_policy(Some(&path)), SafetyPolicy::default());
    }

    #[test]
    fn test_read_policy_file_missing_is_error() {
        let dir = test_dir();
        assert!(matches!(
            read_policy_file(&dir.path().join("nope.toml")),
            Err(SafetyError::PolicyRead { .. })
        ));
    }

    #[test]
    fn test_candidate_order() {
        let cwd = Path::new("/work");
        let home = Path::new("/home/ops");
        let paths = candidate_paths(Some("/etc/rampart.toml"), cwd, Some(home));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/etc/rampart.toml"),
                PathBuf::from("/work/.rampart/safety-policy.toml"),
                PathBuf::from("/work/.rampart/safety-policy.json"),
                PathBuf::from("/home/ops/.rampart/safety-policy.toml"),
            ]
        );

        let without_env = candidate_paths(Some("  "), cwd, None);
        assert_eq!(without_env.len(), 2);
    }

    #[test]
    fn test_first_existing_candidate_wins() {
        let dir = test_dir();
        let json = test_file_in_dir(&dir, ".rampart/safety-policy.json", r#"{"costThreshold": 1}"#);
        let toml_path = dir.path().join(".rampart/safety-policy.toml");

        let candidates = candidate_paths(None, dir.path(), None);
        let (policy, source) = load_first(&candidates);
        assert_eq!(source, PolicySource::File(json));
        assert!((policy.cost_threshold - 1.0).abs() < f64::EPSILON);

        std::fs::write(&toml_path, "cost_threshold = 2.0\n").unwrap();
        let (policy, source) = load_first(&candidates);
        assert_eq!(source, PolicySource::File(toml_path));
        assert!((policy.cost_threshold - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_broken_first_candidate_does_not_fall_through() {
        let dir = test_dir();
        test_file_in_dir(&dir, ".rampart/safety-policy.toml", "not = [valid");
        test_file_in_dir(&dir, ".rampart/safety-policy.json", r#"{"costThreshold": 1}"#);

        let (policy, source) = load_first(&candidate_paths(None, dir.path(), None));
        assert_eq!(source, PolicySource::Default);
        assert_eq!(policy, SafetyPolicy::default());
    }

    #[test]
    fn test_source_display() {
        assert_eq!(PolicySource::Default.to_string(), "built-in defaults");
        assert_eq!(
            PolicySource::File(PathBuf::from("/x/p.toml")).to_string(),
            "/x/p.toml"
        );
    }
}
