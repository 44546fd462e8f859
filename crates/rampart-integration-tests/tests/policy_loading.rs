//! End-to-end tests for safety policy files.

use rampart_safety::loader::candidate_paths;
use rampart_safety::{
    PolicySource, SafetyContext, SafetyEvaluator, SafetyPolicy, load_safety_policy,
    load_safety_policy_with_source, read_policy_file, risk_id,
};
use rampart_test::{
    SAMPLE_POLICY_JSON_CAMEL, SAMPLE_POLICY_TOML, policy_file, test_dir, test_file_in_dir,
};

#[test]
fn toml_policy_drives_the_evaluator() {
    let (_dir, path) = policy_file("safety-policy.toml", SAMPLE_POLICY_TOML);
    let evaluator = SafetyEvaluator::from_policy_file(Some(&path));
    assert_eq!(evaluator.source(), &PolicySource::File(path));

    assert!(!evaluator.requires_safety_check("kubectl get pods"));

    let scale = SafetyContext::new("kubectl scale deployment web", "kubectl");
    let assessment = evaluator.evaluate_safety(&scale).unwrap();
    assert!(assessment.has_risk(risk_id::APPROVAL_REQUIRED_OPERATION));
    assert!(assessment.requires_approval);

    let live = SafetyContext::new("helm upgrade", "helm").with_environment("live");
    assert!(evaluator.requires_approval("helm upgrade", &live));

    let cheap = SafetyContext::new("terraform import", "terraform").with_estimated_cost(200.0);
    assert!(!evaluator.requires_approval("terraform import", &cheap));
}

#[test]
fn json_camel_case_overrides_only_present_fields() {
    let (_dir, path) = policy_file("safety-policy.json", SAMPLE_POLICY_JSON_CAMEL);
    let policy = read_policy_file(&path).unwrap();
    let defaults = SafetyPolicy::default();

    assert_eq!(policy.protected_environments, vec!["staging"]);
    assert!((policy.cost_threshold - 10.0).abs() < f64::EPSILON);
    assert_eq!(policy.always_require_approval, defaults.always_require_approval);
    assert_eq!(policy.skip_safety_for, defaults.skip_safety_for);

    let gaps = policy.invariant_gaps();
    assert!(gaps.iter().any(|g| g == "protected_environments: production"));
}

#[test]
fn broken_policy_falls_back_to_defaults() {
    let (_dir, path) = policy_file("safety-policy.toml", "cost_threshold = \"lots\"");
    assert!(read_policy_file(&path).is_err());

    let (policy, source) = load_safety_policy_with_source(Some(&path));
    assert_eq!(policy, SafetyPolicy::default());
    assert_eq!(source, PolicySource::Default);
}

#[test]
fn negative_threshold_is_invalid() {
    let (_dir, path) = policy_file("safety-policy.toml", "cost_threshold = -1.0");
    assert!(read_policy_file(&path).is_err());
    assert_eq!(load_safety_policy(Some(&path)), SafetyPolicy::default());
}

#[test]
fn missing_policy_is_default() {
    let dir = test_dir();
    let path = dir.path().join("absent.toml");
    assert_eq!(load_safety_policy(Some(&path)), SafetyPolicy::default());
}

#[test]
fn candidate_order() {
    let dir = test_dir();
    let home = dir.path().join("home");
    let cwd = dir.path().join("work");
    let paths = candidate_paths(Some("/etc/rampart/policy.toml"), &cwd, Some(&home));

    assert_eq!(paths[0].to_str(), Some("/etc/rampart/policy.toml"));
    assert_eq!(paths[1], cwd.join(".rampart").join("safety-policy.toml"));
    assert_eq!(paths[2], cwd.join(".rampart").join("safety-policy.json"));
    assert_eq!(paths[3], home.join(".rampart").join("safety-policy.toml"));

    let without_override = candidate_paths(Some("  "), &cwd, None);
    assert_eq!(without_override.len(), 2);
}

#[test]
fn project_policy_file_is_readable_where_expected() {
    let dir = test_dir();
    let path = test_file_in_dir(&dir, ".rampart/safety-policy.toml", SAMPLE_POLICY_TOML);
    let cwd_candidates = candidate_paths(None, dir.path(), None);
    assert_eq!(cwd_candidates[0], path);

    let policy = read_policy_file(&path).unwrap();
    assert!(policy.requires_approval_for("scale"));
    assert!(policy.invariant_gaps().is_empty());
}
