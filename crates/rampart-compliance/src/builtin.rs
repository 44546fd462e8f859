//! Built-in rule set.
//!
//! Every predicate and fix is a named function so it can be tested on its
//! own. Security booleans that must be explicitly enabled are fail-closed: a
//! missing key is a violation. Tag checks are fail-open for the detailed rule
//! (`comp-002`) because the absence of tags is reported by `comp-001`.

use std::collections::BTreeMap;

use rampart_core::{Category, ComponentConfig, ConfigValue, Severity};

use crate::rule::Rule;

/// Database engines that carry storage-level settings.
const DATABASE_TYPES: [&str; 4] = ["rds", "aurora", "redshift", "documentdb"];

/// Every component type the built-in rules know about.
pub const KNOWN_COMPONENT_TYPES: [&str; 11] = [
    "rds",
    "aurora",
    "redshift",
    "documentdb",
    "s3",
    "vpc",
    "ebs",
    "efs",
    "eks",
    "ec2",
    "lambda",
];

/// Tag keys every tagged resource must carry.
pub const REQUIRED_TAGS: [&str; 3] = ["Environment", "Owner", "ManagedBy"];

/// Minimum automated backup retention, in days.
pub const MIN_BACKUP_RETENTION_DAYS: f64 = 7.0;

/// Whether the config's `environment` names a production environment.
#[must_use]
pub fn is_production(config: &ComponentConfig) -> bool {
    config
        .get_str("environment")
        .is_some_and(|env| env.eq_ignore_ascii_case("production") || env.eq_ignore_ascii_case("prod"))
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// `storage_encrypted` must be explicitly true.
#[must_use]
pub fn storage_encrypted(config: &ComponentConfig) -> bool {
    config.is_truthy("storage_encrypted")
}

/// `publicly_accessible` must not be true. Absent means private.
#[must_use]
pub fn not_publicly_accessible(config: &ComponentConfig) -> bool {
    !config.is_truthy("publicly_accessible")
}

/// `block_public_access` must be explicitly true.
#[must_use]
pub fn public_access_blocked(config: &ComponentConfig) -> bool {
    config.is_truthy("block_public_access")
}

/// `enable_flow_log` must be explicitly true.
#[must_use]
pub fn flow_logs_enabled(config: &ComponentConfig) -> bool {
    config.is_truthy("enable_flow_log")
}

/// `versioning` must be explicitly true.
#[must_use]
pub fn versioning_enabled(config: &ComponentConfig) -> bool {
    config.is_truthy("versioning")
}

/// `encrypted` must be explicitly true.
#[must_use]
pub fn volume_encrypted(config: &ComponentConfig) -> bool {
    config.is_truthy("encrypted")
}

/// `endpoint_public_access` must be explicitly false.
#[must_use]
pub fn endpoint_private(config: &ComponentConfig) -> bool {
    config.get_bool("endpoint_public_access") == Some(false)
}

/// `lifecycle_rules` must be a non-empty list.
#[must_use]
pub fn lifecycle_configured(config: &ComponentConfig) -> bool {
    config
        .get_list("lifecycle_rules")
        .is_some_and(|rules| !rules.is_empty())
}

/// Outside production, `single_nat_gateway` must be true.
#[must_use]
pub fn nat_gateway_right_sized(config: &ComponentConfig) -> bool {
    is_production(config) || config.is_truthy("single_nat_gateway")
}

/// In production, `multi_az` must be true.
#[must_use]
pub fn multi_az_in_production(config: &ComponentConfig) -> bool {
    !is_production(config) || config.is_truthy("multi_az")
}

/// `backup_retention_period` must be at least [`MIN_BACKUP_RETENTION_DAYS`].
#[must_use]
pub fn backup_retention_sufficient(config: &ComponentConfig) -> bool {
    config
        .get_number("backup_retention_period")
        .is_some_and(|days| days >= MIN_BACKUP_RETENTION_DAYS)
}

/// In production, `deletion_protection` must be true.
#[must_use]
pub fn deletion_protection_in_production(config: &ComponentConfig) -> bool {
    !is_production(config) || config.is_truthy("deletion_protection")
}

/// `performance_insights_enabled` must be explicitly true.
#[must_use]
pub fn performance_insights_enabled(config: &ComponentConfig) -> bool {
    config.is_truthy("performance_insights_enabled")
}

/// A non-empty `tags` map must be present.
#[must_use]
pub fn tags_present(config: &ComponentConfig) -> bool {
    config.get_map("tags").is_some_and(|tags| !tags.is_empty())
}

/// When `tags` is present, every [`REQUIRED_TAGS`] key must be set.
#[must_use]
pub fn required_tags_present(config: &ComponentConfig) -> bool {
    match config.get_map("tags") {
        None => true,
        Some(tags) => REQUIRED_TAGS.iter().all(|key| tags.contains_key(*key)),
    }
}

// ---------------------------------------------------------------------------
// Fixes
// ---------------------------------------------------------------------------

/// Set `storage_encrypted = true`.
#[must_use]
pub fn fix_storage_encrypted(config: &ComponentConfig) -> ComponentConfig {
    config.with("storage_encrypted", true)
}

/// Set `publicly_accessible = false`.
#[must_use]
pub fn fix_publicly_accessible(config: &ComponentConfig) -> ComponentConfig {
    config.with("publicly_accessible", false)
}

/// Set `block_public_access = true`.
#[must_use]
pub fn fix_block_public_access(config: &ComponentConfig) -> ComponentConfig {
    config.with("block_public_access", true)
}

/// Set `enable_flow_log = true`.
#[must_use]
pub fn fix_flow_logs(config: &ComponentConfig) -> ComponentConfig {
    config.with("enable_flow_log", true)
}

/// Set `versioning = true`.
#[must_use]
pub fn fix_versioning(config: &ComponentConfig) -> ComponentConfig {
    config.with("versioning", true)
}

/// Set `encrypted = true`.
#[must_use]
pub fn fix_volume_encrypted(config: &ComponentConfig) -> ComponentConfig {
    config.with("encrypted", true)
}

/// Set `endpoint_public_access = false`.
#[must_use]
pub fn fix_endpoint_private(config: &ComponentConfig) -> ComponentConfig {
    config.with("endpoint_public_access", false)
}

/// Set `single_nat_gateway = true`.
#[must_use]
pub fn fix_single_nat_gateway(config: &ComponentConfig) -> ComponentConfig {
    config.with("single_nat_gateway", true)
}

/// Set `multi_az = true`.
#[must_use]
pub fn fix_multi_az(config: &ComponentConfig) -> ComponentConfig {
    config.with("multi_az", true)
}

/// Raise `backup_retention_period` to the minimum.
#[must_use]
pub fn fix_backup_retention(config: &ComponentConfig) -> ComponentConfig {
    config.with("backup_retention_period", MIN_BACKUP_RETENTION_DAYS)
}

/// Set `deletion_protection = true`.
#[must_use]
pub fn fix_deletion_protection(config: &ComponentConfig) -> ComponentConfig {
    config.with("deletion_protection", true)
}

/// Set `performance_insights_enabled = true`.
#[must_use]
pub fn fix_performance_insights(config: &ComponentConfig) -> ComponentConfig {
    config.with("performance_insights_enabled", true)
}

/// Add a tag map carrying the required keys.
///
/// `Environment` is taken from the config's `environment` field when set.
#[must_use]
pub fn fix_tags_present(config: &ComponentConfig) -> ComponentConfig {
    let mut tags = config.get_map("tags").cloned().unwrap_or_default();
    fill_required_tags(config, &mut tags);
    config.with("tags", tags)
}

/// Add any missing required tag keys, keeping existing values.
#[must_use]
pub fn fix_required_tags(config: &ComponentConfig) -> ComponentConfig {
    let Some(existing) = config.get_map("tags") else {
        return config.clone();
    };
    let mut tags = existing.clone();
    fill_required_tags(config, &mut tags);
    config.with("tags", tags)
}

fn fill_required_tags(config: &ComponentConfig, tags: &mut BTreeMap<String, ConfigValue>) {
    let environment = config.get_str("environment").unwrap_or("unknown");
    for key in REQUIRED_TAGS {
        tags.entry(key.to_owned()).or_insert_with(|| match key {
            "Environment" => ConfigValue::from(environment),
            "ManagedBy" => ConfigValue::from("terraform"),
            _ => ConfigValue::from("unassigned"),
        });
    }
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// Build the built-in rules in registration order.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "sec-001",
            Category::Security,
            Severity::Critical,
            "Storage encryption at rest",
        )
        .with_description("Database storage must be encrypted at rest")
        .with_recommendation("Set `storage_encrypted = true` and supply a KMS key")
        .applies_to(DATABASE_TYPES)
        .reads(["storage_encrypted"])
        .with_check(storage_encrypted)
        .with_fix(fix_storage_encrypted),
        Rule::new(
            "sec-002",
            Category::Security,
            Severity::Critical,
            "No public database endpoint",
        )
        .with_description("Databases must not be reachable from the public internet")
        .with_recommendation("Set `publicly_accessible = false` and connect through private subnets")
        .applies_to(["rds", "aurora", "redshift"])
        .reads(["publicly_accessible"])
        .with_check(not_publicly_accessible)
        .with_fix(fix_publicly_accessible),
        Rule::new(
            "sec-003",
            Category::Security,
            Severity::High,
            "S3 public access block",
        )
        .with_description("Buckets must block all public ACLs and policies")
        .with_recommendation("Set `block_public_access = true`")
        .applies_to(["s3"])
        .reads(["block_public_access"])
        .with_check(public_access_blocked)
        .with_fix(fix_block_public_access),
        Rule::new("sec-004", Category::Security, Severity::Medium, "VPC flow logs")
            .with_description("VPC traffic must be captured by flow logs for audit")
            .with_recommendation("Set `enable_flow_log = true`")
            .applies_to(["vpc"])
            .reads(["enable_flow_log"])
            .with_check(flow_logs_enabled)
            .with_fix(fix_flow_logs),
        Rule::new("sec-005", Category::Security, Severity::Medium, "S3 versioning")
            .with_description("Bucket versioning protects objects from accidental overwrite")
            .with_recommendation("Set `versioning = true`")
            .applies_to(["s3"])
            .reads(["versioning"])
            .with_check(versioning_enabled)
            .with_fix(fix_versioning),
        Rule::new(
            "sec-006",
            Category::Security,
            Severity::Critical,
            "Volume encryption",
        )
        .with_description("Block and file storage volumes must be encrypted")
        .with_recommendation("Set `encrypted = true`")
        .applies_to(["ebs", "efs"])
        .reads(["encrypted"])
        .with_check(volume_encrypted)
        .with_fix(fix_volume_encrypted),
        Rule::new(
            "sec-007",
            Category::Security,
            Severity::High,
            "Private cluster endpoint",
        )
        .with_description("The Kubernetes API endpoint is public unless explicitly disabled")
        .with_recommendation("Set `endpoint_public_access = false` and use a private endpoint")
        .applies_to(["eks"])
        .reads(["endpoint_public_access"])
        .with_check(endpoint_private)
        .with_fix(fix_endpoint_private),
        Rule::new("cost-001", Category::Cost, Severity::Low, "S3 lifecycle rules")
            .with_description("Buckets without lifecycle rules retain every object indefinitely")
            .with_recommendation(
                "Add `lifecycle_rules` that transition or expire objects by age",
            )
            .applies_to(["s3"])
            .reads(["lifecycle_rules"])
            .with_check(lifecycle_configured),
        Rule::new("cost-002", Category::Cost, Severity::Medium, "NAT gateway sizing")
            .with_description("Non-production VPCs should share a single NAT gateway")
            .with_recommendation("Set `single_nat_gateway = true` outside production")
            .applies_to(["vpc"])
            .reads(["single_nat_gateway", "environment"])
            .with_check(nat_gateway_right_sized)
            .with_fix(fix_single_nat_gateway),
        Rule::new(
            "rel-001",
            Category::Reliability,
            Severity::High,
            "Multi-AZ in production",
        )
        .with_description("Production databases must be deployed across availability zones")
        .with_recommendation("Set `multi_az = true` for production")
        .applies_to(["rds", "aurora"])
        .reads(["multi_az", "environment"])
        .with_check(multi_az_in_production)
        .with_fix(fix_multi_az),
        Rule::new(
            "rel-002",
            Category::Reliability,
            Severity::Medium,
            "Backup retention",
        )
        .with_description("Automated backups must be retained for at least 7 days")
        .with_recommendation("Set `backup_retention_period` to 7 or more")
        .applies_to(["rds", "aurora", "documentdb"])
        .reads(["backup_retention_period"])
        .with_check(backup_retention_sufficient)
        .with_fix(fix_backup_retention),
        Rule::new(
            "rel-003",
            Category::Reliability,
            Severity::Medium,
            "Deletion protection in production",
        )
        .with_description("Production databases must be protected against accidental deletion")
        .with_recommendation("Set `deletion_protection = true` for production")
        .applies_to(["rds", "aurora"])
        .reads(["deletion_protection", "environment"])
        .with_check(deletion_protection_in_production)
        .with_fix(fix_deletion_protection),
        Rule::new(
            "perf-001",
            Category::Performance,
            Severity::Low,
            "Performance Insights",
        )
        .with_description("Performance Insights should be enabled to diagnose query load")
        .with_recommendation("Set `performance_insights_enabled = true`")
        .applies_to(["rds", "aurora"])
        .reads(["performance_insights_enabled"])
        .with_check(performance_insights_enabled)
        .with_fix(fix_performance_insights),
        Rule::new("comp-001", Category::Compliance, Severity::Low, "Resource tags")
            .with_description("Resources must carry tags for ownership and cost allocation")
            .with_recommendation("Add a `tags` map")
            .applies_to(KNOWN_COMPONENT_TYPES)
            .reads(["tags"])
            .with_check(tags_present)
            .with_fix(fix_tags_present),
        Rule::new(
            "comp-002",
            Category::Compliance,
            Severity::Medium,
            "Required tag keys",
        )
        .with_description("Tags must include Environment, Owner and ManagedBy")
        .with_recommendation("Add the missing keys to `tags`")
        .applies_to(KNOWN_COMPONENT_TYPES)
        .reads(["tags"])
        .with_check(required_tags_present)
        .with_fix(fix_required_tags),
    ]
}
