//! Test fixtures for configurations, plan output and policy documents.

use std::collections::BTreeMap;

use rampart_core::{ComponentConfig, ConfigValue};

/// A tag map carrying every required key.
#[must_use]
pub fn standard_tags(environment: &str) -> BTreeMap<String, ConfigValue> {
    let mut tags = BTreeMap::new();
    tags.insert("Environment".to_string(), ConfigValue::from(environment));
    tags.insert("Owner".to_string(), ConfigValue::from("platform-team"));
    tags.insert("ManagedBy".to_string(), ConfigValue::from("terraform"));
    tags
}

/// A production RDS configuration that satisfies every built-in rule.
#[must_use]
pub fn compliant_rds_config() -> ComponentConfig {
    ComponentConfig::new()
        .with("environment", "production")
        .with("engine", "postgres")
        .with("storage_encrypted", true)
        .with("publicly_accessible", false)
        .with("multi_az", true)
        .with("backup_retention_period", 14.0)
        .with("deletion_protection", true)
        .with("performance_insights_enabled", true)
        .with("tags", standard_tags("production"))
}

/// A production RDS configuration that violates most built-in rules.
#[must_use]
pub fn insecure_rds_config() -> ComponentConfig {
    ComponentConfig::new()
        .with("environment", "production")
        .with("engine", "mysql")
        .with("storage_encrypted", false)
        .with("publicly_accessible", true)
        .with("multi_az", false)
        .with("backup_retention_period", 1.0)
        .with("deletion_protection", false)
}

/// An S3 configuration that satisfies every built-in rule.
#[must_use]
pub fn compliant_s3_config() -> ComponentConfig {
    ComponentConfig::new()
        .with("environment", "staging")
        .with("block_public_access", true)
        .with("versioning", true)
        .with(
            "lifecycle_rules",
            vec![ConfigValue::from("expire-after-90-days")],
        )
        .with("tags", standard_tags("staging"))
}

/// A development VPC configuration without flow logs or NAT sizing.
#[must_use]
pub fn dev_vpc_config() -> ComponentConfig {
    ComponentConfig::new()
        .with("environment", "dev")
        .with("cidr", "10.0.0.0/16")
        .with("enable_flow_log", false)
}

/// Terraform plan output that destroys `n` resources.
#[must_use]
pub fn plan_output_destroying(n: u32) -> String {
    format!(
        "Terraform will perform the following actions:\n\n  \
         # aws_instance.web will be destroyed\n  \
         - resource \"aws_instance\" \"web\" {{\n      \
         - ami = \"ami-123456\"\n    }}\n\n\
         Plan: 2 to add, 1 to change, {n} to destroy.\n"
    )
}

/// Terraform plan output that only adds resources.
pub const PLAN_OUTPUT_ADD_ONLY: &str = "\
Terraform will perform the following actions:

  # aws_s3_bucket.logs will be created
  + resource \"aws_s3_bucket\" \"logs\" {
      + bucket = \"logs\"
    }

Plan: 1 to add, 0 to change, 0 to destroy.
";

/// Terraform output when nothing would change.
pub const PLAN_OUTPUT_NO_CHANGES: &str = "\
No changes. Your infrastructure matches the configuration.

Terraform has compared your real infrastructure against your configuration
and found no differences, so no changes are needed.
";

/// Text that carries no recognizable plan summary.
pub const PLAN_OUTPUT_UNPARSEABLE: &str = "\
Error: Failed to load plugin schemas

Could not load the schema for provider registry.terraform.io/hashicorp/aws.
";

/// A snake_case TOML policy document.
pub const SAMPLE_POLICY_TOML: &str = r#"
always_require_approval = ["destroy", "delete", "apply", "scale"]
protected_environments = ["production", "prod", "live"]
skip_safety_for = ["plan", "list", "describe", "get"]
cost_threshold = 250.0
"#;

/// A camelCase JSON policy document that only overrides the cost threshold
/// and protected environments.
pub const SAMPLE_POLICY_JSON_CAMEL: &str = r#"{
  "protectedEnvironments": ["staging"],
  "costThreshold": 10
}"#;
