//! Reading and writing configuration documents.
//!
//! Files ending in `.json` are JSON; everything else is TOML.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

use rampart_compliance::ComponentInput;
use rampart_core::ComponentConfig;

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Read and deserialize a JSON or TOML document.
pub(crate) fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if is_json(path) {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {} as JSON", path.display()))
    } else {
        toml::from_str(&content)
            .with_context(|| format!("failed to parse {} as TOML", path.display()))
    }
}

/// Serialize `value` as JSON or TOML according to the extension of `path`.
pub(crate) fn render_document<T: Serialize>(path: &Path, value: &T) -> Result<String> {
    if is_json(path) {
        serde_json::to_string_pretty(value)
            .with_context(|| format!("failed to render {} as JSON", path.display()))
    } else {
        toml::to_string_pretty(value)
            .with_context(|| format!("failed to render {} as TOML", path.display()))
    }
}

/// Serialize a component configuration for `path`.
///
/// TOML has no null, so null values are dropped when rendering TOML.
pub(crate) fn render_config(path: &Path, config: &ComponentConfig) -> Result<String> {
    if is_json(path) {
        return render_document(path, config);
    }
    let stripped = config.without_nulls();
    if stripped != *config {
        tracing::debug!(path = %path.display(), "Dropping null values for TOML output");
    }
    render_document(path, &stripped)
}

/// Read one component configuration.
pub(crate) fn read_component_config(path: &Path) -> Result<ComponentConfig> {
    read_document(path)
}

/// A scan file: a bare list (JSON) or a `components` table array (TOML).
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ScanDocument {
    List(Vec<ComponentInput>),
    Table { components: Vec<ComponentInput> },
}

/// Read a list of `{component, config}` entries.
pub(crate) fn read_component_list(path: &Path) -> Result<Vec<ComponentInput>> {
    let document: ScanDocument = read_document(path)?;
    Ok(match document {
        ScanDocument::List(entries) | ScanDocument::Table { components: entries } => entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_test::policy_file;

    #[test]
    fn test_read_toml_config() {
        let (_dir, path) = policy_file(
            "rds.toml",
            "storage_encrypted = false\nenvironment = \"production\"\n\n[tags]\nOwner = \"ops\"\n",
        );
        let config = read_component_config(&path).unwrap();
        assert_eq!(config.get_bool("storage_encrypted"), Some(false));
        assert!(config.get_map("tags").unwrap().contains_key("Owner"));
    }

    #[test]
    fn test_read_json_config() {
        let (_dir, path) = policy_file("s3.json", r#"{"versioning": true, "lifecycle_rules": []}"#);
        let config = read_component_config(&path).unwrap();
        assert_eq!(config.get_bool("versioning"), Some(true));
        assert_eq!(config.get_list("lifecycle_rules").map(<[_]>::len), Some(0));
    }

    #[test]
    fn test_read_component_list_both_shapes() {
        let (_a, json) = policy_file(
            "scan.json",
            r#"[{"component": "rds", "config": {"storage_encrypted": true}}, {"component": "s3"}]"#,
        );
        let entries = read_component_list(&json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].component, "s3");
        assert!(entries[1].config.is_empty());

        let (_b, toml_path) = policy_file(
            "scan.toml",
            "[[components]]\ncomponent = \"vpc\"\n\n[components.config]\nenable_flow_log = true\n",
        );
        let entries = read_component_list(&toml_path).unwrap();
        assert_eq!(entries[0].component, "vpc");
        assert_eq!(entries[0].config.get_bool("enable_flow_log"), Some(true));
    }

    #[test]
    fn test_render_by_extension() {
        let config = ComponentConfig::new().with("encrypted", true);
        let json = render_document(Path::new("out.json"), &config).unwrap();
        assert!(json.contains("\"encrypted\": true"));
        let toml_text = render_document(Path::new("out.toml"), &config).unwrap();
        assert!(toml_text.contains("encrypted = true"));
    }

    #[test]
    fn test_json_nulls_render_as_toml() {
        let (_dir, path) = policy_file(
            "rds.json",
            r#"{"storage_encrypted": false, "kms_key_id": null, "tags": {"Owner": null}}"#,
        );
        let config = read_component_config(&path).unwrap();

        let toml_text = render_config(Path::new("fixed.toml"), &config).unwrap();
        assert!(toml_text.contains("storage_encrypted = false"));
        assert!(!toml_text.contains("kms_key_id"));
        let reparsed: ComponentConfig = toml::from_str(&toml_text).unwrap();
        assert!(reparsed.get_map("tags").unwrap().is_empty());

        let json = render_config(Path::new("fixed.json"), &config).unwrap();
        assert!(json.contains("\"kms_key_id\": null"));
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = read_component_config(Path::new("/nonexistent/rampart.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
