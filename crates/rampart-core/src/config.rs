//! Open-ended resource configuration model.
//!
//! A [`ComponentConfig`] is an ordered mapping from string keys to
//! [`ConfigValue`]s. Rules read fields by name; a missing key is an ordinary
//! state that each rule classifies on its own terms, never an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single configuration value.
///
/// Deserializes untagged, so plain JSON or TOML documents map onto it
/// directly. Integers are widened to `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Explicit null (JSON `null`).
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// String value.
    String(String),
    /// Ordered sequence.
    List(Vec<ConfigValue>),
    /// Nested mapping.
    Map(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Interpret this value as a boolean.
    ///
    /// Accepts real booleans and the strings `"true"` / `"false"`
    /// (case-insensitive), which is how many variable files carry flags.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Self::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    /// Interpret this value as a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Borrow this value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow this value as a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow this value as a nested map.
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, ConfigValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Whether this value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Copy of this value with nulls removed from nested lists and maps.
    ///
    /// Returns `None` for `Null` itself. Formats without a null, such as
    /// TOML, can serialize the result.
    #[must_use]
    pub fn without_nulls(&self) -> Option<Self> {
        match self {
            Self::Null => None,
            Self::List(items) => Some(Self::List(
                items.iter().filter_map(Self::without_nulls).collect(),
            )),
            Self::Map(entries) => Some(Self::Map(strip_null_entries(entries))),
            other => Some(other.clone()),
        }
    }
}

fn strip_null_entries(entries: &BTreeMap<String, ConfigValue>) -> BTreeMap<String, ConfigValue> {
    entries
        .iter()
        .filter_map(|(k, v)| v.without_nulls().map(|v| (k.clone(), v)))
        .collect()
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::List(_) | Self::Map(_) => {
                let rendered = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&rendered)
            },
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(value: Vec<ConfigValue>) -> Self {
        Self::List(value)
    }
}

impl From<BTreeMap<String, ConfigValue>> for ConfigValue {
    fn from(value: BTreeMap<String, ConfigValue>) -> Self {
        Self::Map(value)
    }
}

/// Configuration of one infrastructure component (an RDS instance, an S3
/// bucket, a VPC, ...).
///
/// Keys are kept sorted so that serialized output and report rendering are
/// deterministic.
///
/// # Example
///
/// ```
/// use rampart_core::ComponentConfig;
///
/// let original = ComponentConfig::new().with("storage_encrypted", false);
/// let fixed = original.with("storage_encrypted", true);
///
/// assert_eq!(original.get_bool("storage_encrypted"), Some(false));
/// assert_eq!(fixed.get_bool("storage_encrypted"), Some(true));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentConfig {
    values: BTreeMap<String, ConfigValue>,
}

impl ComponentConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of this configuration with `key` set to `value`.
    ///
    /// The receiver is left untouched.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        let mut next = self.clone();
        next.set(key, value);
        next
    }

    /// Set `key` to `value` in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Remove `key`, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.values.remove(key)
    }

    /// Look up a raw value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Whether `key` is present (including an explicit null).
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Look up a boolean field.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ConfigValue::as_bool)
    }

    /// Look up a numeric field.
    #[must_use]
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(ConfigValue::as_number)
    }

    /// Look up a string field.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ConfigValue::as_str)
    }

    /// Look up a list field.
    #[must_use]
    pub fn get_list(&self, key: &str) -> Option<&[ConfigValue]> {
        self.get(key).and_then(ConfigValue::as_list)
    }

    /// Look up a nested map field.
    #[must_use]
    pub fn get_map(&self, key: &str) -> Option<&BTreeMap<String, ConfigValue>> {
        self.get(key).and_then(ConfigValue::as_map)
    }

    /// Whether `key` holds a value that reads as `true`.
    #[must_use]
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get_bool(key) == Some(true)
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the configuration has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.values.iter()
    }

    /// Copy of this configuration with every null value removed, at any
    /// depth. See [`ConfigValue::without_nulls`].
    #[must_use]
    pub fn without_nulls(&self) -> Self {
        Self {
            values: strip_null_entries(&self.values),
        }
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for ComponentConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, ConfigValue>> for ComponentConfig {
    fn from(values: BTreeMap<String, ConfigValue>) -> Self {
        Self { values }
    }
}
