//! Classification types shared across the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Severity of a compliance violation or a safety risk.
///
/// Ordered so that `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Advisory finding.
    Low,
    /// Should be addressed, not urgent.
    Medium,
    /// Requires attention before production use.
    High,
    /// Must be resolved; blocks unattended execution.
    Critical,
}

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Lowercase name used in reports and serialized forms.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Whether a finding at this severity blocks an operation on its own.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Critical)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(CoreError::UnknownSeverity(s.to_owned())),
        }
    }
}

/// Area of concern a compliance rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Encryption, exposure, audit trails.
    Security,
    /// Spend and resource sizing.
    Cost,
    /// Availability and recoverability.
    Reliability,
    /// Observability of performance and throughput.
    Performance,
    /// Organisational requirements such as tagging.
    Compliance,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Security,
        Self::Cost,
        Self::Reliability,
        Self::Performance,
        Self::Compliance,
    ];

    /// Lowercase name used in reports and serialized forms.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::Cost => "cost",
            Self::Reliability => "reliability",
            Self::Performance => "performance",
            Self::Compliance => "compliance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "security" => Ok(Self::Security),
            "cost" => Ok(Self::Cost),
            "reliability" => Ok(Self::Reliability),
            "performance" => Ok(Self::Performance),
            "compliance" => Ok(Self::Compliance),
            _ => Err(CoreError::UnknownCategory(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_severity_blocking() {
        assert!(!Severity::Low.is_blocking());
        assert!(!Severity::High.is_blocking());
        assert!(Severity::Critical.is_blocking());
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("CRITICAL".parse::<Severity>(), Ok(Severity::Critical));
        assert_eq!(" low ".parse::<Severity>(), Ok(Severity::Low));
        assert!(matches!(
            "severe".parse::<Severity>(),
            Err(CoreError::UnknownSeverity(_))
        ));
    }

    #[test]
    fn test_category_parse_and_display() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>(), Ok(category));
        }
        assert!(matches!(
            "billing".parse::<Category>(),
            Err(CoreError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Severity::High).unwrap();
        assert_eq!(json, "\"high\"");
        let category: Category = serde_json::from_str("\"reliability\"").unwrap();
        assert_eq!(category, Category::Reliability);
    }
}
