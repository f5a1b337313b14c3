//! Configuration for the netting engine

use serde::{Deserialize, Serialize};

/// Netting engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Aggregation policy
    pub aggregation: AggregationConfig,

    /// Record format
    pub records: RecordConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "netting".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            aggregation: AggregationConfig::default(),
            records: RecordConfig::default(),
        }
    }
}

/// Aggregation policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Reject transactions with a zero or negative amount
    pub reject_non_positive_amounts: bool,

    /// Reject transactions where payer and payee are the same party
    pub reject_self_transactions: bool,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            reject_non_positive_amounts: true,
            reject_self_transactions: false,
        }
    }
}

/// What to do with a record that cannot be parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Drop the record and log a warning
    #[default]
    Skip,
    /// Stop reading with an error
    Fail,
}

impl std::str::FromStr for MalformedRowPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "fail" => Ok(Self::Fail),
            other => Err(crate::Error::Config(format!(
                "unknown malformed row policy: {}",
                other
            ))),
        }
    }
}

/// Record format configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    /// Malformed record handling
    pub malformed_rows: MalformedRowPolicy,

    /// First line is a header
    pub has_headers: bool,

    /// Field delimiter
    pub delimiter: char,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            malformed_rows: MalformedRowPolicy::Skip,
            has_headers: false,
            delimiter: ',',
        }
    }
}

impl RecordConfig {
    /// Delimiter as a single byte
    pub fn delimiter_byte(&self) -> crate::Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                crate::Error::Config(format!("delimiter must be ASCII, got {:?}", self.delimiter))
            })
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse TOML content
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.records.delimiter_byte()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let mut config = Config::default();

        if let Some(policy) = var("NETTING_MALFORMED_ROWS") {
            config.records.malformed_rows = policy.parse()?;
        }

        if let Some(flag) = var("NETTING_HAS_HEADERS") {
            config.records.has_headers = parse_flag("NETTING_HAS_HEADERS", &flag)?;
        }

        if let Some(flag) = var("NETTING_REJECT_SELF_TRANSACTIONS") {
            config.aggregation.reject_self_transactions =
                parse_flag("NETTING_REJECT_SELF_TRANSACTIONS", &flag)?;
        }

        if let Some(flag) = var("NETTING_ALLOW_NON_POSITIVE") {
            config.aggregation.reject_non_positive_amounts =
                !parse_flag("NETTING_ALLOW_NON_POSITIVE", &flag)?;
        }

        Ok(config)
    }
}

fn parse_flag(key: &str, value: &str) -> crate::Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(crate::Error::Config(format!(
            "{} must be a boolean, got {:?}",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.service_name, "netting");
        assert!(config.aggregation.reject_non_positive_amounts);
        assert!(!config.aggregation.reject_self_transactions);
        assert_eq!(config.records.malformed_rows, MalformedRowPolicy::Skip);
        assert_eq!(config.records.delimiter_byte().unwrap(), b',');
    }

    #[test]
    fn test_from_toml_partial() {
        let config = Config::from_toml(
            r#"
            [records]
            malformed_rows = "fail"
            delimiter = ";"
            "#,
        )
        .unwrap();

        assert_eq!(config.records.malformed_rows, MalformedRowPolicy::Fail);
        assert_eq!(config.records.delimiter, ';');
        assert!(!config.records.has_headers);
        assert!(config.aggregation.reject_non_positive_amounts);
    }

    #[test]
    fn test_from_toml_rejects_non_ascii_delimiter() {
        let err = Config::from_toml("[records]\ndelimiter = \"é\"\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_from_vars() {
        let config = Config::from_vars(vars(&[
            ("NETTING_MALFORMED_ROWS", "FAIL"),
            ("NETTING_HAS_HEADERS", "true"),
            ("NETTING_ALLOW_NON_POSITIVE", "yes"),
        ]))
        .unwrap();

        assert_eq!(config.records.malformed_rows, MalformedRowPolicy::Fail);
        assert!(config.records.has_headers);
        assert!(!config.aggregation.reject_non_positive_amounts);
        assert!(!config.aggregation.reject_self_transactions);
    }

    #[test]
    fn test_from_vars_invalid_flag() {
        let err = Config::from_vars(vars(&[("NETTING_HAS_HEADERS", "maybe")])).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
