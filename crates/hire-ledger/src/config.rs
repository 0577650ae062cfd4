//! # Ledger Configuration
//!
//! Loaded from YAML once at startup and recorded verbatim in the journal's
//! genesis record, so a replay rebuilds the ledger with the same
//! administrator, verifier and collection settings.
//!
//! ```yaml
//! admin: "0x…"
//! verifier: "0x…"          # optional
//! certificates:
//!   name: "Harvard University"
//!   symbol: "HARVARD"
//!   max_batch_size: 100
//! journal_path: "ledger.jsonl"  # optional
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hire_core::Address;

use crate::certificates::DEFAULT_MAX_BATCH_SIZE;

/// Errors loading or validating a [`LedgerConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML for this schema.
    #[error("invalid config YAML in {path}: {reason}")]
    Parse { path: String, reason: String },

    /// A field has an unusable value.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Certificate collection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateCollectionConfig {
    pub name: String,
    pub symbol: String,
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

impl Default for CertificateCollectionConfig {
    fn default() -> Self {
        Self {
            name: "Hire Certificates".into(),
            symbol: "HIRE".into(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

fn default_max_batch_size() -> usize {
    DEFAULT_MAX_BATCH_SIZE
}

/// Construction-time settings of a [`crate::Ledger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Administrator and certificate issuer.
    pub admin: Address,
    /// Verifier designated up front instead of via `set_backend_address`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifier: Option<Address>,
    #[serde(default)]
    pub certificates: CertificateCollectionConfig,
    /// Where the service appends its journal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_path: Option<PathBuf>,
}

impl LedgerConfig {
    /// Config with defaults for everything but the administrator.
    pub fn with_admin(admin: Address) -> Self {
        Self {
            admin,
            verifier: None,
            certificates: CertificateCollectionConfig::default(),
            journal_path: None,
        }
    }

    /// Parse and validate YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml, "<inline>")
    }

    /// Read, parse and validate a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(yaml: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check field values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.is_zero() {
            return Err(ConfigError::Invalid {
                field: "admin",
                reason: "must be non-zero".into(),
            });
        }
        if self.verifier.is_some_and(|v| v.is_zero()) {
            return Err(ConfigError::Invalid {
                field: "verifier",
                reason: "must be non-zero when set".into(),
            });
        }
        if self.certificates.name.is_empty() || self.certificates.symbol.is_empty() {
            return Err(ConfigError::Invalid {
                field: "certificates",
                reason: "name and symbol must not be empty".into(),
            });
        }
        if self.certificates.max_batch_size == 0 {
            return Err(ConfigError::Invalid {
                field: "certificates.max_batch_size",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let admin = Address::derive("admin");
        let config = LedgerConfig::from_yaml_str(&format!("admin: \"{admin}\"\n")).unwrap();
        assert_eq!(config, LedgerConfig::with_admin(admin));
        assert_eq!(config.certificates.max_batch_size, 100);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = format!(
            "admin: \"{}\"\nverifier: \"{}\"\ncertificates:\n  name: Harvard University\n  symbol: HARVARD\n  max_batch_size: 25\njournal_path: /tmp/ledger.jsonl\n",
            Address::derive("admin"),
            Address::derive("relay")
        );
        let config = LedgerConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(config.verifier, Some(Address::derive("relay")));
        assert_eq!(config.certificates.symbol, "HARVARD");
        assert_eq!(config.certificates.max_batch_size, 25);
        assert_eq!(config.journal_path, Some(PathBuf::from("/tmp/ledger.jsonl")));
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero = format!("admin: \"{}\"\n", Address::ZERO);
        assert!(matches!(
            LedgerConfig::from_yaml_str(&zero),
            Err(ConfigError::Invalid { field: "admin", .. })
        ));
        let batch = format!(
            "admin: \"{}\"\ncertificates:\n  name: N\n  symbol: S\n  max_batch_size: 0\n",
            Address::derive("admin")
        );
        assert!(matches!(
            LedgerConfig::from_yaml_str(&batch),
            Err(ConfigError::Invalid { field: "certificates.max_batch_size", .. })
        ));
        assert!(matches!(
            LedgerConfig::from_yaml_str("admin: not-an-address\n"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = LedgerConfig::from_yaml_file(Path::new("/nonexistent/hire.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
