//! Factory configuration
//!
//! Loaded once at deployment from TOML:
//!
//! ```toml
//! admin = "0x1111111111111111111111111111111111111111"
//! payment_token = "0x2222222222222222222222222222222222222222"
//! template = "0x3333333333333333333333333333333333333333"
//! upgrade_fee = 10
//! # governance_delay_secs = 864000
//! ```

use quest_core::{Address, InvalidReason, QuestError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Minimum age of a governance proposal before it can execute (10 days)
pub const GOVERNANCE_DELAY_SECS: u64 = 10 * 24 * 60 * 60;

fn default_governance_delay() -> u64 {
    GOVERNANCE_DELAY_SECS
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
    /// Config text is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field failed validation
    #[error("invalid config field `{field}`: {source}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Validation failure
        #[source]
        source: QuestError,
    },
}

/// Deployment parameters of a quest chain factory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FactoryConfig {
    /// Initial factory admin; receives upgrade fees
    pub admin: Address,
    /// Token upgrade fees are paid in
    pub payment_token: Address,
    /// Fee for upgrading a chain to premium
    ///
    /// TOML integers are signed 64-bit, so the fee is configured as `u64`
    /// and widened when the factory is deployed.
    #[serde(default)]
    pub upgrade_fee: u64,
    /// Address of the locked template chain
    pub template: Address,
    /// Governance timelock in seconds, at least [`GOVERNANCE_DELAY_SECS`]
    #[serde(default = "default_governance_delay")]
    pub governance_delay_secs: u64,
}

impl FactoryConfig {
    /// Config with the default governance delay
    pub fn new(admin: Address, payment_token: Address, upgrade_fee: u64, template: Address) -> Self {
        Self {
            admin,
            payment_token,
            upgrade_fee,
            template,
            governance_delay_secs: GOVERNANCE_DELAY_SECS,
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject zero addresses and a timelock shorter than ten days
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("admin", self.admin),
            ("payment_token", self.payment_token),
            ("template", self.template),
        ];
        for (field, address) in fields {
            if address.is_zero() {
                return Err(ConfigError::Invalid {
                    field,
                    source: InvalidReason::ZeroAddress.into(),
                });
            }
        }
        if self.governance_delay_secs < GOVERNANCE_DELAY_SECS {
            return Err(ConfigError::Invalid {
                field: "governance_delay_secs",
                source: InvalidReason::InvalidParams.into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const CONFIG: &str = r#"
        admin = "0x1111111111111111111111111111111111111111"
        payment_token = "0x2222222222222222222222222222222222222222"
        template = "0x3333333333333333333333333333333333333333"
        upgrade_fee = 10
    "#;

    #[test]
    fn test_parse_applies_default_delay() {
        let config = FactoryConfig::from_toml_str(CONFIG).unwrap();
        assert_eq!(config.upgrade_fee, 10);
        assert_eq!(config.governance_delay_secs, 864_000);
        assert_eq!(
            config.admin.to_string(),
            "0x1111111111111111111111111111111111111111"
        );
    }

    #[test]
    fn test_zero_admin_rejected() {
        let text = CONFIG.replace(
            "0x1111111111111111111111111111111111111111",
            "0x0000000000000000000000000000000000000000",
        );
        assert_matches!(
            FactoryConfig::from_toml_str(&text),
            Err(ConfigError::Invalid {
                field: "admin",
                source: QuestError::Invalid(InvalidReason::ZeroAddress),
            })
        );
    }

    #[test]
    fn test_large_fee_parses() {
        let text = CONFIG.replace("upgrade_fee = 10", "upgrade_fee = 9000000000000000000");
        let config = FactoryConfig::from_toml_str(&text).unwrap();
        assert_eq!(config.upgrade_fee, 9_000_000_000_000_000_000);
    }

    #[test]
    fn test_short_governance_delay_rejected() {
        for delay in [0, GOVERNANCE_DELAY_SECS - 1] {
            let text = format!("{CONFIG}\ngovernance_delay_secs = {delay}\n");
            assert_matches!(
                FactoryConfig::from_toml_str(&text),
                Err(ConfigError::Invalid {
                    field: "governance_delay_secs",
                    source: QuestError::Invalid(InvalidReason::InvalidParams),
                })
            );
        }
        let text = format!("{CONFIG}\ngovernance_delay_secs = {}\n", GOVERNANCE_DELAY_SECS * 2);
        let config = FactoryConfig::from_toml_str(&text).unwrap();
        assert_eq!(config.governance_delay_secs, GOVERNANCE_DELAY_SECS * 2);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let text = format!("{CONFIG}\nfee_recipient = \"x\"\n");
        assert_matches!(FactoryConfig::from_toml_str(&text), Err(ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = FactoryConfig::load_from_file(Path::new("/nonexistent/factory.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/factory.toml"));
    }
}
