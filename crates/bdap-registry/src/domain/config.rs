//! # Registry Configuration
//!
//! Field limits, registration defaults and the chain's address version
//! bytes. Loadable from a config file (every field has a default) and
//! overridable from `BDAP_*` environment variables.

use serde::{Deserialize, Serialize};
use shared_crypto::AddressParams;
use tracing::info;

use super::errors::ConfigError;
use super::validation::is_valid_name;

/// Registration length used when the caller gives none (two years).
pub const DEFAULT_REGISTRATION_DAYS: u64 = 730;

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BdapConfig {
    /// Maximum length of one name label.
    pub max_object_name_length: usize,
    /// Maximum common name length in bytes.
    pub max_common_name_length: usize,
    /// Maximum organization name length in bytes.
    pub max_org_name_length: usize,
    /// Maximum wallet or link address length in bytes.
    pub max_wallet_address_length: usize,
    /// Maximum encryption public key length in bytes.
    pub max_key_length: usize,
    /// Maximum size of one audit hash entry.
    pub max_audit_hash_size: usize,
    /// Maximum audit owner path length.
    pub max_full_path_length: usize,
    /// Maximum signature length.
    pub max_signature_length: usize,
    /// Domain component given to new registrations.
    pub default_domain: String,
    /// Organizational unit given to new public registrations.
    pub default_public_ou: String,
    /// Organization name given to new registrations.
    pub default_organization_name: String,
    /// Root OID prefix given to new registrations.
    pub default_oid_prefix: String,
    /// Registration length when none is requested.
    pub default_registration_days: u64,
    /// Chain address version bytes.
    pub address: AddressParams,
}

impl Default for BdapConfig {
    fn default() -> Self {
        Self {
            max_object_name_length: 63,
            max_common_name_length: 95,
            max_org_name_length: 95,
            max_wallet_address_length: 102,
            max_key_length: 156,
            max_audit_hash_size: 64,
            max_full_path_length: 255,
            max_signature_length: 72,
            default_domain: "bdap.io".to_string(),
            default_public_ou: "public".to_string(),
            default_organization_name: "Duality Blockchain Solutions".to_string(),
            default_oid_prefix: "0.0.0".to_string(),
            default_registration_days: DEFAULT_REGISTRATION_DAYS,
            address: AddressParams::default(),
        }
    }
}

impl BdapConfig {
    /// Creates a minimal config for testing.
    pub fn for_testing() -> Self {
        Self {
            default_domain: "test.bdap".to_string(),
            default_registration_days: 30,
            ..Default::default()
        }
    }

    /// Defaults with `BDAP_*` environment overrides applied, validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::default().with_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let limits: [(&'static str, &mut usize); 8] = [
            ("BDAP_MAX_OBJECT_NAME_LENGTH", &mut self.max_object_name_length),
            ("BDAP_MAX_COMMON_NAME_LENGTH", &mut self.max_common_name_length),
            ("BDAP_MAX_ORG_NAME_LENGTH", &mut self.max_org_name_length),
            ("BDAP_MAX_WALLET_ADDRESS_LENGTH", &mut self.max_wallet_address_length),
            ("BDAP_MAX_KEY_LENGTH", &mut self.max_key_length),
            ("BDAP_MAX_AUDIT_HASH_SIZE", &mut self.max_audit_hash_size),
            ("BDAP_MAX_FULL_PATH_LENGTH", &mut self.max_full_path_length),
            ("BDAP_MAX_SIGNATURE_LENGTH", &mut self.max_signature_length),
        ];
        for (var, slot) in limits {
            if let Some(value) = lookup(var) {
                *slot = parse_env(var, &value)?;
                info!(var, value = *slot, "Config override from environment");
            }
        }

        if let Some(value) = lookup("BDAP_REGISTRATION_DAYS") {
            self.default_registration_days = parse_env("BDAP_REGISTRATION_DAYS", &value)?;
        }
        if let Some(value) = lookup("BDAP_DEFAULT_DOMAIN") {
            self.default_domain = value.to_ascii_lowercase();
        }
        if let Some(value) = lookup("BDAP_DEFAULT_PUBLIC_OU") {
            self.default_public_ou = value.to_ascii_lowercase();
        }
        if let Some(value) = lookup("BDAP_PUBKEY_ADDRESS_PREFIX") {
            self.address.pubkey_prefix = parse_env("BDAP_PUBKEY_ADDRESS_PREFIX", &value)?;
        }
        if let Some(value) = lookup("BDAP_SCRIPT_ADDRESS_PREFIX") {
            self.address.script_prefix = parse_env("BDAP_SCRIPT_ADDRESS_PREFIX", &value)?;
        }

        Ok(self)
    }

    /// Rejects unusable limits and defaults that fail the name grammar.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_object_name_length < 2 {
            return Err(ConfigError::InvalidLimit {
                name: "max_object_name_length",
                reason: "labels need at least 2 characters".to_string(),
            });
        }

        let nonzero = [
            ("max_common_name_length", self.max_common_name_length),
            ("max_org_name_length", self.max_org_name_length),
            ("max_wallet_address_length", self.max_wallet_address_length),
            ("max_key_length", self.max_key_length),
            ("max_audit_hash_size", self.max_audit_hash_size),
            ("max_full_path_length", self.max_full_path_length),
            ("max_signature_length", self.max_signature_length),
        ];
        for (name, value) in nonzero {
            if value == 0 {
                return Err(ConfigError::InvalidLimit {
                    name,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        if self.address.pubkey_prefix == self.address.script_prefix {
            return Err(ConfigError::InvalidLimit {
                name: "address",
                reason: "pubkey and script prefixes must differ".to_string(),
            });
        }

        let names = [
            ("default_domain", &self.default_domain),
            ("default_public_ou", &self.default_public_ou),
        ];
        for (name, value) in names {
            if !is_valid_name(value.as_bytes(), self.max_object_name_length) {
                return Err(ConfigError::InvalidDefault {
                    name,
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnvValue {
            var,
            value: value.to_string(),
        })
}
