//! # Validation Engine
//!
//! Field rules applied to decoded records. Checks run in a fixed order and
//! the first violation is returned. Validation is independent of the
//! commitment check: a record can satisfy one and not the other.
//!
//! ## Name Grammar
//!
//! Names are dot-separated labels. Each label is 2 to N characters from
//! `[a-z0-9-]` and neither starts nor ends with `-`. Checked with a single
//! pass over the bytes.

use shared_crypto::{ChainAddress, Secp256k1PublicKey};

use super::codec::CanonicalRecord;
use super::config::BdapConfig;
use super::entities::{Audit, AuditData, DomainEntry};
use super::errors::ValidationError;

const MIN_LABEL_LENGTH: usize = 2;

/// True if every dot-separated label of `name` satisfies the label grammar.
pub fn is_valid_name(name: &[u8], max_label_length: usize) -> bool {
    !name.is_empty()
        && name
            .split(|b| *b == b'.')
            .all(|label| is_valid_label(label, max_label_length))
}

fn is_valid_label(label: &[u8], max_label_length: usize) -> bool {
    let (Some(&first), Some(&last)) = (label.first(), label.last()) else {
        return false;
    };
    (MIN_LABEL_LENGTH..=max_label_length).contains(&label.len())
        && first != b'-'
        && last != b'-'
        && label
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
}

/// Case-folds a name to its stored form.
pub fn normalize_name(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Applies field rules using the limits of a [`BdapConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    config: &'a BdapConfig,
}

impl<'a> Validator<'a> {
    pub fn new(config: &'a BdapConfig) -> Self {
        Self { config }
    }

    /// Checks a domain entry; returns the first violated rule.
    pub fn validate_entry(&self, entry: &DomainEntry) -> Result<(), ValidationError> {
        let max_label = self.config.max_object_name_length;
        let names = [
            ("domain_component", "domain name", &entry.domain_component),
            ("organizational_unit", "organizational unit", &entry.organizational_unit),
            ("object_id", "object name", &entry.object_id),
        ];
        for (field, label, value) in names {
            if !is_valid_name(value, max_label) {
                return Err(ValidationError::new(
                    field,
                    format!(
                        "Invalid BDAP {label}. Must follow the domain name spec of 2 to {max_label} characters with no preceding or trailing dashes."
                    ),
                ));
            }
        }

        check_max(
            "common_name",
            "Invalid BDAP common name.",
            &entry.common_name,
            self.config.max_common_name_length,
        )?;
        check_max(
            "organization_name",
            "Invalid BDAP organization name.",
            &entry.organization_name,
            self.config.max_org_name_length,
        )?;

        check_max(
            "wallet_address",
            "Invalid BDAP wallet address.",
            &entry.wallet_address,
            self.config.max_wallet_address_length,
        )?;
        if !self.is_chain_address(&entry.wallet_address) {
            return Err(ValidationError::new(
                "wallet_address",
                "Invalid BDAP wallet address. Wallet address failed IsValid check.",
            ));
        }

        check_max(
            "link_address",
            "Invalid BDAP link address.",
            &entry.link_address,
            self.config.max_wallet_address_length,
        )?;
        if !self.is_chain_address(&entry.link_address) {
            return Err(ValidationError::new(
                "link_address",
                "Invalid BDAP link address. Link wallet address failed IsValid check.",
            ));
        }

        check_max(
            "encrypt_public_key",
            "Invalid BDAP encryption public key.",
            &entry.encrypt_public_key,
            self.config.max_key_length,
        )?;
        if !Secp256k1PublicKey::is_valid(&entry.encrypt_public_key) {
            return Err(ValidationError::new(
                "encrypt_public_key",
                "Invalid BDAP encryption public key. Encryption public key failed IsFullyValid check.",
            ));
        }

        Ok(())
    }

    /// Checks every audit hash against the size limit.
    pub fn validate_audit_data(&self, data: &AuditData) -> Result<(), ValidationError> {
        let max = self.config.max_audit_hash_size;
        if data.audit_hashes.iter().any(|hash| hash.len() > max) {
            return Err(ValidationError::new(
                "audit_hashes",
                format!("Invalid audit length. Can not have more than {max} characters."),
            ));
        }
        Ok(())
    }

    /// Checks an audit envelope and the audit data it carries.
    pub fn validate_audit(&self, audit: &Audit) -> Result<(), ValidationError> {
        if audit.audit_data.is_empty() {
            return Err(ValidationError::new("audit_data", "Audit data is empty."));
        }
        let data = AuditData::decode(&audit.audit_data).map_err(|_| {
            ValidationError::new("audit_data", "Audit data could not be decoded.")
        })?;
        self.validate_audit_data(&data)?;

        check_max(
            "owner_full_path",
            "Invalid BDAP audit owner FQDN length.",
            &audit.owner_full_path,
            self.config.max_full_path_length,
        )?;
        check_max(
            "signature",
            "Invalid BDAP audit signature length.",
            &audit.signature,
            self.config.max_signature_length,
        )?;

        Ok(())
    }

    fn is_chain_address(&self, bytes: &[u8]) -> bool {
        std::str::from_utf8(bytes)
            .is_ok_and(|text| ChainAddress::is_valid(text, &self.config.address))
    }
}

fn check_max(
    field: &'static str,
    prefix: &str,
    value: &[u8],
    max: usize,
) -> Result<(), ValidationError> {
    if value.len() > max {
        return Err(ValidationError::new(
            field,
            format!("{prefix} Can not have more than {max} characters."),
        ));
    }
    Ok(())
}
