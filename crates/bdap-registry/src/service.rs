//! # Registry Service
//!
//! Application service implementing [`BdapApi`] over the outbound chain
//! ports. Every call that needs the tip or the pending pool takes exactly
//! one [`ChainSnapshot`](crate::ports::ChainSnapshot) and works from it.

use serde_json::{Map, Value};
use shared_crypto::ChainAddress;
use shared_types::{OutPoint, Script, Transaction};
use tracing::{debug, info};

use crate::domain::audit::{self, AuditAcceptance};
use crate::domain::codec::CanonicalRecord;
use crate::domain::config::BdapConfig;
use crate::domain::conflict::check_pending_conflict;
use crate::domain::entities::{Audit, DomainEntry, DOMAIN_ENTRY_VERSION};
use crate::domain::errors::{BdapError, ConflictError, ValidationError};
use crate::domain::lifecycle::{self, registration_expiry};
use crate::domain::operation::{
    build_data_script, build_entry_operation_script, classify_script, decode_record,
    find_operation, payload_with_commitment, BdapOp, Classification, OperationTag,
};
use crate::domain::projection::{self, ProjectionContext};
use crate::domain::validation::{normalize_name, Validator};
use crate::ports::inbound::{BdapApi, DecodedTransaction, RegistrationOutputs, RegistrationRequest};
use crate::ports::outbound::{
    BlockSource, ChainStateReader, CoinSource, EntryDirectory,
};

/// BDAP registry service.
pub struct BdapService<S> {
    chain: S,
    config: BdapConfig,
}

impl<S> BdapService<S>
where
    S: ChainStateReader + BlockSource + CoinSource + EntryDirectory,
{
    /// Create a new service over `chain`.
    pub fn new(chain: S, config: BdapConfig) -> Self {
        Self { chain, config }
    }

    pub fn config(&self) -> &BdapConfig {
        &self.config
    }

    pub fn chain(&self) -> &S {
        &self.chain
    }

    /// Validator bound to this service's limits.
    pub fn validator(&self) -> Validator<'_> {
        Validator::new(&self.config)
    }

    /// The transaction that created `entry`.
    pub fn originating_transaction(&self, entry: &DomainEntry) -> Result<Option<Transaction>, BdapError> {
        Ok(self.chain.transaction_at(entry.height, &entry.txid)?)
    }

    /// First input of `tx` spending a BDAP operation output, with that
    /// output's operation.
    pub fn find_operation_in_inputs(
        &self,
        tx: &Transaction,
    ) -> Result<Option<(OutPoint, OperationTag)>, BdapError> {
        for input in &tx.inputs {
            let Some(coin) = self.chain.coin(&input.prevout)? else {
                continue;
            };
            if let Classification::Recognized(tag) = classify_script(&coin.output.script_pubkey) {
                return Ok(Some((input.prevout, tag)));
            }
        }
        Ok(None)
    }

    /// Decodes and validates the audit carried by `tx`.
    pub fn decode_audit_transaction(&self, tx: &Transaction) -> Result<Audit, BdapError> {
        let audit: Audit = decode_record(tx)?;
        self.validator().validate_audit(&audit)?;
        Ok(audit)
    }

    /// Verifies each audit's signature against its owner's key, in
    /// parallel. Audits without an owner entry verify as `false`.
    pub fn verify_audits(&self, audits: &[Audit]) -> Result<Vec<bool>, BdapError> {
        let owners = audits
            .iter()
            .map(|a| self.chain.entry(&a.owner()))
            .collect::<Result<Vec<_>, _>>()?;

        let requests: Vec<(&Audit, &[u8])> = audits
            .iter()
            .zip(&owners)
            .map(|(audit, owner)| {
                let key = owner
                    .as_ref()
                    .map_or(&[][..], |entry| entry.encrypt_public_key.as_slice());
                (audit, key)
            })
            .collect();
        Ok(audit::verify_batch(&requests))
    }

    fn projection_context(&self, height: u32) -> Result<ProjectionContext, BdapError> {
        let (tip, median) = match height.checked_sub(1) {
            Some(prev) => self.chain.tip_with_median_time(prev)?,
            None => (self.chain.snapshot()?.tip, None),
        };
        Ok(ProjectionContext {
            confirmed_time: median.unwrap_or(0),
            tip,
        })
    }

    fn destination(&self, wallet_address: &str) -> Result<Script, ValidationError> {
        ChainAddress::parse(wallet_address, &self.config.address)
            .map(|address| address.script_pubkey())
            .map_err(|_| {
                ValidationError::new(
                    "wallet_address",
                    "Invalid BDAP wallet address. Wallet address failed IsValid check.",
                )
            })
    }
}

impl<S> BdapApi for BdapService<S>
where
    S: ChainStateReader + BlockSource + CoinSource + EntryDirectory,
{
    fn build_registration(&self, request: &RegistrationRequest) -> Result<RegistrationOutputs, BdapError> {
        let snapshot = self.chain.snapshot()?;

        let days = request
            .registration_days
            .unwrap_or(self.config.default_registration_days);
        let expire_time =
            registration_expiry(&snapshot.tip, days).ok_or(BdapError::ExpiryOverflow { days })?;

        let entry = DomainEntry {
            version: DOMAIN_ENTRY_VERSION,
            oid: self.config.default_oid_prefix.clone().into_bytes(),
            domain_component: normalize_name(&self.config.default_domain).into_bytes(),
            common_name: request.common_name.clone().into_bytes(),
            organizational_unit: normalize_name(&self.config.default_public_ou).into_bytes(),
            organization_name: self.config.default_organization_name.clone().into_bytes(),
            object_id: normalize_name(&request.object_id).into_bytes(),
            object_type: request.object_type.as_u32(),
            wallet_address: request.wallet_address.clone().into_bytes(),
            public: 1,
            encrypt_public_key: request.encrypt_public_key.clone(),
            link_address: request.link_address.clone().into_bytes(),
            txid: [0; 32],
            height: 0,
            expire_time,
        };
        self.validator().validate_entry(&entry)?;

        let full_path = entry.full_path();
        if self.chain.entry(&full_path)?.is_some() {
            return Err(ConflictError::AlreadyRegistered { full_path }.into());
        }
        check_pending_conflict(&full_path, &snapshot.pending)?;

        let destination = self.destination(&request.wallet_address)?;
        let payload = entry.encode();
        let data_script = build_data_script(&payload);
        let operation_script = build_entry_operation_script(
            BdapOp::New,
            full_path.as_bytes(),
            &entry.encrypt_public_key,
            expire_time,
            &destination,
        );

        info!(%full_path, expire_time, "Built BDAP registration");
        Ok(RegistrationOutputs {
            entry,
            payload,
            data_script,
            operation_script,
        })
    }

    fn classify(&self, script: &Script) -> Classification {
        classify_script(script)
    }

    fn decode_transaction(&self, tx: &Transaction) -> Result<DecodedTransaction, BdapError> {
        let (operation_index, operation) = find_operation(tx).ok_or(BdapError::NotBdapTransaction)?;
        let (data_output, payload, commitment) = payload_with_commitment(tx)?;
        let entry = DomainEntry::decode_with_commitment(&payload, commitment.as_bytes())?;
        self.validator().validate_entry(&entry)?;

        debug!(
            op = operation.op.name(),
            full_path = %entry.full_path(),
            "Decoded BDAP transaction"
        );
        Ok(DecodedTransaction {
            operation_index,
            operation,
            data_output,
            entry,
        })
    }

    fn check_conflict(&self, full_path: &str) -> Result<(), BdapError> {
        let snapshot = self.chain.snapshot()?;
        check_pending_conflict(full_path, &snapshot.pending)?;
        Ok(())
    }

    fn is_expired(&self, entry: &DomainEntry) -> Result<bool, BdapError> {
        let tip = self.chain.snapshot()?.tip;
        Ok(lifecycle::is_expired(entry.expire_time, &tip))
    }

    fn entry_projection(&self, entry: &DomainEntry, abridged: bool) -> Result<Map<String, Value>, BdapError> {
        let ctx = self.projection_context(entry.height)?;
        Ok(projection::entry_projection(entry, &ctx, abridged))
    }

    fn audit_projection(&self, audit: &Audit) -> Result<Map<String, Value>, BdapError> {
        let ctx = self.projection_context(audit.height)?;
        Ok(projection::audit_projection(audit, &ctx))
    }

    fn accept_audit(&self, audit: &Audit) -> Result<AuditAcceptance, BdapError> {
        let owner = self.chain.entry(&audit.owner())?;
        Ok(audit::accept_audit(audit, owner.as_ref(), &self.validator()))
    }
}
