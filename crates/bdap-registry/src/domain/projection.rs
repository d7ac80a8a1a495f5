//! # Projection
//!
//! Flat name → scalar maps of records for presentation layers. Times come
//! from the chain: `time` is the median time of the block before the
//! confirming block, and `expired` is judged against the confirmed tip.

use serde_json::{Map, Value};
use shared_crypto::reversed_hex;
use shared_types::{ChainTip, Timestamp};

use super::entities::{Audit, DomainEntry};
use super::lifecycle::is_expired;

/// Chain times a projection needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionContext {
    /// Median time at the record's confirmation, or 0 if unknown.
    pub confirmed_time: Timestamp,
    /// The confirmed tip.
    pub tip: ChainTip,
}

fn text(bytes: &[u8]) -> Value {
    Value::String(String::from_utf8_lossy(bytes).into_owned())
}

/// Projection of a domain entry. The abridged form carries only the common
/// name, full path and wallet address.
pub fn entry_projection(
    entry: &DomainEntry,
    ctx: &ProjectionContext,
    abridged: bool,
) -> Map<String, Value> {
    let mut map = Map::new();
    if abridged {
        map.insert("common_name".into(), text(&entry.common_name));
        map.insert("object_full_path".into(), entry.full_path().into());
        map.insert("wallet_address".into(), text(&entry.wallet_address));
        return map;
    }

    map.insert("_id".into(), text(&entry.oid));
    map.insert("version".into(), entry.version.into());
    map.insert("domain_component".into(), text(&entry.domain_component));
    map.insert("common_name".into(), text(&entry.common_name));
    map.insert("organizational_unit".into(), text(&entry.organizational_unit));
    map.insert("organization_name".into(), text(&entry.organization_name));
    map.insert("object_id".into(), text(&entry.object_id));
    map.insert("object_full_path".into(), entry.full_path().into());
    map.insert("object_type".into(), entry.object_type.into());
    map.insert("wallet_address".into(), text(&entry.wallet_address));
    map.insert("public".into(), entry.public.into());
    map.insert(
        "encryption_publickey".into(),
        hex::encode(&entry.encrypt_public_key).into(),
    );
    map.insert("link_address".into(), text(&entry.link_address));
    map.insert("txid".into(), reversed_hex(&entry.txid).into());
    map.insert("time".into(), ctx.confirmed_time.into());
    map.insert("height".into(), entry.height.into());
    map.insert("expires_on".into(), entry.expire_time.into());
    map.insert(
        "expired".into(),
        is_expired(entry.expire_time, &ctx.tip).into(),
    );
    map
}

/// Projection of an audit. `version` is null when the audit carries no
/// decodable data.
pub fn audit_projection(audit: &Audit, ctx: &ProjectionContext) -> Map<String, Value> {
    let data = audit.data().unwrap_or_default();
    let mut map = Map::new();
    map.insert(
        "version".into(),
        audit.version().map_or(Value::Null, Value::from),
    );
    map.insert("audit_count".into(), data.audit_hashes.len().into());
    map.insert("timestamp".into(), data.timestamp.into());
    map.insert("owner".into(), audit.owner().into());
    map.insert("signed".into(), audit.is_signed().into());
    map.insert("txid".into(), reversed_hex(&audit.txid).into());
    map.insert("time".into(), ctx.confirmed_time.into());
    map.insert("height".into(), audit.height.into());
    map.insert("expires_on".into(), audit.expire_time.into());
    map.insert(
        "expired".into(),
        is_expired(audit.expire_time, &ctx.tip).into(),
    );
    map
}
