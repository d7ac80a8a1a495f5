//! # Conflict Detector
//!
//! A new registration must not duplicate a path that a pending transaction
//! already claims. Pending transactions are inspected as one snapshot.

use shared_crypto::reversed_hex;
use shared_types::Transaction;
use tracing::warn;

use super::entities::DomainEntry;
use super::errors::ConflictError;
use super::operation::{decode_record, find_operation};

/// Full path a pending transaction registers, if it is a BDAP transaction.
///
/// Only a decodable data output claims a path. The operation parameters are
/// unauthenticated and never consulted.
pub fn pending_full_path(tx: &Transaction) -> Option<String> {
    find_operation(tx)?;
    match decode_record::<DomainEntry>(tx) {
        Ok(entry) => Some(entry.full_path()),
        Err(err) => {
            warn!(
                txid = %reversed_hex(&tx.txid()),
                error = %err,
                "Skipping pending BDAP transaction with undecodable payload"
            );
            None
        }
    }
}

/// Rejects `full_path` if any pending transaction registers the same path.
pub fn check_pending_conflict(full_path: &str, pending: &[Transaction]) -> Result<(), ConflictError> {
    let conflict = pending
        .iter()
        .filter_map(pending_full_path)
        .any(|path| path == full_path);

    if conflict {
        warn!(full_path, "Registration conflicts with pending transaction");
        return Err(ConflictError::InPendingPool {
            full_path: full_path.to_string(),
        });
    }
    Ok(())
}
