//! # Lifecycle & Expiration
//!
//! "Now" is the median time past of the confirmed tip, never the wall
//! clock, so every node agrees on which records are expired. Expiry is
//! informational only; codec and validation never consult it.

use shared_types::{ChainTip, Timestamp};

/// Seconds per day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Extra time added to every new registration (8 hours).
pub const REGISTRATION_GRACE_SECONDS: u64 = 28_800;

/// True once `expire_time` has been reached by the tip's median time.
pub fn is_expired(expire_time: Timestamp, tip: &ChainTip) -> bool {
    expire_time <= tip.median_time_past
}

/// Expiry for a registration confirmed after `tip`, lasting `days`.
///
/// Returns `None` on overflow.
pub fn registration_expiry(tip: &ChainTip, days: u64) -> Option<Timestamp> {
    days.checked_mul(SECONDS_PER_DAY)?
        .checked_add(REGISTRATION_GRACE_SECONDS)?
        .checked_add(tip.median_time_past)
}
