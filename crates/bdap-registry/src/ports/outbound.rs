//! # Outbound Ports (Driven Ports / SPI)
//!
//! Read-only views of state owned elsewhere: the confirmed chain, the coin
//! view, the pending pool and the derived entry directory.
//!
//! Tip and pending pool are read together through [`ChainStateReader`] so
//! one registry call never sees a tip from one moment and a pool from
//! another. The same holds for the tip and a block's median time.

use shared_types::{ChainTip, Coin, Hash, OutPoint, Timestamp, Transaction};
use thiserror::Error;

use crate::domain::entities::DomainEntry;

/// Error from a chain-state collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainStateError {
    /// No block at the requested height.
    #[error("Block height {0} not found")]
    HeightNotFound(u32),

    /// The collaborator could not answer.
    #[error("Chain state unavailable: {0}")]
    Unavailable(String),
}

/// Tip and pending pool captured together.
#[derive(Debug, Clone, Default)]
pub struct ChainSnapshot {
    /// The confirmed tip.
    pub tip: ChainTip,
    /// Pending pool transactions.
    pub pending: Vec<Transaction>,
}

/// Consistent view of the tip and the pending pool.
pub trait ChainStateReader: Send + Sync {
    /// Reads tip and pool under one lock.
    fn snapshot(&self) -> Result<ChainSnapshot, ChainStateError>;

    /// Reads the tip and the median time past of the block at `height`
    /// under one lock. The time is `None` when no block is at `height`.
    fn tip_with_median_time(&self, height: u32) -> Result<(ChainTip, Option<Timestamp>), ChainStateError>;
}

/// Confirmed block access.
pub trait BlockSource: Send + Sync {
    /// The transaction `txid` if it is in the block at `height`.
    fn transaction_at(&self, height: u32, txid: &Hash) -> Result<Option<Transaction>, ChainStateError>;

    /// Median time past of the block at `height`.
    fn median_time_at(&self, height: u32) -> Result<Timestamp, ChainStateError>;
}

/// Coin view.
pub trait CoinSource: Send + Sync {
    /// The coin created at `outpoint`, spent or not.
    fn coin(&self, outpoint: &OutPoint) -> Result<Option<Coin>, ChainStateError>;
}

/// Derived directory of registered entries.
pub trait EntryDirectory: Send + Sync {
    /// The entry registered under `full_path`.
    fn entry(&self, full_path: &str) -> Result<Option<DomainEntry>, ChainStateError>;
}
