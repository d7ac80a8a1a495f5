//! In-Memory Chain State Adapter
//!
//! Implements every outbound port over one `RwLock`. Snapshots and block
//! connection each take the lock once, so readers see either the state
//! before a block or the state after it.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use shared_types::{ChainTip, Coin, Hash, OutPoint, Timestamp, Transaction};
use tracing::{debug, info};

use crate::domain::entities::DomainEntry;
use crate::domain::operation::{decode_record, find_operation, BdapOp};
use crate::ports::outbound::{
    BlockSource, ChainSnapshot, ChainStateError, ChainStateReader, CoinSource, EntryDirectory,
};

#[derive(Debug, Clone)]
struct StoredBlock {
    median_time_past: Timestamp,
    transactions: Vec<Transaction>,
}

#[derive(Debug, Default)]
struct State {
    tip: ChainTip,
    blocks: BTreeMap<u32, StoredBlock>,
    pending: Vec<Transaction>,
    coins: HashMap<OutPoint, Coin>,
    entries: HashMap<String, DomainEntry>,
}

/// Chain, coin view, pending pool and entry directory held in memory.
#[derive(Debug, Default)]
pub struct InMemoryChainState {
    state: RwLock<State>,
}

impl InMemoryChainState {
    /// Empty chain whose tip is `tip`.
    pub fn new(tip: ChainTip) -> Self {
        let state = State {
            tip,
            ..Default::default()
        };
        Self {
            state: RwLock::new(state),
        }
    }

    /// Current tip.
    pub fn tip(&self) -> ChainTip {
        self.state.read().tip
    }

    /// Adds a transaction to the pending pool.
    pub fn add_pending(&self, tx: Transaction) {
        self.state.write().pending.push(tx);
    }

    /// Number of pending transactions.
    pub fn pending_len(&self) -> usize {
        self.state.read().pending.len()
    }

    /// Registers an entry directly in the directory.
    pub fn insert_entry(&self, entry: DomainEntry) {
        self.state.write().entries.insert(entry.full_path(), entry);
    }

    /// Adds a coin to the coin view.
    pub fn insert_coin(&self, outpoint: OutPoint, coin: Coin) {
        self.state.write().coins.insert(outpoint, coin);
    }

    /// Connects a block on top of the tip.
    ///
    /// Under one write lock: stores the block, moves the tip, updates the
    /// coin view, drops the block's transactions from the pending pool and
    /// indexes every new BDAP entry the block confirms.
    pub fn connect_block(&self, hash: Hash, median_time_past: Timestamp, transactions: Vec<Transaction>) {
        let mut state = self.state.write();
        let height = state.tip.height + 1;

        for tx in &transactions {
            let txid = tx.txid();
            for input in &tx.inputs {
                if let Some(coin) = state.coins.get_mut(&input.prevout) {
                    coin.spent = true;
                }
            }
            for (vout, output) in (0u32..).zip(&tx.outputs) {
                state.coins.insert(
                    OutPoint::new(txid, vout),
                    Coin {
                        output: output.clone(),
                        height,
                        spent: false,
                    },
                );
            }

            if let Some(entry) = confirmed_entry(tx, txid, height) {
                debug!(full_path = %entry.full_path(), height, "Indexed BDAP entry");
                state.entries.insert(entry.full_path(), entry);
            }
        }

        let mined: Vec<Hash> = transactions.iter().map(Transaction::txid).collect();
        state.pending.retain(|tx| !mined.contains(&tx.txid()));

        state.blocks.insert(
            height,
            StoredBlock {
                median_time_past,
                transactions,
            },
        );
        state.tip = ChainTip {
            height,
            hash,
            median_time_past,
        };
        info!(height, "Connected block");
    }
}

fn confirmed_entry(tx: &Transaction, txid: Hash, height: u32) -> Option<DomainEntry> {
    let (_, tag) = find_operation(tx)?;
    if tag.op != BdapOp::New {
        return None;
    }
    let mut entry: DomainEntry = decode_record(tx).ok()?;
    entry.txid = txid;
    entry.height = height;
    Some(entry)
}

impl ChainStateReader for InMemoryChainState {
    fn snapshot(&self) -> Result<ChainSnapshot, ChainStateError> {
        let state = self.state.read();
        Ok(ChainSnapshot {
            tip: state.tip,
            pending: state.pending.clone(),
        })
    }

    fn tip_with_median_time(&self, height: u32) -> Result<(ChainTip, Option<Timestamp>), ChainStateError> {
        let state = self.state.read();
        let median = state.blocks.get(&height).map(|block| block.median_time_past);
        Ok((state.tip, median))
    }
}

impl BlockSource for InMemoryChainState {
    fn transaction_at(&self, height: u32, txid: &Hash) -> Result<Option<Transaction>, ChainStateError> {
        let state = self.state.read();
        let block = state
            .blocks
            .get(&height)
            .ok_or(ChainStateError::HeightNotFound(height))?;
        Ok(block
            .transactions
            .iter()
            .find(|tx| tx.txid() == *txid)
            .cloned())
    }

    fn median_time_at(&self, height: u32) -> Result<Timestamp, ChainStateError> {
        self.state
            .read()
            .blocks
            .get(&height)
            .map(|block| block.median_time_past)
            .ok_or(ChainStateError::HeightNotFound(height))
    }
}

impl CoinSource for InMemoryChainState {
    fn coin(&self, outpoint: &OutPoint) -> Result<Option<Coin>, ChainStateError> {
        Ok(self.state.read().coins.get(outpoint).cloned())
    }
}

impl EntryDirectory for InMemoryChainState {
    fn entry(&self, full_path: &str) -> Result<Option<DomainEntry>, ChainStateError> {
        Ok(self.state.read().entries.get(full_path).cloned())
    }
}
