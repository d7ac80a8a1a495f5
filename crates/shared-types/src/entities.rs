//! # Core Chain Entities
//!
//! The UTXO-chain shapes the registry reads: transactions, their inputs and
//! outputs, coins and the confirmed tip. Block and UTXO storage live outside
//! this workspace; these types are what the narrow read queries hand back.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::encoding::Encoder;
use crate::script::Script;

/// A 32-byte hash in internal byte order.
pub type Hash = [u8; 32];

/// Amount in the chain's smallest unit.
pub type Amount = i64;

/// Timestamp in seconds since UNIX epoch.
pub type Timestamp = u64;

/// Reference to a specific output of a prior transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct OutPoint {
    /// Hash of the transaction holding the output.
    pub txid: Hash,
    /// Output index within that transaction.
    pub vout: u32,
}

impl OutPoint {
    pub fn new(txid: Hash, vout: u32) -> Self {
        Self { txid, vout }
    }
}

/// A transaction input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    /// The output being spent.
    pub prevout: OutPoint,
    /// Unlocking script.
    pub script_sig: Script,
    /// Sequence number.
    pub sequence: u32,
}

impl TxIn {
    /// Creates an input spending `prevout` with an empty unlocking script.
    pub fn spending(prevout: OutPoint) -> Self {
        Self {
            prevout,
            script_sig: Script::default(),
            sequence: u32::MAX,
        }
    }
}

/// A transaction output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    /// Value carried by the output.
    pub value: Amount,
    /// Locking script.
    pub script_pubkey: Script,
}

impl TxOut {
    pub fn new(value: Amount, script_pubkey: Script) -> Self {
        Self {
            value,
            script_pubkey,
        }
    }
}

/// A chain transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Transaction {
    /// Transaction format version.
    pub version: i32,
    /// Inputs spending prior outputs.
    pub inputs: Vec<TxIn>,
    /// Outputs created by this transaction.
    pub outputs: Vec<TxOut>,
    /// Earliest height or time the transaction may be mined.
    pub lock_time: u32,
}

impl Transaction {
    /// Serializes the transaction in consensus stream format.
    pub fn encode(&self) -> Vec<u8> {
        let mut enc = Encoder::new();
        enc.write_i32(self.version);
        enc.write_compact_size(self.inputs.len() as u64);
        for input in &self.inputs {
            enc.write_hash(&input.prevout.txid)
                .write_u32(input.prevout.vout)
                .write_bytes(input.script_sig.as_bytes())
                .write_u32(input.sequence);
        }
        enc.write_compact_size(self.outputs.len() as u64);
        for output in &self.outputs {
            enc.write_i64(output.value)
                .write_bytes(output.script_pubkey.as_bytes());
        }
        enc.write_u32(self.lock_time);
        enc.into_bytes()
    }

    /// Transaction id: double SHA-256 of the serialized transaction.
    pub fn txid(&self) -> Hash {
        let first = Sha256::digest(self.encode());
        Sha256::digest(first).into()
    }

    /// Returns true if any input spends `outpoint`.
    pub fn spends(&self, outpoint: &OutPoint) -> bool {
        self.inputs.iter().any(|input| input.prevout == *outpoint)
    }
}

/// An unspent (or spent) output as seen by the coin view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// The output itself.
    pub output: TxOut,
    /// Height of the block that created the output.
    pub height: u32,
    /// Whether the output has already been spent.
    pub spent: bool,
}

/// The most recently confirmed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChainTip {
    /// Height of the tip block.
    pub height: u32,
    /// Hash of the tip block.
    pub hash: Hash,
    /// Median timestamp of the blocks preceding the tip.
    pub median_time_past: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptBuilder;

    #[test]
    fn test_txid_is_deterministic_and_content_bound() {
        let tx = Transaction {
            version: 1,
            inputs: vec![TxIn::spending(OutPoint::new([7u8; 32], 1))],
            outputs: vec![TxOut::new(5_000, ScriptBuilder::new().push_slice(b"x").into_script())],
            lock_time: 0,
        };
        let mut other = tx.clone();
        other.lock_time = 1;

        assert_eq!(tx.txid(), tx.clone().txid());
        assert_ne!(tx.txid(), other.txid());
    }

    #[test]
    fn test_empty_transaction_encoding() {
        let tx = Transaction {
            version: 2,
            ..Default::default()
        };
        assert_eq!(hex::encode(tx.encode()), "02000000000000000000");
    }

    #[test]
    fn test_spends() {
        let prev = OutPoint::new([1u8; 32], 3);
        let tx = Transaction {
            version: 1,
            inputs: vec![TxIn::spending(prev)],
            ..Default::default()
        };
        assert!(tx.spends(&prev));
        assert!(!tx.spends(&OutPoint::new([1u8; 32], 4)));
    }
}
