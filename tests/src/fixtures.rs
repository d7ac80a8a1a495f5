//! Shared fixtures: a chain seeded at a fixed median time, registration
//! requests with valid addresses, and transaction assembly.

use anyhow::Context;
use bdap_registry::{
    build_data_script, build_operation_script, Audit, BdapApi, BdapConfig, BdapOp, BdapService,
    CanonicalRecord, InMemoryChainState, ObjectType, RegistrationOutputs, RegistrationRequest,
};
use shared_crypto::{hash256, AddressKind, ChainAddress, Secp256k1KeyPair};
use shared_types::{ChainTip, OutPoint, Script, Transaction, TxIn, TxOut};
use tracing_subscriber::EnvFilter;

/// Median time past of the starting tip.
pub const GENESIS_MEDIAN_TIME: u64 = 1_600_000_000;

/// Median time advance per mined block.
pub const BLOCK_SPACING: u64 = 150;

/// Value locked in every operation output.
pub const OPERATION_VALUE: i64 = 1_000;

pub type TestService = BdapService<InMemoryChainState>;

/// Installs a test-writer fmt subscriber once. `RUST_LOG` overrides the
/// default `warn` filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub fn genesis_tip() -> ChainTip {
    ChainTip {
        height: 0,
        hash: hash256(b"genesis"),
        median_time_past: GENESIS_MEDIAN_TIME,
    }
}

/// Service over an empty in-memory chain with the test config.
pub fn new_service() -> TestService {
    BdapService::new(InMemoryChainState::new(genesis_tip()), BdapConfig::for_testing())
}

/// Pay-to-pubkey-hash address derived from `seed`.
pub fn wallet_address(config: &BdapConfig, seed: u8) -> String {
    ChainAddress {
        kind: AddressKind::PubkeyHash,
        hash: [seed; 20],
    }
    .encode(&config.address)
}

pub fn registration_request(
    config: &BdapConfig,
    object_id: &str,
    key: &Secp256k1KeyPair,
) -> RegistrationRequest {
    RegistrationRequest {
        object_id: object_id.to_string(),
        common_name: format!("{object_id} (test)"),
        object_type: ObjectType::User,
        registration_days: None,
        wallet_address: wallet_address(config, 0x11),
        link_address: wallet_address(config, 0x22),
        encrypt_public_key: key.public_key().to_compressed_bytes(),
    }
}

/// Data output at index 0, operation output at index 1.
pub fn assemble(outputs: &RegistrationOutputs, spending: Option<OutPoint>) -> Transaction {
    Transaction {
        version: 1,
        inputs: spending.into_iter().map(TxIn::spending).collect(),
        outputs: vec![
            TxOut::new(0, outputs.data_script.clone()),
            TxOut::new(OPERATION_VALUE, outputs.operation_script.clone()),
        ],
        lock_time: 0,
    }
}

/// Builds a registration for `object_id` and returns the finished transaction.
pub fn register(
    service: &TestService,
    object_id: &str,
    key: &Secp256k1KeyPair,
) -> anyhow::Result<(Transaction, RegistrationOutputs)> {
    let request = registration_request(service.config(), object_id, key);
    let outputs = service
        .build_registration(&request)
        .with_context(|| format!("building registration for {object_id}"))?;
    Ok((assemble(&outputs, None), outputs))
}

/// Transaction carrying `audit`, tagged with its owner path.
pub fn audit_tx(audit: &Audit, destination: &Script) -> Transaction {
    Transaction {
        version: 1,
        inputs: vec![],
        outputs: vec![
            TxOut::new(0, build_data_script(&audit.encode())),
            TxOut::new(
                OPERATION_VALUE,
                build_operation_script(
                    BdapOp::New,
                    &[audit.owner_full_path.as_slice()],
                    destination,
                ),
            ),
        ],
        lock_time: 0,
    }
}

/// Mines `transactions` in a new block one spacing after the tip.
pub fn mine(chain: &InMemoryChainState, transactions: Vec<Transaction>) -> ChainTip {
    let tip = chain.tip();
    let median = tip.median_time_past + BLOCK_SPACING;
    mine_at(chain, median, transactions)
}

/// Mines `transactions` in a new block with the given median time.
pub fn mine_at(chain: &InMemoryChainState, median_time_past: u64, transactions: Vec<Transaction>) -> ChainTip {
    let height = chain.tip().height + 1;
    chain.connect_block(hash256(&height.to_le_bytes()), median_time_past, transactions);
    chain.tip()
}
