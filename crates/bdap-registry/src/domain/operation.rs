//! # Operation Tag Parser
//!
//! A BDAP transaction carries two linked outputs:
//!
//! ```text
//! operation output:  OP_1 <op> <push>* OP_2DROP.. [OP_DROP] <destination script>
//! data output:       OP_RETURN <canonical record encoding>
//! ```
//!
//! `OP_1` is the namespace marker. The second small integer selects the
//! operation. Every push between the operation opcode and the first
//! non-push opcode is a parameter. Number pushes (`OP_1NEGATE`,
//! `OP_1..OP_16`) are parameters too, read back as script-number bytes.

use shared_types::opcodes::{OP_1NEGATE, OP_2DROP, OP_DROP, OP_RETURN};
use shared_types::script::{decode_script_num, encode_script_num};
use shared_types::{OutPoint, Script, ScriptBuilder, Transaction};
use tracing::warn;

use super::codec::{CanonicalRecord, Commitment};
use super::errors::{CodecError, DecodeError};
use shared_types::Hash;

/// Small-integer namespace marker opening every operation script.
pub const BDAP_MARKER: u8 = 1;

/// Name reported for codes outside the operation range.
pub const UNKNOWN_OP_NAME: &str = "<unknown bdap op>";

/// A BDAP operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BdapOp {
    New = 2,
    Delete = 3,
    Activate = 4,
    Modify = 5,
    /// Rename (modify RDN).
    Move = 6,
    Execute = 7,
    Bind = 8,
    Revoke = 9,
}

impl BdapOp {
    /// Maps a small-integer opcode value to an operation.
    pub fn from_small_int(value: u8) -> Option<Self> {
        use BdapOp::*;
        let op = match value {
            2 => New,
            3 => Delete,
            4 => Activate,
            5 => Modify,
            6 => Move,
            7 => Execute,
            8 => Bind,
            9 => Revoke,
            _ => return None,
        };
        Some(op)
    }

    pub fn small_int(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            BdapOp::New => "bdap_new",
            BdapOp::Delete => "bdap_delete",
            BdapOp::Activate => "bdap_activate",
            BdapOp::Modify => "bdap_update",
            BdapOp::Move => "bdap_move",
            BdapOp::Execute => "bdap_execute",
            BdapOp::Bind => "bdap_bind",
            BdapOp::Revoke => "bdap_revoke",
        }
    }
}

/// Display name for a numeric operation code.
pub fn op_name(code: i32) -> &'static str {
    u8::try_from(code)
        .ok()
        .and_then(BdapOp::from_small_int)
        .map_or(UNKNOWN_OP_NAME, BdapOp::name)
}

/// A recognized operation and its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationTag {
    pub op: BdapOp,
    /// Pushed data chunks in script order.
    pub params: Vec<Vec<u8>>,
}

impl OperationTag {
    /// First parameter as text; by convention the full path.
    pub fn full_path(&self) -> Option<String> {
        self.params
            .first()
            .map(|p| String::from_utf8_lossy(p).into_owned())
    }

    /// Third parameter as a script number; the expiry of entry operations.
    pub fn expire_time(&self) -> Option<u64> {
        self.params
            .get(2)
            .and_then(|p| decode_script_num(p))
            .and_then(|n| u64::try_from(n).ok())
    }
}

/// Result of scanning one output script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Recognized(OperationTag),
    /// The script does not open with the namespace marker.
    NotBdap,
    /// Marker present, but the operation or its parameters are unusable.
    Malformed,
}

impl Classification {
    /// Legacy numeric form: the operation value when recognized, otherwise
    /// `0` (not BDAP) or `-1` (malformed). Callers treat any value `<= 0`
    /// as "not recognized".
    pub fn legacy_code(&self) -> i32 {
        match self {
            Classification::Recognized(tag) => i32::from(tag.op.small_int()),
            Classification::NotBdap => 0,
            Classification::Malformed => -1,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Classification::Recognized(_))
    }

    pub fn into_tag(self) -> Option<OperationTag> {
        match self {
            Classification::Recognized(tag) => Some(tag),
            _ => None,
        }
    }
}

/// Classifies one output script.
pub fn classify_script(script: &Script) -> Classification {
    let mut instructions = script.instructions();

    match instructions.next() {
        Some(Ok(ins)) if ins.small_int() == Some(BDAP_MARKER) => {}
        _ => return Classification::NotBdap,
    }

    let op = match instructions.next() {
        Some(Ok(ins)) => match ins.small_int().and_then(BdapOp::from_small_int) {
            Some(op) => op,
            None => return Classification::Malformed,
        },
        _ => return Classification::Malformed,
    };

    let mut params = Vec::new();
    for ins in instructions {
        match ins {
            Ok(ins) => match (ins.data, ins.small_int()) {
                (Some(data), _) => params.push(data.to_vec()),
                (None, Some(n)) => params.push(encode_script_num(i64::from(n))),
                (None, None) if ins.opcode == OP_1NEGATE => params.push(encode_script_num(-1)),
                (None, None) => break,
            },
            Err(_) => return Classification::Malformed,
        }
    }

    Classification::Recognized(OperationTag { op, params })
}

/// First output carrying a recognized operation.
pub fn find_operation(tx: &Transaction) -> Option<(usize, OperationTag)> {
    tx.outputs
        .iter()
        .enumerate()
        .find_map(|(i, out)| classify_script(&out.script_pubkey).into_tag().map(|t| (i, t)))
}

/// Index of the operation output, if any.
pub fn operation_output_index(tx: &Transaction) -> Option<usize> {
    find_operation(tx).map(|(index, _)| index)
}

/// True if `tx` spends the operation output that `entry_txid` created at the
/// same index as `tx`'s own operation output. Modify, move and revoke must
/// spend the previous record this way.
pub fn spends_previous_operation(tx: &Transaction, entry_txid: &Hash) -> bool {
    operation_output_index(tx)
        .and_then(|index| u32::try_from(index).ok())
        .is_some_and(|vout| tx.spends(&OutPoint::new(*entry_txid, vout)))
}

/// Location of the data output.
///
/// `others` lists every further candidate. More than one candidate is
/// ambiguous; the first one is still the one used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataOutput {
    pub index: usize,
    pub others: Vec<usize>,
}

impl DataOutput {
    pub fn is_ambiguous(&self) -> bool {
        !self.others.is_empty()
    }
}

/// Finds the null-data output(s) of `tx`.
pub fn locate_data_output(tx: &Transaction) -> Option<DataOutput> {
    let mut candidates = tx
        .outputs
        .iter()
        .enumerate()
        .filter(|(_, out)| out.script_pubkey.is_null_data())
        .map(|(i, _)| i);

    let index = candidates.next()?;
    let others: Vec<usize> = candidates.collect();
    if !others.is_empty() {
        warn!(
            index,
            ?others,
            "Multiple BDAP data outputs; using the first"
        );
    }
    Some(DataOutput { index, others })
}

/// Payload of a data script: the push directly after `OP_RETURN`.
pub fn extract_payload(script: &Script) -> Result<Vec<u8>, DecodeError> {
    let mut instructions = script.instructions();
    match instructions.next() {
        Some(Ok(ins)) if ins.opcode == OP_RETURN => {}
        _ => return Err(DecodeError::MissingPayload),
    }
    match instructions.next() {
        Some(Ok(ins)) => ins
            .data
            .map(<[u8]>::to_vec)
            .ok_or(DecodeError::MissingPayload),
        _ => Err(DecodeError::MissingPayload),
    }
}

/// Payload of `tx`'s data output together with its commitment.
pub fn payload_with_commitment(
    tx: &Transaction,
) -> Result<(DataOutput, Vec<u8>, Commitment), DecodeError> {
    let location = locate_data_output(tx).ok_or(DecodeError::MissingDataOutput)?;
    let payload = extract_payload(&tx.outputs[location.index].script_pubkey)?;
    let commitment = Commitment::of(&payload);
    Ok((location, payload, commitment))
}

/// Decodes the record carried by `tx` and checks its commitment.
pub fn decode_record<R: CanonicalRecord>(tx: &Transaction) -> Result<R, CodecError> {
    let (_, payload, commitment) = payload_with_commitment(tx)?;
    R::decode_with_commitment(&payload, commitment.as_bytes())
}

/// `OP_RETURN <payload>`
pub fn build_data_script(payload: &[u8]) -> Script {
    ScriptBuilder::new()
        .push_opcode(OP_RETURN)
        .push_slice(payload)
        .into_script()
}

/// Marker, operation, parameter pushes, drops that clear all of them off
/// the stack, then `destination`.
pub fn build_operation_script(op: BdapOp, params: &[&[u8]], destination: &Script) -> Script {
    let builder = params
        .iter()
        .fold(operation_prefix(op), |builder, param| builder.push_slice(param));
    finish_operation(builder, params.len(), destination).into_script()
}

fn operation_prefix(op: BdapOp) -> ScriptBuilder {
    ScriptBuilder::new()
        .push_int(i64::from(BDAP_MARKER))
        .push_int(i64::from(op.small_int()))
}

fn finish_operation(mut builder: ScriptBuilder, param_count: usize, destination: &Script) -> ScriptBuilder {
    let items = 2 + param_count;
    for _ in 0..items / 2 {
        builder = builder.push_opcode(OP_2DROP);
    }
    if items % 2 == 1 {
        builder = builder.push_opcode(OP_DROP);
    }
    builder.append(destination)
}

/// Operation script for a registration-style record:
/// full path, encryption key and expiry as parameters.
pub fn build_entry_operation_script(
    op: BdapOp,
    full_path: &[u8],
    encrypt_public_key: &[u8],
    expire_time: u64,
    destination: &Script,
) -> Script {
    let expire = i64::try_from(expire_time).unwrap_or(i64::MAX);
    let builder = operation_prefix(op)
        .push_slice(full_path)
        .push_slice(encrypt_public_key)
        .push_int(expire);
    finish_operation(builder, 3, destination).into_script()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::DomainEntry;
    use shared_types::opcodes::{OP_0, OP_1, OP_16, OP_CHECKSIG, OP_DUP, OP_PUSHDATA1};
    use shared_types::{TxIn, TxOut};

    fn destination() -> Script {
        Script::p2pkh(&[0x42; 20])
    }

    fn entry() -> DomainEntry {
        DomainEntry {
            version: 1,
            object_id: b"alice".to_vec(),
            organizational_unit: b"public".to_vec(),
            domain_component: b"bdap.io".to_vec(),
            ..Default::default()
        }
    }

    fn bdap_tx(entry: &DomainEntry) -> Transaction {
        let op = build_entry_operation_script(
            BdapOp::New,
            entry.full_path().as_bytes(),
            &[0x02; 33],
            1_700_000_000,
            &destination(),
        );
        Transaction {
            version: 1,
            inputs: vec![],
            outputs: vec![
                TxOut::new(0, build_data_script(&entry.encode())),
                TxOut::new(1, op),
            ],
            lock_time: 0,
        }
    }

    #[test]
    fn test_marker_new_path_is_recognized() {
        let script = ScriptBuilder::new()
            .push_int(1)
            .push_int(2)
            .push_slice(b"ab.com")
            .into_script();
        assert_eq!(
            classify_script(&script),
            Classification::Recognized(OperationTag {
                op: BdapOp::New,
                params: vec![b"ab.com".to_vec()],
            })
        );
    }

    #[test]
    fn test_out_of_range_operation_not_recognized() {
        for value in [0u8, 1, 10, 16] {
            let script = ScriptBuilder::new()
                .push_int(1)
                .push_int(i64::from(value))
                .into_script();
            let class = classify_script(&script);
            assert_eq!(class, Classification::Malformed);
            assert!(!class.is_recognized());
            assert!(class.legacy_code() <= 0);
        }
    }

    #[test]
    fn test_missing_marker_is_not_bdap() {
        let script = ScriptBuilder::new().push_int(2).push_int(2).into_script();
        assert_eq!(classify_script(&script), Classification::NotBdap);
        assert_eq!(classify_script(&destination()), Classification::NotBdap);
        assert_eq!(classify_script(&Script::default()), Classification::NotBdap);
        assert_eq!(Classification::NotBdap.legacy_code(), 0);
    }

    #[test]
    fn test_marker_alone_is_malformed() {
        let script = Script::from_bytes(vec![OP_1]);
        assert_eq!(classify_script(&script), Classification::Malformed);
    }

    #[test]
    fn test_truncated_parameter_is_malformed() {
        let script = Script::from_bytes(vec![OP_1, OP_1 + 1, OP_PUSHDATA1, 10, 1, 2]);
        assert_eq!(classify_script(&script), Classification::Malformed);
        assert_eq!(Classification::Malformed.legacy_code(), -1);
    }

    #[test]
    fn test_params_stop_at_first_non_push() {
        let script = build_operation_script(BdapOp::Revoke, &[b"x", b""], &destination());
        let tag = classify_script(&script).into_tag().unwrap();
        assert_eq!(tag.op, BdapOp::Revoke);
        assert_eq!(tag.params, vec![b"x".to_vec(), Vec::new()]);
    }

    #[test]
    fn test_operation_script_layout() {
        let script = build_operation_script(BdapOp::New, &[b"a", b"b", b"c"], &destination());
        let bytes = script.as_bytes();
        // marker, op, three 2-byte pushes, two OP_2DROP, one OP_DROP
        assert_eq!(&bytes[..2], &[OP_1, OP_1 + 1]);
        assert_eq!(&bytes[8..11], &[OP_2DROP, OP_2DROP, OP_DROP]);
        assert_eq!(bytes[11], OP_DUP);
        assert_eq!(*bytes.last().unwrap(), OP_CHECKSIG);

        let even = build_operation_script(BdapOp::New, &[b"a", b"b"], &destination());
        assert_eq!(&even.as_bytes()[6..8], &[OP_2DROP, OP_2DROP]);
        assert_eq!(even.as_bytes()[8], OP_DUP);
    }

    #[test]
    fn test_small_expiry_uses_number_opcode() {
        for (expire, opcode) in [(0u64, OP_0), (1, OP_1), (16, OP_16)] {
            let script = build_entry_operation_script(
                BdapOp::New,
                b"a@b.c",
                &[0x02; 3],
                expire,
                &destination(),
            );
            // marker, op, 6-byte path push, 4-byte key push, expiry
            assert_eq!(script.as_bytes()[12], opcode, "expiry {expire}");

            let tag = classify_script(&script).into_tag().unwrap();
            assert_eq!(tag.params.len(), 3);
            assert_eq!(tag.params[2], encode_script_num(expire as i64));
            assert_eq!(tag.expire_time(), Some(expire));
        }

        let large = build_entry_operation_script(BdapOp::New, b"a@b.c", &[0x02; 3], 17, &destination());
        assert_eq!(&large.as_bytes()[12..14], &[1, 17]);
        assert_eq!(classify_script(&large).into_tag().unwrap().expire_time(), Some(17));
    }

    #[test]
    fn test_number_opcodes_are_parameters() {
        let script = ScriptBuilder::new()
            .push_int(1)
            .push_int(2)
            .push_slice(b"x")
            .push_opcode(OP_1NEGATE)
            .push_opcode(OP_16)
            .push_opcode(OP_2DROP)
            .push_opcode(OP_1)
            .into_script();
        let tag = classify_script(&script).into_tag().unwrap();
        assert_eq!(tag.params, vec![b"x".to_vec(), vec![0x81], vec![0x10]]);
        assert_eq!(tag.expire_time(), Some(16));
    }

    #[test]
    fn test_op_names() {
        assert_eq!(op_name(2), "bdap_new");
        assert_eq!(op_name(5), "bdap_update");
        assert_eq!(op_name(6), "bdap_move");
        assert_eq!(op_name(9), "bdap_revoke");
        assert_eq!(op_name(1), UNKNOWN_OP_NAME);
        assert_eq!(op_name(-1), UNKNOWN_OP_NAME);
        assert_eq!(op_name(300), UNKNOWN_OP_NAME);
    }

    #[test]
    fn test_find_operation_and_data() {
        let entry = entry();
        let tx = bdap_tx(&entry);

        let (index, tag) = find_operation(&tx).unwrap();
        assert_eq!(index, 1);
        assert_eq!(tag.full_path().as_deref(), Some("alice@public.bdap.io"));
        assert_eq!(tag.params.len(), 3);

        let location = locate_data_output(&tx).unwrap();
        assert_eq!(location.index, 0);
        assert!(!location.is_ambiguous());

        let decoded: DomainEntry = decode_record(&tx).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_multiple_data_outputs_are_surfaced() {
        let entry = entry();
        let mut tx = bdap_tx(&entry);
        tx.outputs
            .push(TxOut::new(0, build_data_script(b"second payload")));

        let location = locate_data_output(&tx).unwrap();
        assert_eq!(location.index, 0);
        assert_eq!(location.others, vec![2]);
        assert!(location.is_ambiguous());

        // The first candidate still wins.
        let decoded: DomainEntry = decode_record(&tx).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_missing_data_output() {
        let tx = Transaction {
            outputs: vec![TxOut::new(1, destination())],
            ..Default::default()
        };
        assert_eq!(
            decode_record::<DomainEntry>(&tx),
            Err(CodecError::Structural(DecodeError::MissingDataOutput))
        );
    }

    #[test]
    fn test_bare_op_return_has_no_payload() {
        let script = Script::from_bytes(vec![OP_RETURN]);
        assert_eq!(extract_payload(&script), Err(DecodeError::MissingPayload));
        assert_eq!(
            extract_payload(&build_data_script(b"abc")).unwrap(),
            b"abc".to_vec()
        );
    }

    #[test]
    fn test_spends_previous_operation() {
        let prior = [0x33; 32];
        let mut tx = bdap_tx(&entry());
        assert!(!spends_previous_operation(&tx, &prior));

        tx.inputs.push(TxIn::spending(OutPoint::new(prior, 1)));
        assert!(spends_previous_operation(&tx, &prior));
        assert!(!spends_previous_operation(&tx, &[0x44; 32]));
    }
}
