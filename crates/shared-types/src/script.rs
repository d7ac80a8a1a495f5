//! # Scripts
//!
//! Output scripts as raw bytes, plus instruction iteration and building.
//!
//! Only the opcodes the registry inspects or emits are named in
//! [`opcodes`]; any other byte is carried through as an opaque opcode.

use serde::{Deserialize, Serialize};

use crate::errors::ScriptError;

/// Scripts larger than this are unspendable by consensus.
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// Opcode byte values.
pub mod opcodes {
    /// Pushes an empty byte string.
    pub const OP_0: u8 = 0x00;
    /// Next byte holds the push length.
    pub const OP_PUSHDATA1: u8 = 0x4c;
    /// Next two bytes (LE) hold the push length.
    pub const OP_PUSHDATA2: u8 = 0x4d;
    /// Next four bytes (LE) hold the push length.
    pub const OP_PUSHDATA4: u8 = 0x4e;
    pub const OP_1NEGATE: u8 = 0x4f;
    pub const OP_1: u8 = 0x51;
    pub const OP_16: u8 = 0x60;
    pub const OP_RETURN: u8 = 0x6a;
    pub const OP_2DROP: u8 = 0x6d;
    pub const OP_DROP: u8 = 0x75;
    pub const OP_DUP: u8 = 0x76;
    pub const OP_EQUAL: u8 = 0x87;
    pub const OP_EQUALVERIFY: u8 = 0x88;
    pub const OP_HASH160: u8 = 0xa9;
    pub const OP_CHECKSIG: u8 = 0xac;

    /// Encodes a small integer 1..=16 as `OP_1..OP_16` (0 as `OP_0`).
    pub fn encode_small_int(n: u8) -> u8 {
        debug_assert!(n <= 16);
        if n == 0 {
            OP_0
        } else {
            OP_1 + n - 1
        }
    }

    /// Decodes `OP_0` / `OP_1..OP_16` to its small-integer value.
    pub fn decode_small_int(opcode: u8) -> Option<u8> {
        match opcode {
            OP_0 => Some(0),
            OP_1..=OP_16 => Some(opcode - OP_1 + 1),
            _ => None,
        }
    }

    /// Returns true for opcodes that push data (`OP_0` through `OP_PUSHDATA4`).
    pub fn is_push(opcode: u8) -> bool {
        opcode <= OP_PUSHDATA4
    }

    /// Returns true for any opcode allowed in a push-only script: data
    /// pushes plus the number pushes up to `OP_16`.
    pub fn is_push_only_opcode(opcode: u8) -> bool {
        opcode <= OP_16
    }
}

use opcodes::*;

/// A locking or unlocking script.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Script(Vec<u8>);

impl Script {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the script's instructions.
    pub fn instructions(&self) -> Instructions<'_> {
        Instructions {
            script: &self.0,
            pos: 0,
            failed: false,
        }
    }

    /// A script that can never be redeemed: it starts with `OP_RETURN` or
    /// exceeds the consensus size limit.
    pub fn is_unspendable(&self) -> bool {
        self.0.first() == Some(&OP_RETURN) || self.0.len() > MAX_SCRIPT_SIZE
    }

    /// True if every instruction is a well-formed push, counting
    /// `OP_1NEGATE` and `OP_1..OP_16` as pushes.
    pub fn is_push_only(&self) -> bool {
        self.instructions()
            .all(|ins| matches!(ins, Ok(ins) if is_push_only_opcode(ins.opcode)))
    }

    /// Standard null-data output: `OP_RETURN` followed only by pushes.
    pub fn is_null_data(&self) -> bool {
        match self.0.split_first() {
            Some((&OP_RETURN, rest)) => Script(rest.to_vec()).is_push_only(),
            _ => false,
        }
    }

    /// Pay-to-public-key-hash locking script.
    pub fn p2pkh(pubkey_hash: &[u8; 20]) -> Self {
        ScriptBuilder::new()
            .push_opcode(OP_DUP)
            .push_opcode(OP_HASH160)
            .push_slice(pubkey_hash)
            .push_opcode(OP_EQUALVERIFY)
            .push_opcode(OP_CHECKSIG)
            .into_script()
    }

    /// Pay-to-script-hash locking script.
    pub fn p2sh(script_hash: &[u8; 20]) -> Self {
        ScriptBuilder::new()
            .push_opcode(OP_HASH160)
            .push_slice(script_hash)
            .push_opcode(OP_EQUAL)
            .into_script()
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// One decoded script instruction: an opcode and, for pushes, its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction<'a> {
    pub opcode: u8,
    /// Pushed bytes; `Some(&[])` for `OP_0`, `None` for non-push opcodes.
    pub data: Option<&'a [u8]>,
}

impl Instruction<'_> {
    /// Small-integer value for `OP_0` / `OP_1..OP_16`.
    pub fn small_int(&self) -> Option<u8> {
        decode_small_int(self.opcode)
    }
}

/// Iterator over a script's instructions.
///
/// Yields one `Err` for a truncated push and then stops.
#[derive(Debug, Clone)]
pub struct Instructions<'a> {
    script: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> Instructions<'a> {
    fn read_len(&mut self, width: usize, offset: usize) -> Result<usize, ScriptError> {
        let remaining = self.script.len() - self.pos;
        if remaining < width {
            return Err(ScriptError::TruncatedPush {
                offset,
                wanted: width,
                remaining,
            });
        }
        let mut buf = [0u8; 4];
        buf[..width].copy_from_slice(&self.script[self.pos..self.pos + width]);
        self.pos += width;
        Ok(u32::from_le_bytes(buf) as usize)
    }

    fn next_instruction(&mut self) -> Result<Instruction<'a>, ScriptError> {
        let offset = self.pos;
        let opcode = self.script[self.pos];
        self.pos += 1;

        if !is_push(opcode) {
            return Ok(Instruction { opcode, data: None });
        }

        let len = match opcode {
            OP_PUSHDATA1 => self.read_len(1, offset)?,
            OP_PUSHDATA2 => self.read_len(2, offset)?,
            OP_PUSHDATA4 => self.read_len(4, offset)?,
            direct => direct as usize,
        };
        let remaining = self.script.len() - self.pos;
        if len > remaining {
            return Err(ScriptError::TruncatedPush {
                offset,
                wanted: len,
                remaining,
            });
        }
        let data = &self.script[self.pos..self.pos + len];
        self.pos += len;
        Ok(Instruction {
            opcode,
            data: Some(data),
        })
    }
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<Instruction<'a>, ScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.script.len() {
            return None;
        }
        let result = self.next_instruction();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

/// Incremental script builder using the chain's push conventions.
#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    bytes: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_opcode(mut self, opcode: u8) -> Self {
        self.bytes.push(opcode);
        self
    }

    /// Pushes `data` with the smallest push opcode that can carry its length.
    pub fn push_slice(mut self, data: &[u8]) -> Self {
        let len = data.len();
        if len < OP_PUSHDATA1 as usize {
            self.bytes.push(len as u8);
        } else if len <= 0xff {
            self.bytes.push(OP_PUSHDATA1);
            self.bytes.push(len as u8);
        } else if len <= 0xffff {
            self.bytes.push(OP_PUSHDATA2);
            self.bytes.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            self.bytes.push(OP_PUSHDATA4);
            self.bytes.extend_from_slice(&(len as u32).to_le_bytes());
        }
        self.bytes.extend_from_slice(data);
        self
    }

    /// Pushes an integer as a script number (`OP_N` for -1 and 0..=16).
    pub fn push_int(self, n: i64) -> Self {
        match n {
            -1 => self.push_opcode(OP_1NEGATE),
            0..=16 => self.push_opcode(encode_small_int(n as u8)),
            _ => self.push_slice(&encode_script_num(n)),
        }
    }

    /// Appends another script's bytes verbatim.
    pub fn append(mut self, script: &Script) -> Self {
        self.bytes.extend_from_slice(script.as_bytes());
        self
    }

    pub fn into_script(self) -> Script {
        Script(self.bytes)
    }
}

/// Minimal little-endian sign-magnitude encoding of a script number.
pub fn encode_script_num(n: i64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    let negative = n < 0;
    let mut abs = n.unsigned_abs();
    let mut out = Vec::with_capacity(9);
    while abs > 0 {
        out.push((abs & 0xff) as u8);
        abs >>= 8;
    }
    let last = out.len() - 1;
    if out[last] & 0x80 != 0 {
        out.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        out[last] |= 0x80;
    }
    out
}

/// Decodes a script number of at most 8 bytes.
pub fn decode_script_num(bytes: &[u8]) -> Option<i64> {
    if bytes.is_empty() {
        return Some(0);
    }
    if bytes.len() > 8 {
        return None;
    }
    let mut magnitude: u64 = 0;
    for (i, byte) in bytes.iter().enumerate() {
        magnitude |= u64::from(*byte) << (8 * i);
    }
    let sign_bit = 0x80u64 << (8 * (bytes.len() - 1));
    if magnitude & sign_bit != 0 {
        let abs = magnitude & !sign_bit;
        i64::try_from(abs).ok().map(|v| -v)
    } else {
        i64::try_from(magnitude).ok()
    }
}
