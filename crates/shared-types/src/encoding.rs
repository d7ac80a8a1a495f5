//! # Consensus Stream Encoding
//!
//! The chain's canonical byte layout for serialized objects:
//!
//! | Item | Layout |
//! |------|--------|
//! | fixed integers | little-endian |
//! | byte strings | CompactSize length, then raw bytes |
//! | vectors | CompactSize count, then each element |
//! | VARINT | MSB base-128, +1 offset per continuation byte |
//!
//! Decoding is strict: non-canonical CompactSize forms, oversized lengths
//! and VARINT overflow are all rejected, so that `decode(encode(x)) == x`
//! and any accepted buffer re-encodes to itself.

use crate::entities::Hash;
use crate::errors::EncodingError;

/// Largest length prefix accepted by the decoder (32 MiB).
pub const MAX_SIZE: u64 = 0x0200_0000;

/// Append-only writer for the consensus stream format.
#[derive(Debug, Default, Clone)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    /// Creates an empty encoder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn write_i32(&mut self, value: i32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_i64(&mut self, value: i64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Writes raw bytes with no length prefix.
    pub fn write_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Writes a 32-byte hash in internal byte order.
    pub fn write_hash(&mut self, hash: &Hash) -> &mut Self {
        self.write_raw(hash)
    }

    /// Writes a CompactSize integer.
    pub fn write_compact_size(&mut self, value: u64) -> &mut Self {
        if value < 0xfd {
            self.buf.push(value as u8);
        } else if value <= 0xffff {
            self.buf.push(0xfd);
            self.buf.extend_from_slice(&(value as u16).to_le_bytes());
        } else if value <= 0xffff_ffff {
            self.buf.push(0xfe);
            self.buf.extend_from_slice(&(value as u32).to_le_bytes());
        } else {
            self.buf.push(0xff);
            self.buf.extend_from_slice(&value.to_le_bytes());
        }
        self
    }

    /// Writes a VARINT (MSB base-128 with continuation offset).
    pub fn write_varint(&mut self, mut value: u64) -> &mut Self {
        let mut tmp = [0u8; 10];
        let mut len = 0;
        loop {
            tmp[len] = (value & 0x7f) as u8 | if len > 0 { 0x80 } else { 0x00 };
            if value <= 0x7f {
                break;
            }
            value = (value >> 7) - 1;
            len += 1;
        }
        for i in (0..=len).rev() {
            self.buf.push(tmp[i]);
        }
        self
    }

    /// Writes a length-prefixed byte string.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_compact_size(bytes.len() as u64);
        self.write_raw(bytes)
    }

    /// Writes a count-prefixed vector of byte strings.
    pub fn write_bytes_vec(&mut self, items: &[Vec<u8>]) -> &mut Self {
        self.write_compact_size(items.len() as u64);
        for item in items {
            self.write_bytes(item);
        }
        self
    }

    /// Current encoded length.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the encoder and returns the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over a borrowed buffer in the consensus stream format.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], EncodingError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(EncodingError::UnexpectedEnd { needed, remaining });
        }
        let slice = &self.data[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], EncodingError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, EncodingError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, EncodingError> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, EncodingError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, EncodingError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, EncodingError> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, EncodingError> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    pub fn read_hash(&mut self) -> Result<Hash, EncodingError> {
        self.take_array()
    }

    /// Reads a CompactSize, rejecting non-canonical forms and values above
    /// [`MAX_SIZE`].
    pub fn read_compact_size(&mut self) -> Result<u64, EncodingError> {
        let first = self.read_u8()?;
        let value = match first {
            0xfd => {
                let v = u64::from(self.read_u16()?);
                if v < 0xfd {
                    return Err(EncodingError::NonCanonicalCompactSize);
                }
                v
            }
            0xfe => {
                let v = u64::from(self.read_u32()?);
                if v < 0x1_0000 {
                    return Err(EncodingError::NonCanonicalCompactSize);
                }
                v
            }
            0xff => {
                let v = self.read_u64()?;
                if v < 0x1_0000_0000 {
                    return Err(EncodingError::NonCanonicalCompactSize);
                }
                v
            }
            small => u64::from(small),
        };
        if value > MAX_SIZE {
            return Err(EncodingError::SizeTooLarge(value));
        }
        Ok(value)
    }

    /// Reads a VARINT.
    pub fn read_varint(&mut self) -> Result<u64, EncodingError> {
        let mut value: u64 = 0;
        loop {
            let byte = self.read_u8()?;
            if value > (u64::MAX >> 7) {
                return Err(EncodingError::VarIntOverflow);
            }
            value = (value << 7) | u64::from(byte & 0x7f);
            if byte & 0x80 != 0 {
                if value == u64::MAX {
                    return Err(EncodingError::VarIntOverflow);
                }
                value += 1;
            } else {
                return Ok(value);
            }
        }
    }

    /// Reads a VARINT that must fit in a `u32` field.
    pub fn read_varint_u32(&mut self, field: &'static str) -> Result<u32, EncodingError> {
        let value = self.read_varint()?;
        u32::try_from(value).map_err(|_| EncodingError::ValueOutOfRange { field, value })
    }

    /// Reads a length-prefixed byte string.
    ///
    /// The length is checked against the remaining input before anything is
    /// allocated.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, EncodingError> {
        let len = self.read_compact_size()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    /// Reads a count-prefixed vector of byte strings.
    pub fn read_bytes_vec(&mut self) -> Result<Vec<Vec<u8>>, EncodingError> {
        let count = self.read_compact_size()? as usize;
        // Every element needs at least its one-byte length prefix.
        if count > self.remaining() {
            return Err(EncodingError::UnexpectedEnd {
                needed: count,
                remaining: self.remaining(),
            });
        }
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.read_bytes()?);
        }
        Ok(items)
    }

    /// Fails if any input is left unconsumed.
    pub fn finish(&self) -> Result<(), EncodingError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(EncodingError::TrailingBytes(n)),
        }
    }
}
