//! Physical chunk codec
//!
//! A chunk is one on-wire unit. A logical record is carried by one chunk or
//! by a group of chunks joined with the CF flag.

use bytes::{BufMut, Bytes};
use tracing::trace;

use super::length::{bytes_to_u64, u64_to_bytes};
use super::{ChunkFlags, Error, MAX_PAYLOAD_LEN, MIN_CHUNK_LEN, Result, TypeNameFormat};

/// One physical chunk
///
/// # Wire Format
///
/// ```text
///   7   6   5   4   3   2   1   0
/// +---+---+---+---+---+-----------+
/// | MB| ME| CF| SR| IL|    TNF    |
/// +---+---+---+---+---+-----------+
/// |          Type Length          |
/// +-------------------------------+
/// |  Payload Length (1 or 4, BE)  |
/// +-------------------------------+
/// |   ID Length (present if IL)   |
/// +-------------------------------+
/// |             Type              |
/// +-------------------------------+
/// |       ID (present if IL)      |
/// +-------------------------------+
/// |            Payload            |
/// +-------------------------------+
/// ```
///
/// Encoding trusts the declared lengths: keeping `type_length`, `id_length`
/// and `payload_length` consistent with the slices is the caller's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    /// MB/ME/CF/SR/IL
    pub flags: ChunkFlags,
    /// Type name format
    pub tnf: TypeNameFormat,
    /// Declared type length
    pub type_length: u8,
    /// Declared ID length (only written if IL is set)
    pub id_length: u8,
    /// Declared payload length
    pub payload_length: u32,
    /// Type bytes
    pub record_type: Bytes,
    /// ID bytes
    pub id: Bytes,
    /// Payload bytes
    pub payload: Bytes,
}

impl Chunk {
    /// Size of the serialized chunk, computed from the declared lengths
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let mut len = MIN_CHUNK_LEN;
        if !self.flags.short_record() {
            len += 3;
        }
        if self.flags.id_length_present() {
            len += 1 + usize::from(self.id_length);
        }
        len + usize::from(self.type_length) + self.payload.len()
    }

    /// Serialize the chunk
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out);
        out
    }

    /// Serialize the chunk, appending to `out`
    pub fn encode_into(&self, out: &mut impl BufMut) {
        trace!(
            flags = %self.flags,
            tnf = %self.tnf,
            type_len = self.type_length,
            payload_len = self.payload_length,
            "encode chunk"
        );

        out.put_u8(self.flags.as_u8() | self.tnf.as_u8());
        out.put_u8(self.type_length);

        let width = if self.flags.short_record() { 1 } else { 4 };
        out.put_slice(&u64_to_bytes(u64::from(self.payload_length), width));

        if self.flags.id_length_present() {
            out.put_u8(self.id_length);
        }
        if self.type_length > 0 {
            out.put_slice(&self.record_type);
        }
        if self.flags.id_length_present() && self.id_length > 0 {
            out.put_slice(&self.id);
        }
        out.put_slice(&self.payload);
    }

    /// Parse one chunk from the front of `buf`
    ///
    /// Trailing bytes are left untouched. Returns the chunk and the number of
    /// bytes it occupied. Type, ID and payload share `buf`'s allocation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedInput`] if any field runs past the end of
    /// the buffer.
    pub fn decode(buf: &Bytes) -> Result<(Self, usize)> {
        let mut cursor = Cursor::new(buf);

        let first = cursor.read_u8()?;
        let flags = ChunkFlags::from_bits(first);
        let tnf = TypeNameFormat::from_bits(first);
        let type_length = cursor.read_u8()?;

        let width = if flags.short_record() { 1 } else { 4 };
        let raw_len = bytes_to_u64(&cursor.take(width)?);
        let payload_length = u32::try_from(raw_len).map_err(|_| Error::PayloadTooLarge {
            size: raw_len,
            max: MAX_PAYLOAD_LEN,
        })?;

        let id_length = if flags.id_length_present() {
            cursor.read_u8()?
        } else {
            0
        };

        let record_type = cursor.take(usize::from(type_length))?;
        let id = cursor.take(usize::from(id_length))?;
        let payload_size = usize::try_from(payload_length).map_err(|_| Error::PayloadTooLarge {
            size: raw_len,
            max: MAX_PAYLOAD_LEN,
        })?;
        let payload = cursor.take(payload_size)?;

        let chunk = Self {
            flags,
            tnf,
            type_length,
            id_length,
            payload_length,
            record_type,
            id,
            payload,
        };

        trace!(
            flags = %chunk.flags,
            tnf = %chunk.tnf,
            type_len = type_length,
            payload_len = payload_length,
            consumed = cursor.position(),
            "decoded chunk"
        );

        Ok((chunk, cursor.position()))
    }
}

/// Bounds-checked reader over a shared buffer
struct Cursor<'a> {
    buf: &'a Bytes,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a Bytes) -> Self {
        Self { buf, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<Bytes> {
        let available = self.remaining();
        if n > available {
            return Err(Error::TruncatedInput {
                needed: n,
                available,
            });
        }
        let out = self.buf.slice(self.pos..self.pos + n);
        self.pos += n;
        Ok(out)
    }

    fn read_u8(&mut self) -> Result<u8> {
        let byte = self
            .buf
            .get(self.pos)
            .copied()
            .ok_or(Error::TruncatedInput {
                needed: 1,
                available: 0,
            })?;
        self.pos += 1;
        Ok(byte)
    }
}
