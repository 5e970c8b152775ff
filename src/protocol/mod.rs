//! NDEF codec core
//!
//! Chunk framing, chunk group validation, record assembly and the
//! message-level driver.

mod chunk;
mod error;
mod length;
mod message;
mod payload;
mod record;
mod types;
mod validate;

pub use chunk::Chunk;
pub use error::{DecodeError, Error, Result};
pub use length::{bytes_to_u64, u64_to_bytes};
pub use message::{Message, MessageCodec, encode};
pub use payload::{
    GenericPayload, PayloadCodec, PayloadFactory, PayloadRegistry, PayloadRegistryBuilder,
};
pub use record::{Record, RecordAssembler};
pub use types::{ChunkFlags, TypeNameFormat};
pub use validate::validate;

/// Largest payload written with the 1-byte (short record) length field
pub const SHORT_RECORD_MAX_PAYLOAD: usize = 255;

/// Largest payload representable in the 4-byte length field
pub const MAX_PAYLOAD_LEN: u64 = u32::MAX as u64;

/// Smallest possible chunk: flags, type length, 1-byte payload length
pub const MIN_CHUNK_LEN: usize = 3;
