//! NDEF (NFC Data Exchange Format) - chunk-aware binary codec
//!
//! Decodes byte buffers into messages of logical records and encodes them
//! back. A record may arrive split across several on-wire chunks; chunk
//! groups are validated and merged before the payload is handed to a
//! type-specific [`PayloadCodec`].
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use ndef::{Message, MessageCodec, PayloadRegistry, TypeNameFormat};
//!
//! let registry = Arc::new(PayloadRegistry::empty());
//!
//! // A single URI record
//! let msg = Message::single(
//!     TypeNameFormat::WellKnownType,
//!     &b"U"[..],
//!     None,
//!     &b"\x04github.com/x"[..],
//!     &registry,
//! );
//!
//! let bytes = msg.encode()?;
//!
//! let codec = MessageCodec::new(registry);
//! let decoded = codec.decode(bytes).map_err(|e| e.source)?;
//! assert_eq!(decoded.records()[0].raw_payload().as_ref(), b"\x04github.com/x");
//! # Ok::<(), ndef::Error>(())
//! ```
//!
//! # Features
//!
//! - **Bounds-checked parsing** - malformed input yields
//!   [`Error::TruncatedInput`], never a panic
//! - **Zero-copy decoding** - record fields are [`bytes::Bytes`] slices of
//!   the input buffer
//! - **Pluggable payloads** - an immutable [`PayloadRegistry`] maps
//!   `(TNF, type)` to payload codecs
//! - **`serde`** (optional) - serialization for [`TypeNameFormat`] and
//!   [`ChunkFlags`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod protocol;

pub use protocol::{
    Chunk, ChunkFlags, DecodeError, Error, GenericPayload, MAX_PAYLOAD_LEN, Message,
    MessageCodec, PayloadCodec, PayloadRegistry, Record, RecordAssembler, Result,
    SHORT_RECORD_MAX_PAYLOAD, TypeNameFormat,
};
