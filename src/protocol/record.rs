//! Logical records and their assembly from chunk groups

use std::fmt;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tracing::debug;

use super::{
    Chunk, ChunkFlags, Error, MAX_PAYLOAD_LEN, PayloadCodec, PayloadRegistry, Result,
    SHORT_RECORD_MAX_PAYLOAD, TypeNameFormat,
};

/// A de-chunked NDEF record
///
/// Type, ID and raw payload are [`Bytes`] handles; records decoded from a
/// buffer share its allocation rather than copying out of it.
#[derive(Debug)]
pub struct Record {
    tnf: TypeNameFormat,
    record_type: Bytes,
    id: Option<Bytes>,
    raw_payload: Bytes,
    payload: Box<dyn PayloadCodec>,
}

impl Record {
    /// Create a record, interpreting `payload` through `registry`
    pub fn new(
        tnf: TypeNameFormat,
        record_type: impl Into<Bytes>,
        id: Option<Bytes>,
        payload: impl Into<Bytes>,
        registry: &PayloadRegistry,
    ) -> Self {
        let record_type = record_type.into();
        let raw_payload = payload.into();
        let payload = registry.decode(tnf, &record_type, raw_payload.clone());
        Self {
            tnf,
            record_type,
            id,
            raw_payload,
            payload,
        }
    }

    /// Create a record around an already built payload codec
    pub fn with_payload(
        tnf: TypeNameFormat,
        record_type: impl Into<Bytes>,
        id: Option<Bytes>,
        payload: Box<dyn PayloadCodec>,
    ) -> Self {
        Self {
            tnf,
            record_type: record_type.into(),
            id,
            raw_payload: payload.marshal(),
            payload,
        }
    }

    /// Type name format
    #[must_use]
    pub const fn tnf(&self) -> TypeNameFormat {
        self.tnf
    }

    /// Type bytes
    #[must_use]
    pub fn record_type(&self) -> &Bytes {
        &self.record_type
    }

    /// ID bytes, if the record carries an ID field
    #[must_use]
    pub fn id(&self) -> Option<&Bytes> {
        self.id.as_ref()
    }

    /// Payload bytes as reassembled or supplied at construction
    #[must_use]
    pub fn raw_payload(&self) -> &Bytes {
        &self.raw_payload
    }

    /// Decoded payload
    #[must_use]
    pub fn payload(&self) -> &dyn PayloadCodec {
        self.payload.as_ref()
    }

    /// Check that the type field is consistent with the TNF
    ///
    /// The codec itself never calls this; encoding and decoding accept any
    /// combination.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecordType`] naming the failed rule.
    pub fn check(&self) -> Result<()> {
        let invalid = |reason| Err(Error::InvalidRecordType {
            tnf: self.tnf,
            reason,
        });

        match self.tnf {
            TypeNameFormat::Reserved => invalid("reserved TNF"),
            TypeNameFormat::Unchanged => invalid("Unchanged is only valid on continuation chunks"),
            TypeNameFormat::Empty => {
                if !self.record_type.is_empty() {
                    invalid("Empty record has a type")
                } else if self.id.as_ref().is_some_and(|id| !id.is_empty()) {
                    invalid("Empty record has an ID")
                } else if !self.payload.is_empty() {
                    invalid("Empty record has a payload")
                } else {
                    Ok(())
                }
            }
            TypeNameFormat::Unknown => {
                if self.record_type.is_empty() {
                    Ok(())
                } else {
                    invalid("Unknown record has a type")
                }
            }
            TypeNameFormat::WellKnownType
            | TypeNameFormat::MediaType
            | TypeNameFormat::AbsoluteURI
            | TypeNameFormat::ExternalType => {
                if self.record_type.is_empty() {
                    invalid("type is required")
                } else if !self.record_type.is_ascii() {
                    invalid("type is not ASCII")
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.payload.display_string())
    }
}

/// Merges chunk groups into records and splits records back into chunks
#[derive(Debug, Clone)]
pub struct RecordAssembler {
    registry: Arc<PayloadRegistry>,
}

impl RecordAssembler {
    /// Create an assembler that interprets payloads through `registry`
    #[must_use]
    pub fn new(registry: Arc<PayloadRegistry>) -> Self {
        Self { registry }
    }

    /// Payload registry in use
    #[must_use]
    pub fn registry(&self) -> &PayloadRegistry {
        &self.registry
    }

    /// Merge a validated chunk group into one record
    ///
    /// TNF, type and ID come from the first chunk; the payload is every
    /// chunk's payload in order. Run [`validate`](super::validate) on the
    /// group first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoChunks`] for an empty group.
    pub fn assemble(&self, chunks: &[Chunk]) -> Result<Record> {
        let first = chunks.first().ok_or(Error::NoChunks)?;

        let raw_payload = if let [only] = chunks {
            only.payload.clone()
        } else {
            let total = chunks.iter().map(|c| c.payload.len()).sum();
            let mut buf = BytesMut::with_capacity(total);
            for chunk in chunks {
                buf.extend_from_slice(&chunk.payload);
            }
            buf.freeze()
        };

        let id = first
            .flags
            .id_length_present()
            .then(|| first.id.clone());

        debug!(
            chunks = chunks.len(),
            tnf = %first.tnf,
            payload_len = raw_payload.len(),
            "assembled record"
        );

        let payload = self
            .registry
            .decode(first.tnf, &first.record_type, raw_payload.clone());

        Ok(Record {
            tnf: first.tnf,
            record_type: first.record_type.clone(),
            id,
            raw_payload,
            payload,
        })
    }

    /// Turn a record into a single self-contained chunk (MB and ME set)
    ///
    /// The payload is the record codec's serialized form; the short length
    /// form is used when it is under 256 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] for payloads of 2^32 bytes or
    /// more and [`Error::FieldTooLong`] when the type or ID exceeds 255
    /// bytes.
    pub fn disassemble(record: &Record) -> Result<Chunk> {
        let payload = record.payload.marshal();
        let (short, payload_length) = payload_length_field(payload.len())?;

        let type_length = u8::try_from(record.record_type.len()).map_err(|_| Error::FieldTooLong {
            field: "type",
            len: record.record_type.len(),
        })?;

        let mut flags = ChunkFlags::new()
            .with(ChunkFlags::MESSAGE_BEGIN)
            .with(ChunkFlags::MESSAGE_END);
        flags.set(ChunkFlags::SHORT_RECORD, short);

        let (id, id_length) = match &record.id {
            Some(id) => {
                let len = u8::try_from(id.len()).map_err(|_| Error::FieldTooLong {
                    field: "id",
                    len: id.len(),
                })?;
                flags.set(ChunkFlags::ID_LENGTH_PRESENT, true);
                (id.clone(), len)
            }
            None => (Bytes::new(), 0),
        };

        Ok(Chunk {
            flags,
            tnf: record.tnf,
            type_length,
            id_length,
            payload_length,
            record_type: record.record_type.clone(),
            id,
            payload,
        })
    }
}

/// Pick the length form for a payload: `(short, length)`
fn payload_length_field(len: usize) -> Result<(bool, u32)> {
    let length = u32::try_from(len).map_err(|_| Error::PayloadTooLarge {
        size: u64::try_from(len).unwrap_or(u64::MAX),
        max: MAX_PAYLOAD_LEN,
    })?;
    Ok((len <= SHORT_RECORD_MAX_PAYLOAD, length))
}
