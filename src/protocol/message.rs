//! NDEF messages and the message-level codec

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, instrument, trace};

use super::{
    Chunk, DecodeError, Error, PayloadRegistry, Record, RecordAssembler, Result, TypeNameFormat,
    validate,
};

/// Ordered list of records
///
/// Record order is the physical order on the wire.
#[derive(Debug, Default)]
pub struct Message {
    records: Vec<Record>,
}

impl Message {
    /// Create a message from records
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Create a one-record message, interpreting `payload` through `registry`
    pub fn single(
        tnf: TypeNameFormat,
        record_type: impl Into<Bytes>,
        id: Option<Bytes>,
        payload: impl Into<Bytes>,
        registry: &PayloadRegistry,
    ) -> Self {
        Self::new(vec![Record::new(tnf, record_type, id, payload, registry)])
    }

    /// Records in wire order
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Append a record
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the message has no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Take the records out of the message
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Encode message to bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode(self)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{record}")?;
        }
        Ok(())
    }
}

/// Encode a message, one chunk per record
///
/// Chunked records are never produced: every record is written as a single
/// chunk with MB and ME set.
///
/// # Errors
///
/// Returns [`Error::EmptyMessage`] for a message without records, or the
/// first [`RecordAssembler::disassemble`] failure.
#[instrument(skip_all, fields(records = message.len()))]
pub fn encode(message: &Message) -> Result<Vec<u8>> {
    if message.is_empty() {
        return Err(Error::EmptyMessage);
    }

    let mut out = Vec::new();
    for record in message.records() {
        let chunk = RecordAssembler::disassemble(record)?;
        out.reserve(chunk.encoded_len());
        chunk.encode_into(&mut out);
    }

    trace!(len = out.len(), "encoded message");
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    ReadingChunk,
    RecordBoundary,
    Done,
}

/// Decodes buffers into messages and encodes messages back
///
/// Holds no mutable state; one codec can serve any number of threads.
#[derive(Debug, Clone)]
pub struct MessageCodec {
    assembler: RecordAssembler,
}

impl MessageCodec {
    /// Create a codec that interprets payloads through `registry`
    #[must_use]
    pub fn new(registry: Arc<PayloadRegistry>) -> Self {
        Self {
            assembler: RecordAssembler::new(registry),
        }
    }

    /// Record assembler in use
    #[must_use]
    pub fn assembler(&self) -> &RecordAssembler {
        &self.assembler
    }

    /// Encode a message; see [`encode`]
    #[allow(clippy::unused_self)]
    pub fn encode(&self, message: &Message) -> Result<Vec<u8>> {
        encode(message)
    }

    /// Decode a whole buffer into a message
    ///
    /// Chunks are read until one carries ME; that group is validated and
    /// assembled into a record, and reading continues until the buffer is
    /// exhausted. Record fields share the buffer's allocation.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] with the bytes consumed by complete chunks
    /// before the failure. Truncated chunks and invalid chunk groups both
    /// abort the decode; no partial message is returned.
    pub fn decode(&self, buf: impl Into<Bytes>) -> std::result::Result<Message, DecodeError> {
        self.decode_bytes(&buf.into())
    }

    #[instrument(skip_all, fields(len = buf.len()))]
    fn decode_bytes(&self, buf: &Bytes) -> std::result::Result<Message, DecodeError> {
        let mut state = DecodeState::ReadingChunk;
        let mut consumed = 0;
        let mut group: Vec<Chunk> = Vec::new();
        let mut records = Vec::new();

        let fail = |consumed: usize, err: Error| {
            debug!(consumed, error = %err, "message decode failed");
            DecodeError::new(consumed, err)
        };

        loop {
            match state {
                DecodeState::ReadingChunk => {
                    let rest = buf.slice(consumed..);
                    let (chunk, len) = Chunk::decode(&rest).map_err(|err| fail(consumed, err))?;
                    consumed += len;
                    if chunk.flags.message_end() {
                        state = DecodeState::RecordBoundary;
                    }
                    group.push(chunk);
                }
                DecodeState::RecordBoundary => {
                    let chunks = std::mem::take(&mut group);
                    validate(&chunks).map_err(|err| fail(consumed, err))?;
                    let record = self
                        .assembler
                        .assemble(&chunks)
                        .map_err(|err| fail(consumed, err))?;
                    records.push(record);

                    state = if consumed < buf.len() {
                        DecodeState::ReadingChunk
                    } else {
                        DecodeState::Done
                    };
                }
                DecodeState::Done => break,
            }
        }

        debug!(records = records.len(), consumed, "decoded message");
        Ok(Message::new(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ChunkFlags;

    fn codec() -> MessageCodec {
        MessageCodec::new(Arc::new(PayloadRegistry::empty()))
    }

    fn uri_message() -> Message {
        Message::single(
            TypeNameFormat::WellKnownType,
            &b"U"[..],
            None,
            &b"\x04github.com/x"[..],
            &PayloadRegistry::empty(),
        )
    }

    #[test]
    fn test_message_roundtrip() {
        let original = uri_message();
        let encoded = original.encode().unwrap();
        assert_eq!(&encoded[..3], &[0xD1, 0x01, 0x0D]);

        let decoded = codec().decode(encoded).unwrap();
        assert_eq!(decoded.len(), 1);
        let record = &decoded.records()[0];
        assert_eq!(record.tnf(), TypeNameFormat::WellKnownType);
        assert_eq!(record.record_type().as_ref(), b"U");
        assert_eq!(record.raw_payload().as_ref(), b"\x04github.com/x");
    }

    #[test]
    fn test_reencode_is_idempotent() {
        let encoded = uri_message().encode().unwrap();
        let reencoded = codec().decode(encoded.clone()).unwrap().encode().unwrap();
        assert_eq!(encoded, reencoded);
    }

    #[test]
    fn test_encode_empty_message() {
        assert_eq!(Message::default().encode(), Err(Error::EmptyMessage));
    }

    #[test]
    fn test_decode_multiple_records() {
        let registry = PayloadRegistry::empty();
        let message = Message::new(vec![
            Record::new(TypeNameFormat::MediaType, &b"text/plain"[..], None, &b"one"[..], &registry),
            Record::new(
                TypeNameFormat::Unknown,
                Bytes::new(),
                Some(Bytes::from_static(b"id")),
                vec![7u8; 300],
                &registry,
            ),
        ]);
        let encoded = message.encode().unwrap();
        let decoded = codec().decode(encoded).unwrap();

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.records()[0].record_type().as_ref(), b"text/plain");
        assert_eq!(decoded.records()[1].id().map(|id| &id[..]), Some(&b"id"[..]));
        assert_eq!(decoded.records()[1].raw_payload().len(), 300);
    }

    #[test]
    fn test_decode_empty_buffer() {
        let err = codec().decode(Bytes::new()).unwrap_err();
        assert_eq!(err.consumed, 0);
        assert!(matches!(err.kind(), Error::TruncatedInput { .. }));
    }

    #[test]
    fn test_decode_truncated_reports_consumed() {
        let registry = PayloadRegistry::empty();
        let message = Message::new(vec![
            Record::new(TypeNameFormat::Unknown, Bytes::new(), None, &b"first"[..], &registry),
            Record::new(TypeNameFormat::Unknown, Bytes::new(), None, &b"second"[..], &registry),
        ]);
        let encoded = message.encode().unwrap();
        let first_len = 3 + 5;

        let err = codec()
            .decode(Bytes::copy_from_slice(&encoded[..encoded.len() - 2]))
            .unwrap_err();
        assert_eq!(err.consumed, first_len);
        assert!(matches!(err.kind(), Error::TruncatedInput { .. }));
    }

    #[test]
    fn test_decode_group_without_end() {
        // A lone MB+CF chunk with no continuation
        let chunk = Chunk {
            flags: ChunkFlags::new()
                .with(ChunkFlags::MESSAGE_BEGIN)
                .with(ChunkFlags::CHUNKED)
                .with(ChunkFlags::SHORT_RECORD),
            tnf: TypeNameFormat::Unknown,
            payload_length: 1,
            payload: Bytes::from_static(b"a"),
            ..Chunk::default()
        };
        let err = codec().decode(chunk.encode()).unwrap_err();
        assert_eq!(err.consumed, 4);
        assert!(matches!(err.kind(), Error::TruncatedInput { .. }));
    }

    #[test]
    fn test_decode_invalid_group() {
        // ME set but MB missing
        let chunk = Chunk {
            flags: ChunkFlags::new()
                .with(ChunkFlags::MESSAGE_END)
                .with(ChunkFlags::SHORT_RECORD),
            tnf: TypeNameFormat::Unknown,
            ..Chunk::default()
        };
        let err = codec().decode(chunk.encode()).unwrap_err();
        assert_eq!(err, DecodeError::new(3, Error::MissingMessageBegin));
    }

    #[test]
    fn test_display_joins_records() {
        let registry = PayloadRegistry::empty();
        let message = Message::new(vec![
            Record::new(TypeNameFormat::Unknown, Bytes::new(), None, &b"a"[..], &registry),
            Record::new(TypeNameFormat::Unknown, Bytes::new(), None, &b"b"[..], &registry),
        ]);
        assert_eq!(
            message.to_string(),
            "<Non standard type: contents not printable>\n<Non standard type: contents not printable>"
        );
    }

    #[test]
    fn test_codec_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MessageCodec>();
        assert_send_sync::<Message>();
    }
}
