//! Payload codec contract and registry
//!
//! The core never interprets payload bytes itself. Record assembly hands the
//! reassembled bytes to a [`PayloadCodec`] picked from a [`PayloadRegistry`]
//! by `(TNF, type)`; anything unregistered lands in [`GenericPayload`].

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;

use super::TypeNameFormat;

/// Type-specific payload interpreter
pub trait PayloadCodec: fmt::Debug + Send + Sync {
    /// Serialized payload bytes
    fn marshal(&self) -> Bytes;

    /// Replace the contents by parsing `buf`
    fn unmarshal(&mut self, buf: Bytes);

    /// Human-readable rendering of the payload
    fn display_string(&self) -> String;

    /// Uniform resource name of the payload type
    fn urn(&self) -> String;

    /// Length of the serialized payload
    fn len(&self) -> usize {
        self.marshal().len()
    }

    /// Whether the serialized payload is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether [`display_string`](Self::display_string) renders the contents
    fn is_printable(&self) -> bool {
        true
    }
}

/// Builds an empty codec instance for a registered type
pub type PayloadFactory = fn() -> Box<dyn PayloadCodec>;

/// Opaque payload for unregistered types; stores the raw bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericPayload {
    payload: Bytes,
}

impl GenericPayload {
    /// URN reported by generic payloads
    pub const URN: &'static str = "urn:nfc:ext:go-ndef:generic";

    /// Wrap raw payload bytes
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Raw bytes
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.payload
    }
}

impl PayloadCodec for GenericPayload {
    fn marshal(&self) -> Bytes {
        self.payload.clone()
    }

    fn unmarshal(&mut self, buf: Bytes) {
        self.payload = buf;
    }

    fn display_string(&self) -> String {
        "<Non standard type: contents not printable>".to_owned()
    }

    fn urn(&self) -> String {
        Self::URN.to_owned()
    }

    fn len(&self) -> usize {
        self.payload.len()
    }

    fn is_printable(&self) -> bool {
        false
    }
}

fn generic_factory() -> Box<dyn PayloadCodec> {
    Box::<GenericPayload>::default()
}

/// Immutable `(TNF, type) -> codec` map
///
/// Built once, then shared read-only; lookups never mutate it.
#[derive(Clone)]
pub struct PayloadRegistry {
    codecs: HashMap<(TypeNameFormat, String), PayloadFactory>,
    fallback: PayloadFactory,
}

impl PayloadRegistry {
    /// Start building a registry
    #[must_use]
    pub fn builder() -> PayloadRegistryBuilder {
        PayloadRegistryBuilder::default()
    }

    /// Registry with no entries: every payload decodes as [`GenericPayload`]
    #[must_use]
    pub fn empty() -> Self {
        Self::builder().build()
    }

    /// Whether a codec is registered for the key
    #[must_use]
    pub fn contains(&self, tnf: TypeNameFormat, record_type: &[u8]) -> bool {
        self.codecs.contains_key(&Self::key(tnf, record_type))
    }

    /// Number of registered codecs (fallback excluded)
    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// Whether only the fallback is available
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Build a codec for the key and feed it `payload`
    #[must_use]
    pub fn decode(
        &self,
        tnf: TypeNameFormat,
        record_type: &[u8],
        payload: Bytes,
    ) -> Box<dyn PayloadCodec> {
        let factory = self
            .codecs
            .get(&Self::key(tnf, record_type))
            .copied()
            .unwrap_or(self.fallback);
        let mut codec = factory();
        codec.unmarshal(payload);
        codec
    }

    fn key(tnf: TypeNameFormat, record_type: &[u8]) -> (TypeNameFormat, String) {
        (tnf, String::from_utf8_lossy(record_type).into_owned())
    }
}

impl Default for PayloadRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for PayloadRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.codecs.keys().collect();
        keys.sort_by(|a, b| (a.0.as_u8(), &a.1).cmp(&(b.0.as_u8(), &b.1)));
        f.debug_struct("PayloadRegistry")
            .field("codecs", &keys)
            .finish_non_exhaustive()
    }
}

/// Builder for [`PayloadRegistry`]
#[derive(Default)]
pub struct PayloadRegistryBuilder {
    codecs: HashMap<(TypeNameFormat, String), PayloadFactory>,
    fallback: Option<PayloadFactory>,
}

impl PayloadRegistryBuilder {
    /// Register a codec; a later registration for the same key replaces it
    #[must_use]
    pub fn register(
        mut self,
        tnf: TypeNameFormat,
        record_type: impl Into<String>,
        factory: PayloadFactory,
    ) -> Self {
        self.codecs.insert((tnf, record_type.into()), factory);
        self
    }

    /// Override the codec used for unregistered keys
    #[must_use]
    pub fn fallback(mut self, factory: PayloadFactory) -> Self {
        self.fallback = Some(factory);
        self
    }

    /// Freeze the registry
    #[must_use]
    pub fn build(self) -> PayloadRegistry {
        PayloadRegistry {
            codecs: self.codecs,
            fallback: self.fallback.unwrap_or(generic_factory),
        }
    }
}
