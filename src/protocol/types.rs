//! NDEF type name formats and chunk flags

use std::fmt;

/// Type Name Format: how a record's type field is interpreted (3 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TypeNameFormat {
    /// No type, ID or payload
    #[default]
    Empty = 0x00,
    /// NFC Forum well-known type (RTD)
    WellKnownType = 0x01,
    /// RFC 2046 media type
    MediaType = 0x02,
    /// RFC 3986 absolute URI
    AbsoluteURI = 0x03,
    /// NFC Forum external type
    ExternalType = 0x04,
    /// Unknown payload type
    Unknown = 0x05,
    /// Continuation chunk of a chunked record
    Unchanged = 0x06,
    /// Reserved for future use
    Reserved = 0x07,
}

impl TypeNameFormat {
    /// Bit mask of the TNF field within the flags byte
    pub const MASK: u8 = 0x07;

    /// Convert from the low 3 bits of a byte. Higher bits are ignored.
    #[must_use]
    pub const fn from_bits(value: u8) -> Self {
        match value & Self::MASK {
            0x00 => Self::Empty,
            0x01 => Self::WellKnownType,
            0x02 => Self::MediaType,
            0x03 => Self::AbsoluteURI,
            0x04 => Self::ExternalType,
            0x05 => Self::Unknown,
            0x06 => Self::Unchanged,
            _ => Self::Reserved,
        }
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for TypeNameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "Empty",
            Self::WellKnownType => "WellKnownType",
            Self::MediaType => "MediaType",
            Self::AbsoluteURI => "AbsoluteURI",
            Self::ExternalType => "ExternalType",
            Self::Unknown => "Unknown",
            Self::Unchanged => "Unchanged",
            Self::Reserved => "Reserved",
        };
        write!(f, "{name}")
    }
}

/// Flag bits of a chunk's first byte (TNF bits excluded)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkFlags(u8);

impl ChunkFlags {
    /// Valid flag bits mask
    pub const VALID_MASK: u8 = Self::MESSAGE_BEGIN
        | Self::MESSAGE_END
        | Self::CHUNKED
        | Self::SHORT_RECORD
        | Self::ID_LENGTH_PRESENT;
    /// First chunk of a record group (MB)
    pub const MESSAGE_BEGIN: u8 = 1 << 7;
    /// Last chunk of a record group (ME)
    pub const MESSAGE_END: u8 = 1 << 6;
    /// More chunks follow (CF)
    pub const CHUNKED: u8 = 1 << 5;
    /// 1-byte payload length field (SR)
    pub const SHORT_RECORD: u8 = 1 << 4;
    /// ID length field present (IL)
    pub const ID_LENGTH_PRESENT: u8 = 1 << 3;

    /// Create empty flags
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Create from the first byte of a chunk; TNF bits are dropped
    #[must_use]
    pub const fn from_bits(value: u8) -> Self {
        Self(value & Self::VALID_MASK)
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Set a flag
    #[must_use]
    pub const fn with(mut self, flag: u8) -> Self {
        debug_assert!(flag & !Self::VALID_MASK == 0, "invalid flag bit");
        self.0 |= flag;
        self
    }

    /// Set or clear a flag
    pub fn set(&mut self, flag: u8, on: bool) {
        debug_assert!(flag & !Self::VALID_MASK == 0, "invalid flag bit");
        if on {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }

    /// Check if flag is set
    #[must_use]
    pub const fn has(self, flag: u8) -> bool {
        (self.0 & flag) != 0
    }

    /// MB
    #[must_use]
    pub const fn message_begin(self) -> bool {
        self.has(Self::MESSAGE_BEGIN)
    }

    /// ME
    #[must_use]
    pub const fn message_end(self) -> bool {
        self.has(Self::MESSAGE_END)
    }

    /// CF
    #[must_use]
    pub const fn chunked(self) -> bool {
        self.has(Self::CHUNKED)
    }

    /// SR
    #[must_use]
    pub const fn short_record(self) -> bool {
        self.has(Self::SHORT_RECORD)
    }

    /// IL
    #[must_use]
    pub const fn id_length_present(self) -> bool {
        self.has(Self::ID_LENGTH_PRESENT)
    }
}

impl fmt::Display for ChunkFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.message_begin() {
            parts.push("MB");
        }
        if self.message_end() {
            parts.push("ME");
        }
        if self.chunked() {
            parts.push("CF");
        }
        if self.short_record() {
            parts.push("SR");
        }
        if self.id_length_present() {
            parts.push("IL");
        }
        if parts.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", parts.join(" | "))
        }
    }
}
