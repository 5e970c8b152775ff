//! Chunk group validation
//!
//! Rules are checked in a fixed order and the first failing rule is
//! reported, even when a later rule is also violated.

use super::{Chunk, Error, Result, TypeNameFormat};

/// Check that `chunks` forms one legal record group
///
/// # Errors
///
/// Returns the error for the first violated rule, in order:
/// [`Error::NoChunks`], [`Error::MissingMessageBegin`],
/// [`Error::SingleChunkCannotBeChunked`], [`Error::MissingMessageEnd`],
/// [`Error::LastCannotBeChunked`], [`Error::MissingChunkFlag`],
/// [`Error::UnexpectedIDFlag`], [`Error::UnexpectedTypeLength`],
/// [`Error::UnexpectedTNF`].
pub fn validate(chunks: &[Chunk]) -> Result<()> {
    let (Some(first), Some(last)) = (chunks.first(), chunks.last()) else {
        return Err(Error::NoChunks);
    };

    if !first.flags.message_begin() {
        return Err(Error::MissingMessageBegin);
    }
    if chunks.len() == 1 && first.flags.chunked() {
        return Err(Error::SingleChunkCannotBeChunked);
    }
    if !last.flags.message_end() {
        return Err(Error::MissingMessageEnd);
    }
    if first.flags.chunked() && last.flags.chunked() {
        return Err(Error::LastCannotBeChunked);
    }

    if chunks.len() == 1 {
        return Ok(());
    }

    let (init, _) = chunks.split_at(chunks.len() - 1);
    if init.iter().any(|c| !c.flags.chunked()) {
        return Err(Error::MissingChunkFlag);
    }

    let rest = &chunks[1..];
    if rest.iter().any(|c| c.flags.id_length_present()) {
        return Err(Error::UnexpectedIDFlag);
    }
    if rest.iter().any(|c| c.type_length > 0) {
        return Err(Error::UnexpectedTypeLength);
    }
    if rest.iter().any(|c| c.tnf != TypeNameFormat::Unchanged) {
        return Err(Error::UnexpectedTNF);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ChunkFlags;
    use bytes::Bytes;

    fn chunk(flags: &[u8]) -> Chunk {
        Chunk {
            flags: flags
                .iter()
                .fold(ChunkFlags::new(), |acc, flag| acc.with(*flag)),
            ..Chunk::default()
        }
    }

    fn unchanged(flags: &[u8]) -> Chunk {
        Chunk {
            tnf: TypeNameFormat::Unchanged,
            ..chunk(flags)
        }
    }

    const MB: u8 = ChunkFlags::MESSAGE_BEGIN;
    const ME: u8 = ChunkFlags::MESSAGE_END;
    const CF: u8 = ChunkFlags::CHUNKED;
    const IL: u8 = ChunkFlags::ID_LENGTH_PRESENT;

    #[test]
    fn test_bad_sequences_in_rule_order() {
        let cases: Vec<(Vec<Chunk>, Error)> = vec![
            (vec![], Error::NoChunks),
            (vec![chunk(&[ME, CF])], Error::MissingMessageBegin),
            (vec![chunk(&[MB, ME, CF])], Error::SingleChunkCannotBeChunked),
            (vec![chunk(&[MB])], Error::MissingMessageEnd),
            (
                vec![chunk(&[MB, CF]), chunk(&[ME, CF])],
                Error::LastCannotBeChunked,
            ),
            (
                vec![chunk(&[MB]), chunk(&[ME])],
                Error::MissingChunkFlag,
            ),
            (
                vec![chunk(&[MB, CF, IL]), chunk(&[ME, IL])],
                Error::UnexpectedIDFlag,
            ),
            (
                vec![
                    Chunk {
                        type_length: 1,
                        record_type: Bytes::from_static(b"U"),
                        ..chunk(&[MB, CF])
                    },
                    Chunk {
                        type_length: 1,
                        record_type: Bytes::from_static(b"U"),
                        ..chunk(&[ME])
                    },
                ],
                Error::UnexpectedTypeLength,
            ),
            (
                vec![
                    Chunk {
                        tnf: TypeNameFormat::Empty,
                        type_length: 1,
                        record_type: Bytes::from_static(b"U"),
                        ..chunk(&[MB, CF])
                    },
                    Chunk {
                        tnf: TypeNameFormat::Unknown,
                        ..chunk(&[ME])
                    },
                ],
                Error::UnexpectedTNF,
            ),
        ];

        for (chunks, expected) in cases {
            assert_eq!(validate(&chunks), Err(expected));
        }
    }

    #[test]
    fn test_earlier_rule_wins() {
        // Violates MissingChunkFlag, UnexpectedIDFlag and UnexpectedTNF
        let chunks = vec![chunk(&[MB]), chunk(&[IL]), chunk(&[ME])];
        assert_eq!(validate(&chunks), Err(Error::MissingChunkFlag));

        // IL before type length before TNF
        let chunks = vec![
            chunk(&[MB, CF]),
            Chunk {
                type_length: 1,
                ..chunk(&[CF])
            },
            chunk(&[ME, IL]),
        ];
        assert_eq!(validate(&chunks), Err(Error::UnexpectedIDFlag));
    }

    #[test]
    fn test_offender_anywhere_in_group() {
        let chunks = vec![
            chunk(&[MB, CF]),
            unchanged(&[CF]),
            unchanged(&[CF]),
            Chunk {
                tnf: TypeNameFormat::MediaType,
                ..chunk(&[ME])
            },
        ];
        assert_eq!(validate(&chunks), Err(Error::UnexpectedTNF));
    }

    #[test]
    fn test_single_chunk_ok() {
        assert_eq!(validate(&[chunk(&[MB, ME])]), Ok(()));
    }

    #[test]
    fn test_single_chunk_keeps_its_own_tnf_and_id() {
        let single = Chunk {
            tnf: TypeNameFormat::MediaType,
            type_length: 4,
            ..chunk(&[MB, ME, IL])
        };
        assert_eq!(validate(&[single]), Ok(()));
    }

    #[test]
    fn test_three_chunk_group_ok() {
        let chunks = vec![
            Chunk {
                tnf: TypeNameFormat::WellKnownType,
                type_length: 1,
                record_type: Bytes::from_static(b"U"),
                ..chunk(&[MB, CF])
            },
            unchanged(&[CF]),
            unchanged(&[ME]),
        ];
        assert_eq!(validate(&chunks), Ok(()));
    }
}
