use std::sync::Arc;

use bytes::Bytes;
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use ndef::protocol::{Chunk, ChunkFlags};
use ndef::{Message, MessageCodec, PayloadRegistry, TypeNameFormat};

fn message(len: usize) -> Message {
    Message::single(
        TypeNameFormat::MediaType,
        &b"application/octet-stream"[..],
        None,
        vec![0u8; len],
        &PayloadRegistry::empty(),
    )
}

fn codec() -> MessageCodec {
    MessageCodec::new(Arc::new(PayloadRegistry::empty()))
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    for (name, len) in [("encode_64b", 64), ("encode_1kb", 1024), ("encode_64kb", 64 * 1024)] {
        let msg = message(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                black_box(msg.encode().unwrap());
            });
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let codec = codec();

    for (name, len) in [("decode_64b", 64), ("decode_1kb", 1024), ("decode_64kb", 64 * 1024)] {
        let encoded = Bytes::from(message(len).encode().unwrap());
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                black_box(codec.decode(encoded.clone()).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_chunked_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let codec = codec();

    // 64 KB record split into 256 chunks of 256 bytes
    let chunk_count = 256;
    let mut encoded = Vec::new();
    for i in 0..chunk_count {
        let mut flags = ChunkFlags::new();
        flags.set(ChunkFlags::MESSAGE_BEGIN, i == 0);
        flags.set(ChunkFlags::MESSAGE_END, i == chunk_count - 1);
        flags.set(ChunkFlags::CHUNKED, i != chunk_count - 1);
        let first = i == 0;
        Chunk {
            flags,
            tnf: if first {
                TypeNameFormat::Unknown
            } else {
                TypeNameFormat::Unchanged
            },
            payload_length: 256,
            payload: Bytes::from(vec![0u8; 256]),
            ..Chunk::default()
        }
        .encode_into(&mut encoded);
    }
    let encoded = Bytes::from(encoded);

    group.throughput(Throughput::Bytes(64 * 1024));
    group.bench_function("decode_chunked_64kb", |b| {
        b.iter(|| {
            black_box(codec.decode(encoded.clone()).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_chunked_decode);
criterion_main!(benches);
