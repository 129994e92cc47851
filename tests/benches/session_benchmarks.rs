//! # Peer-Link Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | pl-01 Identity | code generation, validation, identifier derivation |
//! | pl-02 Connection | in-process open + send on the signaling hub |

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pl_01_identity::{derive_identifier, generate_code_with, is_valid_code};
use pl_02_connection::{MemorySignalingHub, SignalingTransport, TransportEvent};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared_types::PeerIdentifier;
use tokio::sync::mpsc;

fn bench_identity(c: &mut Criterion) {
    let mut group = c.benchmark_group("pl-01-identity");
    let mut rng = StdRng::seed_from_u64(42);

    group.bench_function("generate_code", |b| {
        b.iter(|| black_box(generate_code_with(&mut rng)))
    });
    group.bench_function("is_valid_code_text", |b| {
        b.iter(|| black_box(is_valid_code(black_box("54321"))))
    });
    group.bench_function("is_valid_code_rejects", |b| {
        b.iter(|| black_box(is_valid_code(black_box("5432a"))))
    });
    let code = generate_code_with(&mut rng);
    group.bench_function("derive_identifier", |b| {
        b.iter(|| black_box(derive_identifier(Some(code))))
    });
    group.finish();
}

fn bench_memory_hub(c: &mut Criterion) {
    let mut group = c.benchmark_group("pl-02-memory-hub");
    let hub = MemorySignalingHub::new();

    let (a_tx, mut a_rx) = mpsc::unbounded_channel();
    let (b_tx, mut b_rx) = mpsc::unbounded_channel();
    let transport = hub.transport();
    transport
        .initialize(PeerIdentifier::new("p2p-link-12345"), a_tx)
        .expect("register a");
    transport
        .initialize(PeerIdentifier::new("p2p-link-67890"), b_tx)
        .expect("register b");
    let Ok(TransportEvent::Ready(a)) = a_rx.try_recv() else {
        panic!("a not ready");
    };
    let remote = PeerIdentifier::new("p2p-link-67890");

    group.bench_function("open_send_close", |b| {
        b.iter(|| {
            let channel = a.open_channel(&remote).expect("open");
            channel.send("benchmark payload").expect("send");
            channel.close();
            while a_rx.try_recv().is_ok() {}
            while b_rx.try_recv().is_ok() {}
        })
    });
    group.finish();
}

criterion_group!(benches, bench_identity, bench_memory_hub);
criterion_main!(benches);
