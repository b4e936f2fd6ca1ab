//! # SecureFabric Envelope Benchmarks
//!
//! Primitive-level AEAD and signature benches live in `sf-crypto`.
//!
//! | Area | Operation |
//! |------|-----------|
//! | Message id | BLAKE3 over pk ‖ seq ‖ nonce |
//! | Builder | full envelope build, plaintext and encrypted |
//! | Verifier | full verification, single and batch |
//! | Replay | window check-and-mark |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::RngCore;
use sf_crypto::{Ed25519KeyPair, SymmetricKey};
use sf_envelope::{
    CounterNonceSource, EnvelopeBuildApi, EnvelopeConfig, EnvelopeDraft, EnvelopeReceiver,
    EnvelopeSender, EnvelopeVerifyApi, InMemoryKeyring,
};
use sf_replay::ReplayWindow;
use sf_types::{AadExtra, Envelope};
use std::sync::Arc;
use std::time::Duration;

const PAYLOAD_SIZES: [usize; 4] = [64, 1024, 16 * 1024, 256 * 1024];

fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut buf);
    buf
}

fn keyring() -> Arc<InMemoryKeyring> {
    let keys = InMemoryKeyring::new();
    keys.insert(1, SymmetricKey::from_bytes([7u8; 32]))
        .expect("valid key version");
    Arc::new(keys)
}

type BenchSender = EnvelopeSender<CounterNonceSource, Arc<InMemoryKeyring>>;

fn sender(keys: Arc<InMemoryKeyring>) -> BenchSender {
    EnvelopeSender::new(
        Ed25519KeyPair::from_seed([9u8; 32]),
        CounterNonceSource::new(),
        keys,
        &EnvelopeConfig::default(),
    )
}

fn build_many(
    count: usize,
    payload: &[u8],
    key_version: u32,
) -> (Vec<Envelope>, Arc<InMemoryKeyring>) {
    let keys = keyring();
    let sender = sender(Arc::clone(&keys));
    let extra = AadExtra::default();
    let draft =
        EnvelopeDraft::plaintext("bench.topic", payload, &extra).with_key_version(key_version);
    let envelopes = (0..count)
        .map(|_| sender.build_envelope(&draft).expect("bench build"))
        .collect();
    (envelopes, keys)
}

// ============================================================================
// Message id
// ============================================================================

fn bench_message_id(c: &mut Criterion) {
    let public_key = [4u8; 32];
    let nonce = [5u8; 24];
    let mut seq = 0u64;

    c.bench_function("blake3-message-id", |b| {
        b.iter(|| {
            seq = seq.wrapping_add(1);
            black_box(sf_crypto::message_id(&public_key, seq, &nonce))
        })
    });
}

// ============================================================================
// Envelope pipeline
// ============================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope-build");
    let keys = keyring();
    let sender = sender(keys);
    let extra = AadExtra::default();

    for size in PAYLOAD_SIZES {
        let payload = random_bytes(size);
        group.throughput(Throughput::Bytes(size as u64));
        for key_version in [0u32, 1] {
            let draft = EnvelopeDraft::plaintext("bench.topic", &payload, &extra)
                .with_key_version(key_version);
            let name = if key_version == 0 { "plaintext" } else { "encrypted" };
            group.bench_with_input(BenchmarkId::new(name, size), &draft, |b, draft| {
                b.iter(|| black_box(sender.build_envelope(draft)))
            });
        }
    }

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope-verify");
    group.measurement_time(Duration::from_secs(10));
    let payload = random_bytes(1024);

    for key_version in [0u32, 1] {
        let (envelopes, keys) = build_many(1, &payload, key_version);
        let envelope = &envelopes[0];
        // Fresh receiver per iteration; a shared one would reject the replay.
        let name = if key_version == 0 { "plaintext_1k" } else { "encrypted_1k" };
        group.bench_function(name, |b| {
            b.iter_batched(
                || {
                    EnvelopeReceiver::with_default_store(
                        Arc::clone(&keys),
                        EnvelopeConfig::default(),
                    )
                    .expect("valid config")
                },
                |receiver| black_box(receiver.verify_envelope(envelope).is_ok()),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    for size in [10usize, 100, 1000] {
        let (envelopes, keys) = build_many(size, &payload, 1);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("batch", size), &envelopes, |b, batch| {
            b.iter_batched(
                || {
                    EnvelopeReceiver::with_default_store(
                        Arc::clone(&keys),
                        EnvelopeConfig::default().with_replay_window_width(2048),
                    )
                    .expect("valid config")
                },
                |receiver| black_box(receiver.verify_batch(batch).len()),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_replay_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay-window");

    for width in [64u32, 1024, 65_536] {
        group.bench_with_input(BenchmarkId::new("in_order", width), &width, |b, &width| {
            let mut window = ReplayWindow::new(width).expect("valid width");
            let mut seq = 0u64;
            b.iter(|| {
                seq += 1;
                black_box(window.check_and_mark(seq))
            })
        });
    }

    group.bench_function("duplicate", |b| {
        let mut window = ReplayWindow::new(64).expect("valid width");
        window.check_and_mark(10);
        b.iter(|| black_box(window.check_and_mark(10)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_message_id,
    bench_build,
    bench_verify,
    bench_replay_window
);
criterion_main!(benches);
