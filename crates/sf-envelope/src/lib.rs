//! # SecureFabric Envelopes
//!
//! Builds and verifies signed, optionally encrypted envelopes for the
//! SecureFabric pub/sub fabric.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): builder, verification stages, sequence counter, no I/O
//! - **Ports Layer** (`ports/`): inbound API traits, outbound collaborator traits
//! - **Adapters Layer** (`adapters/`): in-memory keyring, nonce sources, loopback node
//! - **Service Layer** (`service/`): wires domain logic to ports
//!
//! ## Envelope lifecycle
//!
//! ```text
//! EnvelopeDraft ──► EnvelopeSender ──► Envelope ──► FabricNode
//!                   (nonce, seq,                       │
//!                    encrypt, sign)                    ▼
//! Accepted ◄── EnvelopeReceiver ◄──────────────── RawEnvelope
//!              (structure, signature, binding,
//!               replay, decrypt, id)
//! ```
//!
//! ## Security Notes
//!
//! - The signature covers `associated_data ‖ payload` as transmitted, so
//!   relays can authenticate envelopes without the symmetric key
//! - Replay state is consulted only after the signature verifies and is
//!   written only after the whole envelope verifies
//! - Rejections never carry key material or plaintext

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{
    CounterNonceSource, InMemoryKeyring, InMemoryReplayStore, KeyringError, LoopbackNode,
    OsNonceSource,
};
pub use domain::builder::EnvelopeBuilder;
pub use domain::config::{EnvelopeConfig, DEFAULT_MAX_PAYLOAD_BYTES};
pub use domain::entities::{Accepted, EnvelopeDraft, VerifyOutcome};
pub use domain::errors::{BuildError, ConfigError, RejectReason, Rejection};
pub use domain::sequence::SequenceCounter;
pub use ports::inbound::{EnvelopeBuildApi, EnvelopeVerifyApi};
pub use ports::outbound::{
    EntropyError, EnvelopeStream, FabricNode, KeyLookupError, NodeError, NodeStats, NonceSource,
    ReplayStore, SymmetricKeyProvider,
};
pub use service::{EnvelopeReceiver, EnvelopeSender, PublishError, Publisher, Subscriber};
