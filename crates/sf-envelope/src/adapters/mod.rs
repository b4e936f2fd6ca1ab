//! # Adapters
//!
//! In-memory implementations of the outbound ports.

pub mod entropy;
pub mod keyring;
pub mod node;

pub use entropy::{CounterNonceSource, OsNonceSource};
pub use keyring::{InMemoryKeyring, KeyringError};
pub use node::LoopbackNode;
pub use sf_replay::InMemoryReplayStore;
