//! # SecureFabric Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs     # Shared keys, senders and receivers
//! ├── conformance/    # Cross-implementation vectors (tests/vectors/)
//! ├── exploits/       # Attack simulations
//! │   ├── replay.rs   # Duplicate and stale delivery
//! │   ├── tamper.rs   # Bit flips in every field
//! │   ├── relay.rs    # Fields mixed across senders by a relay
//! │   └── downgrade.rs# Key-version downgrade
//! └── integration/    # Cross-crate flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p sf-tests
//!
//! # By category
//! cargo test -p sf-tests integration::
//! cargo test -p sf-tests conformance::
//! cargo test -p sf-tests exploits::
//!
//! # Benchmarks
//! cargo bench -p sf-tests
//! ```

#![allow(dead_code)]

pub mod conformance;
pub mod exploits;
