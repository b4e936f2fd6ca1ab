//! # Exploit Simulations
//!
//! Each module plays an attacker who can observe, reorder, duplicate and
//! rewrite envelopes in transit but does not hold the sender's signing key.

pub mod downgrade;
pub mod tamper;
