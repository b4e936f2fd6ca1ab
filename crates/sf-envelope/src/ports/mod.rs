//! # Ports Layer
//!
//! Inbound (driving) API traits and outbound (driven) collaborator traits.

pub mod inbound;
pub mod outbound;
