//! # SF Types - Envelope Data Model
//!
//! Strongly typed envelope record shared by senders, receivers and transport
//! adapters.
//!
//! ## Modules
//!
//! - `primitives`: fixed-length byte newtypes and the message identifier
//! - `aad`: associated data and its canonical serialization
//! - `envelope`: wire-shaped and validated envelopes
//! - `errors`: structural errors
//!
//! Wrong-length fields are rejected when the value is constructed, never when
//! it is used.

#![warn(clippy::all)]

pub mod aad;
pub mod envelope;
pub mod errors;
pub mod primitives;

pub use aad::{AadExtra, AssociatedData};
pub use envelope::{Envelope, RawEnvelope};
pub use errors::EnvelopeError;
pub use primitives::{
    EnvelopeNonce, EnvelopeSignature, MessageId, SenderPublicKey, MESSAGE_ID_LEN,
};
