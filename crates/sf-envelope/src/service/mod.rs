//! # Service Layer
//!
//! Wires the domain logic to the ports:
//! - [`EnvelopeSender`] implements `EnvelopeBuildApi`
//! - [`EnvelopeReceiver`] implements `EnvelopeVerifyApi`
//! - [`Publisher`] / [`Subscriber`] join them to a `FabricNode`

pub mod client;
pub mod receiver;
pub mod sender;

pub use client::{PublishError, Publisher, Subscriber};
pub use receiver::EnvelopeReceiver;
pub use sender::EnvelopeSender;
