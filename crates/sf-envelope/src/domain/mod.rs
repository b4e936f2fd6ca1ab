//! # Domain Layer
//!
//! Pure envelope logic, no I/O.

pub mod builder;
pub mod config;
pub mod entities;
pub mod errors;
pub mod sequence;
pub mod verifier;
