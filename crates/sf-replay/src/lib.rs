//! # SF Replay - Anti-Replay State
//!
//! Per-sender sliding windows over sequence numbers and the store that maps
//! sender identities to them.
//!
//! ## Transition table
//!
//! | Condition | Verdict | Effect |
//! |-----------|---------|--------|
//! | `seq > highest` | `Accept` | slide forward, mark `seq` |
//! | in window, unseen | `Accept` | mark `seq` |
//! | in window, seen | `RejectDuplicate` | none |
//! | `seq <= highest - width` or `seq == 0` | `RejectTooOld` | none |

#![warn(clippy::all)]

pub mod errors;
pub mod store;
pub mod window;

pub use errors::ReplayError;
pub use store::{InMemoryReplayStore, ReplayStore, ReplayStoreStats, WindowHandle};
pub use window::{ReplayVerdict, ReplayWindow, DEFAULT_WINDOW_WIDTH, MAX_WINDOW_WIDTH};
