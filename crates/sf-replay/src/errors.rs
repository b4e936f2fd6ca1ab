use thiserror::Error;

/// Replay state configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReplayError {
    /// Window width outside `1..=max`.
    #[error("Invalid replay window width {width} (must be 1..={max})")]
    InvalidWidth { width: u32, max: u32 },
}
