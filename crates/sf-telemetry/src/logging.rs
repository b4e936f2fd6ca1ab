//! Structured logging helpers.
//!
//! Envelope events carry a fixed set of fields so log pipelines can index
//! them uniformly:
//! - `component`: emitting component (builder, verifier, publisher, ...)
//! - `sender`: sender key fingerprint (never the key itself)
//! - `seq`: sequence number
//! - additional context fields

/// Log an envelope-related event with standard fields.
///
/// `$sender` must implement `Display`; pass a fingerprint, not raw key bytes.
///
/// ```rust,ignore
/// log_envelope_event!(warn, "verifier", "Envelope rejected", fp, seq, reason = "tamper");
/// ```
#[macro_export]
macro_rules! log_envelope_event {
    ($level:ident, $component:expr, $msg:expr, $sender:expr, $seq:expr $(, $($field:tt)*)?) => {
        ::tracing::$level!(
            component = $component,
            sender = %$sender,
            seq = $seq,
            $($($field)*,)?
            $msg
        )
    };
}
