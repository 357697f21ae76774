/// Emits a `trace`-level event describing why an input was rejected.
///
/// Expands to nothing unless the `tracing` feature is enabled. Never pass
/// secret material (keys, nonces) to this macro.
macro_rules! trace_reject {
    ($($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)+);
    };
}
