pub mod game;

// ============================================================================
// Profiling Macros
// ============================================================================

/// Log a message every 100 simulation ticks when the `perf_stats` feature is
/// enabled.
///
/// When the feature is disabled this expands to an empty block; even the
/// arguments are not evaluated.
///
/// # Example
/// ```ignore
/// tick_log!(tick, "tracked {} agents", query.iter().len());
/// ```
#[macro_export]
#[cfg(feature = "perf_stats")]
macro_rules! tick_log {
    ($tick:expr, $($arg:tt)*) => {
        if $tick.0 % 100 == 0 {
            bevy::prelude::info!($($arg)*);
        }
    };
}

#[macro_export]
#[cfg(not(feature = "perf_stats"))]
macro_rules! tick_log {
    ($tick:expr, $($arg:tt)*) => {};
}
