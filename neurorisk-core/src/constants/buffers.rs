//! Buffer Capacities
//!
//! Windows are fixed-capacity rings sized at compile time; configuration
//! chooses a length up to these limits and is rejected beyond them.

/// Largest smoothing window (samples).
pub const MAX_SMOOTHING_WINDOW: usize = 64;

/// Largest stillness window (samples).
///
/// 2.56 s at 100 Hz.
pub const MAX_STILLNESS_WINDOW: usize = 256;

/// Upper bound on events produced by a single sample.
///
/// Impact, risk update, alert, plus one offsets update each from settling
/// and auto-zero.
pub const MAX_EVENTS_PER_SAMPLE: usize = 5;
