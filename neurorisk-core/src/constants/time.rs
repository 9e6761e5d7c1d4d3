//! Time-Related Constants
//!
//! Durations and guards used by the per-sample state machines. All
//! timestamps in the crate are milliseconds.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Milliseconds per day.
pub const MS_PER_DAY: u64 = 86_400_000;

// ===== SAMPLING =====

/// Nominal interval between samples (milliseconds).
///
/// Angular acceleration is a backward difference over this fixed interval
/// regardless of actual arrival jitter.
pub const DEFAULT_SAMPLE_INTERVAL_MS: f32 = 10.0;

// ===== IMPACT GUARDS =====

/// Refractory period after a detected impact (milliseconds).
pub const DEFAULT_IMPACT_DEAD_TIME_MS: u64 = 770;

// ===== AUTO-ZERO GUARDS =====

/// How long stillness must hold before a recompute (milliseconds).
pub const DEFAULT_STILL_HOLD_MS: u64 = 1000;

/// Minimum spacing between two offset recomputes (milliseconds).
pub const DEFAULT_AUTO_ZERO_COOLDOWN_MS: u64 = 10_000;

/// Grace period after (re)connection before auto-zero may act (milliseconds).
pub const DEFAULT_MIN_UPTIME_MS: u64 = 3000;

/// Auto-zero is suppressed this long after an impact (milliseconds).
pub const DEFAULT_IMPACT_SUPPRESSION_MS: u64 = 2000;

// ===== CONNECTION =====

/// Settling delay after connect before detection starts and the first
/// instant zero is taken (milliseconds).
pub const DEFAULT_SETTLING_DELAY_MS: u64 = 1500;

// ===== RISK =====

/// Interval of the periodic risk recompute (milliseconds).
pub const DEFAULT_RISK_TICK_MS: u64 = 5000;
