//! Time handling for the pipeline
//!
//! The core never reads a clock itself: every operation takes `now` from
//! the caller. That keeps the state machines deterministic under test and
//! lets embedded hosts feed a hardware timer. Callers that do want a clock
//! use a [`TimeSource`]:
//! - [`SystemTime`]: wall clock, milliseconds since the Unix epoch (std)
//! - [`ManualClock`]: settable clock shared across threads, for tests and replay

use core::sync::atomic::{AtomicU64, Ordering};

/// Timestamp in milliseconds
///
/// Impact times are wall-clock milliseconds since the Unix epoch so that
/// exposure decay spans restarts; everything else only looks at
/// differences.
pub type Timestamp = u64;

/// Source of time for the system
pub trait TimeSource: Send + Sync {
    /// Current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Clock that only moves when told to
///
/// Shared by reference between a session and the test driving it.
#[derive(Debug, Default)]
pub struct ManualClock {
    timestamp: AtomicU64,
}

impl ManualClock {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp: AtomicU64::new(timestamp) }
    }

    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.store(timestamp, Ordering::Relaxed);
    }

    pub fn advance(&self, ms: u64) {
        self.timestamp.fetch_add(ms, Ordering::Relaxed);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.timestamp.load(Ordering::Relaxed)
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

/// Elapsed days between two timestamps, zero if `later` precedes `earlier`
pub fn days_between(earlier: Timestamp, later: Timestamp) -> f64 {
    later.saturating_sub(earlier) as f64 / crate::constants::MS_PER_DAY as f64
}
