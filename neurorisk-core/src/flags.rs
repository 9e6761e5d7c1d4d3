//! Runtime control flags
//!
//! The capture UI flips these from its own thread while the sample path
//! reads them. Each sample takes one [`FlagSnapshot`] up front, so a flag
//! changing mid-sample is seen on the next one. Relaxed ordering is
//! enough: no other memory is published through these flags.

use core::sync::atomic::{AtomicBool, Ordering};

/// Switches shared between the pipeline and its controllers
#[derive(Debug)]
pub struct ControlFlags {
    paused: AtomicBool,
    detection_disabled: AtomicBool,
    auto_zero_enabled: AtomicBool,
}

/// Flags as read at the start of one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSnapshot {
    pub paused: bool,
    pub detection_disabled: bool,
    pub auto_zero_enabled: bool,
}

impl ControlFlags {
    pub fn new(auto_zero_enabled: bool) -> Self {
        Self {
            paused: AtomicBool::new(false),
            detection_disabled: AtomicBool::new(false),
            auto_zero_enabled: AtomicBool::new(auto_zero_enabled),
        }
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }

    pub fn set_detection_disabled(&self, disabled: bool) {
        self.detection_disabled.store(disabled, Ordering::Relaxed);
    }

    pub fn set_auto_zero_enabled(&self, enabled: bool) {
        self.auto_zero_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub fn is_detection_disabled(&self) -> bool {
        self.detection_disabled.load(Ordering::Relaxed)
    }

    pub fn is_auto_zero_enabled(&self) -> bool {
        self.auto_zero_enabled.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> FlagSnapshot {
        FlagSnapshot {
            paused: self.is_paused(),
            detection_disabled: self.is_detection_disabled(),
            auto_zero_enabled: self.is_auto_zero_enabled(),
        }
    }
}

impl Default for ControlFlags {
    fn default() -> Self {
        Self::new(true)
    }
}
