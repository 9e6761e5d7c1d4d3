//! Fixed-Capacity Sliding Window for Three-Axis Samples
//!
//! ## Overview
//!
//! Smoothing and stillness detection both need "the last W samples" for a
//! window length chosen at runtime. This module provides a ring buffer whose
//! storage is sized at compile time (`CAP`) while the active length (`limit`)
//! comes from configuration. Construction refuses any limit outside
//! `1..=CAP`, so the hot path never allocates.
//!
//! ```text
//! SampleWindow<8> with limit = 5:
//! ┌─────┬─────┬─────┬─────┬─────┬─────┬─────┬─────┐
//! │  D  │  E  │  A  │  B  │  C  │  -  │  -  │  -  │
//! └─────┴─────┴─────┴─────┴─────┴─────┴─────┴─────┘
//!                ↑                 ↑
//!            write_pos        slots beyond limit are never touched
//!
//! Logical view (oldest → newest): A B C D E
//! ```
//!
//! Pushing into a full window evicts the oldest sample (FIFO).
//!
//! ## Statistics
//!
//! `mean()` is computed relative to the oldest sample:
//! `mean = v0 + Σ(vi - v0) / n`. A window of identical values therefore
//! yields exactly that value, with no accumulated rounding, and the
//! shifted sum keeps precision when values sit on a large offset such as
//! gravity. `sample_std_dev()` uses the n−1 estimator and is 0 for fewer
//! than two samples.

use crate::errors::ConfigError;
use crate::types::Vec3;

/// Ring buffer of the most recent `limit` samples
#[derive(Clone, Debug)]
pub struct SampleWindow<const CAP: usize> {
    data: [Vec3; CAP],
    write_pos: usize,
    len: usize,
    limit: usize,
}

impl<const CAP: usize> SampleWindow<CAP> {
    /// Creates an empty window holding at most `limit` samples
    pub fn with_limit(limit: usize) -> Result<Self, ConfigError> {
        if limit == 0 || limit > CAP {
            return Err(ConfigError::WindowOutOfRange {
                name: "sample",
                len: limit,
                min: 1,
                max: CAP,
            });
        }
        Ok(Self {
            data: [Vec3::ZERO; CAP],
            write_pos: 0,
            len: 0,
            limit,
        })
    }

    /// Adds a sample, overwriting the oldest once the window is full
    pub fn push(&mut self, value: Vec3) {
        self.data[self.write_pos] = value;
        self.write_pos = (self.write_pos + 1) % self.limit;

        if self.len < self.limit {
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once `limit` samples have been pushed
    pub fn is_full(&self) -> bool {
        self.len == self.limit
    }

    /// Configured window length
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Most recent sample
    pub fn last(&self) -> Option<&Vec3> {
        if self.is_empty() {
            return None;
        }
        let idx = if self.write_pos == 0 { self.limit - 1 } else { self.write_pos - 1 };
        Some(&self.data[idx])
    }

    /// Iterates from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Vec3> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }

    /// Per-axis arithmetic mean; `None` when empty
    pub fn mean(&self) -> Option<Vec3> {
        let first = *self.get(0)?;
        let n = self.len as f32;
        let shifted = self.iter().fold(Vec3::ZERO, |acc, v| acc + (*v - first));
        Some(first + shifted * (1.0 / n))
    }

    /// Per-axis sample standard deviation (n−1 denominator)
    pub fn sample_std_dev(&self) -> Vec3 {
        if self.len < 2 {
            return Vec3::ZERO;
        }
        let mean = match self.mean() {
            Some(m) => m,
            None => return Vec3::ZERO,
        };
        let sq = self.iter().fold(Vec3::ZERO, |acc, v| {
            let d = *v - mean;
            acc + Vec3::new(d.x * d.x, d.y * d.y, d.z * d.z)
        });
        let denom = (self.len - 1) as f32;
        Vec3::new(
            libm::sqrtf(sq.x / denom),
            libm::sqrtf(sq.y / denom),
            libm::sqrtf(sq.z / denom),
        )
    }

    /// Logical index 0 = oldest
    fn get(&self, index: usize) -> Option<&Vec3> {
        if index >= self.len {
            return None;
        }
        let actual = if self.len < self.limit {
            index
        } else {
            (self.write_pos + index) % self.limit
        };
        self.data.get(actual)
    }
}
