//! Transport frame decoding
//!
//! The sensor link delivers one JSON object per sample:
//!
//! ```text
//! {"accel":[x,y,z],"gyro":[x,y,z]}
//! ```
//!
//! Units are m/s² and rad/s. Extra fields are ignored. A frame with a
//! missing axis or a value that does not fit a finite `f32` is rejected
//! whole; nothing from it reaches the pipeline.

use neurorisk_core::{Sample, Vec3};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("frame contains a non-finite value")]
    NonFinite,
}

#[derive(Deserialize)]
struct RawFrame {
    accel: [f32; 3],
    gyro: [f32; 3],
}

/// Decodes one frame into a [`Sample`]
pub fn decode_frame(frame: &str) -> Result<Sample, FrameError> {
    let raw: RawFrame = serde_json::from_str(frame)?;
    let sample = Sample::new(Vec3::from(raw.accel), Vec3::from(raw.gyro));
    if !sample.is_finite() {
        return Err(FrameError::NonFinite);
    }
    Ok(sample)
}
