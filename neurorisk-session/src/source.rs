//! Sample sources
//!
//! A source yields decoded samples until the transport closes. Decoding
//! failures are yielded as errors rather than ending the stream, so one bad
//! frame costs one sample.

use async_trait::async_trait;
use neurorisk_core::Sample;
use tokio::sync::mpsc;

use crate::frame::{decode_frame, FrameError};

/// Async producer of samples
#[async_trait]
pub trait SampleSource: Send {
    /// `None` once the source is exhausted
    async fn next_sample(&mut self) -> Option<Result<Sample, FrameError>>;
}

/// Text frames arriving over a channel, e.g. from a BLE notification task
#[derive(Debug)]
pub struct ChannelSource {
    frames: mpsc::Receiver<String>,
}

impl ChannelSource {
    pub fn new(frames: mpsc::Receiver<String>) -> Self {
        Self { frames }
    }

    /// Creates a connected sender/source pair
    pub fn channel(capacity: usize) -> (mpsc::Sender<String>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl SampleSource for ChannelSource {
    async fn next_sample(&mut self) -> Option<Result<Sample, FrameError>> {
        let frame = self.frames.recv().await?;
        Some(decode_frame(&frame))
    }
}

/// Pre-decoded samples, for replays and tests
#[derive(Debug, Clone)]
pub struct ReplaySource {
    samples: std::vec::IntoIter<Sample>,
}

impl ReplaySource {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples: samples.into_iter() }
    }
}

#[async_trait]
impl SampleSource for ReplaySource {
    async fn next_sample(&mut self) -> Option<Result<Sample, FrameError>> {
        self.samples.next().map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_source_decodes_and_ends() {
        let (tx, mut source) = ChannelSource::channel(4);
        tx.send(r#"{"accel":[0,0,9.81],"gyro":[0,0,0]}"#.to_string())
            .await
            .expect("send");
        tx.send("garbage".to_string()).await.expect("send");
        drop(tx);

        assert!(matches!(source.next_sample().await, Some(Ok(_))));
        assert!(matches!(source.next_sample().await, Some(Err(FrameError::Malformed(_)))));
        assert!(source.next_sample().await.is_none());
    }

    #[tokio::test]
    async fn replay_source_yields_in_order() {
        let a = Sample::default();
        let mut b = Sample::default();
        b.accel.z = 1.0;
        let mut source = ReplaySource::new(vec![a, b]);

        assert_eq!(source.next_sample().await.map(|r| r.ok()), Some(Some(a)));
        assert_eq!(source.next_sample().await.map(|r| r.ok()), Some(Some(b)));
        assert!(source.next_sample().await.is_none());
    }
}
