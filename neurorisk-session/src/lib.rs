//! Capture Sessions for NeuroRisk
//!
//! ## Overview
//!
//! Wraps the synchronous [`neurorisk_core::ImpactPipeline`] in an async
//! runtime: samples come in from a transport, results go out to any number
//! of presentation subscribers, impacts are persisted as they happen and a
//! background task keeps the decaying risk score current.
//!
//! ```text
//! SampleSource ──→ Session::run ──→ pipeline ──→ broadcast ──→ UI, alerts
//!                                       ↑
//!                       ticker (5 s) ───┘──→ SnapshotStore on impact
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use neurorisk_core::SystemTime;
//! use neurorisk_session::{ChannelSource, Session, SessionConfig};
//! use neurorisk_store::JsonFileStore;
//!
//! # async fn demo() -> Result<(), neurorisk_session::SessionError> {
//! let session = Session::new(
//!     SessionConfig::default(),
//!     JsonFileStore::new("state.json"),
//!     Arc::new(SystemTime),
//! )?;
//! session.load()?;
//! session.connect()?;
//! session.start_ticker()?;
//!
//! let (frames, mut source) = ChannelSource::channel(64);
//! // hand `frames` to the BLE notification handler
//! # drop(frames);
//! session.run(&mut source).await?;
//! session.stop_ticker()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod frame;
pub mod session;
pub mod source;

// Re-export common types
pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use frame::{decode_frame, FrameError};
pub use session::{RunStats, Session, SessionOutput};
pub use source::{ChannelSource, ReplaySource, SampleSource};
