//! # Media Sample Bridge
//!
//! Adapts a native media decoder's audio/video callback interface into
//! timestamped sample queues a rendering pipeline can drain.
//!
//! ## Features
//!
//! - Audio and video format negotiation against a fixed set of
//!   renderer-native formats, renegotiating anything else
//! - Lock/unlock/display video hand-off that never leaves the decoder
//!   without a writable buffer
//! - Pooled, reference-counted audio and video samples
//! - Optional direct texture updates for BGRA frames, with a
//!   [gpui](https://gpui.rs) render target behind the `gpui` feature
//!
//! ## Example
//!
//! ```rust,no_run
//! use media_sample_bridge::{BridgeConfig, MediaCallbacks};
//! use std::time::Duration;
//!
//! let callbacks = MediaCallbacks::new(BridgeConfig::default().video_pool_limit(8));
//! // callbacks.initialize(session) once the decoder session is open
//!
//! let samples = callbacks.samples();
//! callbacks.set_current_time(Duration::from_millis(40));
//! while let Some(frame) = samples.fetch_video() {
//!     println!("{}x{} at {:?}", frame.dim().width, frame.dim().height, frame.time());
//! }
//! ```

mod callbacks;
mod clock;
mod config;
mod error;
mod format;
mod negotiate;
mod planes;
mod pool;
mod producer;
mod queue;
mod sample;
mod session;
mod target;
mod transcode;

#[cfg(feature = "gpui")]
mod gpui_target;

#[cfg(test)]
mod testing;

pub use callbacks::{
    AudioFormatHandler, AudioHandler, FrameHandle, MediaCallbacks, VideoFormatHandler,
    VideoHandler,
};
pub use clock::PlaybackClock;
pub use config::BridgeConfig;
pub use error::Error;
pub use format::{
    AudioFormatState, AudioSampleFormat, Dimensions, FourCc, MAX_AUDIO_CHANNELS,
    VideoFormatState, VideoSampleFormat,
};
pub use negotiate::{PlaneLayout, negotiate_audio, negotiate_video};
pub use planes::{MAX_PLANES, PlaneTable};
pub use pool::{PoolStats, Pooled, SamplePool};
pub use queue::MediaSamples;
pub use sample::{AudioSample, SharedAudioSample, SharedVideoSample, VideoSample};
pub use session::{DecoderSession, PRIMARY_VIDEO_TRACK};
pub use target::{RenderTarget, UpdateRegion};
pub use transcode::decode_depth_bgra;

#[cfg(feature = "gpui")]
pub use gpui_target::GpuiRenderTarget;
