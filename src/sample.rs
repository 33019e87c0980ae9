use std::sync::Arc;
use std::time::Duration;

use crate::Error;
use crate::format::{AudioSampleFormat, Dimensions, VideoSampleFormat};
use crate::pool::Pooled;

/// An audio sample shared between the output queue and its consumers.
pub type SharedAudioSample = Arc<Pooled<AudioSample>>;

/// A video sample shared between the output queue and its consumers.
pub type SharedVideoSample = Arc<Pooled<VideoSample>>;

/// A block of interleaved PCM frames.
#[derive(Debug, Default)]
pub struct AudioSample {
    buffer: Vec<u8>,
    frames: u32,
    channels: u32,
    format: AudioSampleFormat,
    sample_rate: u32,
    time: Duration,
    duration: Duration,
}

impl AudioSample {
    /// Copies `size` bytes of `data` into the sample and stamps it.
    ///
    /// Fails if `data` is shorter than `size`.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        &mut self,
        data: &[u8],
        size: usize,
        frames: u32,
        channels: u32,
        format: AudioSampleFormat,
        sample_rate: u32,
        time: Duration,
        duration: Duration,
    ) -> Result<(), Error> {
        let source = data.get(..size).ok_or(Error::BufferTooSmall {
            needed: size,
            available: data.len(),
        })?;

        self.buffer.clear();
        self.buffer.extend_from_slice(source);
        self.frames = frames;
        self.channels = channels;
        self.format = format;
        self.sample_rate = sample_rate;
        self.time = time;
        self.duration = duration;

        Ok(())
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Byte length of the PCM data.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    pub fn format(&self) -> AudioSampleFormat {
        self.format
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Presentation time on the playback clock.
    pub fn time(&self) -> Duration {
        self.time
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// One decoded picture in a renderer-native pixel layout.
#[derive(Debug, Default)]
pub struct VideoSample {
    buffer: Vec<u8>,
    dim: Dimensions,
    output_dim: Dimensions,
    format: VideoSampleFormat,
    stride: u32,
    time: Duration,
    duration: Duration,
}

impl VideoSample {
    /// Sizes the pixel buffer for a frame of `dim` rows of `stride` bytes.
    ///
    /// The allocation from a previous frame is reused when large enough.
    pub fn initialize(
        &mut self,
        dim: Dimensions,
        output_dim: Dimensions,
        format: VideoSampleFormat,
        stride: u32,
        duration: Duration,
    ) -> Result<(), Error> {
        if dim.is_empty() || stride < dim.width {
            return Err(Error::Geometry {
                width: dim.width,
                height: dim.height,
                stride,
            });
        }

        let len = stride as usize * dim.height as usize;
        self.buffer.clear();
        self.buffer.resize(len, 0);
        self.dim = dim;
        self.output_dim = output_dim;
        self.format = format;
        self.stride = stride;
        self.time = Duration::ZERO;
        self.duration = duration;

        Ok(())
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn mutable_buffer(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Dimensions of the decoder buffer.
    pub fn dim(&self) -> Dimensions {
        self.dim
    }

    /// Dimensions the picture should be displayed at.
    pub fn output_dim(&self) -> Dimensions {
        self.output_dim
    }

    pub fn format(&self) -> VideoSampleFormat {
        self.format
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn time(&self) -> Duration {
        self.time
    }

    pub fn set_time(&mut self, time: Duration) {
        self.time = time;
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}
