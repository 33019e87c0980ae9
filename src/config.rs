/// Tuning knobs for a [`MediaCallbacks`](crate::MediaCallbacks) bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Maximum number of audio samples in flight before new blocks are dropped.
    pub audio_pool_limit: usize,
    /// Maximum number of video samples in flight before frames are discarded.
    pub video_pool_limit: usize,
    /// Re-map depth-encoded BGRA frames in place before queueing them.
    pub depth_transcode: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            audio_pool_limit: 256,
            video_pool_limit: 16,
            depth_transcode: false,
        }
    }
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the audio sample high-watermark.
    pub fn audio_pool_limit(mut self, limit: usize) -> Self {
        self.audio_pool_limit = limit;
        self
    }

    /// Set the video sample high-watermark.
    pub fn video_pool_limit(mut self, limit: usize) -> Self {
        self.video_pool_limit = limit;
        self
    }

    /// Enable or disable the depth re-mapping pass on BGRA frames.
    pub fn depth_transcode(mut self, enabled: bool) -> Self {
        self.depth_transcode = enabled;
        self
    }
}
