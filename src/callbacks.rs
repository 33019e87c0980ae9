use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::clock::PlaybackClock;
use crate::config::BridgeConfig;
use crate::format::{AudioFormatState, FourCc, VideoFormatState};
use crate::negotiate::{PlaneLayout, negotiate_audio, negotiate_video};
use crate::planes::PlaneTable;
use crate::pool::{PoolStats, Pooled, SamplePool};
use crate::queue::MediaSamples;
use crate::sample::{AudioSample, VideoSample};
use crate::session::DecoderSession;
use crate::target::RenderTarget;

/// State shared between the lifecycle controller and the decoder callbacks.
pub(crate) struct BridgeState {
    pub(crate) config: BridgeConfig,
    pub(crate) clock: PlaybackClock,
    pub(crate) session: Mutex<Option<Arc<dyn DecoderSession>>>,
    pub(crate) samples: Arc<MediaSamples>,
    pub(crate) audio_pool: SamplePool<AudioSample>,
    pub(crate) video_pool: SamplePool<VideoSample>,
    pub(crate) audio_format: RwLock<AudioFormatState>,
    pub(crate) video_format: RwLock<VideoFormatState>,
    /// Playback time of the last frame handed to the decoder.
    pub(crate) last_lock: Mutex<Option<Duration>>,
    pub(crate) render_target: Mutex<Option<Arc<dyn RenderTarget>>>,
}

impl BridgeState {
    fn new(config: BridgeConfig) -> Self {
        Self {
            audio_pool: SamplePool::new(config.audio_pool_limit),
            video_pool: SamplePool::new(config.video_pool_limit),
            config,
            clock: PlaybackClock::new(),
            session: Mutex::new(None),
            samples: Arc::new(MediaSamples::new()),
            audio_format: RwLock::new(AudioFormatState::default()),
            video_format: RwLock::new(VideoFormatState::default()),
            last_lock: Mutex::new(None),
            render_target: Mutex::new(None),
        }
    }

    pub(crate) fn session(&self) -> Option<Arc<dyn DecoderSession>> {
        self.session.lock().clone()
    }
}

/// A picture on loan to the decoder between lock and display.
#[derive(Debug)]
pub struct FrameHandle(pub(crate) Pooled<VideoSample>);

/// Audio format callbacks, invoked once per format change.
#[derive(Debug, Clone)]
pub struct AudioFormatHandler {
    state: Weak<BridgeState>,
}

impl AudioFormatHandler {
    /// Accepts the proposed format, rewriting it to a supported one.
    ///
    /// Returns `false` only if the bridge is gone.
    pub fn setup(&self, format: &mut FourCc, rate: &mut u32, channels: &mut u32) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };

        log::trace!("audio setup (format = {format}, rate = {rate}, channels = {channels})");
        let accepted = negotiate_audio(format, rate, channels);
        *state.audio_format.write() = accepted;
        log::debug!("accepted audio format {accepted:?}");

        true
    }

    pub fn cleanup(&self) {
        log::trace!("audio cleanup");
    }
}

/// Audio playback callbacks.
#[derive(Debug, Clone)]
pub struct AudioHandler {
    state: Weak<BridgeState>,
}

impl AudioHandler {
    /// Queues `count` frames of PCM due at decoder timestamp `pts`.
    pub fn play(&self, samples: &[u8], count: u32, pts: i64) {
        if let Some(state) = self.state.upgrade() {
            state.audio_play(samples, count, pts);
        }
    }

    // pausing and resuming are driven by the consumer's clock
    pub fn pause(&self, pts: i64) {
        log::trace!("audio pause (pts = {pts})");
    }

    pub fn resume(&self, pts: i64) {
        log::trace!("audio resume (pts = {pts})");
    }

    pub fn flush(&self, pts: i64) {
        log::trace!("audio flush (pts = {pts})");
    }

    pub fn drain(&self) {
        log::trace!("audio drain");
    }
}

/// Video format callbacks, invoked once per format change.
#[derive(Debug, Clone)]
pub struct VideoFormatHandler {
    state: Weak<BridgeState>,
}

impl VideoFormatHandler {
    /// Chooses a renderer-native layout and fills in the decoder's plane
    /// layout. Returns `false` to reject the proposal.
    pub fn setup(
        &self,
        chroma: &mut FourCc,
        width: &mut u32,
        height: &mut u32,
        layout: &mut PlaneLayout,
    ) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let Some(session) = state.session() else {
            return false;
        };

        log::trace!("video setup (chroma = {chroma}, dim = {width}x{height})");
        match negotiate_video(session.as_ref(), chroma, width, height, layout) {
            Ok(accepted) => {
                log::debug!("accepted video format {accepted:?} as {chroma}");
                *state.video_format.write() = accepted;
                true
            }
            Err(err) => {
                log::debug!("rejecting video format {chroma}: {err}");
                *state.video_format.write() = VideoFormatState::default();
                false
            }
        }
    }

    pub fn cleanup(&self) {
        log::trace!("video cleanup");
    }
}

/// Per-frame video callbacks: lock, then unlock, then display.
#[derive(Debug, Clone)]
pub struct VideoHandler {
    state: Weak<BridgeState>,
}

impl VideoHandler {
    /// Hands the decoder a buffer to decode the next picture into.
    ///
    /// `planes` always ends up with a writable plane 0 while the bridge is
    /// alive. `None` means the picture will be discarded.
    pub fn lock(&self, planes: &mut PlaneTable) -> Option<FrameHandle> {
        let Some(state) = self.state.upgrade() else {
            planes.clear();
            log::warn!("video lock without a bridge");
            return None;
        };
        state.video_lock(planes)
    }

    /// Releases the scratch buffer of a discarded picture.
    pub fn unlock(&self, frame: Option<&FrameHandle>, planes: &mut PlaneTable) {
        if frame.is_some() {
            log::trace!("video unlock");
        } else if planes.release_scratch() {
            log::trace!("video unlock released scratch buffer");
        }
    }

    /// Publishes a decoded picture.
    pub fn display(&self, frame: Option<FrameHandle>) {
        let Some(frame) = frame else {
            return;
        };
        if let Some(state) = self.state.upgrade() {
            state.video_display(frame);
        }
    }
}

/// Connects a decoder session to the sample queues.
///
/// The consumer owns this, advances the playback clock each tick and drains
/// [`samples`](Self::samples). The decoder only ever sees the handlers
/// registered by [`initialize`](Self::initialize).
pub struct MediaCallbacks {
    state: Arc<BridgeState>,
}

impl fmt::Debug for MediaCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaCallbacks")
            .field("config", &self.state.config)
            .field("initialized", &self.is_initialized())
            .field("current_time", &self.current_time())
            .finish()
    }
}

impl Default for MediaCallbacks {
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}

impl Drop for MediaCallbacks {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl MediaCallbacks {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            state: Arc::new(BridgeState::new(config)),
        }
    }

    /// Registers the bridge with `session`, detaching from any previous one.
    pub fn initialize(&self, session: Arc<dyn DecoderSession>) {
        self.shutdown();

        *self.state.session.lock() = Some(Arc::clone(&session));

        let state = Arc::downgrade(&self.state);
        session.set_audio_format_callbacks(Some(AudioFormatHandler {
            state: state.clone(),
        }));
        session.set_audio_callbacks(Some(AudioHandler {
            state: state.clone(),
        }));
        session.set_video_format_callbacks(Some(VideoFormatHandler {
            state: state.clone(),
        }));
        session.set_video_callbacks(Some(VideoHandler { state }));

        log::debug!("media callbacks initialized");
    }

    /// Unregisters from the session and discards pooled samples.
    ///
    /// The decoder must have stopped calling back before this runs.
    pub fn shutdown(&self) {
        let Some(session) = self.state.session.lock().take() else {
            return;
        };

        session.set_audio_callbacks(None);
        session.set_audio_format_callbacks(None);
        session.set_video_callbacks(None);
        session.set_video_format_callbacks(None);

        self.state.audio_pool.reset();
        self.state.video_pool.reset();
        self.state.clock.reset();
        *self.state.last_lock.lock() = None;

        log::debug!("media callbacks shut down");
    }

    pub fn is_initialized(&self) -> bool {
        self.state.session.lock().is_some()
    }

    /// The queues the decoder callbacks fill.
    pub fn samples(&self) -> Arc<MediaSamples> {
        Arc::clone(&self.state.samples)
    }

    /// Advances the playback clock used to stamp new samples.
    pub fn set_current_time(&self, time: Duration) {
        self.state.clock.set(time);
    }

    pub fn current_time(&self) -> Duration {
        self.state.clock.get()
    }

    /// Binds (or unbinds) a texture updated directly with each BGRA frame.
    pub fn set_render_target(&self, target: Option<Arc<dyn RenderTarget>>) {
        *self.state.render_target.lock() = target;
    }

    pub fn audio_format(&self) -> AudioFormatState {
        *self.state.audio_format.read()
    }

    pub fn video_format(&self) -> VideoFormatState {
        *self.state.video_format.read()
    }

    pub fn audio_pool_stats(&self) -> PoolStats {
        self.state.audio_pool.stats()
    }

    pub fn video_pool_stats(&self) -> PoolStats {
        self.state.video_pool.stats()
    }
}
