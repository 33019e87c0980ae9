use std::collections::HashMap;

use parking_lot::Mutex;

use crate::callbacks::{AudioFormatHandler, AudioHandler, VideoFormatHandler, VideoHandler};
use crate::format::FourCc;
use crate::session::DecoderSession;

/// In-memory decoder session recording the handlers registered with it.
#[derive(Default)]
pub(crate) struct FakeSession {
    pub size: Option<(u32, u32)>,
    pub fps: f32,
    pub delay: i64,
    pub planes: HashMap<FourCc, u32>,
    pub audio_format: Mutex<Option<AudioFormatHandler>>,
    pub audio: Mutex<Option<AudioHandler>>,
    pub video_format: Mutex<Option<VideoFormatHandler>>,
    pub video: Mutex<Option<VideoHandler>>,
}

impl FakeSession {
    pub fn new(width: u32, height: u32, fps: f32) -> Self {
        Self {
            size: Some((width, height)),
            fps,
            ..Self::default()
        }
    }

    pub fn without_size(mut self) -> Self {
        self.size = None;
        self
    }

    pub fn with_planes(mut self, chroma: FourCc, count: u32) -> Self {
        self.planes.insert(chroma, count);
        self
    }

    pub fn with_delay(mut self, micros: i64) -> Self {
        self.delay = micros;
        self
    }

    pub fn registered(&self) -> [bool; 4] {
        [
            self.audio_format.lock().is_some(),
            self.audio.lock().is_some(),
            self.video_format.lock().is_some(),
            self.video.lock().is_some(),
        ]
    }

    pub fn audio_format_handler(&self) -> AudioFormatHandler {
        self.audio_format.lock().clone().unwrap()
    }

    pub fn audio_handler(&self) -> AudioHandler {
        self.audio.lock().clone().unwrap()
    }

    pub fn video_format_handler(&self) -> VideoFormatHandler {
        self.video_format.lock().clone().unwrap()
    }

    pub fn video_handler(&self) -> VideoHandler {
        self.video.lock().clone().unwrap()
    }
}

impl DecoderSession for FakeSession {
    fn set_audio_format_callbacks(&self, handler: Option<AudioFormatHandler>) {
        *self.audio_format.lock() = handler;
    }

    fn set_audio_callbacks(&self, handler: Option<AudioHandler>) {
        *self.audio.lock() = handler;
    }

    fn set_video_format_callbacks(&self, handler: Option<VideoFormatHandler>) {
        *self.video_format.lock() = handler;
    }

    fn set_video_callbacks(&self, handler: Option<VideoHandler>) {
        *self.video.lock() = handler;
    }

    fn video_size(&self, _track: u32) -> Option<(u32, u32)> {
        self.size
    }

    fn fps(&self) -> f32 {
        self.fps
    }

    fn delay(&self, _pts: i64) -> i64 {
        self.delay
    }

    fn chroma_plane_count(&self, chroma: FourCc) -> Option<u32> {
        self.planes.get(&chroma).copied()
    }
}
