//! Decoder-thread sample production.
//!
//! Everything here runs on the decoder's own threads and must return
//! promptly: failures turn into dropped blocks or discarded frames, never
//! into errors the decoder would see.

use std::sync::Arc;
use std::time::Duration;

use crate::Error;
use crate::callbacks::{BridgeState, FrameHandle};
use crate::clock::offset_micros;
use crate::format::{VideoFormatState, VideoSampleFormat};
use crate::planes::PlaneTable;
use crate::pool::Pooled;
use crate::sample::{AudioSample, VideoSample};
use crate::target::UpdateRegion;
use crate::transcode::decode_depth_bgra;

impl BridgeState {
    pub(crate) fn audio_play(&self, data: &[u8], count: u32, pts: i64) {
        log::trace!(
            "audio play (count = {count}, pts = {pts}, queue = {})",
            self.samples.num_audio()
        );

        match self.produce_audio(data, count, pts) {
            Ok(sample) => self.samples.add_audio(Arc::new(sample)),
            Err(err) => log::debug!("dropping audio block: {err}"),
        }
    }

    fn produce_audio(&self, data: &[u8], count: u32, pts: i64) -> Result<Pooled<AudioSample>, Error> {
        let format = *self.audio_format.read();
        if format.sample_rate == 0 {
            return Err(Error::SampleRate);
        }

        let mut sample = self
            .audio_pool
            .acquire()
            .ok_or_else(|| Error::PoolExhausted(self.audio_pool.stats().outstanding))?;

        let delay = self.session().map_or(0, |session| session.delay(pts));
        let duration =
            Duration::from_micros(u64::from(count) * 1_000_000 / u64::from(format.sample_rate));
        let size = count as usize * format.bytes_per_sample() as usize * format.channels as usize;

        sample.initialize(
            data,
            size,
            count,
            format.channels,
            format.format,
            format.sample_rate,
            offset_micros(self.clock.get(), delay),
            duration,
        )?;

        Ok(sample)
    }

    pub(crate) fn video_lock(&self, planes: &mut PlaneTable) -> Option<FrameHandle> {
        planes.clear();

        let now = self.clock.get();
        let format = *self.video_format.read();
        let mut last_lock = self.last_lock.lock();

        // already have a frame for this tick
        if *last_lock == Some(now) {
            planes.supply_scratch(format.buffer_len());
            return None;
        }

        log::trace!("video lock (current time = {now:?})");

        match self.acquire_video_sample(&format) {
            Ok(mut sample) => {
                *last_lock = Some(now);
                planes.attach(0, sample.mutable_buffer());
                Some(FrameHandle(sample))
            }
            Err(err) => {
                log::debug!("discarding video frame: {err}");
                planes.supply_scratch(format.buffer_len());
                None
            }
        }
    }

    fn acquire_video_sample(&self, format: &VideoFormatState) -> Result<Pooled<VideoSample>, Error> {
        let mut sample = self
            .video_pool
            .acquire()
            .ok_or_else(|| Error::PoolExhausted(self.video_pool.stats().outstanding))?;

        sample.initialize(
            format.buffer,
            format.output,
            format.format,
            format.stride,
            format.frame_duration,
        )?;

        Ok(sample)
    }

    pub(crate) fn video_display(&self, frame: FrameHandle) {
        let FrameHandle(mut sample) = frame;
        let now = self.clock.get();

        log::trace!(
            "video display (current time = {now:?}, queue = {})",
            self.samples.num_video()
        );

        sample.set_time(now);

        if sample.format() == VideoSampleFormat::CharBgra {
            let dim = sample.dim();
            if self.config.depth_transcode {
                decode_depth_bgra(sample.mutable_buffer(), dim.width, dim.height);
            }

            let target = self.render_target.lock().clone();
            if let Some(target) = target {
                target.update_region(
                    &UpdateRegion::full(dim.width, dim.height),
                    sample.stride(),
                    4,
                    sample.buffer(),
                );
            }
        }

        self.samples.add_video(Arc::new(sample));
    }
}
