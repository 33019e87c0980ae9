use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::sample::{SharedAudioSample, SharedVideoSample};

/// Ready samples waiting for the consumer, one FIFO per track.
///
/// The decoder thread pushes, the consumer pops. Each operation holds the
/// track's lock only for the push or pop itself.
#[derive(Debug, Default)]
pub struct MediaSamples {
    audio: Mutex<VecDeque<SharedAudioSample>>,
    video: Mutex<VecDeque<SharedVideoSample>>,
}

impl MediaSamples {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_audio(&self, sample: SharedAudioSample) {
        self.audio.lock().push_back(sample);
    }

    pub fn add_video(&self, sample: SharedVideoSample) {
        self.video.lock().push_back(sample);
    }

    /// Takes the oldest ready audio sample.
    pub fn fetch_audio(&self) -> Option<SharedAudioSample> {
        self.audio.lock().pop_front()
    }

    /// Takes the oldest ready video sample.
    pub fn fetch_video(&self) -> Option<SharedVideoSample> {
        self.video.lock().pop_front()
    }

    pub fn num_audio(&self) -> usize {
        self.audio.lock().len()
    }

    pub fn num_video(&self) -> usize {
        self.video.lock().len()
    }

    /// Drops every queued sample, returning them to their pools.
    pub fn flush(&self) {
        let audio = std::mem::take(&mut *self.audio.lock());
        let video = std::mem::take(&mut *self.video.lock());
        drop(audio);
        drop(video);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::SamplePool;
    use crate::sample::{AudioSample, VideoSample};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn video(pool: &SamplePool<VideoSample>, millis: u64) -> SharedVideoSample {
        let mut sample = pool.acquire().unwrap();
        sample.set_time(Duration::from_millis(millis));
        Arc::new(sample)
    }

    #[test]
    fn tracks_are_fifo_and_independent() {
        let pool = SamplePool::<VideoSample>::new(8);
        let audio_pool = SamplePool::<AudioSample>::new(8);
        let samples = MediaSamples::new();

        samples.add_video(video(&pool, 0));
        samples.add_video(video(&pool, 40));
        samples.add_audio(Arc::new(audio_pool.acquire().unwrap()));

        assert_eq!(samples.num_video(), 2);
        assert_eq!(samples.num_audio(), 1);

        assert_eq!(samples.fetch_video().unwrap().time(), Duration::ZERO);
        assert_eq!(samples.fetch_video().unwrap().time(), Duration::from_millis(40));
        assert!(samples.fetch_video().is_none());
        assert!(samples.fetch_audio().is_some());
        assert!(samples.fetch_audio().is_none());
    }

    #[test]
    fn flush_returns_samples_to_pool() {
        let pool = SamplePool::<VideoSample>::new(8);
        let samples = MediaSamples::new();
        samples.add_video(video(&pool, 0));
        samples.add_video(video(&pool, 1));
        assert_eq!(pool.stats().outstanding, 2);

        samples.flush();
        assert_eq!(samples.num_video(), 0);
        assert_eq!(pool.stats().outstanding, 0);
        assert_eq!(pool.stats().available, 2);
    }

    #[test]
    fn concurrent_push_and_drain() {
        let pool = Arc::new(SamplePool::<VideoSample>::new(1024));
        let samples = Arc::new(MediaSamples::new());

        let producer = {
            let pool = Arc::clone(&pool);
            let samples = Arc::clone(&samples);
            thread::spawn(move || {
                for i in 0..500 {
                    samples.add_video(video(&pool, i));
                }
            })
        };

        let mut last = None;
        let mut received = 0;
        while received < 500 {
            match samples.fetch_video() {
                Some(sample) => {
                    if let Some(previous) = last {
                        assert!(sample.time() > previous);
                    }
                    last = Some(sample.time());
                    received += 1;
                }
                None => thread::yield_now(),
            }
        }

        producer.join().unwrap();
        assert_eq!(pool.stats().outstanding, 0);
    }
}
