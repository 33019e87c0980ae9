use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// The host's playback position.
///
/// Written by the consumer once per tick and read by the decoder callbacks
/// when stamping samples. A stale value is fine, a torn one is not, so the
/// whole timestamp lives in one atomic word.
#[derive(Debug, Default)]
pub struct PlaybackClock {
    nanos: AtomicU64,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }

    /// Times beyond `u64::MAX` nanoseconds saturate.
    pub fn set(&self, time: Duration) {
        let nanos = u64::try_from(time.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.store(nanos, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.nanos.store(0, Ordering::Relaxed);
    }
}

/// Shifts `time` by a signed microsecond offset, saturating at zero.
pub(crate) fn offset_micros(time: Duration, micros: i64) -> Duration {
    let delta = Duration::from_micros(micros.unsigned_abs());
    if micros >= 0 {
        time.saturating_add(delta)
    } else {
        time.saturating_sub(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_reset() {
        let clock = PlaybackClock::new();
        assert_eq!(clock.get(), Duration::ZERO);

        clock.set(Duration::from_millis(1500));
        assert_eq!(clock.get(), Duration::from_millis(1500));

        clock.reset();
        assert_eq!(clock.get(), Duration::ZERO);
    }

    #[test]
    fn offsets_saturate_at_zero() {
        let time = Duration::from_millis(10);
        assert_eq!(offset_micros(time, 2_000), Duration::from_millis(12));
        assert_eq!(offset_micros(time, -4_000), Duration::from_millis(6));
        assert_eq!(offset_micros(time, -20_000), Duration::ZERO);
        assert_eq!(offset_micros(time, i64::MIN), Duration::ZERO);
    }
}
