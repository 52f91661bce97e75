use std::time::{Duration, Instant};

/// Rate limiter for the audio level stream.
///
/// Level samples arrive far faster than the display can usefully refresh.
/// The throttler passes at most one sample per interval and discards the
/// rest outright; a discarded sample is lost, not deferred, so the meter
/// never lags behind the microphone.
#[derive(Debug)]
pub struct LevelThrottle {
    interval: Duration,
    last_accepted: Option<Instant>,
}

impl LevelThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    /// Decide whether a sample arriving at `now` may render.
    ///
    /// The first sample after a quiet period always passes.
    pub fn accept(&mut self, now: Instant) -> bool {
        match self.last_accepted {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }

    /// Forget the last accepted sample, so the next one passes.
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}
