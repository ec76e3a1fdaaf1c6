//! Frame clock.

use std::time::{Duration, Instant};

/// Longest single frame the [`Ticker`] reports, so a stalled process does not
/// make animations jump to their end.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Per-frame timing handed to every scene update.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    delta_ms: f32,
    elapsed_ms: f64,
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame that lasted `delta_ms`.
    pub fn advance(&mut self, delta_ms: f32) {
        self.delta_ms = delta_ms.max(0.0);
        self.elapsed_ms += self.delta_ms as f64;
        self.frame += 1;
    }

    /// Milliseconds since the previous frame.
    pub fn delta_ms(&self) -> f32 {
        self.delta_ms
    }

    /// Milliseconds since the clock started.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Number of frames so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// Drives a [`FrameClock`] from wall-clock time.
#[derive(Debug)]
pub struct Ticker {
    clock: FrameClock,
    last: Option<Instant>,
    max_delta: Duration,
}

impl Ticker {
    pub fn new() -> Self {
        Self {
            clock: FrameClock::new(),
            last: None,
            max_delta: MAX_FRAME_DELTA,
        }
    }

    /// Advance to `now`. The first tick reports a zero delta.
    pub fn tick_at(&mut self, now: Instant) -> &FrameClock {
        let delta = match self.last {
            Some(last) => now.saturating_duration_since(last).min(self.max_delta),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        self.clock.advance(delta.as_secs_f32() * 1000.0);
        &self.clock
    }

    pub fn tick(&mut self) -> &FrameClock {
        self.tick_at(Instant::now())
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock_advance() {
        let mut clock = FrameClock::new();
        clock.advance(16.0);
        clock.advance(17.0);

        assert_eq!(clock.delta_ms(), 17.0);
        assert_eq!(clock.elapsed_ms(), 33.0);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let mut clock = FrameClock::new();
        clock.advance(-5.0);
        assert_eq!(clock.delta_ms(), 0.0);
        assert_eq!(clock.elapsed_ms(), 0.0);
    }

    #[test]
    fn test_ticker_caps_delta() {
        let start = Instant::now();
        let mut ticker = Ticker::new();

        assert_eq!(ticker.tick_at(start).delta_ms(), 0.0);

        let delta = ticker.tick_at(start + Duration::from_millis(20)).delta_ms();
        assert!((delta - 20.0).abs() < 0.01);

        let delta = ticker.tick_at(start + Duration::from_secs(5)).delta_ms();
        assert!((delta - 100.0).abs() < 0.01);
        assert_eq!(ticker.clock().frame(), 3);
    }
}
