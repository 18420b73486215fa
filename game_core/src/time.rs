//! Frame clock for advancing simulation time
//!
//! Not to be confused with in-game time. All timeouts in the camera and
//! targeting systems are measured against [`Time::elapsed`], which only
//! advances when [`Time::update`] is called.

use std::time::Duration;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Time {
    delta: Duration,
    elapsed: Duration,
}

impl Time {
    pub const fn new() -> Self {
        Self {
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    /// Returns the duration of the last frame.
    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Returns the duration of the last frame in seconds.
    #[inline]
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Returns the time since the clock was started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Advances the clock by one frame of length `delta`.
    pub fn update(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::Time;

    #[test]
    fn update_accumulates() {
        let mut time = Time::new();
        time.update(Duration::from_millis(16));
        time.update(Duration::from_millis(17));

        assert_eq!(time.delta(), Duration::from_millis(17));
        assert_eq!(time.elapsed(), Duration::from_millis(33));
    }
}
