use std::time::Duration;

/// Gates work to run at most once per `timestep`.
#[derive(Clone, Debug)]
pub struct Interval {
    last_update: Option<Duration>,
    timestep: Duration,
}

impl Interval {
    pub const fn new(timestep: Duration) -> Self {
        Self {
            last_update: None,
            timestep,
        }
    }

    #[inline]
    pub fn timestep(&self) -> Duration {
        self.timestep
    }

    pub fn set_timestep(&mut self, timestep: Duration) {
        self.timestep = timestep;
    }

    /// Returns `true` if at least one `timestep` has passed since the interval
    /// was last ready. The first call always returns `true`.
    ///
    /// Missed timesteps are not caught up; the next timestep starts at `now`.
    pub fn is_ready(&mut self, now: Duration) -> bool {
        match self.last_update {
            Some(last) if now.saturating_sub(last) < self.timestep => false,
            _ => {
                self.last_update = Some(now);
                true
            }
        }
    }

    /// Makes the next call to [`is_ready`] return `true`.
    ///
    /// [`is_ready`]: Self::is_ready
    pub fn reset(&mut self) {
        self.last_update = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::Interval;

    #[test]
    fn first_call_is_ready() {
        let mut interval = Interval::new(Duration::from_millis(100));
        assert!(interval.is_ready(Duration::from_millis(3)));
    }

    #[test]
    fn gates_until_timestep() {
        let mut interval = Interval::new(Duration::from_millis(100));
        assert!(interval.is_ready(Duration::ZERO));

        assert!(!interval.is_ready(Duration::from_millis(50)));
        assert!(!interval.is_ready(Duration::from_millis(99)));
        assert!(interval.is_ready(Duration::from_millis(100)));
        assert!(!interval.is_ready(Duration::from_millis(150)));
    }

    #[test]
    fn does_not_catch_up() {
        let mut interval = Interval::new(Duration::from_millis(100));
        assert!(interval.is_ready(Duration::ZERO));

        assert!(interval.is_ready(Duration::from_millis(550)));
        assert!(!interval.is_ready(Duration::from_millis(560)));
    }

    #[test]
    fn reset_forces_ready() {
        let mut interval = Interval::new(Duration::from_secs(1));
        assert!(interval.is_ready(Duration::ZERO));
        assert!(!interval.is_ready(Duration::from_millis(10)));

        interval.reset();
        assert!(interval.is_ready(Duration::from_millis(20)));
    }
}
