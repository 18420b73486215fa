use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration of the target search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockOnSettings {
    /// The maximum distance at which new targets are found.
    ///
    /// Defaults to `2000.0`.
    pub lock_on_range: f32,
    /// The full angle of the cone in front of the viewer in which targets
    /// are preferred.
    ///
    /// Defaults to `120.0`.
    pub sector_lock_angle: f32,
    /// The full angle of the cone in which targets are still considered if
    /// the sector is empty.
    ///
    /// Defaults to `150.0`.
    pub edge_detection_angle: f32,
    /// Factor on [`lock_on_range`] for how far a target may move away before
    /// an existing lock is dropped.
    ///
    /// Defaults to `1.2`.
    ///
    /// [`lock_on_range`]: Self::lock_on_range
    pub extended_lock_range_multiplier: f32,
    /// Height above the feet from which visibility traces are made.
    ///
    /// Defaults to `50.0`.
    pub raycast_height_offset: f32,
    /// Seconds between candidate searches.
    ///
    /// Defaults to `0.1`.
    pub search_interval: f32,
    /// Seconds between size cache cleanups.
    ///
    /// Defaults to `1.0`.
    pub size_update_interval: f32,
    /// The maximum angle at which a candidate is used for camera
    /// correction.
    ///
    /// Defaults to `160.0`.
    pub correction_max_angle: f32,
    /// Actors carrying any of these tags are never targeted.
    ///
    /// Defaults to `["Friendly", "Player"]`.
    pub excluded_tags: Vec<String>,
}

impl LockOnSettings {
    #[inline]
    pub fn search_interval(&self) -> Duration {
        secs(self.search_interval)
    }

    #[inline]
    pub fn size_update_interval(&self) -> Duration {
        secs(self.size_update_interval)
    }

    /// Returns the distance up to which an existing lock is kept.
    #[inline]
    pub fn extended_range(&self) -> f32 {
        self.lock_on_range * self.extended_lock_range_multiplier
    }
}

impl Default for LockOnSettings {
    fn default() -> Self {
        Self {
            lock_on_range: 2000.0,
            sector_lock_angle: 120.0,
            edge_detection_angle: 150.0,
            extended_lock_range_multiplier: 1.2,
            raycast_height_offset: 50.0,
            search_interval: 0.1,
            size_update_interval: 1.0,
            correction_max_angle: 160.0,
            excluded_tags: vec![String::from("Friendly"), String::from("Player")],
        }
    }
}

/// Converts seconds into a [`Duration`]. Negative or non-finite values
/// become zero.
pub fn secs(secs: f32) -> Duration {
    Duration::try_from_secs_f32(secs).unwrap_or(Duration::ZERO)
}
