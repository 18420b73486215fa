//! Camera configuration that is read every tick.

use std::time::Duration;

use game_targeting::settings::secs;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How the camera follows a locked target.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingMode {
    /// Follow the target on every axis.
    #[default]
    Full,
    /// Only follow the yaw of the target, keeping the current pitch.
    HorizontalOnly,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraSettings {
    /// Speed at which the camera follows the target. Smooth target switches
    /// take this many seconds.
    ///
    /// Defaults to `5.0`.
    pub interp_speed: f32,
    /// Interpolate towards the target instead of snapping.
    ///
    /// Defaults to `true`.
    pub smooth_tracking: bool,
    /// Defaults to [`TrackingMode::Full`].
    pub tracking_mode: TrackingMode,
    /// Offset added to the point the camera aims at.
    ///
    /// Defaults to `(0, 0, 0)`.
    pub target_location_offset: Vec3,
    /// Rotate the character towards the locked target.
    ///
    /// Defaults to `true`.
    pub rotate_character_to_target: bool,
    /// Degrees the free camera turns per unit of look input.
    ///
    /// Defaults to `2.5`.
    pub look_rate: f32,
    /// Low-pass filter the aim point of the target.
    ///
    /// Defaults to `false`.
    pub stable_interpolation: bool,
    /// Defaults to `10.0`.
    pub stable_interp_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            interp_speed: 5.0,
            smooth_tracking: true,
            tracking_mode: TrackingMode::Full,
            target_location_offset: Vec3::ZERO,
            rotate_character_to_target: true,
            look_rate: 2.5,
            stable_interpolation: false,
            stable_interp_speed: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdvancedCameraSettings {
    /// Adjust the arm length and aim point to the distance of the target.
    ///
    /// Defaults to `true`.
    pub distance_adaptive: bool,
    /// Compensate height differences between the agent and the target.
    ///
    /// Defaults to `true`.
    pub terrain_height_compensation: bool,
    /// Use the size profile of the target for tracking and add the per size
    /// offsets to the aim point.
    ///
    /// Defaults to `false`.
    pub enemy_size_adaptation: bool,
    /// Defaults to `(0, 0, 0)`.
    pub small_enemy_offset: Vec3,
    /// Defaults to `(0, 0, 0)`.
    pub medium_enemy_offset: Vec3,
    /// Defaults to `(0, 0, 0)`.
    pub large_enemy_offset: Vec3,
    /// Seconds between advanced adjustments.
    ///
    /// Defaults to `0.1`.
    pub adjustment_interval: f32,
}

impl AdvancedCameraSettings {
    #[inline]
    pub fn adjustment_interval(&self) -> Duration {
        secs(self.adjustment_interval)
    }
}

impl Default for AdvancedCameraSettings {
    fn default() -> Self {
        Self {
            distance_adaptive: true,
            terrain_height_compensation: true,
            enemy_size_adaptation: false,
            small_enemy_offset: Vec3::ZERO,
            medium_enemy_offset: Vec3::ZERO,
            large_enemy_offset: Vec3::ZERO,
            adjustment_interval: 0.1,
        }
    }
}

/// Looking around while locked on without losing the target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FreeLookSettings {
    /// Defaults to `true`.
    pub enabled: bool,
    /// Maximum yaw offset in degrees.
    ///
    /// Defaults to `60.0`.
    pub horizontal_limit: f32,
    /// Maximum pitch offset in degrees.
    ///
    /// Defaults to `30.0`.
    pub vertical_limit: f32,
    /// Seconds without input until the camera returns to the target.
    ///
    /// Defaults to `1.5`.
    pub auto_return_delay: f32,
    /// Defaults to `3.0`.
    pub return_to_center_speed: f32,
}

impl FreeLookSettings {
    #[inline]
    pub fn auto_return_delay(&self) -> Duration {
        secs(self.auto_return_delay)
    }
}

impl Default for FreeLookSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            horizontal_limit: 60.0,
            vertical_limit: 30.0,
            auto_return_delay: 1.5,
            return_to_center_speed: 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::{AdvancedCameraSettings, CameraSettings, TrackingMode};

    #[test]
    fn camera_settings_from_toml() {
        let settings: CameraSettings = toml::from_str(
            r#"
            interp_speed = 8.0
            tracking_mode = "horizontal_only"
            target_location_offset = [0.0, 0.0, 20.0]
            "#,
        )
        .unwrap();

        assert_eq!(settings.interp_speed, 8.0);
        assert_eq!(settings.tracking_mode, TrackingMode::HorizontalOnly);
        assert_eq!(settings.target_location_offset, Vec3::new(0.0, 0.0, 20.0));
        assert!(settings.smooth_tracking);
    }

    #[test]
    fn advanced_defaults() {
        let settings: AdvancedCameraSettings = toml::from_str("").unwrap();
        assert_eq!(settings, AdvancedCameraSettings::default());
    }
}
