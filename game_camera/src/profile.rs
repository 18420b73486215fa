//! Camera framing per target size.

use game_targeting::size::SizeCategory;
use serde::{Deserialize, Serialize};

/// How the camera frames a target of a certain size.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeProfile {
    pub distance: f32,
    pub height_offset: f32,
    pub pitch_offset: f32,
    pub z_bias_near: f32,
    pub z_bias_far: f32,
    pub fov_adjustment: f32,
    pub tracking_speed: f32,
    pub switch_speed: f32,
}

impl SizeProfile {
    pub const SMALL: Self = Self {
        distance: 350.0,
        height_offset: 60.0,
        pitch_offset: -3.0,
        z_bias_near: -200.0,
        z_bias_far: -350.0,
        fov_adjustment: 2.0,
        tracking_speed: 7.0,
        switch_speed: 10.0,
    };

    pub const MEDIUM: Self = Self {
        distance: 450.0,
        height_offset: 100.0,
        pitch_offset: -5.0,
        z_bias_near: -120.0,
        z_bias_far: -200.0,
        fov_adjustment: 0.0,
        tracking_speed: 5.0,
        switch_speed: 8.0,
    };

    pub const LARGE: Self = Self {
        distance: 600.0,
        height_offset: 150.0,
        pitch_offset: -8.0,
        z_bias_near: -80.0,
        z_bias_far: -120.0,
        fov_adjustment: -3.0,
        tracking_speed: 4.0,
        switch_speed: 6.0,
    };

    pub const GIANT: Self = Self {
        distance: 800.0,
        height_offset: 250.0,
        pitch_offset: -12.0,
        z_bias_near: -60.0,
        z_bias_far: -100.0,
        fov_adjustment: -5.0,
        tracking_speed: 3.0,
        switch_speed: 5.0,
    };

    /// Returns the default profile for targets of `size`.
    pub const fn for_size(size: SizeCategory) -> Self {
        match size {
            SizeCategory::Small => Self::SMALL,
            SizeCategory::Medium | SizeCategory::Unknown => Self::MEDIUM,
            SizeCategory::Large => Self::LARGE,
            SizeCategory::Giant => Self::GIANT,
        }
    }
}

impl Default for SizeProfile {
    fn default() -> Self {
        Self::MEDIUM
    }
}

/// Custom values replacing fields of the default [`SizeProfile`].
///
/// A field left at zero inherits the default. `distance`, `tracking_speed`
/// and `switch_speed` only override with positive values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileOverrides {
    /// Apply the custom values at all.
    ///
    /// Defaults to `false`.
    pub use_custom: bool,
    pub distance: f32,
    pub height_offset: f32,
    pub pitch_offset: f32,
    pub z_bias_near: f32,
    pub z_bias_far: f32,
    pub fov_adjustment: f32,
    pub tracking_speed: f32,
    pub switch_speed: f32,
}

impl ProfileOverrides {
    /// Returns `base` with all set custom values applied.
    pub fn merge(&self, base: SizeProfile) -> SizeProfile {
        if !self.use_custom {
            return base;
        }

        fn positive(custom: f32, base: f32) -> f32 {
            if custom > 0.0 {
                custom
            } else {
                base
            }
        }

        fn non_zero(custom: f32, base: f32) -> f32 {
            if custom != 0.0 {
                custom
            } else {
                base
            }
        }

        SizeProfile {
            distance: positive(self.distance, base.distance),
            height_offset: non_zero(self.height_offset, base.height_offset),
            pitch_offset: non_zero(self.pitch_offset, base.pitch_offset),
            z_bias_near: non_zero(self.z_bias_near, base.z_bias_near),
            z_bias_far: non_zero(self.z_bias_far, base.z_bias_far),
            fov_adjustment: non_zero(self.fov_adjustment, base.fov_adjustment),
            tracking_speed: positive(self.tracking_speed, base.tracking_speed),
            switch_speed: positive(self.switch_speed, base.switch_speed),
        }
    }

    /// Returns the effective profile for targets of `size`.
    #[inline]
    pub fn profile_for(&self, size: SizeCategory) -> SizeProfile {
        self.merge(SizeProfile::for_size(size))
    }

    /// Returns a warning for every custom value outside of its sensible
    /// range. Unset values are not checked.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.distance != 0.0 && !(200.0..=2000.0).contains(&self.distance) {
            warnings.push(format!(
                "camera distance {} is outside of 200..=2000",
                self.distance
            ));
        }

        if self.height_offset.abs() > 500.0 {
            warnings.push(format!(
                "height offset {} is outside of -500..=500",
                self.height_offset
            ));
        }

        if self.pitch_offset.abs() > 45.0 {
            warnings.push(format!(
                "pitch offset {} is outside of -45..=45",
                self.pitch_offset
            ));
        }

        warnings
    }

    /// Resets every custom value so that the defaults apply again.
    pub fn reset(&mut self) {
        *self = Self {
            use_custom: self.use_custom,
            ..Default::default()
        };
    }
}
