//! The spring arm the camera is attached to.

use std::collections::HashMap;

use ahash::RandomState;
use game_common::math::Rotation;
use game_targeting::size::SizeCategory;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::profile::SizeProfile;

const MAX_BOOM_PITCH: f32 = 89.0;

/// A complete spring arm setup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraSetup {
    /// Defaults to `450.0`.
    pub arm_length: f32,
    /// Defaults to a pitch of `-15`.
    pub initial_rotation: Rotation,
    /// Offset of the camera at the end of the arm.
    ///
    /// Defaults to `(0, 0, 50)`.
    pub socket_offset: Vec3,
    /// Defaults to `true`.
    pub use_pawn_control_rotation: bool,
    /// Defaults to `false`.
    pub camera_lag: bool,
    /// Defaults to `10.0`.
    pub camera_lag_speed: f32,
    /// Added to the camera offset while locked on.
    ///
    /// Defaults to `(0, 0, 0)`.
    pub lock_on_height_offset: Vec3,
    /// Factor on the arm length while locked on, if no setup for the size of
    /// the target exists.
    ///
    /// Defaults to `1.2`.
    pub lock_on_arm_length_multiplier: f32,
}

impl Default for CameraSetup {
    fn default() -> Self {
        Self {
            arm_length: 450.0,
            initial_rotation: Rotation::new(-15.0, 0.0, 0.0),
            socket_offset: Vec3::new(0.0, 0.0, 50.0),
            use_pawn_control_rotation: true,
            camera_lag: false,
            camera_lag_speed: 10.0,
            lock_on_height_offset: Vec3::ZERO,
            lock_on_arm_length_multiplier: 1.2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RigConfig {
    /// The setup while not locked on.
    pub default: CameraSetup,
    /// The setups used while locked on to a target of a certain size.
    ///
    /// Defaults to a setup for every known size derived from [`default`].
    ///
    /// [`default`]: Self::default
    pub per_size: HashMap<SizeCategory, CameraSetup, RandomState>,
    /// Defaults to `600.0`.
    pub normal_walk_speed: f32,
    /// Defaults to `600.0`.
    pub locked_walk_speed: f32,
}

impl RigConfig {
    /// Returns the arm length while locked on to a target of `size`.
    pub fn lock_arm_length(&self, size: SizeCategory) -> f32 {
        match self.per_size.get(&size) {
            Some(setup) => setup.arm_length,
            None => self.default.arm_length * self.default.lock_on_arm_length_multiplier,
        }
    }
}

impl Default for RigConfig {
    fn default() -> Self {
        let default = CameraSetup::default();

        let sized = |arm: f32, pitch: Option<f32>, height: f32| {
            let mut setup = default.clone();
            setup.arm_length *= arm;
            if let Some(pitch) = pitch {
                setup.initial_rotation.pitch = pitch;
            }
            setup.lock_on_height_offset = Vec3::new(0.0, 0.0, height);
            setup
        };

        let mut per_size = HashMap::default();
        per_size.insert(SizeCategory::Small, sized(0.8, None, 0.0));
        per_size.insert(SizeCategory::Medium, sized(1.0, None, 30.0));
        per_size.insert(SizeCategory::Large, sized(1.3, Some(-25.0), 60.0));
        per_size.insert(SizeCategory::Giant, sized(1.6, Some(-30.0), 100.0));

        Self {
            default,
            per_size,
            normal_walk_speed: 600.0,
            locked_walk_speed: 600.0,
        }
    }
}

/// The currently applied spring arm state.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraRig {
    pub arm_length: f32,
    pub boom_rotation: Rotation,
    pub camera_offset: Vec3,
    pub use_pawn_control_rotation: bool,
    pub camera_lag: bool,
    pub camera_lag_speed: f32,
    /// The character faces its movement direction instead of the camera
    /// direction.
    pub orient_to_movement: bool,
    pub walk_speed: f32,
    /// Degrees added to the field of view of the camera.
    pub fov_offset: f32,
    pub profile: SizeProfile,
}

impl CameraRig {
    /// Creates a rig with the default setup applied.
    pub fn new(config: &RigConfig) -> Self {
        let mut rig = Self {
            arm_length: 0.0,
            boom_rotation: Rotation::ZERO,
            camera_offset: Vec3::ZERO,
            use_pawn_control_rotation: true,
            camera_lag: false,
            camera_lag_speed: 0.0,
            orient_to_movement: true,
            walk_speed: 0.0,
            fov_offset: 0.0,
            profile: SizeProfile::default(),
        };
        rig.apply_default(config);
        rig
    }

    fn apply_setup(&mut self, setup: &CameraSetup, locked: bool) {
        self.arm_length = setup.arm_length;
        self.boom_rotation = setup.initial_rotation;
        self.use_pawn_control_rotation = setup.use_pawn_control_rotation;
        self.camera_lag = setup.camera_lag;
        self.camera_lag_speed = setup.camera_lag_speed;

        self.camera_offset = setup.socket_offset;
        if locked {
            self.camera_offset += setup.lock_on_height_offset;
        }
    }

    /// Applies the setup for locking on to a target of `size`.
    ///
    /// Falls back to the default setup with the lock on arm length multiplier
    /// if no setup for `size` exists.
    pub fn apply_lock(&mut self, config: &RigConfig, size: SizeCategory, profile: SizeProfile) {
        match config.per_size.get(&size) {
            Some(setup) => self.apply_setup(setup, true),
            None => {
                tracing::debug!("no camera setup for {:?} targets, using default", size);

                self.apply_setup(&config.default, true);
                self.arm_length = config.lock_arm_length(size);
            }
        }

        self.orient_to_movement = false;
        self.walk_speed = config.locked_walk_speed;
        self.profile = profile;
    }

    /// Frames the target with the custom `profile` on top of the applied
    /// lock setup.
    ///
    /// The arm length is replaced by the profile distance. The height and
    /// pitch offsets are added to the setup.
    pub fn apply_profile(&mut self, profile: SizeProfile) {
        self.arm_length = profile.distance;
        self.camera_offset.z += profile.height_offset;
        self.boom_rotation.pitch =
            (self.boom_rotation.pitch + profile.pitch_offset).clamp(-MAX_BOOM_PITCH, MAX_BOOM_PITCH);
        self.fov_offset = profile.fov_adjustment;
        self.profile = profile;
    }

    /// Restores the setup used while not locked on.
    pub fn apply_default(&mut self, config: &RigConfig) {
        self.apply_setup(&config.default, false);
        self.orient_to_movement = true;
        self.walk_speed = config.normal_walk_speed;
        self.fov_offset = 0.0;
        self.profile = SizeProfile::default();
    }

    /// Returns the location of the camera for a character at `pivot` with the
    /// camera looking along `look`.
    pub fn camera_position(&self, pivot: Vec3, look: Rotation) -> Vec3 {
        pivot + self.camera_offset - look.forward() * self.arm_length
    }
}

/// Returns the arm length adapted to the size of and the distance to the
/// locked target.
pub fn spring_arm_length(base: f32, size: SizeCategory, distance: f32) -> f32 {
    let size_factor = match size {
        SizeCategory::Giant => 1.5,
        SizeCategory::Large => 1.2,
        SizeCategory::Medium | SizeCategory::Unknown => 1.0,
        SizeCategory::Small => 0.9,
    };

    let distance_factor = if distance < 300.0 {
        0.8
    } else if distance > 1000.0 {
        1.2
    } else {
        1.0
    };

    base * size_factor * distance_factor
}

#[cfg(test)]
mod tests {
    use game_common::assert_f32;
    use game_common::math::Rotation;
    use game_targeting::size::SizeCategory;
    use glam::Vec3;

    use super::{spring_arm_length, CameraRig, RigConfig};
    use crate::profile::SizeProfile;

    #[test]
    fn lock_applies_size_setup() {
        let config = RigConfig::default();
        let mut rig = CameraRig::new(&config);

        rig.apply_lock(&config, SizeCategory::Giant, SizeProfile::GIANT);
        assert_f32!(rig.arm_length, 450.0 * 1.6);
        assert_f32!(rig.boom_rotation.pitch, -30.0);
        assert_eq!(rig.camera_offset, Vec3::new(0.0, 0.0, 150.0));
        assert!(!rig.orient_to_movement);
        assert_eq!(rig.profile, SizeProfile::GIANT);
    }

    #[test]
    fn lock_without_size_setup_uses_multiplier() {
        let mut config = RigConfig::default();
        config.per_size.clear();

        let mut rig = CameraRig::new(&config);
        rig.apply_lock(&config, SizeCategory::Large, SizeProfile::LARGE);
        assert_f32!(rig.arm_length, 450.0 * 1.2);
    }

    #[test]
    fn custom_profile_frames_target() {
        let config = RigConfig::default();
        let mut rig = CameraRig::new(&config);

        let profile = SizeProfile {
            distance: 1500.0,
            height_offset: 300.0,
            pitch_offset: -30.0,
            fov_adjustment: 4.0,
            ..SizeProfile::MEDIUM
        };
        rig.apply_lock(&config, SizeCategory::Medium, profile);
        rig.apply_profile(profile);

        assert_f32!(rig.arm_length, 1500.0);
        assert_eq!(rig.camera_offset, Vec3::new(0.0, 0.0, 380.0));
        assert_f32!(rig.boom_rotation.pitch, -45.0);
        assert_f32!(rig.fov_offset, 4.0);

        rig.apply_profile(SizeProfile {
            pitch_offset: -80.0,
            ..profile
        });
        assert_f32!(rig.boom_rotation.pitch, -89.0);

        rig.apply_default(&config);
        assert_eq!(rig, CameraRig::new(&config));
    }

    #[test]
    fn default_restores_rig() {
        let config = RigConfig::default();
        let initial = CameraRig::new(&config);

        let mut rig = initial.clone();
        rig.apply_lock(&config, SizeCategory::Small, SizeProfile::SMALL);
        assert_ne!(rig, initial);

        rig.apply_default(&config);
        assert_eq!(rig, initial);
    }

    #[test]
    fn arm_length_factors() {
        assert_f32!(spring_arm_length(500.0, SizeCategory::Giant, 500.0), 750.0);
        assert_f32!(spring_arm_length(500.0, SizeCategory::Small, 100.0), 360.0);
        assert_f32!(spring_arm_length(500.0, SizeCategory::Large, 1200.0), 720.0);
        assert_f32!(spring_arm_length(500.0, SizeCategory::Medium, 1000.0), 500.0);
    }

    #[test]
    fn camera_behind_pivot() {
        let config = RigConfig::default();
        let rig = CameraRig::new(&config);

        let pos = rig.camera_position(Vec3::ZERO, Rotation::ZERO);
        assert_eq!(pos, Vec3::new(-450.0, 0.0, 50.0));
    }
}
