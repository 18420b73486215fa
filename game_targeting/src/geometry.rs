//! Pure angle and distance helpers used for scoring and sorting targets.

use game_common::entity::EntityId;
use game_common::math::Rotation;
use glam::Vec3;

/// A snapshot of the agent that is looking for targets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewer {
    pub entity: EntityId,
    pub position: Vec3,
    /// The direction the viewer is currently looking in, usually the camera
    /// orientation.
    pub look: Rotation,
}

impl Viewer {
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.look.forward()
    }

    #[inline]
    pub fn angle_to(&self, point: Vec3) -> f32 {
        angle_to_target(self.position, self.look, point)
    }

    #[inline]
    pub fn direction_to(&self, point: Vec3) -> f32 {
        direction_angle(self.position, self.look, point)
    }
}

/// Returns the unsigned angle in degrees between the look direction and the
/// direction from `origin` to `point`.
///
/// If `point` is at `origin` the angle is 90 degrees.
pub fn angle_to_target(origin: Vec3, look: Rotation, point: Vec3) -> f32 {
    let dir = (point - origin).normalize_or_zero();
    if dir == Vec3::ZERO {
        return 90.0;
    }

    look.forward().dot(dir).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Returns the signed angle in degrees of `point` relative to the look
/// direction. Negative angles are to the left, positive to the right.
pub fn direction_angle(origin: Vec3, look: Rotation, point: Vec3) -> f32 {
    let dir = point - origin;
    let forward = look.forward().dot(dir);
    let right = look.right().dot(dir);

    right.atan2(forward).to_degrees()
}

/// Returns `true` if `player` is behind a target at `target` facing
/// `target_rotation`.
pub fn is_behind(target: Vec3, target_rotation: Rotation, player: Vec3) -> bool {
    let to_player = (player - target).normalize_or_zero();
    target_rotation.forward().dot(to_player) < 0.0
}

/// Returns the factor applied to the tracking speed for a target at
/// `distance`, so that far away targets are caught up with faster.
pub fn distance_speed_multiplier(distance: f32) -> f32 {
    if distance > 1500.0 {
        2.0
    } else if distance > 800.0 {
        1.5
    } else {
        1.0
    }
}
