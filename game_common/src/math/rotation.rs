use std::ops::{Add, Mul, Neg, Sub};

use glam::Vec3;

/// Tolerance below which two rotations are treated as identical by
/// [`Rotation::interp_to`].
const NEARLY_ZERO: f32 = 1e-4;

/// A rotation expressed as euler angles in degrees.
///
/// The world is Z-up: a zero rotation looks along `+X`, a positive yaw turns
/// towards `+Y` (right) and a positive pitch looks up.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rotation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotation {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    #[inline]
    pub const fn from_yaw(yaw: f32) -> Self {
        Self::new(0.0, yaw, 0.0)
    }

    /// Returns the rotation looking along `direction`. The roll is always zero.
    ///
    /// A zero-length direction returns [`Rotation::ZERO`].
    pub fn from_direction(direction: Vec3) -> Self {
        let yaw = direction.y.atan2(direction.x).to_degrees();
        let horizontal = (direction.x * direction.x + direction.y * direction.y).sqrt();
        let pitch = direction.z.atan2(horizontal).to_degrees();

        Self::new(pitch, yaw, 0.0)
    }

    /// Returns the rotation that looks from `from` towards `to`.
    #[inline]
    pub fn look_at(from: Vec3, to: Vec3) -> Self {
        Self::from_direction(to - from)
    }

    /// Returns the same rotation with every axis in `(-180, 180]`.
    pub fn normalized(self) -> Self {
        Self::new(
            normalize_axis(self.pitch),
            normalize_axis(self.yaw),
            normalize_axis(self.roll),
        )
    }

    /// Returns the shortest per-axis rotation that turns `self` into `target`.
    #[inline]
    pub fn delta(self, target: Self) -> Self {
        (target - self).normalized()
    }

    /// Returns `true` if every axis is within `tolerance` degrees of zero.
    pub fn is_nearly_zero(self, tolerance: f32) -> bool {
        self.pitch.abs() <= tolerance && self.yaw.abs() <= tolerance && self.roll.abs() <= tolerance
    }

    /// Returns `true` if `self` and `other` describe the same orientation
    /// within `tolerance` degrees on every axis.
    #[inline]
    pub fn is_nearly(self, other: Self, tolerance: f32) -> bool {
        self.delta(other).is_nearly_zero(tolerance)
    }

    pub fn is_finite(self) -> bool {
        self.pitch.is_finite() && self.yaw.is_finite() && self.roll.is_finite()
    }

    /// Returns the rotation with only the yaw component.
    #[inline]
    pub const fn yaw_only(self) -> Self {
        Self::from_yaw(self.yaw)
    }

    /// Returns the unit direction vector this rotation looks along.
    pub fn forward(self) -> Vec3 {
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let (sy, cy) = self.yaw.to_radians().sin_cos();

        Vec3::new(cp * cy, cp * sy, sp)
    }

    /// Returns the unit vector pointing to the right of this rotation.
    pub fn right(self) -> Vec3 {
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sr, cr) = self.roll.to_radians().sin_cos();

        Vec3::new(sr * sp * cy - cr * sy, sr * sp * sy + cr * cy, -sr * cp)
    }

    /// Returns the unit vector pointing upwards of this rotation.
    pub fn up(self) -> Vec3 {
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sr, cr) = self.roll.to_radians().sin_cos();

        Vec3::new(-(cr * sp * cy + sr * sy), cy * sr - cr * sp * sy, cr * cp)
    }

    /// Rotates the local vector `v` (`x` forward, `y` right, `z` up) into
    /// world space.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        self.forward() * v.x + self.right() * v.y + self.up() * v.z
    }

    /// Moves `self` towards `target` with a speed proportional to the
    /// remaining distance.
    ///
    /// Each axis takes the shortest path. The step is `delta * speed`, clamped
    /// so that it never overshoots. If the remaining distance is negligible or
    /// `speed` is not positive, `target` is returned exactly.
    pub fn interp_to(self, target: Self, delta: f32, speed: f32) -> Self {
        if speed <= 0.0 {
            return target;
        }

        let diff = self.delta(target);
        if !diff.is_finite() {
            return self;
        }

        if diff.is_nearly_zero(NEARLY_ZERO) {
            return target;
        }

        let alpha = (delta * speed).clamp(0.0, 1.0);
        (self + diff * alpha).normalized()
    }

    /// Linearly interpolates towards `target` along the shortest path.
    ///
    /// `t` is clamped to `[0, 1]`; `t == 1` returns `target` exactly.
    pub fn lerp(self, target: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        if t >= 1.0 {
            return target;
        }

        (self + self.delta(target) * t).normalized()
    }
}

impl Add for Rotation {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.pitch + rhs.pitch, self.yaw + rhs.yaw, self.roll + rhs.roll)
    }
}

impl Sub for Rotation {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.pitch - rhs.pitch, self.yaw - rhs.yaw, self.roll - rhs.roll)
    }
}

impl Mul<f32> for Rotation {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.pitch * rhs, self.yaw * rhs, self.roll * rhs)
    }
}

impl Neg for Rotation {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.pitch, -self.yaw, -self.roll)
    }
}

/// Wraps an angle in degrees into `(-180, 180]`.
pub fn normalize_axis(angle: f32) -> f32 {
    let angle = angle % 360.0;

    if angle > 180.0 {
        angle - 360.0
    } else if angle <= -180.0 {
        angle + 360.0
    } else {
        angle
    }
}
