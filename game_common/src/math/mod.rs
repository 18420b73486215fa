//! Math primitives shared by the camera and targeting systems.

/// Asserts approximated equals on two f32s.
///
/// The tolerance defaults to `0.0001`.
#[macro_export]
macro_rules! assert_f32 {
    ($a:expr, $b:expr) => {
        $crate::assert_f32!($a, $b, 0.0001)
    };
    ($a:expr, $b:expr, $tolerance:expr) => {{
        let (a, b, tolerance): (f32, f32, f32) = ($a, $b, $tolerance);
        if !(a >= b - tolerance && a <= b + tolerance) {
            // Fallback to the assert_eq macro for better output.
            assert_eq!(a, b);
        }
    }};
}

#[macro_export]
macro_rules! assert_vec {
    ($a:expr, $b:expr) => {
        $crate::assert_vec!($a, $b, 0.0001)
    };
    ($a:expr, $b:expr, $tolerance:expr) => {{
        let (a, b) = ($a, $b);
        $crate::assert_f32!(a.x, b.x, $tolerance);
        $crate::assert_f32!(a.y, b.y, $tolerance);
        $crate::assert_f32!(a.z, b.z, $tolerance);
    }};
}

#[macro_export]
macro_rules! assert_rotation {
    ($a:expr, $b:expr) => {
        $crate::assert_rotation!($a, $b, 0.0001)
    };
    ($a:expr, $b:expr, $tolerance:expr) => {{
        let (a, b): ($crate::math::Rotation, $crate::math::Rotation) = ($a, $b);
        let delta = a.delta(b);
        $crate::assert_f32!(delta.pitch, 0.0, $tolerance);
        $crate::assert_f32!(delta.yaw, 0.0, $tolerance);
        $crate::assert_f32!(delta.roll, 0.0, $tolerance);
    }};
}

mod rotation;

use glam::Vec3;
pub use rotation::{normalize_axis, Rotation};

/// An axis-aligned bounding box.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    /// Half of the size on every axis.
    pub extents: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn new(center: Vec3, extents: Vec3) -> Self {
        Self { center, extents }
    }

    /// Returns the full height (Z axis) of the box.
    #[inline]
    pub fn height(&self) -> f32 {
        self.extents.z * 2.0
    }

    #[inline]
    pub fn volume(&self) -> f32 {
        self.extents.x * self.extents.y * self.extents.z * 8.0
    }

    /// Returns the largest full dimension of the box.
    #[inline]
    pub fn max_dimension(&self) -> f32 {
        self.extents.max_element() * 2.0
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.extents
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.extents
    }
}

/// Moves `current` towards `target` with a speed proportional to the
/// remaining distance, without overshooting.
///
/// A non-positive `speed` returns `target`.
pub fn vinterp_to(current: Vec3, target: Vec3, delta: f32, speed: f32) -> Vec3 {
    if speed <= 0.0 {
        return target;
    }

    let dist = target - current;
    if dist.length_squared() < 1e-8 {
        return target;
    }

    current + dist * (delta * speed).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::{vinterp_to, Aabb};

    #[test]
    fn test_assert_f32() {
        assert_f32!(0.0001, 0.0002);
    }

    #[test]
    #[should_panic]
    fn test_assert_f32_failure() {
        assert_f32!(0.001, 0.002);
    }

    #[test]
    fn aabb_dimensions() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::new(10.0, 20.0, 50.0));

        assert_f32!(aabb.height(), 100.0);
        assert_f32!(aabb.volume(), 80_000.0);
        assert_f32!(aabb.max_dimension(), 100.0);
        assert_vec!(aabb.min(), Vec3::new(-10.0, -20.0, -50.0));
    }

    #[test]
    fn vinterp_to_steps() {
        let current = Vec3::ZERO;
        let target = Vec3::new(100.0, 0.0, 0.0);

        assert_vec!(vinterp_to(current, target, 0.05, 10.0), Vec3::new(50.0, 0.0, 0.0));
        assert_eq!(vinterp_to(current, target, 1.0, 10.0), target);
        assert_eq!(vinterp_to(current, target, 0.05, 0.0), target);
    }
}
