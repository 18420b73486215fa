//! The point on a target the camera aims at.

use game_common::entity::EntityId;
use game_common::math::vinterp_to;
use game_common::world::Actor;
use game_targeting::size::SizeCategory;
use glam::Vec3;

use crate::settings::{AdvancedCameraSettings, CameraSettings};

/// Height difference from which the aim point is compensated.
const TERRAIN_THRESHOLD: f32 = 100.0;
const TERRAIN_ABOVE_FACTOR: f32 = 0.3;
const TERRAIN_BELOW_FACTOR: f32 = 0.2;

/// Returns the vertical correction of the aim point for a target standing at
/// `target` when the agent stands at `agent`.
///
/// Targets far above the agent are aimed lower, targets far below are aimed
/// higher.
pub fn terrain_compensation(agent: Vec3, target: Vec3) -> Vec3 {
    let diff = target.z - agent.z;

    if diff >= TERRAIN_THRESHOLD {
        Vec3::new(0.0, 0.0, -diff * TERRAIN_ABOVE_FACTOR)
    } else if diff <= -TERRAIN_THRESHOLD {
        Vec3::new(0.0, 0.0, -diff * TERRAIN_BELOW_FACTOR)
    } else {
        Vec3::ZERO
    }
}

#[inline]
fn size_offset(size: SizeCategory) -> Vec3 {
    Vec3::new(0.0, 0.0, size.height_offset())
}

/// Returns the configured extra offset for targets of `size`.
pub fn size_adaptive_offset(advanced: &AdvancedCameraSettings, size: SizeCategory) -> Vec3 {
    match size {
        SizeCategory::Small => advanced.small_enemy_offset,
        SizeCategory::Medium => advanced.medium_enemy_offset,
        SizeCategory::Large => advanced.large_enemy_offset,
        SizeCategory::Giant | SizeCategory::Unknown => Vec3::ZERO,
    }
}

/// Returns the point the camera tracks on `target`.
pub fn optimal_anchor(
    agent: Vec3,
    target: &Actor,
    size: SizeCategory,
    camera: &CameraSettings,
    advanced: &AdvancedCameraSettings,
) -> Vec3 {
    let mut anchor = target.bounds().center + size_offset(size) + camera.target_location_offset;

    if advanced.terrain_height_compensation {
        anchor += terrain_compensation(agent, target.location());
    }

    if advanced.enemy_size_adaptation {
        anchor += size_adaptive_offset(advanced, size);
    }

    anchor
}

/// Returns the aim point reported by the advanced camera adjustment.
pub fn advanced_anchor(
    agent: Vec3,
    target: &Actor,
    size: SizeCategory,
    advanced: &AdvancedCameraSettings,
) -> Vec3 {
    let mut anchor = target.bounds().center + size_offset(size);

    if advanced.terrain_height_compensation {
        anchor += terrain_compensation(agent, target.location());
    }

    anchor
}

/// Low-pass filters the anchor of a single target.
///
/// Switching to a different target snaps to its anchor.
#[derive(Copy, Clone, Debug, Default)]
pub struct AnchorSmoother {
    state: Option<(EntityId, Vec3)>,
}

impl AnchorSmoother {
    pub const fn new() -> Self {
        Self { state: None }
    }

    pub fn smooth(&mut self, target: EntityId, anchor: Vec3, delta: f32, speed: f32) -> Vec3 {
        let location = match self.state {
            Some((id, location)) if id == target => vinterp_to(location, anchor, delta, speed),
            _ => anchor,
        };

        self.state = Some((target, location));
        location
    }

    pub fn reset(&mut self) {
        self.state = None;
    }
}
