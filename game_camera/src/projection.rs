//! Projection of the lock-on indicator onto the screen.

use std::collections::HashMap;
use std::time::Duration;

use ahash::RandomState;
use game_common::entity::EntityId;
use game_common::math::Rotation;
use game_common::world::{Actor, World};
use game_core::counter::Interval;
use game_targeting::settings::secs;
use game_targeting::size::SizeCategory;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Height difference from which the indicator moves to the feet or head of
/// the target.
const BODY_PART_THRESHOLD: f32 = 200.0;

/// Points closer to the camera plane than this are not projected.
const NEAR_PLANE: f32 = 1.0;

/// The camera a point is projected through.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraView {
    pub location: Vec3,
    pub rotation: Rotation,
}

impl CameraView {
    /// Returns the `point` in camera space, with `x` forward, `y` right and
    /// `z` up.
    pub fn to_local(&self, point: Vec3) -> Vec3 {
        let v = point - self.location;
        Vec3::new(
            v.dot(self.rotation.forward()),
            v.dot(self.rotation.right()),
            v.dot(self.rotation.up()),
        )
    }
}

pub trait ScreenProjector {
    /// Returns the screen position of `point` in pixels, or `None` if the
    /// point is off-screen or behind the camera.
    fn project_to_screen(&self, view: &CameraView, point: Vec3) -> Option<Vec2>;
}

impl<T> ScreenProjector for &T
where
    T: ?Sized + ScreenProjector,
{
    #[inline]
    fn project_to_screen(&self, view: &CameraView, point: Vec3) -> Option<Vec2> {
        (**self).project_to_screen(view, point)
    }
}

/// A pinhole camera with a horizontal field of view.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PerspectiveProjector {
    /// Horizontal field of view in degrees.
    ///
    /// Defaults to `90.0`.
    pub fov: f32,
    /// Size of the viewport in pixels.
    ///
    /// Defaults to `1920x1080`.
    pub viewport: Vec2,
}

impl Default for PerspectiveProjector {
    fn default() -> Self {
        Self {
            fov: 90.0,
            viewport: Vec2::new(1920.0, 1080.0),
        }
    }
}

impl ScreenProjector for PerspectiveProjector {
    fn project_to_screen(&self, view: &CameraView, point: Vec3) -> Option<Vec2> {
        let local = view.to_local(point);
        if local.x < NEAR_PLANE || self.viewport.y <= 0.0 {
            return None;
        }

        let half = (self.fov.to_radians() * 0.5).tan();
        let aspect = self.viewport.x / self.viewport.y;

        let x = local.y / (local.x * half);
        let y = local.z / (local.x * half) * aspect;

        if !(-1.0..=1.0).contains(&x) || !(-1.0..=1.0).contains(&y) {
            return None;
        }

        Some(Vec2::new(
            (1.0 + x) * 0.5 * self.viewport.x,
            (1.0 - y) * 0.5 * self.viewport.y,
        ))
    }
}

/// Which point on the target the indicator is attached to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    /// The named socket of the target, or the target center if it has none.
    #[default]
    Socket,
    ActorCenter,
    BoundsCenter,
    CustomOffset,
    /// The socket if present, otherwise the bounds center with a size
    /// dependent offset.
    Hybrid,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Head,
    #[default]
    Chest,
    Feet,
}

impl BodyPart {
    /// Returns the best part to aim at on a target at `target` for an agent
    /// at `agent`.
    pub fn best(agent: Vec3, target: Vec3) -> Self {
        let diff = target.z - agent.z;

        if diff > BODY_PART_THRESHOLD {
            Self::Feet
        } else if diff < -BODY_PART_THRESHOLD {
            Self::Head
        } else {
            Self::Chest
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiSettings {
    /// Defaults to [`ProjectionMode::Socket`].
    pub mode: ProjectionMode,
    /// Defaults to `Spine2Socket`.
    pub socket_name: String,
    /// Offset added to the socket or actor location.
    ///
    /// Defaults to `(0, 0, 50)`.
    pub socket_offset: Vec3,
    /// Fraction of the half height added to the bounds center.
    ///
    /// Defaults to `0.6`.
    pub bounds_height_ratio: f32,
    /// Move the [`Hybrid`] point by the size of the target.
    ///
    /// Defaults to `true`.
    ///
    /// [`Hybrid`]: ProjectionMode::Hybrid
    pub size_adaptive: bool,
    /// Extra offsets per [`BodyPart`].
    ///
    /// Defaults to no offsets.
    pub body_part_offsets: HashMap<BodyPart, Vec3, RandomState>,
    /// Minimum seconds between two projections of the same target.
    ///
    /// Defaults to `1/30`.
    pub update_interval: f32,
}

impl UiSettings {
    #[inline]
    pub fn update_interval(&self) -> Duration {
        secs(self.update_interval)
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            mode: ProjectionMode::default(),
            socket_name: String::from("Spine2Socket"),
            socket_offset: Vec3::new(0.0, 0.0, 50.0),
            bounds_height_ratio: 0.6,
            size_adaptive: true,
            body_part_offsets: HashMap::default(),
            update_interval: 1.0 / 30.0,
        }
    }
}

/// The lock-on indicator of a target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Indicator {
    pub target: EntityId,
    /// The screen position, or `None` if the indicator is hidden.
    pub screen: Option<Vec2>,
    pub body_part: BodyPart,
}

impl Indicator {
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.screen.is_some()
    }
}

#[derive(Debug)]
pub struct UiProjectionAdapter {
    settings: UiSettings,
    interval: Interval,
    indicator: Option<Indicator>,
}

impl UiProjectionAdapter {
    pub fn new(settings: UiSettings) -> Self {
        Self {
            interval: Interval::new(settings.update_interval()),
            settings,
            indicator: None,
        }
    }

    pub fn settings(&self) -> &UiSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: UiSettings) {
        self.interval.set_timestep(settings.update_interval());
        self.interval.reset();
        self.settings = settings;
    }

    /// Returns the last computed indicator.
    #[inline]
    pub fn indicator(&self) -> Option<&Indicator> {
        self.indicator.as_ref()
    }

    /// Returns the world location the indicator of `target` is attached to.
    pub fn projection_point(&self, agent: Vec3, target: &Actor) -> Vec3 {
        let settings = &self.settings;
        let socket = target.socket_location(&settings.socket_name);

        let bounds_point = || {
            let bounds = target.bounds();
            bounds.center + Vec3::new(0.0, 0.0, bounds.extents.z * settings.bounds_height_ratio)
        };

        let mut point = match settings.mode {
            ProjectionMode::Socket => socket.unwrap_or(target.location()) + settings.socket_offset,
            ProjectionMode::ActorCenter => target.location(),
            ProjectionMode::BoundsCenter => bounds_point(),
            ProjectionMode::CustomOffset => target.location() + settings.socket_offset,
            ProjectionMode::Hybrid => match socket {
                Some(socket) => socket + settings.socket_offset,
                None => {
                    let mut point = bounds_point() + settings.socket_offset;
                    if settings.size_adaptive {
                        point.z += match SizeCategory::classify(target.bounds()) {
                            SizeCategory::Small => -30.0,
                            SizeCategory::Large | SizeCategory::Giant => 50.0,
                            SizeCategory::Medium | SizeCategory::Unknown => 0.0,
                        };
                    }
                    point
                }
            },
        };

        let part = BodyPart::best(agent, target.location());
        if let Some(offset) = settings.body_part_offsets.get(&part) {
            point += *offset;
        }

        point
    }

    /// Updates the indicator for `target`.
    ///
    /// The projection only runs when the target changed or the update
    /// interval elapsed. Otherwise the previous indicator is returned.
    pub fn update<P>(
        &mut self,
        now: Duration,
        projector: &P,
        view: &CameraView,
        agent: Vec3,
        world: &World,
        target: Option<EntityId>,
    ) -> Option<&Indicator>
    where
        P: ?Sized + ScreenProjector,
    {
        let Some(target) = target else {
            self.hide();
            return None;
        };

        let changed = self.indicator.map(|indicator| indicator.target) != Some(target);
        if changed {
            self.interval.reset();
        }

        if !self.interval.is_ready(now) {
            return self.indicator.as_ref();
        }

        let Some(actor) = world.get_alive(target) else {
            self.hide();
            return None;
        };

        let point = self.projection_point(agent, actor);
        let screen = projector.project_to_screen(view, point).or_else(|| {
            tracing::trace!("indicator point of {:?} not on screen, retrying at center", target);
            projector.project_to_screen(view, actor.location())
        });

        self.indicator = Some(Indicator {
            target,
            screen,
            body_part: BodyPart::best(agent, actor.location()),
        });
        self.indicator.as_ref()
    }

    /// Removes the indicator.
    pub fn hide(&mut self) {
        self.indicator = None;
        self.interval.reset();
    }
}
