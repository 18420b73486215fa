//! Overlap and visibility queries.
//!
//! The detector only depends on the [`Sensor`] and [`LineOfSight`] traits.
//! The implementations in this module resolve the queries against the plain
//! actor registry and a set of occluding spheres.

use game_common::entity::EntityId;
use game_common::world::World;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Finds the actors within a sphere.
pub trait Sensor {
    fn overlapping(&self, world: &World, origin: Vec3, radius: f32) -> Vec<EntityId>;
}

/// The result of a visibility trace.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Trace {
    /// Nothing is between the two points.
    Clear,
    /// The trace was blocked, optionally by an entity.
    Hit(Option<EntityId>),
}

/// Traces a segment between two points for blocking geometry.
pub trait LineOfSight {
    /// Traces from `from` to `to`. Geometry owned by `ignore` never blocks.
    fn trace(&self, world: &World, from: Vec3, to: Vec3, ignore: EntityId) -> Trace;

    /// Returns `true` if `target` can be seen from `from`.
    ///
    /// A trace that is blocked by `target` itself counts as visible.
    fn trace_visible(
        &self,
        world: &World,
        from: Vec3,
        to: Vec3,
        ignore: EntityId,
        target: EntityId,
    ) -> bool {
        match self.trace(world, from, to, ignore) {
            Trace::Clear => true,
            Trace::Hit(hit) => hit == Some(target),
        }
    }
}

impl<T> Sensor for &T
where
    T: Sensor + ?Sized,
{
    #[inline]
    fn overlapping(&self, world: &World, origin: Vec3, radius: f32) -> Vec<EntityId> {
        (**self).overlapping(world, origin, radius)
    }
}

impl<T> LineOfSight for &T
where
    T: LineOfSight + ?Sized,
{
    #[inline]
    fn trace(&self, world: &World, from: Vec3, to: Vec3, ignore: EntityId) -> Trace {
        (**self).trace(world, from, to, ignore)
    }
}

/// A [`Sensor`] returning every actor whose location is within the radius.
#[derive(Copy, Clone, Debug, Default)]
pub struct RadiusSensor;

impl Sensor for RadiusSensor {
    fn overlapping(&self, world: &World, origin: Vec3, radius: f32) -> Vec<EntityId> {
        let radius_squared = radius * radius;

        world
            .iter()
            .filter(|(_, actor)| actor.location().distance_squared(origin) <= radius_squared)
            .map(|(id, _)| id)
            .collect()
    }
}

/// A [`LineOfSight`] that never blocks.
#[derive(Copy, Clone, Debug, Default)]
pub struct Unobstructed;

impl LineOfSight for Unobstructed {
    #[inline]
    fn trace(&self, _world: &World, _from: Vec3, _to: Vec3, _ignore: EntityId) -> Trace {
        Trace::Clear
    }
}

/// A sphere blocking line of sight.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Occluder {
    pub center: Vec3,
    pub radius: f32,
    /// The entity the sphere belongs to, if any.
    #[serde(skip)]
    pub owner: Option<EntityId>,
}

impl Occluder {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            owner: None,
        }
    }

    pub fn with_owner(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Returns the fraction along the segment `from` to `to` where it first
    /// enters the sphere. A segment starting inside the sphere hits at `0`.
    pub fn intersect(&self, from: Vec3, to: Vec3) -> Option<f32> {
        let dir = to - from;
        let offset = from - self.center;

        let c = offset.length_squared() - self.radius * self.radius;
        if c <= 0.0 {
            return Some(0.0);
        }

        let a = dir.length_squared();
        if a == 0.0 {
            return None;
        }

        let b = 2.0 * offset.dot(dir);
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let t = (-b - discriminant.sqrt()) / (2.0 * a);
        (0.0..=1.0).contains(&t).then_some(t)
    }
}

/// A [`LineOfSight`] blocked by a list of [`Occluder`] spheres.
#[derive(Clone, Debug, Default)]
pub struct SphereOccluders {
    occluders: Vec<Occluder>,
}

impl SphereOccluders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, occluder: Occluder) {
        self.occluders.push(occluder);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Occluder> + '_ {
        self.occluders.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.occluders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occluders.is_empty()
    }
}

impl FromIterator<Occluder> for SphereOccluders {
    fn from_iter<T: IntoIterator<Item = Occluder>>(iter: T) -> Self {
        Self {
            occluders: iter.into_iter().collect(),
        }
    }
}

impl LineOfSight for SphereOccluders {
    fn trace(&self, _world: &World, from: Vec3, to: Vec3, ignore: EntityId) -> Trace {
        let _span = tracing::trace_span!("SphereOccluders::trace").entered();

        let mut nearest: Option<(f32, &Occluder)> = None;
        for occluder in &self.occluders {
            if occluder.owner == Some(ignore) {
                continue;
            }

            let Some(t) = occluder.intersect(from, to) else {
                continue;
            };

            if nearest.map_or(true, |(toi, _)| t < toi) {
                nearest = Some((t, occluder));
            }
        }

        match nearest {
            Some((_, occluder)) => Trace::Hit(occluder.owner),
            None => Trace::Clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use game_common::world::{Actor, World};
    use glam::Vec3;

    use super::{LineOfSight, Occluder, RadiusSensor, Sensor, SphereOccluders, Trace};

    #[test]
    fn radius_sensor_inclusive() {
        let mut world = World::new();
        let inside = world.spawn(Actor::new("inside", Vec3::new(100.0, 0.0, 0.0)));
        let edge = world.spawn(Actor::new("edge", Vec3::new(0.0, 200.0, 0.0)));
        let outside = world.spawn(Actor::new("outside", Vec3::new(0.0, 0.0, 201.0)));

        let found = RadiusSensor.overlapping(&world, Vec3::ZERO, 200.0);
        assert!(found.contains(&inside));
        assert!(found.contains(&edge));
        assert!(!found.contains(&outside));
    }

    #[test]
    fn occluder_intersection() {
        let occluder = Occluder::new(Vec3::new(50.0, 0.0, 0.0), 10.0);

        let t = occluder.intersect(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0));
        assert_eq!(t, Some(0.4));

        // Passes beside the sphere.
        assert_eq!(occluder.intersect(Vec3::new(0.0, 20.0, 0.0), Vec3::new(100.0, 20.0, 0.0)), None);
        // Stops before the sphere.
        assert_eq!(occluder.intersect(Vec3::ZERO, Vec3::new(30.0, 0.0, 0.0)), None);
        // Starts inside.
        assert_eq!(occluder.intersect(Vec3::new(50.0, 0.0, 0.0), Vec3::ZERO), Some(0.0));
    }

    #[test]
    fn trace_reports_nearest_owner() {
        let mut world = World::new();
        let agent = world.spawn(Actor::new("agent", Vec3::ZERO));
        let near = world.spawn(Actor::new("near", Vec3::new(30.0, 0.0, 0.0)));
        let far = world.spawn(Actor::new("far", Vec3::new(70.0, 0.0, 0.0)));

        let occluders: SphereOccluders = [
            Occluder::new(Vec3::new(70.0, 0.0, 0.0), 5.0).with_owner(far),
            Occluder::new(Vec3::new(30.0, 0.0, 0.0), 5.0).with_owner(near),
        ]
        .into_iter()
        .collect();

        let to = Vec3::new(100.0, 0.0, 0.0);
        assert_eq!(occluders.trace(&world, Vec3::ZERO, to, agent), Trace::Hit(Some(near)));

        assert!(occluders.trace_visible(&world, Vec3::ZERO, to, agent, near));
        assert!(!occluders.trace_visible(&world, Vec3::ZERO, to, agent, far));
    }

    #[test]
    fn trace_ignores_own_geometry() {
        let mut world = World::new();
        let agent = world.spawn(Actor::new("agent", Vec3::ZERO));

        let occluders: SphereOccluders = [Occluder::new(Vec3::ZERO, 50.0).with_owner(agent)]
            .into_iter()
            .collect();

        assert_eq!(
            occluders.trace(&world, Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), agent),
            Trace::Clear
        );
    }
}
