//! Target search and scoring.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use ahash::RandomState;
use game_common::entity::EntityId;
use game_common::world::{Actor, World};
use game_core::counter::Interval;
use glam::Vec3;

use crate::geometry::Viewer;
use crate::sensor::{LineOfSight, Sensor};
use crate::settings::LockOnSettings;
use crate::size::{SizeCache, SizeCategory};

/// The score of a target that must never be selected.
///
/// Lower than any score a valid target can have.
pub const REJECT_SCORE: f32 = f32::MIN;

/// Targets closer than this are penalized when scoring.
const CLOSE_DISTANCE: f32 = 50.0;
const CLOSE_PENALTY: f32 = 0.5;

const ANGLE_WEIGHT: f32 = 0.7;
const DISTANCE_WEIGHT: f32 = 0.3;

/// The maximum number of undrained events. The oldest event is dropped once
/// the queue is full.
pub const MAX_PENDING_EVENTS: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetectionEvent {
    /// The candidate list was replaced. Contains the new candidates sorted
    /// from left to right.
    CandidatesUpdated(Vec<EntityId>),
    /// A target was classified for the first time.
    ValidTargetFound {
        target: EntityId,
        size: SizeCategory,
    },
}

/// Finds lock-on candidates around a [`Viewer`].
///
/// The candidate list is only refreshed by [`update`] and
/// [`refresh_candidates`]. Between refreshes the handles in the list may stop
/// resolving, so every query validates them again.
///
/// [`update`]: Self::update
/// [`refresh_candidates`]: Self::refresh_candidates
#[derive(Clone, Debug)]
pub struct TargetDetector {
    settings: LockOnSettings,
    candidates: Vec<EntityId>,
    sizes: SizeCache,
    search: Interval,
    size_update: Interval,
    events: VecDeque<DetectionEvent>,
}

impl TargetDetector {
    pub fn new(settings: LockOnSettings) -> Self {
        Self {
            search: Interval::new(settings.search_interval()),
            size_update: Interval::new(settings.size_update_interval()),
            settings,
            candidates: Vec::new(),
            sizes: SizeCache::new(),
            events: VecDeque::new(),
        }
    }

    #[inline]
    pub fn settings(&self) -> &LockOnSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: LockOnSettings) {
        self.search.set_timestep(settings.search_interval());
        self.size_update
            .set_timestep(settings.size_update_interval());
        self.settings = settings;
    }

    /// Returns the current candidates sorted from left to right.
    #[inline]
    pub fn candidates(&self) -> &[EntityId] {
        &self.candidates
    }

    /// Returns the size cache.
    #[inline]
    pub fn sizes(&self) -> &SizeCache {
        &self.sizes
    }

    /// Runs the interval gated search and size cache maintenance.
    ///
    /// Nothing is done while `switching` is set, since the look direction the
    /// candidates are sorted by is still rotating. Returns `true` if the
    /// candidates were refreshed.
    pub fn update<S, L>(
        &mut self,
        now: Duration,
        viewer: &Viewer,
        world: &World,
        sensor: &S,
        los: &L,
        switching: bool,
    ) -> bool
    where
        S: Sensor,
        L: LineOfSight,
    {
        let _span = tracing::trace_span!("TargetDetector::update").entered();

        if switching {
            return false;
        }

        let refreshed = if self.search.is_ready(now) {
            self.refresh_candidates(viewer, world, sensor, los);
            true
        } else {
            false
        };

        if self.size_update.is_ready(now) {
            self.update_sizes(world);
        }

        refreshed
    }

    /// Queries the sensor and replaces the candidate list with all valid
    /// targets sorted by their direction from left to right.
    pub fn refresh_candidates<S, L>(&mut self, viewer: &Viewer, world: &World, sensor: &S, los: &L)
    where
        S: Sensor,
        L: LineOfSight,
    {
        let _span = tracing::trace_span!("TargetDetector::refresh_candidates").entered();

        let mut candidates: Vec<(EntityId, f32)> = sensor
            .overlapping(world, viewer.position, self.settings.lock_on_range)
            .into_iter()
            .filter(|id| self.is_valid_target(viewer, world, los, *id))
            .filter_map(|id| {
                let actor = world.get(id)?;
                Some((id, viewer.direction_to(actor.location())))
            })
            .collect();

        candidates.sort_by(|(_, a), (_, b)| a.total_cmp(b));

        let candidates: Vec<EntityId> = candidates.into_iter().map(|(id, _)| id).collect();
        if candidates.len() != self.candidates.len() {
            tracing::debug!("found {} lock-on candidates", candidates.len());
        }

        self.candidates = candidates.clone();
        self.push_event(DetectionEvent::CandidatesUpdated(candidates));
    }

    /// Returns the actor of `target` if it may be targeted at all, regardless
    /// of range or visibility.
    pub fn validate_target<'a>(
        &self,
        viewer: &Viewer,
        world: &'a World,
        target: EntityId,
    ) -> Option<&'a Actor> {
        if target == viewer.entity {
            return None;
        }

        let actor = world.get_alive(target)?;
        if self
            .settings
            .excluded_tags
            .iter()
            .any(|tag| actor.has_tag(tag))
        {
            return None;
        }

        Some(actor)
    }

    /// Returns `true` if `target` may become a new lock-on target.
    pub fn is_valid_target<L>(&self, viewer: &Viewer, world: &World, los: &L, target: EntityId) -> bool
    where
        L: LineOfSight,
    {
        let Some(actor) = self.validate_target(viewer, world, target) else {
            return false;
        };

        let location = actor.location();
        if viewer.position.distance(location) > self.settings.lock_on_range {
            return false;
        }

        let offset = Vec3::new(0.0, 0.0, self.settings.raycast_height_offset);
        los.trace_visible(
            world,
            viewer.position + offset,
            location + offset,
            viewer.entity,
            target,
        )
    }

    /// Returns `true` if an existing lock on `target` may be kept.
    ///
    /// Compared to [`is_valid_target`] the range is extended and neither the
    /// angle nor visibility are checked.
    ///
    /// [`is_valid_target`]: Self::is_valid_target
    pub fn still_lockable(&self, viewer: &Viewer, world: &World, target: EntityId) -> bool {
        let Some(actor) = self.validate_target(viewer, world, target) else {
            return false;
        };

        viewer.position.distance(actor.location()) <= self.settings.extended_range()
    }

    /// Scores `target` by how centered and how close it is. Higher is better.
    ///
    /// Returns [`REJECT_SCORE`] if the target can not be scored.
    pub fn score(&self, viewer: &Viewer, world: &World, target: EntityId) -> f32 {
        let range = self.settings.lock_on_range;
        if range <= 0.0 {
            return REJECT_SCORE;
        }

        let Some(actor) = world.get_alive(target) else {
            return REJECT_SCORE;
        };

        let offset = actor.location() - viewer.position;
        let distance = offset.length();

        let angle_factor = viewer.forward().dot(offset.normalize_or_zero());
        let distance_factor = 1.0 - (distance / range).sqrt();

        let mut score = ANGLE_WEIGHT * angle_factor + DISTANCE_WEIGHT * distance_factor;
        if distance < CLOSE_DISTANCE {
            score -= CLOSE_PENALTY;
        }

        if score.is_nan() {
            REJECT_SCORE
        } else {
            score
        }
    }

    /// Returns the target with the highest score from `targets`.
    pub fn best_from(&self, viewer: &Viewer, world: &World, targets: &[EntityId]) -> Option<EntityId> {
        let mut best = None;
        let mut best_score = REJECT_SCORE;

        for target in targets {
            let score = self.score(viewer, world, *target);
            if score > best_score {
                best = Some(*target);
                best_score = score;
            }
        }

        best
    }

    /// Returns the candidates within half the sector angle of the look
    /// direction.
    pub fn sector_targets(&self, viewer: &Viewer, world: &World) -> Vec<EntityId> {
        let half = self.settings.sector_lock_angle / 2.0;
        self.candidates_within(viewer, world, |angle| angle <= half)
    }

    /// Returns the candidates outside of the sector but within half the edge
    /// detection angle.
    pub fn edge_targets(&self, viewer: &Viewer, world: &World) -> Vec<EntityId> {
        let sector = self.settings.sector_lock_angle / 2.0;
        let edge = self.settings.edge_detection_angle / 2.0;
        self.candidates_within(viewer, world, |angle| angle > sector && angle <= edge)
    }

    /// Returns the best target in the sector, falling back to the best target
    /// in the edge zone.
    pub fn best_in_sector(&self, viewer: &Viewer, world: &World) -> Option<EntityId> {
        let _span = tracing::trace_span!("TargetDetector::best_in_sector").entered();

        self.try_sector_target(viewer, world).or_else(|| {
            let edge = self.edge_targets(viewer, world);
            self.best_from(viewer, world, &edge)
        })
    }

    /// Returns the best target in the sector only.
    pub fn try_sector_target(&self, viewer: &Viewer, world: &World) -> Option<EntityId> {
        let sector = self.sector_targets(viewer, world);
        self.best_from(viewer, world, &sector)
    }

    /// Returns the closest candidate if the camera may be corrected towards
    /// it.
    ///
    /// Returns `None` if the closest candidate is too far behind the look
    /// direction, even if other candidates are within the limit.
    pub fn camera_correction_target(&self, viewer: &Viewer, world: &World) -> Option<EntityId> {
        let (id, location) = self
            .candidates
            .iter()
            .filter_map(|id| {
                let actor = self.validate_target(viewer, world, *id)?;
                Some((*id, actor.location()))
            })
            .min_by(|(_, a), (_, b)| {
                viewer
                    .position
                    .distance_squared(*a)
                    .total_cmp(&viewer.position.distance_squared(*b))
            })?;

        (viewer.angle_to(location) <= self.settings.correction_max_angle).then_some(id)
    }

    /// Returns the size of `target`, classifying and caching it on first use.
    ///
    /// Targets that do not resolve report their cached size, or
    /// [`SizeCategory::Unknown`].
    pub fn size_category(&mut self, world: &World, target: EntityId) -> SizeCategory {
        let Some(actor) = world.get(target) else {
            return self.sizes.get(target).unwrap_or_default();
        };

        let (size, is_new) = self.sizes.get_or_classify(target, actor.bounds());
        if is_new {
            tracing::trace!("classified {:?} as {:?}", target, size);
            self.push_event(DetectionEvent::ValidTargetFound { target, size });
        }

        size
    }

    /// Returns all current candidates of the given `size`.
    pub fn targets_by_size(&mut self, world: &World, size: SizeCategory) -> Vec<EntityId> {
        let candidates = self.live_candidates(world);
        candidates
            .into_iter()
            .filter(|id| self.size_category(world, *id) == size)
            .collect()
    }

    /// Returns the closest current candidate of the given `size`.
    pub fn nearest_by_size(
        &mut self,
        viewer: &Viewer,
        world: &World,
        size: SizeCategory,
    ) -> Option<EntityId> {
        self.targets_by_size(world, size)
            .into_iter()
            .filter_map(|id| {
                let actor = world.get(id)?;
                Some((id, viewer.position.distance_squared(actor.location())))
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(id, _)| id)
    }

    /// Counts the current candidates per size. Every category is present in
    /// the result, including those without candidates.
    pub fn size_statistics(&mut self, world: &World) -> HashMap<SizeCategory, usize, RandomState> {
        let mut stats: HashMap<_, _, RandomState> =
            SizeCategory::ALL.iter().map(|size| (*size, 0)).collect();

        for id in self.live_candidates(world) {
            let size = self.size_category(world, id);
            *stats.entry(size).or_default() += 1;
        }

        stats
    }

    pub fn pop_event(&mut self) -> Option<DetectionEvent> {
        self.events.pop_front()
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = DetectionEvent> + '_ {
        self.events.drain(..)
    }

    /// Drops all candidates and cached sizes.
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.sizes.clear();
        self.search.reset();
        self.size_update.reset();
    }

    /// Queues `event`. An undrained candidate update is replaced by the newer
    /// one.
    fn push_event(&mut self, event: DetectionEvent) {
        if let DetectionEvent::CandidatesUpdated(_) = event {
            self.events
                .retain(|event| !matches!(event, DetectionEvent::CandidatesUpdated(_)));
        }

        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }

        self.events.push_back(event);
    }

    fn update_sizes(&mut self, world: &World) {
        let removed = self.sizes.cleanup(world);
        if removed != 0 {
            tracing::trace!("removed {} stale size cache entries", removed);
        }

        for id in self.live_candidates(world) {
            self.size_category(world, id);
        }
    }

    fn live_candidates(&self, world: &World) -> Vec<EntityId> {
        self.candidates
            .iter()
            .copied()
            .filter(|id| world.get_alive(*id).is_some())
            .collect()
    }

    fn candidates_within<F>(&self, viewer: &Viewer, world: &World, f: F) -> Vec<EntityId>
    where
        F: Fn(f32) -> bool,
    {
        self.candidates
            .iter()
            .copied()
            .filter(|id| {
                self.validate_target(viewer, world, *id)
                    .is_some_and(|actor| f(viewer.angle_to(actor.location())))
            })
            .collect()
    }
}

impl Default for TargetDetector {
    fn default() -> Self {
        Self::new(LockOnSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use game_common::entity::EntityId;
    use game_common::math::Rotation;
    use game_common::world::{Actor, World};
    use glam::Vec3;

    use super::{DetectionEvent, TargetDetector, MAX_PENDING_EVENTS, REJECT_SCORE};
    use crate::geometry::Viewer;
    use crate::sensor::{Occluder, RadiusSensor, SphereOccluders, Unobstructed};
    use crate::settings::LockOnSettings;
    use crate::size::SizeCategory;

    fn setup() -> (World, Viewer) {
        let mut world = World::new();
        let agent = world.spawn(Actor::new("agent", Vec3::ZERO).with_tag("Player"));

        let viewer = Viewer {
            entity: agent,
            position: Vec3::ZERO,
            look: Rotation::ZERO,
        };

        (world, viewer)
    }

    fn refresh(detector: &mut TargetDetector, viewer: &Viewer, world: &World) {
        detector.refresh_candidates(viewer, world, &RadiusSensor, &Unobstructed);
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let (mut world, viewer) = setup();
        let at_range = world.spawn(Actor::new("a", Vec3::new(2000.0, 0.0, 0.0)));
        let beyond = world.spawn(Actor::new("b", Vec3::new(0.0, 2000.01, 0.0)));

        let detector = TargetDetector::default();
        assert!(detector.is_valid_target(&viewer, &world, &Unobstructed, at_range));
        assert!(!detector.is_valid_target(&viewer, &world, &Unobstructed, beyond));
    }

    #[test]
    fn excludes_self_and_tags() {
        let (mut world, viewer) = setup();
        let friendly = world.spawn(Actor::new("friend", Vec3::new(100.0, 0.0, 0.0)).with_tag("Friendly"));
        let enemy = world.spawn(Actor::new("enemy", Vec3::new(100.0, 10.0, 0.0)));

        let mut detector = TargetDetector::default();
        refresh(&mut detector, &viewer, &world);

        assert_eq!(detector.candidates(), [enemy]);
        assert!(!detector.is_valid_target(&viewer, &world, &Unobstructed, viewer.entity));
        assert!(!detector.is_valid_target(&viewer, &world, &Unobstructed, friendly));
    }

    #[test]
    fn excludes_pending_destroy() {
        let (mut world, viewer) = setup();
        let enemy = world.spawn(Actor::new("enemy", Vec3::new(100.0, 0.0, 0.0)));
        world.get_mut(enemy).unwrap().pending_destroy = true;

        let mut detector = TargetDetector::default();
        refresh(&mut detector, &viewer, &world);
        assert!(detector.candidates().is_empty());
        assert!(!detector.still_lockable(&viewer, &world, enemy));
    }

    #[test]
    fn candidates_sorted_left_to_right() {
        let (mut world, viewer) = setup();
        let right = world.spawn(Actor::new("right", Vec3::new(500.0, 300.0, 0.0)));
        let center = world.spawn(Actor::new("center", Vec3::new(500.0, 0.0, 0.0)));
        let left = world.spawn(Actor::new("left", Vec3::new(500.0, -300.0, 0.0)));

        let mut detector = TargetDetector::default();
        refresh(&mut detector, &viewer, &world);

        assert_eq!(detector.candidates(), [left, center, right]);
        assert_eq!(
            detector.pop_event(),
            Some(DetectionEvent::CandidatesUpdated(vec![left, center, right]))
        );
    }

    #[test]
    fn occluder_blocks_unless_owned_by_target() {
        let (mut world, viewer) = setup();
        let hidden = world.spawn(Actor::new("hidden", Vec3::new(1000.0, 0.0, 0.0)));
        let shielded = world.spawn(Actor::new("shielded", Vec3::new(0.0, 1000.0, 0.0)));

        let occluders: SphereOccluders = [
            Occluder::new(Vec3::new(500.0, 0.0, 50.0), 100.0),
            Occluder::new(Vec3::new(0.0, 1000.0, 50.0), 80.0).with_owner(shielded),
        ]
        .into_iter()
        .collect();

        let detector = TargetDetector::default();
        assert!(!detector.is_valid_target(&viewer, &world, &occluders, hidden));
        assert!(detector.is_valid_target(&viewer, &world, &occluders, shielded));
    }

    #[test]
    fn score_prefers_centered_targets() {
        let (mut world, viewer) = setup();
        let centered = world.spawn(Actor::new("centered", Vec3::new(500.0, 0.0, 0.0)));
        let side = world.spawn(Actor::new("side", Vec3::new(0.0, 500.0, 0.0)));
        let close = world.spawn(Actor::new("close", Vec3::new(20.0, 0.0, 0.0)));

        let detector = TargetDetector::default();
        let score_centered = detector.score(&viewer, &world, centered);
        let score_side = detector.score(&viewer, &world, side);

        assert!(score_centered > score_side);
        // The close penalty outweighs the distance bonus.
        assert!(detector.score(&viewer, &world, close) < score_centered);
        assert_eq!(
            detector.best_from(&viewer, &world, &[side, centered, close]),
            Some(centered)
        );
    }

    #[test]
    fn score_sentinel() {
        let (mut world, viewer) = setup();
        let target = world.spawn(Actor::new("target", Vec3::new(500.0, 0.0, 0.0)));
        let gone = world.spawn(Actor::new("gone", Vec3::new(500.0, 0.0, 0.0)));
        world.despawn(gone);

        let detector = TargetDetector::default();
        assert_eq!(detector.score(&viewer, &world, gone), REJECT_SCORE);
        assert_eq!(detector.best_from(&viewer, &world, &[gone]), None);

        let detector = TargetDetector::new(LockOnSettings {
            lock_on_range: 0.0,
            ..Default::default()
        });
        assert_eq!(detector.score(&viewer, &world, target), REJECT_SCORE);
        assert_eq!(detector.best_from(&viewer, &world, &[target]), None);
    }

    #[test]
    fn target_behind_is_in_no_zone() {
        let (mut world, viewer) = setup();
        let behind = world.spawn(Actor::new("behind", Vec3::new(-500.0, 0.0, 0.0)));

        let mut detector = TargetDetector::default();
        refresh(&mut detector, &viewer, &world);
        assert_eq!(detector.candidates(), [behind]);

        assert!(detector.sector_targets(&viewer, &world).is_empty());
        assert!(detector.edge_targets(&viewer, &world).is_empty());
        assert_eq!(detector.best_in_sector(&viewer, &world), None);
    }

    #[test]
    fn best_in_sector_falls_back_to_edge() {
        let (mut world, viewer) = setup();
        // 70 degrees to the right: outside the 60 degree sector, inside the
        // 75 degree edge.
        let yaw = 70.0_f32.to_radians();
        let edge = world.spawn(Actor::new(
            "edge",
            Vec3::new(yaw.cos() * 500.0, yaw.sin() * 500.0, 0.0),
        ));

        let mut detector = TargetDetector::default();
        refresh(&mut detector, &viewer, &world);

        assert_eq!(detector.try_sector_target(&viewer, &world), None);
        assert_eq!(detector.best_in_sector(&viewer, &world), Some(edge));

        let sector = world.spawn(Actor::new("sector", Vec3::new(800.0, 100.0, 0.0)));
        refresh(&mut detector, &viewer, &world);
        assert_eq!(detector.best_in_sector(&viewer, &world), Some(sector));
    }

    #[test]
    fn still_lockable_uses_extended_range() {
        let (mut world, viewer) = setup();
        let target = world.spawn(Actor::new("target", Vec3::new(2300.0, 0.0, 0.0)));
        let far = world.spawn(Actor::new("far", Vec3::new(2500.0, 0.0, 0.0)));

        let detector = TargetDetector::default();
        assert!(!detector.is_valid_target(&viewer, &world, &Unobstructed, target));
        assert!(detector.still_lockable(&viewer, &world, target));
        assert!(!detector.still_lockable(&viewer, &world, far));
    }

    #[test]
    fn camera_correction_picks_closest() {
        let (mut world, viewer) = setup();
        world.spawn(Actor::new("near", Vec3::new(-300.0, 10.0, 0.0)));
        world.spawn(Actor::new("far", Vec3::new(900.0, 0.0, 0.0)));

        let mut detector = TargetDetector::default();
        refresh(&mut detector, &viewer, &world);

        // The closest candidate is almost directly behind, beyond the 160
        // degree limit. The target ahead is not considered instead.
        assert_eq!(detector.camera_correction_target(&viewer, &world), None);

        let side = world.spawn(Actor::new("side", Vec3::new(0.0, 200.0, 0.0)));
        refresh(&mut detector, &viewer, &world);
        assert_eq!(detector.camera_correction_target(&viewer, &world), Some(side));
    }

    #[test]
    fn size_queries() {
        let (mut world, viewer) = setup();
        let small = world.spawn(
            Actor::new("small", Vec3::new(300.0, 0.0, 0.0)).with_extents(Vec3::new(15.0, 15.0, 40.0)),
        );
        let giant_near = world.spawn(
            Actor::new("giant near", Vec3::new(600.0, 0.0, 0.0)).with_extents(Vec3::new(100.0, 100.0, 300.0)),
        );
        let giant_far = world.spawn(
            Actor::new("giant far", Vec3::new(1200.0, 0.0, 0.0)).with_extents(Vec3::new(100.0, 100.0, 300.0)),
        );

        let mut detector = TargetDetector::default();
        refresh(&mut detector, &viewer, &world);

        assert_eq!(detector.size_category(&world, small), SizeCategory::Small);

        let giants = detector.targets_by_size(&world, SizeCategory::Giant);
        assert_eq!(giants.len(), 2);
        assert!(giants.contains(&giant_far));
        assert_eq!(
            detector.nearest_by_size(&viewer, &world, SizeCategory::Giant),
            Some(giant_near)
        );

        let stats = detector.size_statistics(&world);
        assert_eq!(stats[&SizeCategory::Small], 1);
        assert_eq!(stats[&SizeCategory::Giant], 2);
        assert_eq!(stats[&SizeCategory::Large], 0);
        assert_eq!(stats.len(), SizeCategory::ALL.len());
    }

    #[test]
    fn first_classification_emits_event() {
        let (mut world, _) = setup();
        let target = world.spawn(Actor::new("target", Vec3::new(300.0, 0.0, 0.0)));

        let mut detector = TargetDetector::default();
        detector.size_category(&world, target);
        detector.size_category(&world, target);

        let found: Vec<EntityId> = detector
            .drain_events()
            .filter_map(|event| match event {
                DetectionEvent::ValidTargetFound { target, .. } => Some(target),
                _ => None,
            })
            .collect();
        assert_eq!(found, [target]);
    }

    #[test]
    fn update_is_interval_gated() {
        let (mut world, viewer) = setup();
        world.spawn(Actor::new("target", Vec3::new(300.0, 0.0, 0.0)));

        let mut detector = TargetDetector::default();
        let mut update = |now, switching| {
            detector.update(now, &viewer, &world, &RadiusSensor, &Unobstructed, switching)
        };

        assert!(update(Duration::ZERO, false));
        assert!(!update(Duration::from_millis(50), false));
        assert!(!update(Duration::from_millis(150), true));
        assert!(update(Duration::from_millis(160), false));
    }

    #[test]
    fn undrained_events_are_bounded() {
        let (mut world, viewer) = setup();
        let target = world.spawn(Actor::new("target", Vec3::new(300.0, 0.0, 0.0)));

        let mut detector = TargetDetector::default();
        for frame in 0..1000 {
            let now = Duration::from_millis(frame * 100);
            detector.update(now, &viewer, &world, &RadiusSensor, &Unobstructed, false);
        }

        // Only the latest candidate update is kept.
        let events: Vec<DetectionEvent> = detector.drain_events().collect();
        assert_eq!(
            events,
            [
                DetectionEvent::ValidTargetFound {
                    target,
                    size: SizeCategory::Medium,
                },
                DetectionEvent::CandidatesUpdated(vec![target]),
            ]
        );

        for index in 0..(MAX_PENDING_EVENTS * 2) {
            let id = world.spawn(Actor::new("crowd", Vec3::new(300.0, index as f32, 0.0)));
            detector.size_category(&world, id);
        }
        assert_eq!(detector.drain_events().count(), MAX_PENDING_EVENTS);
    }

    #[test]
    fn size_cache_cleaned_on_update() {
        let (mut world, viewer) = setup();
        let target = world.spawn(Actor::new("target", Vec3::new(300.0, 0.0, 0.0)));

        let mut detector = TargetDetector::default();
        detector.update(Duration::ZERO, &viewer, &world, &RadiusSensor, &Unobstructed, false);
        assert_eq!(detector.sizes().len(), 1);

        world.despawn(target);
        detector.update(Duration::from_secs(1), &viewer, &world, &RadiusSensor, &Unobstructed, false);
        assert!(detector.sizes().is_empty());
        assert!(detector.candidates().is_empty());
    }
}
