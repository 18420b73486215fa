//! The per-agent lock-on system tying detection, camera and UI together.

use std::time::Duration;

use game_common::entity::EntityId;
use game_common::world::World;
use game_core::time::Time;
use game_targeting::detection::{DetectionEvent, TargetDetector};
use game_targeting::geometry::Viewer;
use game_targeting::sensor::{LineOfSight, Sensor};
use game_targeting::settings::LockOnSettings;
use serde::{Deserialize, Serialize};

use crate::controller::{CameraController, LockState};
use crate::events::{CameraEvent, EventKind};
use crate::presets::{CameraPresets, SettingsSource};
use crate::profile::ProfileOverrides;
use crate::projection::{CameraView, Indicator, ScreenProjector, UiProjectionAdapter, UiSettings};
use crate::rig::RigConfig;
use crate::settings::{AdvancedCameraSettings, CameraSettings, FreeLookSettings};

/// Stick deflection needed to switch targets.
pub const THUMBSTICK_THRESHOLD: f32 = 0.7;

/// All settings of a [`LockOnSystem`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockOnConfig {
    pub targeting: LockOnSettings,
    pub camera: CameraSettings,
    pub advanced: AdvancedCameraSettings,
    pub free_look: FreeLookSettings,
    pub rig: RigConfig,
    pub overrides: ProfileOverrides,
    pub ui: UiSettings,
}

/// The player input of a single frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Horizontal look input.
    pub turn: f32,
    /// Vertical look input.
    pub look_up: f32,
    pub is_moving: bool,
    /// Horizontal deflection of the switch stick in `[-1, 1]`.
    pub switch_axis: f32,
    /// The lock button was pressed this frame.
    pub toggle_lock: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum Stick {
    #[default]
    Neutral,
    Left,
    Right,
}

impl Stick {
    fn from_axis(x: f32) -> Self {
        if x < -THUMBSTICK_THRESHOLD {
            Self::Left
        } else if x > THUMBSTICK_THRESHOLD {
            Self::Right
        } else {
            Self::Neutral
        }
    }
}

/// The lock-on system of a single agent.
///
/// The overlap queries, visibility traces and screen projection are supplied
/// by the `S`, `L` and `P` collaborators. Settings changes are polled from
/// `C` once per [`update`].
///
/// [`update`]: Self::update
#[derive(Debug)]
pub struct LockOnSystem<S, L, P, C = CameraPresets> {
    agent: EntityId,
    controller: CameraController,
    detector: TargetDetector,
    ui: UiProjectionAdapter,
    source: C,
    sensor: S,
    los: L,
    projector: P,
    time: Time,
    stick: Stick,
}

impl<S, L, P> LockOnSystem<S, L, P>
where
    S: Sensor,
    L: LineOfSight,
    P: ScreenProjector,
{
    /// Creates a new system for `agent` using the builtin [`CameraPresets`]
    /// as settings source.
    pub fn new(agent: EntityId, config: LockOnConfig, sensor: S, los: L, projector: P) -> Self {
        let mut system = Self {
            agent,
            controller: CameraController::new(agent),
            detector: TargetDetector::new(config.targeting.clone()),
            ui: UiProjectionAdapter::new(config.ui.clone()),
            source: CameraPresets::new(),
            sensor,
            los,
            projector,
            time: Time::new(),
            stick: Stick::Neutral,
        };
        system.apply_config(config);
        system
    }
}

impl<S, L, P, C> LockOnSystem<S, L, P, C>
where
    S: Sensor,
    L: LineOfSight,
    P: ScreenProjector,
    C: SettingsSource,
{
    /// Replaces the settings source.
    pub fn with_source<D>(self, source: D) -> LockOnSystem<S, L, P, D>
    where
        D: SettingsSource,
    {
        LockOnSystem {
            agent: self.agent,
            controller: self.controller,
            detector: self.detector,
            ui: self.ui,
            source,
            sensor: self.sensor,
            los: self.los,
            projector: self.projector,
            time: self.time,
            stick: self.stick,
        }
    }

    pub fn apply_config(&mut self, config: LockOnConfig) {
        self.detector.set_settings(config.targeting);
        self.controller.set_camera_settings(config.camera);
        self.controller.set_advanced_settings(config.advanced);
        self.controller.set_free_look_settings(config.free_look);
        self.controller.set_rig_config(config.rig);
        self.controller.set_overrides(config.overrides);
        self.ui.set_settings(config.ui);
    }

    #[inline]
    pub fn agent(&self) -> EntityId {
        self.agent
    }

    #[inline]
    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn controller(&self) -> &CameraController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut CameraController {
        &mut self.controller
    }

    pub fn detector(&self) -> &TargetDetector {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut TargetDetector {
        &mut self.detector
    }

    pub fn ui(&self) -> &UiProjectionAdapter {
        &self.ui
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut C {
        &mut self.source
    }

    #[inline]
    pub fn current_state(&self) -> LockState {
        self.controller.state()
    }

    #[inline]
    pub fn current_target(&self) -> Option<EntityId> {
        self.controller.target()
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, f: F)
    where
        F: FnMut(&CameraEvent) + 'static,
    {
        self.controller.events_mut().subscribe(kind, f);
    }

    /// Removes and returns all pending [`DetectionEvent`]s.
    pub fn detection_events(&mut self) -> impl Iterator<Item = DetectionEvent> + '_ {
        self.detector.drain_events()
    }

    /// Advances the system by one frame of length `delta`.
    ///
    /// Returns the lock-on indicator, if a target is locked.
    #[inline]
    pub fn update(&mut self, delta: Duration, input: &FrameInput, world: &mut World) -> Option<Indicator> {
        self.update_with(delta, input, world, |_, _| ())
    }

    /// Advances the system by one frame like [`update`], running `commands`
    /// once the frame began and before the input is handled.
    ///
    /// Locks and switches issued from `commands` see the clock and the agent
    /// location of this frame.
    ///
    /// [`update`]: Self::update
    pub fn update_with<F>(
        &mut self,
        delta: Duration,
        input: &FrameInput,
        world: &mut World,
        commands: F,
    ) -> Option<Indicator>
    where
        F: FnOnce(&mut Self, &mut World),
    {
        let _span = tracing::trace_span!("LockOnSystem::update").entered();

        self.time.update(delta);
        let now = self.time.elapsed();

        if let Some(update) = self.source.poll() {
            tracing::debug!("applying new camera settings");
            self.controller.set_camera_settings(update.camera);
            self.controller.set_advanced_settings(update.advanced);
        }

        let viewer = self.viewer(world)?;

        self.controller
            .begin_frame(&self.time, viewer.position, world.get(self.agent)?.rotation());

        self.detector.update(
            now,
            &viewer,
            world,
            &self.sensor,
            &self.los,
            self.controller.is_switching(),
        );

        commands(self, world);

        self.handle_player_input(input.turn, input.look_up);
        self.handle_player_movement(input.is_moving);
        if input.toggle_lock {
            self.toggle_lock(world);
        }
        self.handle_thumbstick(input.switch_axis, world);

        if let Some(target) = self.controller.target() {
            if !self.detector.still_lockable(&viewer, world, target) {
                tracing::debug!("{:?} is no longer lockable", target);
                self.clear_lock();
            }
        }

        self.controller.tick(world);

        let rotation = self.controller.rotation();
        let view = CameraView {
            location: self.controller.rig().camera_position(viewer.position, rotation),
            rotation,
        };
        let indicator = self
            .ui
            .update(
                now,
                &self.projector,
                &view,
                viewer.position,
                world,
                self.controller.target(),
            )
            .copied();

        if let Some(agent) = world.get_mut(self.agent) {
            agent.transform.rotation = self.controller.body_rotation();
        }

        indicator
    }

    /// Handles look input. While locked on the input moves the free look
    /// offset, otherwise it rotates the camera.
    pub fn handle_player_input(&mut self, turn: f32, look_up: f32) {
        self.controller.handle_player_input(turn, look_up);

        if self.controller.target().is_some() {
            let rate = self.controller.camera_settings().look_rate;
            self.controller
                .apply_free_look_input(turn * rate, look_up * rate);
        } else {
            self.controller.apply_look_input(turn, look_up);
        }
    }

    pub fn handle_player_movement(&mut self, is_moving: bool) {
        self.controller.handle_player_movement(is_moving);
    }

    /// Clears the lock if locked, otherwise locks on to the best target in
    /// the sector. Resets the camera if there is no such target.
    pub fn toggle_lock(&mut self, world: &World) {
        if self.controller.target().is_some() {
            self.clear_lock();
            return;
        }

        let Some(viewer) = self.viewer(world) else {
            return;
        };

        self.detector
            .refresh_candidates(&viewer, world, &self.sensor, &self.los);

        match self.detector.try_sector_target(&viewer, world) {
            Some(target) => {
                self.start_lock(target, world);
            }
            None => {
                tracing::debug!("no target in sector, resetting camera");
                self.controller.simple_reset();
            }
        }
    }

    /// Locks on to `target`.
    pub fn start_lock(&mut self, target: EntityId, world: &World) -> bool {
        let Some(viewer) = self.viewer(world) else {
            return false;
        };

        if self
            .detector
            .validate_target(&viewer, world, target)
            .is_none()
        {
            tracing::debug!("refusing to lock on to {:?}", target);
            return false;
        }

        if !self.controller.start_lock(world, target) {
            return false;
        }

        self.detector.size_category(world, target);
        true
    }

    pub fn clear_lock(&mut self) {
        self.controller.clear_target();
    }

    /// Switches the lock to `target`.
    pub fn switch_target(&mut self, target: EntityId, world: &World) -> bool {
        let Some(viewer) = self.viewer(world) else {
            return false;
        };

        if !self
            .detector
            .is_valid_target(&viewer, world, &self.los, target)
        {
            tracing::debug!("refusing to switch to {:?}", target);
            return false;
        }

        if !self.controller.start_switch(world, target) {
            return false;
        }

        self.detector.size_category(world, target);
        true
    }

    pub fn switch_left(&mut self, world: &World) -> bool {
        self.switch_by(-1, world)
    }

    pub fn switch_right(&mut self, world: &World) -> bool {
        self.switch_by(1, world)
    }

    fn switch_by(&mut self, step: isize, world: &World) -> bool {
        let Some(current) = self.controller.target() else {
            return false;
        };

        let candidates = self.detector.candidates();
        if candidates.len() < 2 {
            return false;
        }

        let next = candidates
            .iter()
            .position(|id| *id == current)
            .and_then(|index| index.checked_add_signed(step))
            .and_then(|index| candidates.get(index).copied());

        match next {
            Some(target) => self.switch_target(target, world),
            None => false,
        }
    }

    /// Switches targets when the stick is pushed past the
    /// [`THUMBSTICK_THRESHOLD`]. Holding the stick switches only once.
    pub fn handle_thumbstick(&mut self, x: f32, world: &World) {
        let stick = Stick::from_axis(x);
        let previous = std::mem::replace(&mut self.stick, stick);

        if self.controller.target().is_none() || stick == previous {
            return;
        }

        match stick {
            Stick::Left => {
                self.switch_left(world);
            }
            Stick::Right => {
                self.switch_right(world);
            }
            Stick::Neutral => (),
        }
    }

    /// Starts correcting the camera towards the closest candidate.
    pub fn start_auto_correction(&mut self, world: &World) -> bool {
        let Some(viewer) = self.viewer(world) else {
            return false;
        };

        match self.detector.camera_correction_target(&viewer, world) {
            Some(target) => self.controller.start_auto_correction(world, target),
            None => false,
        }
    }

    fn viewer(&self, world: &World) -> Option<Viewer> {
        let Some(agent) = world.get(self.agent) else {
            tracing::warn!("lock-on agent {:?} does not exist", self.agent);
            return None;
        };

        Some(Viewer {
            entity: self.agent,
            position: agent.location(),
            look: self.controller.rotation(),
        })
    }
}
