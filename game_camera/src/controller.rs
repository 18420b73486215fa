//! The lock-on camera state machine.
//!
//! The controller owns the camera orientation. While a target is held it
//! tracks the target every tick. On top of that at most one transient mode
//! runs at a time:
//!
//! - a smooth switch to a new target over a fixed duration,
//! - an auto correction towards a target at a fixed speed,
//! - a smooth reset back to the body rotation,
//! - a minimal change switch, in which the camera does not move at all.
//!
//! Player look input cancels auto corrections and resets. Player movement
//! cancels auto corrections and ends minimal change switches after the player
//! kept moving for a while.

use std::time::Duration;

use game_common::entity::EntityId;
use game_common::math::Rotation;
use game_common::world::{Actor, World};
use game_core::counter::Interval;
use game_core::time::Time;
use game_targeting::geometry::{angle_to_target, distance_speed_multiplier, is_behind};
use game_targeting::size::SizeCategory;
use glam::Vec3;

use crate::anchor::{advanced_anchor, optimal_anchor, AnchorSmoother};
use crate::events::{CameraEvent, CameraEvents};
use crate::profile::{ProfileOverrides, SizeProfile};
use crate::rig::{spring_arm_length, CameraRig, RigConfig};
use crate::settings::{AdvancedCameraSettings, CameraSettings, FreeLookSettings, TrackingMode};

/// Switches to targets within this angle in degrees only change the
/// indicator, the camera stays where it is.
pub const SWITCH_DEADZONE: f32 = 10.0;
/// Switches to targets beyond this angle in degrees snap the camera.
pub const LARGE_ANGLE_THRESHOLD: f32 = 120.0;

pub const CHARACTER_ROTATION_SPEED: f32 = 10.0;
pub const CAMERA_RESET_SPEED: f32 = 8.0;
pub const CAMERA_RESET_ANGLE_THRESHOLD: f32 = 1.0;
pub const AUTO_CORRECTION_SPEED: f32 = 6.0;
pub const LOCK_COMPLETION_THRESHOLD: f32 = 1.0;

/// Look input below this magnitude is ignored for interrupts.
pub const INPUT_DEADZONE: f32 = 0.1;

/// How long the player must keep moving to end a minimal change switch.
pub const MINIMAL_CHANGE_RECOVERY: Duration = Duration::from_millis(500);

const FREE_LOOK_INPUT_THRESHOLD: f32 = 0.01;
const FREE_LOOK_CENTER_TOLERANCE: f32 = 0.1;

/// The maximum pitch of the free camera.
const MAX_PITCH: f32 = 89.0;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LockState {
    /// No target, the camera follows player input.
    #[default]
    Normal,
    /// Tracking the current target.
    LockedOn,
    SmoothSwitching,
    AutoCorrection,
    SmoothReset,
    /// The target changed by a small angle. Only the indicator moved, the
    /// camera stays until the player moves.
    MinimalChangeSwitch,
}

impl LockState {
    /// Returns `true` for the states that only last for a limited time.
    pub fn is_transient(self) -> bool {
        !matches!(self, Self::Normal | Self::LockedOn)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ResetGoal {
    /// The current body rotation of the agent.
    Body,
    Fixed(Rotation),
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Transient {
    None,
    SmoothSwitch {
        start_time: Duration,
        start_rotation: Rotation,
        target_rotation: Rotation,
        rotate_character: bool,
    },
    AutoCorrection {
        target: EntityId,
        target_rotation: Rotation,
    },
    SmoothReset {
        goal: ResetGoal,
    },
    MinimalChange {
        since: Duration,
    },
}

#[derive(Copy, Clone, Debug, Default)]
struct FreeLook {
    offset: Rotation,
    last_input: Duration,
    active: bool,
}

#[derive(Debug)]
pub struct CameraController {
    agent: EntityId,

    camera: CameraSettings,
    advanced: AdvancedCameraSettings,
    free_look_settings: FreeLookSettings,
    rig_config: RigConfig,
    overrides: ProfileOverrides,

    rig: CameraRig,
    rotation: Rotation,
    body_rotation: Rotation,
    position: Vec3,
    time: Time,

    target: Option<EntityId>,
    previous_target: Option<EntityId>,
    transient: Transient,
    follow_target: bool,
    rotate_character: bool,

    is_moving: bool,
    moving_since: Option<Duration>,

    free_look: FreeLook,
    anchor: AnchorSmoother,
    adjustment: Interval,
    current_size: SizeCategory,
    current_distance: f32,

    events: CameraEvents,
    last_state: LockState,
}

impl CameraController {
    /// Creates a new controller for the camera of `agent`.
    pub fn new(agent: EntityId) -> Self {
        let rig_config = RigConfig::default();
        let advanced = AdvancedCameraSettings::default();

        Self {
            agent,
            camera: CameraSettings::default(),
            adjustment: Interval::new(advanced.adjustment_interval()),
            advanced,
            free_look_settings: FreeLookSettings::default(),
            rig: CameraRig::new(&rig_config),
            rig_config,
            overrides: ProfileOverrides::default(),
            rotation: Rotation::ZERO,
            body_rotation: Rotation::ZERO,
            position: Vec3::ZERO,
            time: Time::new(),
            target: None,
            previous_target: None,
            transient: Transient::None,
            follow_target: true,
            rotate_character: true,
            is_moving: false,
            moving_since: None,
            free_look: FreeLook::default(),
            anchor: AnchorSmoother::new(),
            current_size: SizeCategory::Unknown,
            current_distance: 0.0,
            events: CameraEvents::new(),
            last_state: LockState::Normal,
        }
    }

    #[inline]
    pub fn agent(&self) -> EntityId {
        self.agent
    }

    pub fn camera_settings(&self) -> &CameraSettings {
        &self.camera
    }

    pub fn set_camera_settings(&mut self, settings: CameraSettings) {
        tracing::debug!(
            "camera settings updated: interp_speed = {}, smooth = {}, mode = {:?}",
            settings.interp_speed,
            settings.smooth_tracking,
            settings.tracking_mode,
        );
        self.camera = settings;
    }

    pub fn advanced_settings(&self) -> &AdvancedCameraSettings {
        &self.advanced
    }

    pub fn set_advanced_settings(&mut self, settings: AdvancedCameraSettings) {
        self.adjustment
            .set_timestep(settings.adjustment_interval());
        self.advanced = settings;
    }

    pub fn free_look_settings(&self) -> &FreeLookSettings {
        &self.free_look_settings
    }

    pub fn set_free_look_settings(&mut self, settings: FreeLookSettings) {
        if !settings.enabled {
            self.reset_free_look();
        }

        self.free_look_settings = settings;
    }

    pub fn rig_config(&self) -> &RigConfig {
        &self.rig_config
    }

    /// Replaces the rig configuration. The new configuration is applied the
    /// next time a target is locked or the lock is cleared.
    pub fn set_rig_config(&mut self, config: RigConfig) {
        self.rig_config = config;
    }

    pub fn overrides(&self) -> &ProfileOverrides {
        &self.overrides
    }

    pub fn set_overrides(&mut self, overrides: ProfileOverrides) {
        for warning in overrides.validate() {
            tracing::warn!("camera profile override: {}", warning);
        }

        self.overrides = overrides;
    }

    pub fn events_mut(&mut self) -> &mut CameraEvents {
        &mut self.events
    }

    /// Starts a new frame.
    ///
    /// Must be called before any other call in the frame so that all
    /// timeouts are measured against the current time.
    pub fn begin_frame(&mut self, time: &Time, position: Vec3, body_rotation: Rotation) {
        self.time = *time;
        self.position = position;
        self.body_rotation = body_rotation;
    }

    /// Returns the current camera orientation.
    #[inline]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Overrides the camera orientation.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation.normalized();
    }

    #[inline]
    pub fn body_rotation(&self) -> Rotation {
        self.body_rotation
    }

    #[inline]
    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    #[inline]
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    #[inline]
    pub fn previous_target(&self) -> Option<EntityId> {
        self.previous_target
    }

    #[inline]
    pub fn current_size(&self) -> SizeCategory {
        self.current_size
    }

    #[inline]
    pub fn current_distance(&self) -> f32 {
        self.current_distance
    }

    #[inline]
    pub fn is_following(&self) -> bool {
        self.follow_target
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    #[inline]
    pub fn free_look_offset(&self) -> Rotation {
        self.free_look.offset
    }

    #[inline]
    pub fn is_free_looking(&self) -> bool {
        self.free_look.active
    }

    pub fn state(&self) -> LockState {
        match self.transient {
            Transient::SmoothSwitch { .. } => LockState::SmoothSwitching,
            Transient::AutoCorrection { .. } => LockState::AutoCorrection,
            Transient::SmoothReset { .. } => LockState::SmoothReset,
            Transient::MinimalChange { .. } => LockState::MinimalChangeSwitch,
            Transient::None if self.target.is_some() => LockState::LockedOn,
            Transient::None => LockState::Normal,
        }
    }

    #[inline]
    pub fn is_switching(&self) -> bool {
        matches!(self.transient, Transient::SmoothSwitch { .. })
    }

    /// Locks on to `target`.
    ///
    /// Returns `false` if `target` can not be locked on to.
    pub fn start_lock(&mut self, world: &World, target: EntityId) -> bool {
        let Some(actor) = self.validate_target(world, target) else {
            tracing::debug!("cannot lock on to invalid target {:?}", target);
            return false;
        };

        let size = SizeCategory::classify(actor.bounds());
        self.set_target(target, size);

        self.follow_target = true;
        self.rotate_character = true;
        self.transient = Transient::None;

        tracing::debug!("locked on to {:?} ({:?})", target, size);
        self.sync_state();
        true
    }

    /// Switches the lock to `target`.
    ///
    /// Depending on the angle between the current camera direction and the
    /// new target the camera stays, moves smoothly or snaps.
    pub fn start_switch(&mut self, world: &World, target: EntityId) -> bool {
        if self.target.is_none() {
            return self.start_lock(world, target);
        }

        if self.target == Some(target) {
            return false;
        }

        let Some(actor) = self.validate_target(world, target) else {
            tracing::debug!("cannot switch to invalid target {:?}", target);
            return false;
        };

        let size = SizeCategory::classify(actor.bounds());
        let anchor = optimal_anchor(self.position, actor, size, &self.camera, &self.advanced);
        let target_rotation = Rotation::look_at(self.position, anchor);
        let angle = angle_to_target(self.position, self.rotation, anchor);

        self.set_target(target, size);

        if angle <= SWITCH_DEADZONE {
            tracing::debug!("switched to {:?} by {:.1} degrees, camera stays", target, angle);

            self.transient = Transient::MinimalChange {
                since: self.time.elapsed(),
            };
            self.follow_target = false;
            self.rotate_character = false;
        } else if angle > LARGE_ANGLE_THRESHOLD {
            tracing::debug!("switched to {:?} by {:.1} degrees, snapping", target, angle);

            self.rotation = target_rotation;
            self.transient = Transient::None;
            self.follow_target = true;
            self.rotate_character = true;
        } else {
            tracing::debug!("switching to {:?} by {:.1} degrees", target, angle);

            match &mut self.transient {
                Transient::SmoothSwitch {
                    target_rotation: goal,
                    ..
                } => *goal = target_rotation,
                transient => {
                    *transient = Transient::SmoothSwitch {
                        start_time: self.time.elapsed(),
                        start_rotation: self.rotation,
                        target_rotation,
                        rotate_character: self.is_moving,
                    };
                }
            }

            self.follow_target = true;
            self.rotate_character = true;
        }

        self.sync_state();
        true
    }

    /// Starts turning the camera towards `target` without changing the lock.
    pub fn start_auto_correction(&mut self, world: &World, target: EntityId) -> bool {
        if self.is_switching() {
            tracing::debug!("not correcting towards {:?} while switching", target);
            return false;
        }

        let Some(actor) = self.validate_target(world, target) else {
            tracing::debug!("cannot correct towards invalid target {:?}", target);
            return false;
        };

        self.transient = Transient::AutoCorrection {
            target,
            target_rotation: Rotation::look_at(self.position, actor.location()),
        };

        tracing::debug!("correcting camera towards {:?}", target);
        self.events.emit(CameraEvent::CorrectionStarted { target });
        self.sync_state();
        true
    }

    /// Drops the current target and smoothly resets the camera to the body
    /// rotation.
    pub fn clear_target(&mut self) {
        let previous = self.target.take();
        if previous.is_some() {
            self.previous_target = previous;
        }

        self.reset_free_look();
        self.anchor.reset();
        self.follow_target = true;
        self.rotate_character = true;
        self.rig.apply_default(&self.rig_config);

        self.transient = Transient::SmoothReset {
            goal: ResetGoal::Body,
        };

        tracing::debug!("cleared target {:?}", previous);
        if previous.is_some() {
            self.events.emit(CameraEvent::TargetChanged {
                previous,
                current: None,
            });
        }

        self.sync_state();
    }

    /// Smoothly resets the camera to the body rotation.
    pub fn start_reset(&mut self) {
        self.transient = Transient::SmoothReset {
            goal: ResetGoal::Body,
        };
        self.sync_state();
    }

    /// Smoothly resets the camera to `rotation`.
    pub fn start_reset_to(&mut self, rotation: Rotation) {
        self.transient = Transient::SmoothReset {
            goal: ResetGoal::Fixed(rotation.normalized()),
        };
        self.sync_state();
    }

    /// Instantly resets the camera to the body rotation.
    pub fn simple_reset(&mut self) {
        if matches!(self.transient, Transient::SmoothReset { .. }) {
            self.transient = Transient::None;
        }

        self.rotation = self.body_rotation;
        self.events.emit(CameraEvent::ResetComplete);
        self.sync_state();
    }

    /// Drops the target and instantly restores the default camera.
    pub fn reset_to_default(&mut self) {
        let previous = self.target.take();
        if previous.is_some() {
            self.previous_target = previous;
            self.events.emit(CameraEvent::TargetChanged {
                previous,
                current: None,
            });
        }

        self.transient = Transient::None;
        self.reset_free_look();
        self.anchor.reset();
        self.follow_target = true;
        self.rotate_character = true;
        self.rig.apply_default(&self.rig_config);
        self.rotation = self.body_rotation;

        self.events.emit(CameraEvent::ResetComplete);
        self.sync_state();
    }

    /// Handles raw look input of the player.
    ///
    /// Input beyond the [`INPUT_DEADZONE`] cancels auto corrections and
    /// resets.
    pub fn handle_player_input(&mut self, turn: f32, look_up: f32) {
        if !should_interrupt(turn, look_up) {
            return;
        }

        match self.transient {
            Transient::AutoCorrection { .. } => {
                tracing::debug!("player input stopped auto correction");
                self.transient = Transient::None;
            }
            Transient::SmoothReset { .. } => {
                tracing::debug!("player input stopped camera reset");
                self.transient = Transient::None;
            }
            _ => (),
        }

        self.sync_state();
    }

    /// Handles the movement state of the player.
    ///
    /// Must be called every frame with the current state.
    pub fn handle_player_movement(&mut self, is_moving: bool) {
        let now = self.time.elapsed();

        self.is_moving = is_moving;
        if !is_moving {
            self.moving_since = None;
            return;
        }

        let moving_since = *self.moving_since.get_or_insert(now);

        if self.target.is_none() {
            return;
        }

        match self.transient {
            Transient::SmoothSwitch {
                ref mut rotate_character,
                ..
            } => {
                // Movement never interrupts a switch, but lets the character
                // follow it.
                *rotate_character = true;
                return;
            }
            Transient::AutoCorrection { .. } => {
                tracing::debug!("player movement stopped auto correction");
                self.transient = Transient::None;
            }
            Transient::SmoothReset { .. } => {
                tracing::debug!("player movement stopped camera reset");
                self.transient = Transient::None;
            }
            Transient::MinimalChange { since } => {
                let start = since.max(moving_since);
                let moved = now.saturating_sub(start);

                if moved < MINIMAL_CHANGE_RECOVERY {
                    return;
                }

                tracing::debug!("minimal change switch ended after moving for {:?}", moved);
                self.transient = Transient::None;
                self.follow_target = true;
                self.rotate_character = true;
            }
            Transient::None => (),
        }

        if !self.follow_target {
            tracing::debug!("camera follow restored");
            self.follow_target = true;
            self.rotate_character = true;
        }

        self.sync_state();
    }

    /// Adds look input to the free look offset while locked on.
    pub fn apply_free_look_input(&mut self, yaw: f32, pitch: f32) {
        if self.target.is_none() || !self.free_look_settings.enabled {
            return;
        }

        let horizontal = self.free_look_settings.horizontal_limit;
        let vertical = self.free_look_settings.vertical_limit;

        let offset = &mut self.free_look.offset;
        offset.yaw = (offset.yaw + yaw).clamp(-horizontal, horizontal);
        offset.pitch = (offset.pitch + pitch).clamp(-vertical, vertical);

        if yaw.abs() > FREE_LOOK_INPUT_THRESHOLD || pitch.abs() > FREE_LOOK_INPUT_THRESHOLD {
            self.free_look.last_input = self.time.elapsed();
            self.free_look.active = true;
        }
    }

    pub fn reset_free_look(&mut self) {
        self.free_look = FreeLook::default();
    }

    /// Rotates the free camera by raw look input. Does nothing unless the
    /// controller is in [`LockState::Normal`].
    pub fn apply_look_input(&mut self, turn: f32, look_up: f32) {
        if self.state() != LockState::Normal {
            return;
        }

        let rate = self.camera.look_rate;
        let pitch = (self.rotation.pitch + look_up * rate).clamp(-MAX_PITCH, MAX_PITCH);
        let yaw = self.rotation.yaw + turn * rate;

        self.rotation = Rotation::new(pitch, yaw, self.rotation.roll).normalized();
    }

    /// Advances the camera by one frame.
    pub fn tick(&mut self, world: &World) {
        let _span = tracing::trace_span!("CameraController::tick").entered();

        // A transient that completes this tick still owns the rotation until
        // the next one.
        let transient = self.transient;
        match transient {
            Transient::SmoothReset { goal } => self.update_smooth_reset(goal),
            Transient::AutoCorrection {
                target,
                target_rotation,
            } => self.update_auto_correction(world, target, target_rotation),
            _ => (),
        }

        if let Some(target) = self.target {
            match self.validate_target(world, target) {
                Some(actor) => {
                    match transient {
                        Transient::SmoothSwitch { .. } => self.update_smooth_switch(),
                        Transient::None | Transient::MinimalChange { .. } => {
                            self.update_lock_on_camera(target, actor)
                        }
                        Transient::AutoCorrection { .. } | Transient::SmoothReset { .. } => (),
                    }

                    if self.advanced.distance_adaptive {
                        self.update_advanced_adjustment(actor);
                    }
                }
                None => {
                    tracing::debug!("lock-on target {:?} is no longer valid", target);
                    self.clear_target();
                }
            }
        }

        self.sync_state();
    }

    /// Returns `true` if the agent stands behind the current target.
    pub fn is_player_behind_target(&self, world: &World) -> bool {
        let Some(actor) = self.target.and_then(|target| world.get_alive(target)) else {
            return false;
        };

        is_behind(actor.location(), actor.rotation(), self.position)
    }

    /// Returns `true` if switching between targets of the two sizes should
    /// move the camera instead of cutting.
    pub fn should_use_camera_movement_for_size_change(from: SizeCategory, to: SizeCategory) -> bool {
        from.is_adjacent(to)
    }

    /// Returns the effective [`SizeProfile`] for targets of `size`.
    pub fn profile_for(&self, size: SizeCategory) -> SizeProfile {
        self.overrides.profile_for(size)
    }

    fn validate_target<'a>(&self, world: &'a World, target: EntityId) -> Option<&'a Actor> {
        if target == self.agent {
            return None;
        }

        world.get_alive(target)
    }

    fn set_target(&mut self, target: EntityId, size: SizeCategory) {
        let previous = self.target.replace(target);
        if previous.is_some() {
            self.previous_target = previous;
        }

        let profile = self.profile_for(size);
        self.rig.apply_lock(&self.rig_config, size, profile);
        if self.overrides.use_custom {
            self.rig.apply_profile(profile);
        }
        self.current_size = size;
        self.anchor.reset();
        self.adjustment.reset();

        self.events.emit(CameraEvent::TargetChanged {
            previous,
            current: Some(target),
        });
    }

    fn update_smooth_switch(&mut self) {
        let Transient::SmoothSwitch {
            start_time,
            start_rotation,
            target_rotation,
            rotate_character,
        } = self.transient
        else {
            return;
        };

        let duration = self.switch_duration();
        let alpha = if duration <= 0.0 {
            1.0
        } else {
            self.time.elapsed().saturating_sub(start_time).as_secs_f32() / duration
        };

        if alpha >= 1.0 {
            self.rotation = target_rotation;
            self.transient = Transient::None;
            tracing::debug!("smooth switch completed");
        } else {
            self.rotation = start_rotation.lerp(target_rotation, alpha);
        }

        if rotate_character {
            self.body_rotation = self.rotation.yaw_only();
        }
    }

    /// Returns the duration of a smooth switch in seconds.
    ///
    /// A custom switch speed scales the duration relative to the switch speed
    /// of medium targets.
    fn switch_duration(&self) -> f32 {
        if self.overrides.use_custom {
            let scale = SizeProfile::MEDIUM.switch_speed / self.rig.profile.switch_speed;
            self.camera.interp_speed * scale
        } else {
            self.camera.interp_speed
        }
    }

    fn update_auto_correction(&mut self, world: &World, target: EntityId, goal: Rotation) {
        let goal = match world.get_alive(target) {
            Some(actor) => Rotation::look_at(self.position, actor.location()),
            None => goal,
        };

        self.rotation = self
            .rotation
            .interp_to(goal, self.time.delta_secs(), AUTO_CORRECTION_SPEED);

        if self
            .rotation
            .delta(goal)
            .is_nearly_zero(LOCK_COMPLETION_THRESHOLD)
        {
            tracing::debug!("auto correction towards {:?} completed", target);
            self.transient = Transient::None;
        } else {
            self.transient = Transient::AutoCorrection {
                target,
                target_rotation: goal,
            };
        }
    }

    fn update_smooth_reset(&mut self, goal: ResetGoal) {
        let goal = match goal {
            ResetGoal::Body => self.body_rotation,
            ResetGoal::Fixed(rotation) => rotation,
        };

        self.rotation = self
            .rotation
            .interp_to(goal, self.time.delta_secs(), CAMERA_RESET_SPEED);

        if self
            .rotation
            .delta(goal)
            .is_nearly_zero(CAMERA_RESET_ANGLE_THRESHOLD)
        {
            self.rotation = goal;
            self.transient = Transient::None;

            tracing::debug!("camera reset completed");
            self.events.emit(CameraEvent::ResetComplete);
        }
    }

    fn update_lock_on_camera(&mut self, target: EntityId, actor: &Actor) {
        if matches!(self.transient, Transient::MinimalChange { .. }) {
            return;
        }

        let delta = self.time.delta_secs();

        let mut anchor = optimal_anchor(
            self.position,
            actor,
            self.current_size,
            &self.camera,
            &self.advanced,
        );
        if self.camera.stable_interpolation {
            anchor = self
                .anchor
                .smooth(target, anchor, delta, self.camera.stable_interp_speed);
        }

        let look_at = Rotation::look_at(self.position, anchor);

        if !self.follow_target {
            self.rotate_body_towards(look_at);
            return;
        }

        let look = look_at + self.update_free_look(delta);

        let distance = self.position.distance(actor.location());
        let base_speed = if self.advanced.enemy_size_adaptation {
            self.rig.profile.tracking_speed
        } else {
            self.camera.interp_speed
        };
        let speed = base_speed * distance_speed_multiplier(distance);

        let goal = match self.camera.tracking_mode {
            TrackingMode::Full => look,
            TrackingMode::HorizontalOnly => {
                Rotation::new(self.rotation.pitch, look.yaw, self.rotation.roll)
            }
        };

        self.rotation = if self.camera.smooth_tracking {
            self.rotation.interp_to(goal, delta, speed)
        } else {
            goal.normalized()
        };

        self.rotate_body_towards(look_at);
    }

    fn rotate_body_towards(&mut self, look_at: Rotation) {
        if !self.rotate_character || !self.camera.rotate_character_to_target {
            return;
        }

        self.body_rotation = self.body_rotation.interp_to(
            look_at.yaw_only(),
            self.time.delta_secs(),
            CHARACTER_ROTATION_SPEED,
        );
    }

    /// Returns the free look offset for this frame, returning it to the
    /// center once the player stopped looking around.
    fn update_free_look(&mut self, delta: f32) -> Rotation {
        if !self.free_look_settings.enabled || !self.free_look.active {
            return Rotation::ZERO;
        }

        let idle = self
            .time
            .elapsed()
            .saturating_sub(self.free_look.last_input);
        if idle > self.free_look_settings.auto_return_delay() {
            self.free_look.offset = self.free_look.offset.interp_to(
                Rotation::ZERO,
                delta,
                self.free_look_settings.return_to_center_speed,
            );

            if self
                .free_look
                .offset
                .is_nearly_zero(FREE_LOOK_CENTER_TOLERANCE)
            {
                self.reset_free_look();
            }
        }

        self.free_look.offset
    }

    fn update_advanced_adjustment(&mut self, actor: &Actor) {
        if !self.adjustment.is_ready(self.time.elapsed()) {
            return;
        }

        let size = SizeCategory::classify(actor.bounds());
        let distance = self.position.distance(actor.location());
        let anchor = advanced_anchor(self.position, actor, size, &self.advanced);

        self.current_size = size;
        self.current_distance = distance;

        let base = if self.overrides.use_custom {
            self.profile_for(size).distance
        } else {
            self.rig_config.lock_arm_length(size)
        };
        self.rig.arm_length = spring_arm_length(base, size, distance);

        tracing::trace!(
            "advanced adjustment: size = {:?}, distance = {:.1}",
            size,
            distance
        );
        self.events.emit(CameraEvent::CameraAdjusted {
            size,
            distance,
            anchor,
        });
    }

    fn sync_state(&mut self) {
        let state = self.state();
        if state == self.last_state {
            return;
        }

        tracing::debug!("camera state {:?} -> {:?}", self.last_state, state);
        self.events.emit(CameraEvent::StateChanged {
            from: self.last_state,
            to: state,
        });
        self.last_state = state;
    }
}

/// Returns `true` if the look input is strong enough to interrupt automatic
/// camera movement.
#[inline]
pub fn should_interrupt(turn: f32, look_up: f32) -> bool {
    turn.abs() > INPUT_DEADZONE || look_up.abs() > INPUT_DEADZONE
}
