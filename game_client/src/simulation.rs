use std::time::Duration;

use game_camera::events::EventKind;
use game_camera::lockon::{FrameInput, LockOnConfig, LockOnSystem};
use game_camera::projection::{Indicator, PerspectiveProjector};
use game_camera::script::{Script, ScriptAction, ScriptStep};
use game_common::entity::EntityId;
use game_common::world::World;
use game_targeting::sensor::{RadiusSensor, SphereOccluders};

use crate::scenario::Stage;

pub type System = LockOnSystem<RadiusSensor, SphereOccluders, PerspectiveProjector>;

/// Runs a [`LockOnSystem`] against a scripted [`Stage`] at a fixed timestep.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    system: System,
    script: Script,
    delta: Duration,
    frame: u64,
    is_moving: bool,
}

impl Simulation {
    pub fn new(config: LockOnConfig, stage: Stage, steps: Vec<ScriptStep>, timestep: u32) -> Self {
        let mut system = LockOnSystem::new(
            stage.agent,
            config,
            RadiusSensor,
            stage.occluders,
            PerspectiveProjector::default(),
        );

        for kind in [
            EventKind::StateChanged,
            EventKind::TargetChanged,
            EventKind::ResetComplete,
            EventKind::CorrectionStarted,
            EventKind::CameraAdjusted,
        ] {
            system.subscribe(kind, |event| tracing::info!("{:?}", event));
        }

        Self {
            world: stage.world,
            system,
            script: Script::new(steps),
            delta: Duration::from_secs(1) / timestep.max(1),
            frame: 0,
            is_moving: false,
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn system(&self) -> &System {
        &self.system
    }

    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Returns `true` once every script step ran.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.script.is_finished()
    }

    /// Runs the due script steps and advances the system by one frame.
    ///
    /// Input actions feed the [`FrameInput`] of the frame. All other actions
    /// run once the frame began, so they see the current frame time.
    pub fn step(&mut self) -> Option<Indicator> {
        self.frame += 1;
        let _span = tracing::debug_span!("frame", id = self.frame).entered();

        let now = self.system.time().elapsed() + self.delta;

        let mut input = FrameInput {
            is_moving: self.is_moving,
            ..Default::default()
        };
        let mut commands = Vec::new();
        for action in self.script.poll(now) {
            tracing::info!("running {:?}", action);

            match action {
                ScriptAction::ToggleLock => input.toggle_lock = true,
                ScriptAction::Move { moving } => {
                    self.is_moving = moving;
                    input.is_moving = moving;
                }
                // Look input only lasts for a single frame.
                ScriptAction::Look { turn, look_up } => {
                    input.turn = turn;
                    input.look_up = look_up;
                }
                ScriptAction::Preset { name } => {
                    if let Err(err) = self.system.source_mut().switch_to_name(&name) {
                        tracing::warn!("cannot switch camera preset: {}", err);
                    }
                }
                action => commands.push(action),
            }
        }

        let indicator =
            self.system
                .update_with(self.delta, &input, &mut self.world, |system, world| {
                    for action in commands {
                        run_command(system, world, action);
                    }
                });

        for event in self.system.detection_events() {
            tracing::debug!("{:?}", event);
        }

        if let Some(indicator) = &indicator {
            tracing::trace!("indicator at {:?}", indicator.screen);
        }

        indicator
    }

    /// Returns the name of the locked target.
    pub fn target_name(&self) -> Option<&str> {
        let target = self.system.current_target()?;
        self.world.get(target).map(|actor| actor.name.as_str())
    }
}

fn run_command(system: &mut System, world: &mut World, action: ScriptAction) {
    match action {
        ScriptAction::SwitchLeft => {
            system.switch_left(world);
        }
        ScriptAction::SwitchRight => {
            system.switch_right(world);
        }
        ScriptAction::ClearLock => system.clear_lock(),
        ScriptAction::LockOn { target } => {
            if let Some(target) = resolve(world, &target) {
                system.start_lock(target, world);
            }
        }
        ScriptAction::SwitchTo { target } => {
            if let Some(target) = resolve(world, &target) {
                system.switch_target(target, world);
            }
        }
        ScriptAction::AutoCorrect { target } => {
            if let Some(target) = resolve(world, &target) {
                system.controller_mut().start_auto_correction(world, target);
            }
        }
        ScriptAction::Despawn { target } => {
            if let Some(target) = resolve(world, &target) {
                world.despawn(target);
            }
        }
        // Applied through the frame input or the settings source.
        ScriptAction::ToggleLock
        | ScriptAction::Move { .. }
        | ScriptAction::Look { .. }
        | ScriptAction::Preset { .. } => (),
    }
}

fn resolve(world: &World, name: &str) -> Option<EntityId> {
    let id = world.find_by_name(name);
    if id.is_none() {
        tracing::warn!("no actor named {:?}", name);
    }

    id
}
