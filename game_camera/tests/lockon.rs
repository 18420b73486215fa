use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use game_camera::controller::LockState;
use game_camera::events::{CameraEvent, EventKind};
use game_camera::lockon::{FrameInput, LockOnConfig, LockOnSystem};
use game_camera::projection::{Indicator, PerspectiveProjector};
use game_common::assert_f32;
use game_common::entity::EntityId;
use game_common::world::{Actor, World};
use game_targeting::detection::DetectionEvent;
use game_targeting::sensor::{Occluder, RadiusSensor, SphereOccluders};
use glam::Vec3;

const FRAME: Duration = Duration::from_millis(10);

type System = LockOnSystem<RadiusSensor, SphereOccluders, PerspectiveProjector>;

struct Arena {
    world: World,
    system: System,
    left: EntityId,
    center: EntityId,
    right: EntityId,
}

impl Arena {
    fn new(occluders: SphereOccluders) -> Self {
        let mut world = World::new();
        let agent = world.spawn(Actor::new("player", Vec3::ZERO).with_tag("Player"));

        let mut spawn = |name: &str, yaw: f32| {
            let yaw = yaw.to_radians();
            world.spawn(Actor::new(name, Vec3::new(yaw.cos(), yaw.sin(), 0.0) * 800.0))
        };
        let left = spawn("left", -20.0);
        let center = spawn("center", 0.0);
        let right = spawn("right", 20.0);

        let system = LockOnSystem::new(
            agent,
            LockOnConfig::default(),
            RadiusSensor,
            occluders,
            PerspectiveProjector::default(),
        );

        Self {
            world,
            system,
            left,
            center,
            right,
        }
    }

    fn update(&mut self, input: FrameInput) -> Option<Indicator> {
        self.system.update(FRAME, &input, &mut self.world)
    }

    fn idle(&mut self, frames: usize) {
        for _ in 0..frames {
            self.update(FrameInput::default());
        }
    }

    fn toggle(&mut self) {
        self.update(FrameInput {
            toggle_lock: true,
            ..Default::default()
        });
    }

    fn stick(&mut self, x: f32) {
        self.update(FrameInput {
            switch_axis: x,
            ..Default::default()
        });
    }
}

#[test]
fn toggle_locks_center_target() {
    let mut arena = Arena::new(SphereOccluders::new());

    arena.toggle();
    assert_eq!(arena.system.current_target(), Some(arena.center));
    assert_eq!(arena.system.current_state(), LockState::LockedOn);

    let indicator = arena.update(FrameInput::default()).unwrap();
    assert_eq!(indicator.target, arena.center);
    assert!(indicator.is_visible());

    arena.idle(100);
    arena.toggle();
    assert_eq!(arena.system.current_target(), None);
    assert_eq!(arena.system.current_state(), LockState::SmoothReset);
    assert!(arena.update(FrameInput::default()).is_none());
}

#[test]
fn toggle_without_targets_resets_camera() {
    let mut world = World::new();
    let agent = world.spawn(Actor::new("player", Vec3::ZERO));
    // Behind the agent, outside of the sector.
    world.spawn(Actor::new("behind", Vec3::new(-500.0, 0.0, 0.0)));

    let mut system = LockOnSystem::new(
        agent,
        LockOnConfig::default(),
        RadiusSensor,
        SphereOccluders::new(),
        PerspectiveProjector::default(),
    );

    let resets = Rc::new(RefCell::new(0));
    {
        let resets = resets.clone();
        system.subscribe(EventKind::ResetComplete, move |_| *resets.borrow_mut() += 1);
    }

    let input = FrameInput {
        toggle_lock: true,
        ..Default::default()
    };
    system.update(FRAME, &input, &mut world);

    assert_eq!(system.current_target(), None);
    assert_eq!(system.current_state(), LockState::Normal);
    assert_eq!(*resets.borrow(), 1);
}

#[test]
fn occluded_target_is_skipped() {
    let occluders = [Occluder::new(Vec3::new(400.0, 0.0, 50.0), 100.0)]
        .into_iter()
        .collect();
    let mut arena = Arena::new(occluders);

    arena.toggle();
    let target = arena.system.current_target();
    assert!(target.is_some());
    assert_ne!(target, Some(arena.center));
    assert!(!arena.system.detector().candidates().contains(&arena.center));
}

#[test]
fn thumbstick_switches_once_per_push() {
    let mut arena = Arena::new(SphereOccluders::new());
    arena.toggle();
    assert_eq!(
        arena.system.detector().candidates(),
        [arena.left, arena.center, arena.right]
    );

    arena.stick(0.9);
    assert_eq!(arena.system.current_target(), Some(arena.right));
    assert_eq!(arena.system.current_state(), LockState::SmoothSwitching);

    // Holding the stick does not switch again.
    for _ in 0..10 {
        arena.stick(0.9);
    }
    assert_eq!(arena.system.current_target(), Some(arena.right));

    arena.stick(0.0);
    arena.stick(-0.9);
    assert_eq!(arena.system.current_target(), Some(arena.center));

    // Small pushes are ignored.
    arena.stick(0.0);
    arena.stick(-0.5);
    assert_eq!(arena.system.current_target(), Some(arena.center));
}

#[test]
fn switch_at_edge_of_list_is_ignored() {
    let mut arena = Arena::new(SphereOccluders::new());
    arena.toggle();

    arena.stick(-0.9);
    assert_eq!(arena.system.current_target(), Some(arena.left));

    arena.stick(0.0);
    assert!(!arena.system.switch_left(&arena.world));
    assert_eq!(arena.system.current_target(), Some(arena.left));
}

#[test]
fn lock_dropped_out_of_extended_range() {
    let mut arena = Arena::new(SphereOccluders::new());

    let resets = Rc::new(RefCell::new(0));
    {
        let resets = resets.clone();
        arena
            .system
            .controller_mut()
            .events_mut()
            .on_reset_complete(move || *resets.borrow_mut() += 1);
    }

    arena.toggle();
    arena.idle(100);

    // Within the extended range the lock is kept.
    arena.world.get_mut(arena.center).unwrap().transform.translation = Vec3::new(2300.0, 0.0, 0.0);
    arena.idle(1);
    assert_eq!(arena.system.current_target(), Some(arena.center));

    arena.world.get_mut(arena.center).unwrap().transform.translation = Vec3::new(2500.0, 0.0, 0.0);
    arena.idle(1);
    assert_eq!(arena.system.current_target(), None);
    assert_eq!(arena.system.current_state(), LockState::SmoothReset);
    assert_eq!(arena.system.controller().previous_target(), Some(arena.center));

    arena.idle(200);
    assert_eq!(arena.system.current_state(), LockState::Normal);
    assert_eq!(*resets.borrow(), 1);
}

#[test]
fn despawned_target_drops_lock() {
    let mut arena = Arena::new(SphereOccluders::new());
    arena.toggle();
    arena.idle(100);

    arena.world.despawn(arena.center);
    arena.idle(1);

    assert_eq!(arena.system.current_target(), None);
    assert_eq!(arena.system.current_state(), LockState::SmoothReset);
}

#[test]
fn body_turns_towards_target() {
    let mut arena = Arena::new(SphereOccluders::new());
    let right = arena.right;
    assert!(arena.system.start_lock(right, &arena.world));

    arena.idle(200);

    let agent = arena.world.get(arena.system.agent()).unwrap();
    assert_f32!(agent.rotation().yaw, 20.0, 0.01);
    assert_f32!(arena.system.controller().rotation().yaw, 20.0, 0.01);
}

#[test]
fn look_input_moves_free_look_while_locked() {
    let mut arena = Arena::new(SphereOccluders::new());

    arena.update(FrameInput {
        turn: 1.0,
        ..Default::default()
    });
    assert_f32!(arena.system.controller().rotation().yaw, 2.5);

    arena.toggle();
    arena.update(FrameInput {
        turn: 1.0,
        ..Default::default()
    });
    assert_f32!(arena.system.controller().free_look_offset().yaw, 2.5);
}

#[test]
fn preset_applied_on_next_update() {
    let mut arena = Arena::new(SphereOccluders::new());
    assert_eq!(arena.system.controller().camera_settings().interp_speed, 5.0);

    arena.system.source_mut().switch_to_name("Fast").unwrap();
    assert_eq!(arena.system.controller().camera_settings().interp_speed, 5.0);

    arena.idle(1);
    assert_eq!(arena.system.controller().camera_settings().interp_speed, 10.0);
    assert!(!arena.system.controller().advanced_settings().distance_adaptive);

    assert!(arena.system.source_mut().switch_to_name("Slow").is_err());
    assert_eq!(arena.system.source().current().name, "Fast");
}

#[test]
fn missing_agent_skips_update() {
    let mut arena = Arena::new(SphereOccluders::new());
    arena.toggle();

    let agent = arena.system.agent();
    arena.world.despawn(agent);

    assert!(arena.update(FrameInput::default()).is_none());
    assert!(!arena.system.switch_right(&arena.world));
}

#[test]
fn events_are_reported() {
    let mut arena = Arena::new(SphereOccluders::new());

    let targets = Rc::new(RefCell::new(Vec::new()));
    {
        let targets = targets.clone();
        arena.system.subscribe(EventKind::TargetChanged, move |event| {
            if let CameraEvent::TargetChanged { current, .. } = event {
                targets.borrow_mut().push(*current);
            }
        });
    }

    arena.toggle();
    arena.toggle();
    assert_eq!(*targets.borrow(), [Some(arena.center), None]);

    let events: Vec<_> = arena.system.detection_events().collect();
    assert!(events
        .iter()
        .any(|event| matches!(event, DetectionEvent::CandidatesUpdated(c) if c.len() == 3)));
    assert!(events.iter().any(|event| matches!(
        event,
        DetectionEvent::ValidTargetFound { target, .. } if *target == arena.center
    )));
    assert_eq!(arena.system.detection_events().count(), 0);
}
