//! Scenario files describing the actors, occluders and scripted input of a
//! simulation run.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use ahash::RandomState;
use game_camera::script::ScriptStep;
use game_common::entity::EntityId;
use game_common::math::Rotation;
use game_common::world::{Actor, World};
use game_targeting::sensor::{Occluder, SphereOccluders};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Io(io::Error),
    #[error(transparent)]
    Toml(toml::de::Error),
    #[error("unknown actor: {0:?}")]
    UnknownActor(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// The actor owning the camera.
    pub agent: ActorDesc,
    #[serde(default, rename = "actor")]
    pub actors: Vec<ActorDesc>,
    #[serde(default, rename = "occluder")]
    pub occluders: Vec<OccluderDesc>,
    #[serde(default, rename = "step")]
    pub script: Vec<ScriptStep>,
}

impl Scenario {
    pub fn from_file<P>(path: P) -> Result<Self, ScenarioError>
    where
        P: AsRef<Path>,
    {
        let mut file = File::open(path).map_err(ScenarioError::Io)?;

        let mut buf = String::new();
        file.read_to_string(&mut buf).map_err(ScenarioError::Io)?;

        Self::parse(&buf)
    }

    pub fn parse(s: &str) -> Result<Self, ScenarioError> {
        toml::from_str(s).map_err(ScenarioError::Toml)
    }

    /// Spawns all actors and resolves the names used by occluders and
    /// script steps.
    pub fn build(&self) -> Result<Stage, ScenarioError> {
        let mut world = World::new();

        let agent = world.spawn(self.agent.to_actor());
        for actor in &self.actors {
            world.spawn(actor.to_actor());
        }

        let resolve = |name: &str| {
            world
                .find_by_name(name)
                .ok_or_else(|| ScenarioError::UnknownActor(name.to_owned()))
        };

        let mut occluders = SphereOccluders::new();
        for desc in &self.occluders {
            let mut occluder = Occluder::new(desc.center, desc.radius);
            if let Some(owner) = &desc.owner {
                occluder = occluder.with_owner(resolve(owner)?);
            }

            occluders.push(occluder);
        }

        for step in &self.script {
            if let Some(name) = step.action.target() {
                resolve(name)?;
            }
        }

        tracing::debug!(
            "built scenario with {} actors and {} occluders",
            world.len(),
            occluders.len()
        );

        Ok(Stage {
            world,
            agent,
            occluders,
        })
    }
}

/// The spawned state of a [`Scenario`].
#[derive(Clone, Debug)]
pub struct Stage {
    pub world: World,
    pub agent: EntityId,
    pub occluders: SphereOccluders,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActorDesc {
    pub name: String,
    pub position: Vec3,
    /// Yaw in degrees.
    #[serde(default)]
    pub yaw: f32,
    /// Half extents of the bounding box. Defaults to a humanoid.
    #[serde(default)]
    pub extents: Option<Vec3>,
    #[serde(default)]
    pub bounds_offset: Vec3,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub sockets: HashMap<String, Vec3, RandomState>,
    #[serde(default)]
    pub pending_destroy: bool,
}

impl ActorDesc {
    pub fn to_actor(&self) -> Actor {
        let mut actor = Actor::new(self.name.clone(), self.position)
            .with_rotation(Rotation::from_yaw(self.yaw))
            .with_bounds_offset(self.bounds_offset);

        if let Some(extents) = self.extents {
            actor = actor.with_extents(extents);
        }

        for tag in &self.tags {
            actor = actor.with_tag(tag.clone());
        }

        for (name, offset) in &self.sockets {
            actor = actor.with_socket(name.clone(), *offset);
        }

        actor.pending_destroy = self.pending_destroy;
        actor
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OccluderDesc {
    pub center: Vec3,
    pub radius: f32,
    /// Name of the actor the sphere belongs to.
    #[serde(default)]
    pub owner: Option<String>,
}

#[cfg(test)]
mod tests {
    use game_camera::script::ScriptAction;
    use game_common::assert_vec;
    use glam::Vec3;

    use super::{Scenario, ScenarioError};

    const SCENARIO: &str = r#"
        [agent]
        name = "player"
        position = [0.0, 0.0, 0.0]
        tags = ["Player"]

        [[actor]]
        name = "troll"
        position = [800.0, 0.0, 0.0]
        yaw = 180.0
        extents = [100.0, 100.0, 200.0]
        sockets = { Spine2Socket = [0.0, 0.0, 120.0] }

        [[actor]]
        name = "crate"
        position = [400.0, 200.0, 0.0]
        tags = ["NoLockOn"]

        [[occluder]]
        center = [800.0, 0.0, 100.0]
        radius = 150.0
        owner = "troll"

        [[step]]
        delay = 0.5
        action = "lock_on"
        target = "troll"
    "#;

    #[test]
    fn build_scenario() {
        let scenario = Scenario::parse(SCENARIO).unwrap();
        assert_eq!(scenario.actors.len(), 2);
        assert_eq!(
            scenario.script[0].action,
            ScriptAction::LockOn {
                target: "troll".into()
            }
        );

        let stage = scenario.build().unwrap();
        assert_eq!(stage.world.len(), 3);
        assert!(stage.world.get(stage.agent).unwrap().has_tag("Player"));

        let troll_id = stage.world.find_by_name("troll").unwrap();
        let troll = stage.world.get(troll_id).unwrap();
        assert_eq!(troll.rotation().yaw, 180.0);
        assert_eq!(troll.extents, Vec3::new(100.0, 100.0, 200.0));
        assert_vec!(
            troll.socket_location("Spine2Socket").unwrap(),
            Vec3::new(800.0, 0.0, 120.0)
        );

        let occluder = stage.occluders.iter().next().unwrap();
        assert_eq!(occluder.owner, Some(troll_id));
    }

    #[test]
    fn build_bundled_scenario() {
        let scenario = Scenario::parse(include_str!("../../scenarios/duel.toml")).unwrap();
        let stage = scenario.build().unwrap();
        assert_eq!(stage.world.len(), 5);
        assert_eq!(stage.occluders.len(), 1);
        assert!(!scenario.script.is_empty());
    }

    #[test]
    fn unknown_occluder_owner() {
        let input = r#"
            [agent]
            name = "player"
            position = [0.0, 0.0, 0.0]

            [[occluder]]
            center = [0.0, 0.0, 0.0]
            radius = 1.0
            owner = "ghost"
        "#;

        let err = Scenario::parse(input).unwrap().build().unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownActor(name) if name == "ghost"));
    }

    #[test]
    fn unknown_script_target() {
        let input = r#"
            [agent]
            name = "player"
            position = [0.0, 0.0, 0.0]

            [[step]]
            action = "despawn"
            target = "ghost"
        "#;

        let err = Scenario::parse(input).unwrap().build().unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownActor(_)));
    }

    #[test]
    fn missing_agent() {
        let err = Scenario::parse("[[actor]]\nname = \"a\"\nposition = [0.0, 0.0, 0.0]")
            .unwrap_err();
        assert!(matches!(err, ScenarioError::Toml(_)));
    }
}
