//! The registry owning every actor.

use std::collections::{HashMap, HashSet};

use ahash::RandomState;
use glam::Vec3;
use slotmap::{DefaultKey, SlotMap};

use crate::entity::EntityId;
use crate::math::{Aabb, Rotation};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Rotation,
}

impl Transform {
    #[inline]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Rotation::ZERO,
        }
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation.forward()
    }
}

/// An actor in the [`World`].
#[derive(Clone, Debug)]
pub struct Actor {
    pub name: String,
    pub transform: Transform,
    /// Offset of the bounding box center from the actor location.
    pub bounds_offset: Vec3,
    /// Half extents of the bounding box.
    pub extents: Vec3,
    pub tags: HashSet<String, RandomState>,
    /// Named anchor points in actor-local space.
    pub sockets: HashMap<String, Vec3, RandomState>,
    /// The actor is being destroyed and must no longer be interacted with.
    pub pending_destroy: bool,
}

impl Actor {
    pub fn new(name: impl Into<String>, translation: Vec3) -> Self {
        Self {
            name: name.into(),
            transform: Transform::from_translation(translation),
            bounds_offset: Vec3::ZERO,
            extents: Vec3::new(25.0, 25.0, 45.0),
            tags: HashSet::default(),
            sockets: HashMap::default(),
            pending_destroy: false,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_extents(mut self, extents: Vec3) -> Self {
        self.extents = extents;
        self
    }

    pub fn with_bounds_offset(mut self, offset: Vec3) -> Self {
        self.bounds_offset = offset;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_socket(mut self, name: impl Into<String>, offset: Vec3) -> Self {
        self.sockets.insert(name.into(), offset);
        self
    }

    #[inline]
    pub fn location(&self) -> Vec3 {
        self.transform.translation
    }

    #[inline]
    pub fn rotation(&self) -> Rotation {
        self.transform.rotation
    }

    /// Returns the world space bounding box of the actor.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.transform.translation + self.bounds_offset, self.extents)
    }

    #[inline]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Returns the world location of the socket with the given `name`, if the
    /// actor has one.
    pub fn socket_location(&self, name: &str) -> Option<Vec3> {
        self.sockets
            .get(name)
            .map(|offset| self.transform.translation + self.transform.rotation.rotate(*offset))
    }
}

/// The owning registry of all actors.
///
/// Despawning an actor invalidates every [`EntityId`] pointing to it.
#[derive(Clone, Debug, Default)]
pub struct World {
    actors: SlotMap<DefaultKey, Actor>,
}

impl World {
    pub fn new() -> Self {
        Self {
            actors: SlotMap::new(),
        }
    }

    pub fn spawn(&mut self, actor: Actor) -> EntityId {
        let id = EntityId(self.actors.insert(actor));
        tracing::trace!("spawned actor {:?}", id);
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<Actor> {
        let actor = self.actors.remove(id.0);
        if actor.is_some() {
            tracing::trace!("despawned actor {:?}", id);
        }

        actor
    }

    #[inline]
    pub fn get(&self, id: EntityId) -> Option<&Actor> {
        self.actors.get(id.0)
    }

    #[inline]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Actor> {
        self.actors.get_mut(id.0)
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.actors.contains_key(id.0)
    }

    /// Returns the actor if it exists and is not pending destruction.
    pub fn get_alive(&self, id: EntityId) -> Option<&Actor> {
        self.get(id).filter(|actor| !actor.pending_destroy)
    }

    /// Returns the first actor with the given `name`.
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.actors
            .iter()
            .find(|(_, actor)| actor.name == name)
            .map(|(key, _)| EntityId(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Actor)> + '_ {
        self.actors.iter().map(|(key, actor)| (EntityId(key), actor))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}
