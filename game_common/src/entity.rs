//! Entity

use slotmap::DefaultKey;

/// A generational handle to an actor in the [`World`].
///
/// The handle never keeps the actor alive. Once the actor is despawned the
/// handle stops resolving, even if its slot is reused by a new actor.
///
/// [`World`]: crate::world::World
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) DefaultKey);
