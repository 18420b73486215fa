//! Size classification of targets and its cache.

use std::collections::HashMap;

use ahash::RandomState;
use game_common::entity::EntityId;
use game_common::math::Aabb;
use game_common::world::World;
use serde::{Deserialize, Serialize};

const GIANT_HEIGHT: f32 = 500.0;
const GIANT_VOLUME: f32 = 1_000_000.0;
const LARGE_HEIGHT: f32 = 300.0;
const LARGE_VOLUME: f32 = 300_000.0;
const MEDIUM_HEIGHT: f32 = 150.0;
const MEDIUM_VOLUME: f32 = 100_000.0;

/// The size tier of a target, derived from its bounding box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
    Giant,
    #[default]
    Unknown,
}

impl SizeCategory {
    /// Every category, in ascending size order with [`Unknown`] last.
    ///
    /// [`Unknown`]: Self::Unknown
    pub const ALL: [Self; 5] = [
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::Giant,
        Self::Unknown,
    ];

    /// Classifies a bounding box by its full height and volume.
    ///
    /// Either threshold being exceeded is enough to move up a tier.
    pub fn classify(bounds: Aabb) -> Self {
        let height = bounds.height();
        let volume = bounds.volume();

        if height > GIANT_HEIGHT || volume > GIANT_VOLUME {
            Self::Giant
        } else if height > LARGE_HEIGHT || volume > LARGE_VOLUME {
            Self::Large
        } else if height > MEDIUM_HEIGHT || volume > MEDIUM_VOLUME {
            Self::Medium
        } else {
            Self::Small
        }
    }

    /// Returns the ordinal of the tier, or `None` for [`Unknown`].
    ///
    /// [`Unknown`]: Self::Unknown
    pub const fn level(self) -> Option<u8> {
        match self {
            Self::Small => Some(0),
            Self::Medium => Some(1),
            Self::Large => Some(2),
            Self::Giant => Some(3),
            Self::Unknown => None,
        }
    }

    /// Returns `true` if both categories are known and at most one tier
    /// apart.
    pub fn is_adjacent(self, other: Self) -> bool {
        match (self.level(), other.level()) {
            (Some(a), Some(b)) => a.abs_diff(b) <= 1,
            _ => false,
        }
    }

    /// Returns the vertical offset applied to the aim point of a target of
    /// this size.
    pub const fn height_offset(self) -> f32 {
        match self {
            Self::Giant => 200.0,
            Self::Large => 100.0,
            Self::Medium => 50.0,
            Self::Small | Self::Unknown => 0.0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Giant => "giant",
            Self::Unknown => "unknown",
        }
    }
}

/// Caches the [`SizeCategory`] of every target seen so far.
///
/// Entries for despawned targets stay in the cache until [`cleanup`] is
/// called.
///
/// [`cleanup`]: Self::cleanup
#[derive(Clone, Debug, Default)]
pub struct SizeCache {
    entries: HashMap<EntityId, SizeCategory, RandomState>,
}

impl SizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, id: EntityId) -> Option<SizeCategory> {
        self.entries.get(&id).copied()
    }

    /// Returns the cached category of `id`, classifying `bounds` if the
    /// entity was not seen before.
    ///
    /// The returned flag is `true` if the entity was newly classified.
    pub fn get_or_classify(&mut self, id: EntityId, bounds: Aabb) -> (SizeCategory, bool) {
        if let Some(size) = self.entries.get(&id) {
            return (*size, false);
        }

        let size = SizeCategory::classify(bounds);
        self.entries.insert(id, size);
        (size, true)
    }

    /// Reclassifies `id`, replacing any cached category.
    pub fn refresh(&mut self, id: EntityId, bounds: Aabb) -> SizeCategory {
        let size = SizeCategory::classify(bounds);
        self.entries.insert(id, size);
        size
    }

    /// Removes all entries whose entity no longer exists in `world`.
    ///
    /// Returns the number of removed entries.
    pub fn cleanup(&mut self, world: &World) -> usize {
        let len = self.entries.len();
        self.entries.retain(|id, _| world.contains(*id));
        len - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
