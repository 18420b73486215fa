//! The common core of the lock-on and camera systems.
//!
//! Contains the math primitives, the generational [`EntityId`] handle and
//! the [`World`] registry that owns every actor.
//!
//! [`EntityId`]: entity::EntityId
//! [`World`]: world::World

extern crate self as game_common;

pub mod entity;
pub mod math;
pub mod world;
