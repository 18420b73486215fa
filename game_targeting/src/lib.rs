//! Finding, scoring and classifying lock-on targets.
//!
//! The [`TargetDetector`] never queries the world directly for overlaps or
//! visibility. It asks a [`Sensor`] for the actors around the viewer and a
//! [`LineOfSight`] whether they can be seen.
//!
//! [`TargetDetector`]: detection::TargetDetector
//! [`Sensor`]: sensor::Sensor
//! [`LineOfSight`]: sensor::LineOfSight

pub mod detection;
pub mod geometry;
pub mod sensor;
pub mod settings;
pub mod size;
