//! The lock-on camera.
//!
//! [`CameraController`] owns the camera orientation and runs the lock-on
//! state machine. [`LockOnSystem`] ties it together with target detection,
//! the UI indicator and the settings source for one agent.
//!
//! [`CameraController`]: controller::CameraController
//! [`LockOnSystem`]: lockon::LockOnSystem

pub mod anchor;
pub mod controller;
pub mod events;
pub mod lockon;
pub mod presets;
pub mod profile;
pub mod projection;
pub mod rig;
pub mod script;
pub mod settings;
