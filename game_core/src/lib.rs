//! The core runtime pieces shared by every system: the frame clock, interval
//! gating and the logger.

pub mod counter;
pub mod logger;
pub mod time;
