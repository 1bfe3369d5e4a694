//! Per-frame systems.
//!
//! Each system is a plain function of the registry and the frame delta. They
//! hold no state of their own and draw no random numbers, so a frame is fully
//! determined by `dt` and the registry contents. [`crate::schedule`] runs them
//! in a fixed order.

pub mod color_anim;
pub mod line_anim;
pub mod position_anim;
pub mod size_pulse;
pub mod timers;
