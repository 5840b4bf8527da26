//! Delay engine internals.
//!
//! Everything here is host-agnostic: a circular buffer with interpolated
//! readback, the position smoother and per-sample feedback loop, and the
//! per-block tempo/depth mapping. The `unit` module wires these to the
//! host boundary.

pub mod buffer;
pub mod mapper;
pub mod processor;
pub mod tables;

pub use buffer::{DelayBuffer, DELAY_BUFFER_LEN};
pub use mapper::{clamp_bpm, map_block, BlockParams, FeedbackPolarity, MAX_BPM, MIN_BPM};
pub use processor::{converge_position, DelayProcessor};
