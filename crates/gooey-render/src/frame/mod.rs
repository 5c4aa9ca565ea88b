//! Frame Submission Engine.
//!
//! Drives one window's frame through `Idle → Acquiring → Recording →
//! Submitted → Idle` against any [`FrameDevice`].

mod device;
mod engine;
#[cfg(test)]
pub(crate) mod mock;
mod state;

pub use device::{FenceWait, FrameDevice};
pub use engine::{FrameEngine, DEFAULT_CLEAR_COLOR, DEFAULT_FENCE_TIMEOUT, DEFAULT_FRAMES_IN_FLIGHT};
pub use state::{FrameOutcome, FrameState};
