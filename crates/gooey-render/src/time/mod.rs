//! Time subsystem.
//!
//! - `FrameRate`: one per window, fed once per presented frame
//! - `Timers`: periodic callbacks polled by the run loop

mod frame_rate;
mod timers;

pub use frame_rate::FrameRate;
pub use timers::{TimerId, Timers};
