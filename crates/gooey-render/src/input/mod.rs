//! Input events.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! `platform` translates window-system events into [`Event`]s.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::{EventQueue, EVENT_CAPACITY};
pub use state::InputState;
pub use types::{key_name, DropEvent, Event, KeyEvent, Modifiers, MouseButton};
