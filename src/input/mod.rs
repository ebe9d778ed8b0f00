//! Input handling: platform-agnostic event types and pointer tracking for
//! the camera manipulator.

/// Platform-agnostic input events.
pub mod event;
/// Cursor position and drag tracking.
pub mod mouse;

pub use event::{InputEvent, Key, MouseButton, TouchCursor};
pub use mouse::PointerState;
