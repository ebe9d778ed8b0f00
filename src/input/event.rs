use glam::DVec3;

/// Platform-agnostic input events.
///
/// Fed into
/// [`CameraManipulator::handle_event`](crate::camera::CameraManipulator::handle_event),
/// which turns them into camera gestures.
///
/// # Example
///
/// ```ignore
/// manipulator.handle_event(
///     &mut camera,
///     &InputEvent::CursorMoved { x: 100.0, y: 200.0 },
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to absolute position.
    CursorMoved {
        /// Horizontal position in CSS pixels.
        x: f64,
        /// Vertical position in CSS pixels.
        y: f64,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Scroll wheel.
    Scroll {
        /// Scroll amount (positive = zoom in, negative = zoom out).
        delta: f64,
    },
    /// Double click. The host resolves the world point under the cursor.
    DoubleClick {
        /// Picked surface point, `None` over the background.
        world: Option<DVec3>,
    },
    /// One or more touch points moved.
    TouchMoved {
        /// Active touch points with their motion since the previous event.
        cursors: Vec<TouchCursor>,
    },
    /// Double tap with one finger.
    TouchDoubleTap {
        /// Picked surface point, `None` over the background.
        world: Option<DVec3>,
    },
    /// Key pressed.
    KeyDown {
        /// Navigation key.
        key: Key,
    },
}

/// One touch point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchCursor {
    /// Horizontal position in CSS pixels.
    pub x: f64,
    /// Vertical position in CSS pixels.
    pub y: f64,
    /// Horizontal motion since the previous event.
    pub dx: f64,
    /// Vertical motion since the previous event.
    pub dy: f64,
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}

/// Navigation keys understood by the manipulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Turn left.
    Left,
    /// Turn right.
    Right,
    /// Move forward.
    Up,
    /// Move backward.
    Down,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` to a navigation key. Arrows and WASD
    /// are both accepted.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Self::Left),
            "ArrowRight" | "KeyD" => Some(Self::Right),
            "ArrowUp" | "KeyW" => Some(Self::Up),
            "ArrowDown" | "KeyS" => Some(Self::Down),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_codes_map_arrows_and_wasd() {
        assert_eq!(Key::from_code("ArrowUp"), Some(Key::Up));
        assert_eq!(Key::from_code("KeyW"), Some(Key::Up));
        assert_eq!(Key::from_code("KeyA"), Some(Key::Left));
        assert_eq!(Key::from_code("ArrowDown"), Some(Key::Down));
        assert_eq!(Key::from_code("KeyQ"), None);
    }
}
