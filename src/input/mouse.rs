use super::event::MouseButton;

/// Tracks the cursor and the held button so absolute cursor events can be
/// turned into drag deltas.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    position: Option<(f64, f64)>,
    button: Option<MouseButton>,
}

impl PointerState {
    /// No button held, position unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cursor position and return the motion since the previous
    /// one. The first position after a reset yields no motion.
    pub fn move_to(&mut self, x: f64, y: f64) -> (f64, f64) {
        let delta = self
            .position
            .map_or((0.0, 0.0), |(px, py)| (x - px, y - py));
        self.position = Some((x, y));
        delta
    }

    /// Record a button press. Pressing a second button while one is held
    /// keeps the first.
    pub fn press(&mut self, button: MouseButton) {
        if self.button.is_none() {
            self.button = Some(button);
        }
    }

    /// Record a button release. Returns `true` if it ended the drag.
    pub fn release(&mut self, button: MouseButton) -> bool {
        if self.button == Some(button) {
            self.button = None;
            true
        } else {
            false
        }
    }

    /// Button driving the current drag.
    #[must_use]
    pub fn pressed(&self) -> Option<MouseButton> {
        self.button
    }

    /// Last known cursor position.
    #[must_use]
    pub fn position(&self) -> Option<(f64, f64)> {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_move_has_no_delta() {
        let mut pointer = PointerState::new();
        assert_eq!(pointer.move_to(10.0, 20.0), (0.0, 0.0));
        assert_eq!(pointer.move_to(13.0, 18.0), (3.0, -2.0));
        assert_eq!(pointer.position(), Some((13.0, 18.0)));
    }

    #[test]
    fn first_pressed_button_drives_drag() {
        let mut pointer = PointerState::new();
        pointer.press(MouseButton::Right);
        pointer.press(MouseButton::Left);
        assert_eq!(pointer.pressed(), Some(MouseButton::Right));
        assert!(!pointer.release(MouseButton::Left));
        assert!(pointer.release(MouseButton::Right));
        assert_eq!(pointer.pressed(), None);
    }
}
