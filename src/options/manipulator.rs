use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Controls", inline)]
#[serde(default)]
/// Input sensitivities. Touch speeds are scaled by the device pixel ratio
/// when applied.
pub struct ManipulatorOptions {
    /// Mouse pan sensitivity.
    #[schemars(title = "Mouse Pan", range(min = 0.05, max = 2.0), extend("step" = 0.01))]
    pub mouse_pan_speed: f64,
    /// Mouse wheel zoom sensitivity.
    #[schemars(title = "Mouse Zoom", range(min = 0.05, max = 2.0), extend("step" = 0.01))]
    pub mouse_zoom_speed: f64,
    /// Mouse drag rotation sensitivity.
    #[schemars(title = "Mouse Rotate", range(min = 0.05, max = 2.0), extend("step" = 0.01))]
    pub mouse_rotate_speed: f64,
    /// Two-finger pan sensitivity.
    #[schemars(title = "Touch Pan", range(min = 0.1, max = 5.0), extend("step" = 0.01))]
    pub touch_pan_speed: f64,
    /// Pinch zoom sensitivity.
    #[schemars(title = "Touch Zoom", range(min = 0.005, max = 0.5), extend("step" = 0.001))]
    pub touch_zoom_speed: f64,
    /// One-finger rotation sensitivity.
    #[schemars(title = "Touch Rotate", range(min = 0.05, max = 2.0), extend("step" = 0.01))]
    pub touch_rotate_speed: f64,
    /// Pixels of virtual drag per arrow-key rotation.
    #[schemars(skip)]
    pub key_rotate_speed: f64,
    /// Keyboard pan sensitivity.
    #[schemars(skip)]
    pub key_pan_speed: f64,
    /// Fraction of the scene radius moved per forward/backward key press.
    #[schemars(skip)]
    pub key_forward_speed: f64,
}

impl Default for ManipulatorOptions {
    fn default() -> Self {
        Self {
            mouse_pan_speed: 0.37,
            mouse_zoom_speed: 0.278,
            mouse_rotate_speed: 0.45,
            touch_pan_speed: 1.86,
            touch_zoom_speed: 0.0596,
            touch_rotate_speed: 0.44,
            key_rotate_speed: 12.0,
            key_pan_speed: 1.0,
            key_forward_speed: 0.0092,
        }
    }
}
