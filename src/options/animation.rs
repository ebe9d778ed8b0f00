use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::EasingFunction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
/// Timing and convergence parameters for the camera animators.
pub struct AnimationOptions {
    /// Fraction of the remaining distance covered per frame by the smoothed
    /// animators.
    #[schemars(title = "Smoothing", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub acceleration: f64,
    /// Position delta below which the smoothed animator stops moving.
    #[schemars(skip)]
    pub update_threshold: f64,
    /// Azimuth step per frame while orbiting, in radians.
    #[schemars(title = "Orbit Speed", range(min = 0.0005, max = 0.05), extend("step" = 0.0005))]
    pub orbit_step: f64,
    /// Frames a field-of-view morph takes.
    #[schemars(skip)]
    pub morph_steps: u32,
    /// Duration of one saved-view transition step in milliseconds.
    #[schemars(skip)]
    pub transition_step_ms: u64,
    /// Upper bound on saved-view transition steps.
    #[schemars(skip)]
    pub transition_max_steps: u32,
    /// Steps per scene radius travelled during a saved-view transition.
    #[schemars(title = "Transition Length", range(min = 50.0, max = 1000.0), extend("step" = 10.0))]
    pub transition_distance_ratio: f64,
    /// How long a navigation stop waits for the camera to settle.
    #[schemars(skip)]
    pub navigate_stop_delay_ms: u64,
    /// Easing applied to saved-view transitions.
    #[schemars(title = "Transition Easing")]
    pub transition_easing: EasingFunction,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            acceleration: 0.15,
            update_threshold: 1e-4,
            orbit_step: 0.004,
            morph_steps: 50,
            transition_step_ms: 15,
            transition_max_steps: 266,
            transition_distance_ratio: 450.0,
            navigate_stop_delay_ms: 100,
            transition_easing: EasingFunction::SineInOut,
        }
    }
}

impl AnimationOptions {
    /// Shorter transitions for handheld devices.
    #[must_use]
    pub fn mobile() -> Self {
        Self {
            transition_distance_ratio: 300.0,
            ..Self::default()
        }
    }
}
