//! Core trait for camera animators.

use web_time::Instant;

use crate::camera::CameraRig;

/// Outcome of one animator tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimatorStep {
    /// The camera pose changed and the frame should be redrawn.
    pub updated: bool,
    /// The animator reached its end and should be unbound.
    pub finished: bool,
}

impl AnimatorStep {
    /// Nothing moved.
    pub const IDLE: Self = Self {
        updated: false,
        finished: false,
    };

    /// Step that moved the camera (or not) and keeps running.
    #[must_use]
    pub const fn running(updated: bool) -> Self {
        Self {
            updated,
            finished: false,
        }
    }

    /// Final step.
    #[must_use]
    pub const fn finished(updated: bool) -> Self {
        Self {
            updated,
            finished: true,
        }
    }
}

/// Advances the current camera pose toward the target pose once per frame.
///
/// Implementations mutate the rig in place and report whether anything
/// changed. They never unbind themselves: a finished step is acted on by
/// the owner of the [`AnimatorSlot`](super::AnimatorSlot).
pub trait Animator {
    /// One tick. `now` drives time-based animators.
    fn update(&mut self, rig: &mut CameraRig, now: Instant) -> AnimatorStep;

    /// Name for logging.
    fn name(&self) -> &'static str {
        "unnamed"
    }
}
