//! Camera animators: per-frame strategies that move the current camera pose
//! toward the target pose.
//!
//! Six variants cover the viewer's motion styles. [`NormalAnimator`] is the
//! resting state and smooths direct manipulation; the others are bound for
//! the duration of a gesture or flight and unbound when done, handing
//! control back through the [`AnimatorSlot`].

mod instant;
mod morphing;
mod navigate;
mod normal;
mod orbit;
mod slot;
mod traits;
mod transition;

pub use instant::InstantAnimator;
pub use morphing::MorphingAnimator;
pub use navigate::NavigateAnimator;
pub use normal::NormalAnimator;
pub use orbit::OrbitAnimator;
pub use slot::AnimatorSlot;
pub use traits::{Animator, AnimatorStep};
pub use transition::TransitionAnimator;
use web_time::Instant;

use crate::camera::CameraRig;

/// Discriminant of [`CameraAnimator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimatorKind {
    /// [`InstantAnimator`].
    Instant,
    /// [`NormalAnimator`].
    Normal,
    /// [`OrbitAnimator`].
    Orbit,
    /// [`NavigateAnimator`].
    Navigate,
    /// [`TransitionAnimator`].
    Transition,
    /// [`MorphingAnimator`].
    Morphing,
}

/// The closed set of animators a scene camera can run.
#[derive(Debug, Clone)]
pub enum CameraAnimator {
    /// Snap to target.
    Instant(InstantAnimator),
    /// Exponential decay toward target.
    Normal(NormalAnimator),
    /// Continuous rotation.
    Orbit(OrbitAnimator),
    /// Eye/look-at glide.
    Navigate(NavigateAnimator),
    /// Timed flight to a saved view.
    Transition(TransitionAnimator),
    /// Field-of-view morph.
    Morphing(MorphingAnimator),
}

impl CameraAnimator {
    /// Which variant this is.
    #[must_use]
    pub fn kind(&self) -> AnimatorKind {
        match self {
            Self::Instant(_) => AnimatorKind::Instant,
            Self::Normal(_) => AnimatorKind::Normal,
            Self::Orbit(_) => AnimatorKind::Orbit,
            Self::Navigate(_) => AnimatorKind::Navigate,
            Self::Transition(_) => AnimatorKind::Transition,
            Self::Morphing(_) => AnimatorKind::Morphing,
        }
    }

    /// Bring a bound animator to rest, leaving the rig in a pose the normal
    /// animator can continue from. Animators without an end state are left
    /// as they are.
    pub fn stop(&mut self, rig: &mut CameraRig) {
        match self {
            Self::Orbit(orbit) => orbit.stop(rig),
            Self::Navigate(navigate) => navigate.force_stop(rig),
            Self::Transition(transition) => transition.stop(rig),
            Self::Instant(_) | Self::Normal(_) | Self::Morphing(_) => {}
        }
    }

    fn as_animator(&mut self) -> &mut dyn Animator {
        match self {
            Self::Instant(a) => a,
            Self::Normal(a) => a,
            Self::Orbit(a) => a,
            Self::Navigate(a) => a,
            Self::Transition(a) => a,
            Self::Morphing(a) => a,
        }
    }
}

impl Animator for CameraAnimator {
    fn update(&mut self, rig: &mut CameraRig, now: Instant) -> AnimatorStep {
        self.as_animator().update(rig, now)
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Instant(a) => a.name(),
            Self::Normal(a) => a.name(),
            Self::Orbit(a) => a.name(),
            Self::Navigate(a) => a.name(),
            Self::Transition(a) => a.name(),
            Self::Morphing(a) => a.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::scene::SceneBounds;

    #[test]
    fn enum_dispatches_to_variant() {
        let mut rig =
            CameraRig::new(Camera::new(640, 480), SceneBounds::default());
        let mut animator = CameraAnimator::Orbit(OrbitAnimator::new(0.01));
        let theta = rig.target.theta;
        let step = animator.update(&mut rig, Instant::now());
        assert!(step.updated);
        assert!((rig.target.theta - theta - 0.01).abs() < 1e-12);
        assert_eq!(animator.name(), "orbit");
        assert_eq!(animator.kind(), AnimatorKind::Orbit);
    }

    #[test]
    fn stop_settles_transition_angles() {
        let mut rig =
            CameraRig::new(Camera::new(640, 480), SceneBounds::default());
        rig.camera.update();
        rig.target.theta = 2.0;
        let mut animator = CameraAnimator::Transition(
            TransitionAnimator::from_options(&Default::default()),
        );
        animator.stop(&mut rig);
        assert_eq!(rig.target.theta, rig.camera.theta());
    }
}
