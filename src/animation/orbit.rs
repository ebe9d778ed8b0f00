//! Continuous auto-rotation around the look-at point.

use web_time::Instant;

use super::traits::{Animator, AnimatorStep};
use crate::camera::CameraRig;

/// Spins the camera around the vertical axis by a fixed step per tick.
///
/// Orbiting is third-person only. A first-person camera is switched out on
/// [`OrbitAnimator::start`] and switched back on [`OrbitAnimator::stop`].
#[derive(Debug, Clone, Copy)]
pub struct OrbitAnimator {
    step: f64,
    saved_first_person: bool,
}

impl OrbitAnimator {
    /// Orbit advancing `step` radians per tick.
    #[must_use]
    pub fn new(step: f64) -> Self {
        Self {
            step,
            saved_first_person: false,
        }
    }

    /// Leave first person, remembering to return to it.
    pub fn start(&mut self, rig: &mut CameraRig) {
        if rig.camera.is_first_person() {
            self.saved_first_person = true;
            rig.set_first_person(false);
        }
    }

    /// Freeze the pose where the orbit left it.
    pub fn stop(&mut self, rig: &mut CameraRig) {
        rig.target.distance = rig.camera.distance;
        rig.settle_angles(false);
        if self.saved_first_person {
            self.saved_first_person = false;
            rig.set_first_person(true);
        }
    }
}

impl Animator for OrbitAnimator {
    fn update(&mut self, rig: &mut CameraRig, _now: Instant) -> AnimatorStep {
        rig.target.theta += self.step;
        rig.camera.theta = rig.target.theta;
        rig.update_projection();
        rig.camera.update();
        AnimatorStep::running(true)
    }

    fn name(&self) -> &'static str {
        "orbit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::scene::SceneBounds;

    fn rig() -> CameraRig {
        let mut rig =
            CameraRig::new(Camera::new(640, 480), SceneBounds::default());
        rig.camera.update();
        rig
    }

    #[test]
    fn advances_theta_every_tick() {
        let mut rig = rig();
        let start = rig.target.theta;
        let mut orbit = OrbitAnimator::new(0.004);
        orbit.start(&mut rig);
        for _ in 0..10 {
            assert!(orbit.update(&mut rig, Instant::now()).updated);
        }
        assert!((rig.target.theta - start - 0.04).abs() < 1e-12);
        assert_eq!(rig.camera.theta(), rig.target.theta);
    }

    #[test]
    fn restores_first_person_on_stop() {
        let mut rig = rig();
        rig.set_first_person(true);
        rig.camera.update();
        let mut orbit = OrbitAnimator::new(0.004);
        orbit.start(&mut rig);
        assert!(!rig.camera.is_first_person());

        for _ in 0..5 {
            let _ = orbit.update(&mut rig, Instant::now());
        }
        orbit.stop(&mut rig);
        assert!(rig.camera.is_first_person());
        assert_eq!(rig.target.theta, rig.camera.theta());
    }
}
