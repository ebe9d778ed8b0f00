//! Field-of-view morph for panorama blending.

use web_time::Instant;

use super::traits::{Animator, AnimatorStep};
use crate::camera::CameraRig;

/// Steps the fov toward its target by a constant increment.
#[derive(Debug, Clone, Copy)]
pub struct MorphingAnimator {
    steps: u32,
    speed: f64,
    fov_diff: f64,
}

impl MorphingAnimator {
    /// Morph finishing in `steps` ticks.
    #[must_use]
    pub fn new(steps: u32) -> Self {
        Self {
            steps: steps.max(1),
            speed: 0.0,
            fov_diff: 0.0,
        }
    }

    /// Begin a morph. Angles snap immediately; `fov` replaces the current
    /// fov (clamped to `[1, 170]`) and `target_fov` the target.
    pub fn start(
        &mut self,
        rig: &mut CameraRig,
        angles: Option<(f64, f64)>,
        fov: Option<f64>,
        target_fov: Option<f64>,
    ) {
        if let Some((theta, phi)) = angles {
            rig.camera.theta = theta;
            rig.target.theta = theta;
            rig.camera.phi = phi;
            rig.target.phi = phi;
        }
        if let Some(fov) = fov {
            rig.camera.apply_fov(fov.clamp(1.0, 170.0));
        }
        if let Some(target_fov) = target_fov {
            rig.target.fov = target_fov;
        }
        self.fov_diff = rig.target.fov - rig.camera.fov();
        self.speed = self.fov_diff / f64::from(self.steps);
    }

    /// Completed fraction, from 0 at start to 1 at the target fov.
    #[must_use]
    pub fn progress(&self, rig: &CameraRig) -> f64 {
        if self.fov_diff == 0.0 {
            return 1.0;
        }
        1.0 - (rig.target.fov - rig.camera.fov()) / self.fov_diff
    }
}

impl Animator for MorphingAnimator {
    fn update(&mut self, rig: &mut CameraRig, _now: Instant) -> AnimatorStep {
        let remaining = rig.target.fov - rig.camera.fov();
        if self.speed == 0.0 || remaining.abs() < self.speed.abs() {
            rig.camera.apply_fov(rig.target.fov);
            rig.camera.update();
            return AnimatorStep::finished(true);
        }
        let fov = rig.camera.fov() + self.speed;
        rig.camera.apply_fov(fov);
        rig.camera.update();
        AnimatorStep::running(true)
    }

    fn name(&self) -> &'static str {
        "morphing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::scene::SceneBounds;

    fn rig() -> CameraRig {
        CameraRig::new(Camera::new(640, 480), SceneBounds::default())
    }

    #[test]
    fn reaches_target_in_configured_steps() {
        let mut rig = rig();
        let mut morph = MorphingAnimator::new(50);
        morph.start(&mut rig, Some((0.2, 0.1)), Some(90.0), Some(40.0));
        assert_eq!(rig.camera.theta(), 0.2);
        assert_eq!(morph.progress(&rig), 0.0);

        let mut ticks = 0;
        while !morph.update(&mut rig, Instant::now()).finished {
            ticks += 1;
            assert!(ticks <= 50);
        }
        assert_eq!(rig.camera.fov(), 40.0);
        assert_eq!(morph.progress(&rig), 1.0);
    }

    #[test]
    fn progress_is_monotonic() {
        let mut rig = rig();
        let mut morph = MorphingAnimator::new(10);
        morph.start(&mut rig, None, Some(30.0), Some(80.0));
        let mut last = morph.progress(&rig);
        for _ in 0..5 {
            let _ = morph.update(&mut rig, Instant::now());
            let p = morph.progress(&rig);
            assert!(p > last);
            last = p;
        }
    }

    #[test]
    fn start_clamps_fov_and_empty_morph_finishes() {
        let mut rig = rig();
        let mut morph = MorphingAnimator::new(50);
        morph.start(&mut rig, None, Some(400.0), Some(170.0));
        assert_eq!(rig.camera.fov(), 170.0);
        assert!(morph.update(&mut rig, Instant::now()).finished);
    }
}
