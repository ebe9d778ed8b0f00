//! Snap animator with no interpolation.

use web_time::Instant;

use super::traits::{Animator, AnimatorStep};
use crate::camera::{CameraRig, SNAP_PHI_LIMIT};

/// Copies the target pose into the current pose every tick.
///
/// Used when the host drives the camera directly, e.g. from a VR headset
/// pose, and any smoothing would lag.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantAnimator;

impl Animator for InstantAnimator {
    fn update(&mut self, rig: &mut CameraRig, _now: Instant) -> AnimatorStep {
        let camera = &mut rig.camera;
        camera.distance = rig.target.distance;
        camera.theta = rig.target.theta;
        camera.phi = rig.target.phi.clamp(-SNAP_PHI_LIMIT, SNAP_PHI_LIMIT);
        if !camera.first_person {
            camera.at = rig.target.at;
        }
        camera.apply_fov(rig.target.fov);

        rig.update_projection();
        rig.camera.update();
        AnimatorStep::running(true)
    }

    fn name(&self) -> &'static str {
        "instant"
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::*;
    use crate::camera::Camera;
    use crate::scene::SceneBounds;

    fn rig() -> CameraRig {
        CameraRig::new(Camera::new(640, 480), SceneBounds::default())
    }

    #[test]
    fn snaps_to_target_and_clamps_pitch() {
        let mut rig = rig();
        rig.target.theta = 0.3;
        rig.target.phi = 2.0;
        rig.target.distance = 4.0;
        rig.target.fov = 60.0;
        rig.target.at = DVec3::new(1.0, 1.0, 0.0);

        let step = InstantAnimator.update(&mut rig, Instant::now());
        assert!(step.updated);
        assert!(!step.finished);
        assert_eq!(rig.camera.theta(), 0.3);
        assert_eq!(rig.camera.phi(), SNAP_PHI_LIMIT);
        assert_eq!(rig.camera.distance(), 4.0);
        assert_eq!(rig.camera.fov(), 60.0);
        assert_eq!(rig.camera.at(), DVec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn first_person_keeps_eye() {
        let mut rig = rig();
        rig.camera.update();
        rig.set_first_person(true);
        rig.camera.update();
        let eye = rig.camera.eye();
        rig.target.at = DVec3::new(50.0, 0.0, 0.0);
        rig.target.theta += 0.5;

        let _ = InstantAnimator.update(&mut rig, Instant::now());
        assert!((rig.camera.eye() - eye).length() < 1e-9);
    }
}
