//! Exponential-decay animator, the default.

use web_time::Instant;

use super::traits::{Animator, AnimatorStep};
use crate::camera::{CameraRig, POLE_LIMIT};
use crate::options::AnimationOptions;

/// Threshold on angle and fov deltas below which nothing moves.
const ANGLE_THRESHOLD: f64 = 1e-4;

/// Moves every pose component a fixed fraction of the remaining way to its
/// target per tick.
///
/// Never finishes on its own; it idles once the pose has converged. The
/// look-at point only follows its target in third person, since a
/// first-person camera derives it from the eye.
#[derive(Debug, Clone, Copy)]
pub struct NormalAnimator {
    acceleration: f64,
    update_threshold: f64,
}

impl Default for NormalAnimator {
    fn default() -> Self {
        Self::from_options(&AnimationOptions::default())
    }
}

impl NormalAnimator {
    /// Animator tuned by `options.acceleration` and
    /// `options.update_threshold`.
    #[must_use]
    pub fn from_options(options: &AnimationOptions) -> Self {
        Self {
            acceleration: options.acceleration,
            update_threshold: options.update_threshold,
        }
    }
}

impl Animator for NormalAnimator {
    fn update(&mut self, rig: &mut CameraRig, _now: Instant) -> AnimatorStep {
        let k = self.acceleration;
        let target = &rig.target;
        let camera = &mut rig.camera;

        let diff_distance = target.distance - camera.distance;
        let diff_theta = target.theta - camera.theta;
        let diff_phi = target.phi - camera.phi;
        let diff_fov = target.fov - camera.fov();

        let mut diff_at = 0.0;
        if !camera.first_person {
            let delta = target.at - camera.at;
            camera.at += delta * k;
            diff_at = delta.abs().element_sum();
        }

        let angle_changed =
            diff_theta.abs() + diff_phi.abs() > ANGLE_THRESHOLD;
        let position_changed =
            diff_distance.abs() + diff_at > self.update_threshold;
        let fov_changed = diff_fov.abs() > ANGLE_THRESHOLD;
        let updated = angle_changed
            || position_changed
            || fov_changed
            || camera.is_changed();

        if updated {
            camera.distance += diff_distance * k;
            camera.theta += diff_theta * k;
            camera.phi =
                (camera.phi + diff_phi * k).clamp(-POLE_LIMIT, POLE_LIMIT);
            let fov = camera.fov() + diff_fov * k;
            camera.apply_fov(fov);

            rig.update_projection();
            rig.camera.update();
        }
        AnimatorStep::running(updated)
    }

    fn name(&self) -> &'static str {
        "normal"
    }
}
