//! Point-to-point glide driven by eye and look-at targets.

use std::time::Duration;

use glam::DVec3;
use web_time::Instant;

use super::traits::{Animator, AnimatorStep};
use crate::camera::CameraRig;

/// Fraction of the remaining way covered per tick.
const RATE: f64 = 0.15;

/// Eye, look-at and fov must all be this close to their targets before a
/// requested stop takes effect.
const SETTLE_TOLERANCE: f64 = 1e-3;

/// Glides eye and look-at toward targets set by the host, e.g. from a
/// walkthrough path or a minimap click.
///
/// Stopping is deferred: a stop requested mid-glide is re-checked after a
/// delay until the camera has settled, so the glide is never cut short.
#[derive(Debug, Clone)]
pub struct NavigateAnimator {
    stop_delay: Duration,
    pending_stop: Option<Instant>,
}

impl NavigateAnimator {
    /// Navigator re-checking a pending stop every `stop_delay`.
    #[must_use]
    pub fn new(stop_delay: Duration) -> Self {
        Self {
            stop_delay,
            pending_stop: None,
        }
    }

    /// Set the glide destination. Angles and fov are optional; the fov is
    /// clamped like any target fov.
    pub fn start(
        &mut self,
        rig: &mut CameraRig,
        eye: DVec3,
        at: DVec3,
        angles: Option<(f64, f64)>,
        fov: Option<f64>,
    ) {
        if let Some((theta, phi)) = angles {
            rig.target.theta = theta;
            rig.target.phi = phi;
        }
        if let Some(fov) = fov {
            rig.target.fov = fov.clamp(0.1, 179.9);
        }
        rig.set_target_eye_at(eye, at);
        self.pending_stop = None;
    }

    /// Ask the glide to end. Returns `true` when it ended now; otherwise a
    /// re-check is scheduled and a later [`Animator::update`] finishes.
    pub fn request_stop(&mut self, rig: &mut CameraRig, now: Instant) -> bool {
        if rig.eye_at_unsettled(SETTLE_TOLERANCE) {
            log::trace!("navigation still moving, deferring stop");
            self.pending_stop = Some(now + self.stop_delay);
            return false;
        }
        self.force_stop(rig);
        true
    }

    /// End the glide immediately, deriving the angles from where the camera
    /// is.
    pub fn force_stop(&mut self, rig: &mut CameraRig) {
        self.pending_stop = None;
        rig.camera.distance = rig.target.distance;
        rig.settle_angles(true);
    }

    /// Whether a deferred stop is waiting.
    #[must_use]
    pub fn is_stopping(&self) -> bool {
        self.pending_stop.is_some()
    }
}

impl Animator for NavigateAnimator {
    fn update(&mut self, rig: &mut CameraRig, now: Instant) -> AnimatorStep {
        if self.pending_stop.is_some_and(|at| now >= at)
            && self.request_stop(rig, now)
        {
            return AnimatorStep::finished(true);
        }
        rig.step_eye_at(RATE);
        AnimatorStep::running(true)
    }

    fn name(&self) -> &'static str {
        "navigate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Camera, SNAP_PHI_LIMIT};
    use crate::scene::SceneBounds;

    fn rig() -> CameraRig {
        let mut rig =
            CameraRig::new(Camera::new(640, 480), SceneBounds::default());
        rig.target.fov = rig.camera.fov();
        rig.camera.update();
        rig
    }

    #[test]
    fn stop_is_deferred_until_settled() {
        let mut rig = rig();
        let mut nav = NavigateAnimator::new(Duration::from_millis(100));
        let eye = DVec3::new(6.0, 4.0, 3.0);
        let at = DVec3::new(0.0, 0.0, 1.0);
        nav.start(&mut rig, eye, at, None, None);

        let mut now = Instant::now();
        let _ = nav.update(&mut rig, now);
        assert!(!nav.request_stop(&mut rig, now));
        assert!(nav.is_stopping());

        let mut finished = false;
        for _ in 0..400 {
            now += Duration::from_millis(16);
            let step = nav.update(&mut rig, now);
            if step.finished {
                finished = true;
                break;
            }
        }
        assert!(finished);
        assert!(rig.camera.eye().distance(eye) <= 1e-3);

        let d = rig.camera.eye() - rig.camera.at();
        let phi = (d.z / rig.target.distance)
            .clamp(-1.0, 1.0)
            .asin()
            .clamp(-SNAP_PHI_LIMIT, SNAP_PHI_LIMIT);
        assert!((rig.camera.theta() - d.y.atan2(d.x)).abs() < 1e-9);
        assert!((rig.camera.phi() - phi).abs() < 1e-9);
    }

    #[test]
    fn stop_when_settled_is_immediate() {
        let mut rig = rig();
        let mut nav = NavigateAnimator::new(Duration::from_millis(100));
        let eye = rig.camera.eye();
        let at = rig.camera.at();
        nav.start(&mut rig, eye, at, None, None);
        assert!(nav.request_stop(&mut rig, Instant::now()));
        assert!(!nav.is_stopping());
    }

    #[test]
    fn start_clamps_fov() {
        let mut rig = rig();
        let mut nav = NavigateAnimator::new(Duration::ZERO);
        nav.start(
            &mut rig,
            DVec3::X,
            DVec3::ZERO,
            Some((0.5, 0.1)),
            Some(500.0),
        );
        assert_eq!(rig.target.fov, 179.9);
        assert_eq!(rig.target.theta, 0.5);
    }
}
