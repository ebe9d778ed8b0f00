//! Timed, eased flight between two saved views.

use std::f64::consts::PI;
use std::time::Duration;

use glam::DVec3;
use web_time::Instant;

use super::traits::{Animator, AnimatorStep};
use crate::camera::{
    spherical_direction, CameraDump, CameraEvent, CameraRig, SNAP_PHI_LIMIT,
};
use crate::options::AnimationOptions;
use crate::util::EasingFunction;

/// Fraction of the remaining way the camera chases the interpolated pose
/// per tick.
const RATE: f64 = 0.15;

/// Position delta below which a tick counts as idle.
const POSITION_THRESHOLD: f64 = 1e-4;

/// Looking straight up or down needs more iterations to land on the exact
/// eye and look-at, so the idle threshold is tightened there.
const VERTICAL_POSITION_THRESHOLD: f64 = 1e-7;

/// Past this multiple of the planned duration the flight is abandoned.
const OVERRUN_FACTOR: u32 = 3;

/// One end of a flight.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Waypoint {
    eye: DVec3,
    at: DVec3,
    theta: f64,
    phi: f64,
    distance: f64,
}

impl Waypoint {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            eye: self.eye.lerp(other.eye, t),
            at: self.at.lerp(other.at, t),
            theta: self.theta + (other.theta - self.theta) * t,
            phi: self.phi + (other.phi - self.phi) * t,
            distance: self.distance + (other.distance - self.distance) * t,
        }
    }
}

/// Flies from the current view to a [`CameraDump`].
///
/// The flight length is proportional to how far the view moves relative to
/// the scene size, bounded by a step budget. When it ends (or is abandoned
/// after overrunning) [`CameraEvent::TransitionEnded`] is queued.
#[derive(Debug, Clone)]
pub struct TransitionAnimator {
    src: Waypoint,
    dst: Waypoint,
    start: Option<Instant>,
    duration: Duration,
    step: Duration,
    max_steps: u32,
    distance_ratio: f64,
    easing: EasingFunction,
}

impl TransitionAnimator {
    /// Transition tuned by the `transition_*` options.
    #[must_use]
    pub fn from_options(options: &AnimationOptions) -> Self {
        Self {
            src: Waypoint::default(),
            dst: Waypoint::default(),
            start: None,
            duration: Duration::ZERO,
            step: Duration::from_millis(options.transition_step_ms),
            max_steps: options.transition_max_steps,
            distance_ratio: options.transition_distance_ratio,
            easing: options.transition_easing,
        }
    }

    /// Change the time per step for subsequent flights.
    pub fn set_step_duration(&mut self, step: Duration) {
        self.step = step;
    }

    /// Planned flight duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Begin a flight to `dest`.
    ///
    /// The target pose is restored to `dest` right away so the end point is
    /// known, then the current pose is put back at the source. With `vr`
    /// the flight is skipped and the camera chases the destination directly,
    /// since an animated view is uncomfortable in a headset.
    pub fn start(
        &mut self,
        rig: &mut CameraRig,
        dest: &CameraDump,
        vr: bool,
        now: Instant,
    ) {
        if vr {
            rig.restore(dest);
        }
        self.src = Waypoint {
            eye: rig.camera.eye,
            at: rig.camera.at,
            theta: rig.camera.theta,
            phi: rig.camera.phi,
            distance: rig.camera.distance,
        };
        if !vr {
            rig.restore(dest);
        }

        let mut dir = spherical_direction(rig.target.theta, rig.target.phi);
        if rig.camera.first_person {
            dir = -dir;
        }
        let dst_at = DVec3::from_array(dest.at);
        self.dst = Waypoint {
            eye: dst_at + dir * rig.target.distance,
            at: dst_at,
            theta: rig.target.theta,
            phi: rig.target.phi,
            distance: rig.target.distance,
        };
        self.duration = self.plan(rig.scene.radius);

        rig.camera.at = self.src.at;
        rig.camera.eye = self.src.eye;

        if vr {
            self.start = None;
            let dst = self.dst;
            let _ = self.chase(rig, &dst);
        } else {
            self.start = Some(now);
            let src = self.src;
            let _ = self.chase(rig, &src);
        }
        log::debug!(
            "camera transition planned for {} ms",
            self.duration.as_millis()
        );
    }

    /// Freeze the pose where the flight left it.
    pub fn stop(&mut self, rig: &mut CameraRig) {
        self.start = None;
        rig.target.distance = rig.camera.distance;
        rig.settle_angles(true);
    }

    fn finish(&mut self, rig: &mut CameraRig) -> AnimatorStep {
        rig.camera.emit(CameraEvent::TransitionEnded);
        self.stop(rig);
        AnimatorStep::finished(true)
    }

    /// Step count from the largest of the positional and angular moves.
    fn plan(&self, radius: f64) -> Duration {
        let (src, dst) = (&self.src, &self.dst);
        let radius = if radius > 0.0 { radius } else { 1.0 };
        let by_length = |d: f64| (d / radius * self.distance_ratio).ceil();
        let by_angle = |a: f64| (a.abs() / PI * 90.0).ceil();

        let steps = [
            by_length(src.at.distance(dst.at)),
            by_length(src.eye.distance(dst.eye)),
            by_length((src.distance - dst.distance).abs()),
            by_angle(src.theta - dst.theta),
            by_angle(src.phi - dst.phi),
        ]
        .into_iter()
        .fold(1.0_f64, f64::max)
        .min(f64::from(self.max_steps.max(1)));
        self.step * steps as u32
    }

    /// Retarget the rig to `pose` and chase it one tick. Returns whether the
    /// camera was still away from the pose.
    fn chase(&self, rig: &mut CameraRig, pose: &Waypoint) -> bool {
        rig.set_target_eye_at(pose.eye, pose.at);
        rig.target.theta = pose.theta;
        rig.target.phi = pose.phi;

        let vertical =
            (1.0 - (rig.target.phi / SNAP_PHI_LIMIT).abs()).abs() < 1e-4;
        let threshold = if vertical {
            VERTICAL_POSITION_THRESHOLD
        } else {
            POSITION_THRESHOLD
        };

        let camera = &rig.camera;
        let angle_changed = (rig.target.theta - camera.theta).abs()
            + (rig.target.phi - camera.phi).abs()
            > 1e-4;
        let position_changed = (rig.target.eye - camera.eye)
            .abs()
            .element_sum()
            + (rig.target.at - camera.at).abs().element_sum()
            > threshold;
        let fov_changed = (rig.target.fov - camera.fov()).abs() > 1e-4;

        rig.step_eye_at(RATE);
        angle_changed || position_changed || fov_changed
    }
}

impl Animator for TransitionAnimator {
    fn update(&mut self, rig: &mut CameraRig, now: Instant) -> AnimatorStep {
        // VR flights are restored in `start` and end on the first tick.
        let Some(start) = self.start else {
            log::debug!("camera transition jumped to destination");
            return self.finish(rig);
        };
        let elapsed = now.saturating_duration_since(start);

        if elapsed >= self.duration {
            let dst = self.dst;
            if elapsed > self.duration.saturating_mul(OVERRUN_FACTOR) {
                log::warn!(
                    "camera transition overran {} ms, stopping",
                    self.duration.as_millis()
                );
                return self.finish(rig);
            }
            if !self.chase(rig, &dst) {
                return self.finish(rig);
            }
            return AnimatorStep::running(true);
        }

        let ratio = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let current = self.src.lerp(&self.dst, self.easing.evaluate(ratio));
        if current.eye.distance(current.at) > 1e-3 {
            return AnimatorStep::running(self.chase(rig, &current));
        }
        AnimatorStep::IDLE
    }

    fn name(&self) -> &'static str {
        "transition"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::scene::SceneBounds;
    use crate::util::Aabb;

    fn rig() -> CameraRig {
        let scene = SceneBounds::new(Aabb::new(
            DVec3::splat(-10.0),
            DVec3::splat(10.0),
        ));
        let mut rig = CameraRig::new(Camera::new(800, 600), scene);
        rig.target.fov = rig.camera.fov();
        rig.camera.update();
        rig
    }

    fn dump() -> CameraDump {
        CameraDump {
            fov: Some(46.0),
            height: None,
            distance: 12.0,
            phi: 0.3,
            theta: 0.5,
            at: [2.0, 1.0, 0.0],
        }
    }

    #[test]
    fn duration_is_bounded_by_step_budget() {
        let mut rig = rig();
        let mut transition =
            TransitionAnimator::from_options(&AnimationOptions::default());
        transition.start(&mut rig, &dump(), false, Instant::now());
        let step = Duration::from_millis(15);
        assert!(transition.duration() >= step);
        assert!(transition.duration() <= step * 266);
    }

    #[test]
    fn zero_move_plans_a_single_step() {
        let mut rig = rig();
        let mut transition =
            TransitionAnimator::from_options(&AnimationOptions::default());
        let here = CameraDump {
            fov: Some(rig.camera.fov()),
            height: None,
            distance: rig.camera.distance(),
            phi: rig.camera.phi(),
            theta: rig.camera.theta(),
            at: rig.camera.at().to_array(),
        };
        transition.start(&mut rig, &here, false, Instant::now());
        assert_eq!(transition.duration(), Duration::from_millis(15));
    }

    #[test]
    fn reaches_destination_and_announces_end() {
        let mut rig = rig();
        let mut transition =
            TransitionAnimator::from_options(&AnimationOptions::default());
        let mut now = Instant::now();
        transition.start(&mut rig, &dump(), false, now);
        let _ = rig.camera.drain_events();

        let mut finished = false;
        for _ in 0..2000 {
            now += Duration::from_millis(16);
            if transition.update(&mut rig, now).finished {
                finished = true;
                break;
            }
        }
        assert!(finished);
        assert_eq!(
            rig.camera.drain_events(),
            vec![CameraEvent::TransitionEnded]
        );
        let at = DVec3::new(2.0, 1.0, 0.0);
        assert!(rig.camera.at().distance(at) < 1e-2);
        assert!((rig.camera.theta() - 0.5).abs() < 1e-2);
        assert!((rig.camera.phi() - 0.3).abs() < 1e-2);
    }

    #[test]
    fn overrun_abandons_flight() {
        let mut rig = rig();
        let mut transition =
            TransitionAnimator::from_options(&AnimationOptions::default());
        let now = Instant::now();
        transition.start(&mut rig, &dump(), false, now);
        let late = now + transition.duration() * 4;
        let step = transition.update(&mut rig, late);
        assert!(step.finished);
        assert!(rig
            .camera
            .drain_events()
            .contains(&CameraEvent::TransitionEnded));
    }

    #[test]
    fn vr_chases_destination_without_timer() {
        let mut rig = rig();
        let mut transition =
            TransitionAnimator::from_options(&AnimationOptions::default());
        transition.start(&mut rig, &dump(), true, Instant::now());
        let at = DVec3::new(2.0, 1.0, 0.0);
        assert_eq!(rig.target.at, at);
        let _ = rig.camera.drain_events();

        let step = transition.update(&mut rig, Instant::now());
        assert!(step.finished);
        assert_eq!(
            rig.camera.drain_events(),
            vec![CameraEvent::TransitionEnded]
        );
    }
}
