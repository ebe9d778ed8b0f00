//! The state animators operate on: the base camera, its target pose and the
//! scene it frames.

use std::f64::consts::{PI, TAU};

use glam::DVec3;

use super::core::{Camera, SNAP_PHI_LIMIT};
use super::dump::CameraDump;
use crate::scene::SceneBounds;

/// Closest the eye may get to the look-at point, as a fraction of the scene
/// radius.
const MIN_DISTANCE_RATIO: f64 = 0.001;

/// Where input wants the camera to be. Animators move the current pose of
/// [`Camera`] toward it.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetPose {
    /// Target azimuth in radians.
    pub theta: f64,
    /// Target elevation in radians.
    pub phi: f64,
    /// Target eye to look-at distance.
    pub distance: f64,
    /// Target vertical field of view in degrees.
    pub fov: f64,
    /// Target look-at point.
    pub at: DVec3,
    /// Target eye, used by eye-driven animators.
    pub eye: DVec3,
}

impl Default for TargetPose {
    fn default() -> Self {
        Self {
            theta: -PI / 4.0,
            phi: PI / 18.0,
            distance: 15.0,
            fov: 46.0,
            at: DVec3::ZERO,
            eye: DVec3::ZERO,
        }
    }
}

/// Unit vector for spherical angles, pointing from the look-at point toward
/// a third-person eye.
#[must_use]
pub fn spherical_direction(theta: f64, phi: f64) -> DVec3 {
    let (sx, cx) = phi.sin_cos();
    let (sz, cz) = theta.sin_cos();
    DVec3::new(cx * cz, cx * sz, sx)
}

/// Wrap an angle difference into `[-pi, pi]`.
#[must_use]
pub fn shortest_arc(diff: f64) -> f64 {
    let diff = diff % TAU;
    if diff > PI {
        diff - TAU
    } else if diff < -PI {
        diff + TAU
    } else {
        diff
    }
}

/// Camera plus target pose plus scene bounds.
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// Current pose and matrices.
    pub camera: Camera,
    /// Pose the animators converge to.
    pub target: TargetPose,
    /// Bounds of the framed scene.
    pub scene: SceneBounds,
}

impl CameraRig {
    /// Rig with default poses.
    #[must_use]
    pub fn new(camera: Camera, scene: SceneBounds) -> Self {
        Self {
            camera,
            target: TargetPose::default(),
            scene,
        }
    }

    /// Fit the near/far planes around the scene for the current pose.
    ///
    /// Both the current eye and the eye the target distance would produce
    /// are considered, so zooming does not clip the model mid-animation.
    pub fn update_projection(&mut self) {
        let center = self.scene.center();
        let radius = self.scene.radius;
        let back = self.camera.back_axis();
        let target_eye = self.camera.at + back * self.target.distance;

        let current = back.dot(self.camera.eye - center);
        let targeted = back.dot(target_eye - center);

        let mut znear = current.min(targeted) - radius * 1.1;
        let zfar = current.max(targeted) + radius * 1.03;
        if self.camera.is_perspective() && znear < MIN_DISTANCE_RATIO * radius
        {
            znear = MIN_DISTANCE_RATIO * radius;
        }
        self.camera.update_projection(znear, zfar);
    }

    /// Enter or leave first-person mode on both poses.
    ///
    /// Leaving first person pins the target look-at to the current one so
    /// the camera orbits where it was looking.
    pub fn set_first_person(&mut self, enabled: bool) {
        if self.camera.first_person != enabled {
            self.target.theta += PI;
            self.target.phi = -self.target.phi;
        }
        if !enabled {
            self.target.at = self.camera.at;
            self.camera.mark_changed();
        }
        self.camera.set_first_person(enabled);
    }

    /// Set target eye and look-at, pushing the look-at away when the two
    /// nearly coincide.
    pub fn set_target_eye_at(&mut self, eye: DVec3, at: DVec3) {
        self.target.eye = eye;
        self.target.at = at;

        let offset = at - eye;
        let d = offset.length();
        let min_distance = MIN_DISTANCE_RATIO * self.scene.radius;
        self.target.distance = d;
        if d < min_distance {
            self.target.distance = min_distance;
            self.target.at = if d > 0.0 {
                eye + offset * (min_distance / d)
            } else {
                eye + self.camera.view_direction() * min_distance
            };
        }
    }

    /// Move eye, look-at and fov a `rate` fraction toward their targets and
    /// rebuild the view with a look-at matrix.
    pub fn step_eye_at(&mut self, rate: f64) {
        let camera = &mut self.camera;
        let eye = camera.eye + (self.target.eye - camera.eye) * rate;
        let at = camera.at + (self.target.at - camera.at) * rate;
        camera.look_at(eye, at);

        let fov = camera.fov() + (self.target.fov - camera.fov()) * rate;
        camera.apply_fov(fov);
        self.update_projection();
    }

    /// Whether eye, look-at or fov are further than `tolerance` from their
    /// targets.
    #[must_use]
    pub fn eye_at_unsettled(&self, tolerance: f64) -> bool {
        self.camera.eye.distance(self.target.eye) > tolerance
            || self.camera.at.distance(self.target.at) > tolerance
            || (self.target.fov - self.camera.fov()).abs() > tolerance
    }

    /// Derive both poses' angles from the current eye-at vector, ending an
    /// eye-driven animation.
    ///
    /// The eye-at vector points backward in first person; `flip_first_person`
    /// converts the angles accordingly.
    pub fn settle_angles(&mut self, flip_first_person: bool) {
        let d = self.camera.eye - self.camera.at;
        let ratio = if self.target.distance > 0.0 {
            (d.z / self.target.distance).clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let mut phi = ratio.asin().clamp(-SNAP_PHI_LIMIT, SNAP_PHI_LIMIT);
        let mut theta = d.y.atan2(d.x);
        if flip_first_person && self.camera.first_person {
            phi = -phi;
            theta += PI;
        }
        self.camera.phi = phi;
        self.target.phi = phi;
        self.camera.theta = theta;
        self.target.theta = theta;
    }

    /// Jump both poses to a saved view.
    ///
    /// Theta takes the shortest arc from the current angle. A first-person
    /// camera stays first-person: the saved third-person angles are converted
    /// and the eye is placed in front of the saved look-at. Views saved from
    /// an orthographic camera switch to orthographic and reset the distance
    /// to frame the whole scene.
    pub fn restore(&mut self, dump: &CameraDump) {
        let distance = if dump.height.is_some() {
            self.scene.radius * 1.2
        } else {
            dump.distance
        };
        self.camera.distance = distance;
        self.target.distance = distance;

        let phi = dump.phi.clamp(-SNAP_PHI_LIMIT, SNAP_PHI_LIMIT);
        let at = DVec3::from_array(dump.at);

        if self.camera.first_person {
            self.camera.phi = -phi;
            self.target.phi = -phi;
            let diff = shortest_arc(dump.theta + PI - self.camera.theta);
            self.target.theta = self.camera.theta + diff;
            self.camera.theta = self.target.theta;

            let dir = spherical_direction(self.target.theta, self.target.phi);
            self.camera.eye = at - dir * distance;
        } else {
            self.camera.phi = phi;
            self.target.phi = phi;
            let diff = shortest_arc(dump.theta - self.camera.theta);
            self.target.theta = self.camera.theta + diff;
            self.camera.theta = self.target.theta;
        }

        self.camera.at = at;
        self.target.at = at;

        if let Some(height) = dump.height {
            self.camera.apply_height(height);
            self.camera.set_perspective(false);
        } else {
            self.camera.set_perspective(true);
        }

        self.update_projection();
        self.camera.update();
        self.camera.mark_changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Aabb;

    fn rig() -> CameraRig {
        let scene =
            SceneBounds::new(Aabb::new(DVec3::splat(-5.0), DVec3::splat(5.0)));
        let mut rig = CameraRig::new(Camera::new(800, 600), scene);
        rig.camera.update();
        rig
    }

    #[test]
    fn shortest_arc_wraps() {
        assert!((shortest_arc(1.5 * PI) + 0.5 * PI).abs() < 1e-12);
        assert!((shortest_arc(-1.5 * PI) - 0.5 * PI).abs() < 1e-12);
        assert!((shortest_arc(5.0 * PI) - PI).abs() < 1e-9);
        assert_eq!(shortest_arc(0.25), 0.25);
    }

    #[test]
    fn projection_brackets_scene() {
        let mut rig = rig();
        rig.target.distance = rig.camera.distance;
        rig.update_projection();
        let to_center = rig.camera.eye.distance(rig.scene.center());
        assert!(rig.camera.znear() < to_center - rig.scene.radius);
        assert!(rig.camera.zfar() > to_center + rig.scene.radius);
        assert!(rig.camera.znear() >= 0.001 * rig.scene.radius);
    }

    #[test]
    fn target_eye_at_enforces_min_distance() {
        let mut rig = rig();
        let eye = DVec3::new(1.0, 0.0, 0.0);
        rig.set_target_eye_at(eye, eye + DVec3::new(1e-6, 0.0, 0.0));
        let min = 0.001 * rig.scene.radius;
        assert!((rig.target.distance - min).abs() < 1e-12);
        assert!((rig.target.at.distance(eye) - min).abs() < 1e-12);

        rig.set_target_eye_at(eye, eye);
        assert!((rig.target.at.distance(eye) - min).abs() < 1e-12);
    }

    #[test]
    fn settle_angles_recovers_spherical_pose() {
        let mut rig = rig();
        rig.camera.theta = 0.8;
        rig.camera.phi = 0.3;
        rig.camera.update();
        rig.target.distance = rig.camera.distance;
        rig.camera.theta = 0.0;
        rig.camera.phi = 0.0;
        rig.settle_angles(true);
        assert!((rig.camera.theta - 0.8).abs() < 1e-9);
        assert!((rig.camera.phi - 0.3).abs() < 1e-9);
        assert_eq!(rig.target.theta, rig.camera.theta);
    }

    #[test]
    fn settle_angles_flips_in_first_person() {
        let mut rig = rig();
        rig.camera.theta = 0.8;
        rig.camera.phi = 0.3;
        rig.camera.first_person = true;
        rig.camera.update();
        rig.target.distance = rig.camera.distance;
        rig.settle_angles(true);
        let dir = spherical_direction(rig.camera.theta, rig.camera.phi);
        let expected = spherical_direction(0.8, 0.3);
        assert!((dir - expected).length() < 1e-9);
    }

    #[test]
    fn step_eye_at_converges() {
        let mut rig = rig();
        rig.set_target_eye_at(DVec3::new(10.0, 10.0, 2.0), DVec3::ZERO);
        for _ in 0..200 {
            rig.step_eye_at(0.15);
        }
        assert!(!rig.eye_at_unsettled(1e-3));
        assert!(rig.camera.view_matrix().is_finite());
    }

    #[test]
    fn restore_third_person() {
        let mut rig = rig();
        let dump = CameraDump {
            fov: Some(46.0),
            height: None,
            distance: 7.0,
            phi: 0.2,
            theta: 0.1 + 2.0 * PI,
            at: [1.0, 2.0, 3.0],
        };
        rig.restore(&dump);
        assert_eq!(rig.camera.at(), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(rig.camera.distance(), 7.0);
        // Shortest arc from the default theta of pi
        assert!((rig.camera.theta() - 0.1).abs() < 1e-9);
        let expected =
            DVec3::new(1.0, 2.0, 3.0) + spherical_direction(0.1, 0.2) * 7.0;
        assert!((rig.camera.eye() - expected).length() < 1e-9);
    }

    #[test]
    fn restore_ortho_dump_switches_projection() {
        let mut rig = rig();
        let dump = CameraDump {
            fov: None,
            height: Some(3.0),
            distance: 100.0,
            phi: 2.0,
            theta: 0.0,
            at: [0.0; 3],
        };
        rig.restore(&dump);
        assert!(!rig.camera.is_perspective());
        assert_eq!(rig.camera.height(), 3.0);
        assert!((rig.target.distance - rig.scene.radius * 1.2).abs() < 1e-12);
        assert!((rig.camera.phi() - SNAP_PHI_LIMIT).abs() < 1e-12);
    }

    #[test]
    fn restore_first_person_keeps_view_through_at() {
        let mut rig = rig();
        rig.set_first_person(true);
        let dump = CameraDump {
            fov: Some(46.0),
            height: None,
            distance: 4.0,
            phi: 0.1,
            theta: 1.0,
            at: [0.0, 0.0, 1.0],
        };
        rig.restore(&dump);
        assert!(rig.camera.is_first_person());
        assert!((rig.camera.at() - DVec3::new(0.0, 0.0, 1.0)).length() < 1e-9);
        let expected_eye =
            DVec3::new(0.0, 0.0, 1.0) + spherical_direction(1.0, 0.1) * 4.0;
        assert!((rig.camera.eye() - expected_eye).length() < 1e-9);
    }
}
