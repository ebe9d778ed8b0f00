//! The viewer's camera: a [`CameraRig`] driven by a bound animator, with
//! the gesture handlers input code calls and the cull pipeline the renderer
//! queries.
//!
//! Gestures only touch the target pose; [`SceneCamera::update`] lets the
//! active animator move the current pose once per frame.

use std::f64::consts::PI;
use std::mem;
use std::time::Duration;

use glam::DVec3;
use web_time::Instant;

use super::core::{Camera, POLE_LIMIT};
use super::dump::CameraDump;
use super::event::CameraEvent;
use super::rig::{shortest_arc, spherical_direction, CameraRig, TargetPose};
use crate::animation::{
    Animator, AnimatorKind, AnimatorSlot, CameraAnimator, InstantAnimator,
    MorphingAnimator, NavigateAnimator, NormalAnimator, OrbitAnimator,
    TransitionAnimator,
};
use crate::culling::{Cull, CullStats};
use crate::options::{Options, ZeroAreaMode};
use crate::scene::{Drawable, IndexRange, Layer, SceneBounds};

/// Pitch the camera returns to on reset.
const RESET_PHI: f64 = PI / 18.0;
/// Azimuth the camera returns to on reset.
const RESET_THETA: f64 = -PI / 4.0;

/// Spherical camera bound to a scene.
#[derive(Debug, Clone)]
pub struct SceneCamera {
    rig: CameraRig,
    animators: AnimatorSlot,
    cull: Cull,
    options: Options,
    transition_step: Duration,
    init_distance: f64,
    max_zoom_offset: f64,
    min_zoom_offset: f64,
    restricted: bool,
    updated: bool,
}

impl SceneCamera {
    /// Camera for `scene` rendering into a `width` x `height` viewport,
    /// driven by a normal animator.
    #[must_use]
    pub fn new(
        scene: SceneBounds,
        width: u32,
        height: u32,
        options: &Options,
    ) -> Self {
        let mut camera = Camera::new(width, height);
        camera.set_fov(options.camera.fov);
        camera.update_projection(options.camera.znear, options.camera.zfar);

        let mut rig = CameraRig::new(camera, scene);
        rig.target.fov = options.camera.fov;
        rig.camera.update();

        let mut cull = Cull::new(&options.culling);
        cull.set_bim_enabled(
            rig.scene.bim_culling_needed && options.culling.bim,
        );
        cull.update(&rig.camera, &rig.scene);

        Self {
            animators: AnimatorSlot::new(CameraAnimator::Normal(
                NormalAnimator::from_options(&options.animation),
            )),
            cull,
            transition_step: Duration::from_millis(
                options.animation.transition_step_ms,
            ),
            init_distance: rig.target.distance,
            max_zoom_offset: options.camera.max_zoom_offset,
            min_zoom_offset: options.camera.min_zoom_offset,
            options: options.clone(),
            restricted: false,
            updated: true,
            rig,
        }
    }

    /// Advance the active animator one frame. Returns whether the camera
    /// moved and the frame needs redrawing.
    ///
    /// A finished animator is unbound here, handing control back to the one
    /// it displaced.
    pub fn update(&mut self, now: Instant) -> bool {
        let step = self.animators.active_mut().update(&mut self.rig, now);
        if step.updated || step.finished {
            self.cull.update(&self.rig.camera, &self.rig.scene);
        }
        if step.finished {
            let done = self.animators.unbind();
            log::debug!(
                "{} animator finished, {} resumes",
                done.name(),
                self.animators.active().name()
            );
        }
        self.rig.camera.clear_changed();
        self.updated = step.updated;
        step.updated
    }

    /// Whether the last [`SceneCamera::update`] moved the camera.
    #[must_use]
    pub fn is_updated(&self) -> bool {
        self.updated
    }

    // -- Gestures --

    /// Rotate by a drag of `(x, y)` pixels. Vertical drags are inverted in
    /// first person so the view follows the cursor.
    pub fn rotate(&mut self, x: f64, y: f64) {
        let speed = self.options.camera.rotate_speed;
        let y = if self.rig.camera.first_person { -y } else { y };
        self.rig.target.theta -= x * speed;
        self.rig.target.phi =
            (self.rig.target.phi + y * speed).clamp(-POLE_LIMIT, POLE_LIMIT);
    }

    /// Zoom by `delta` (positive = closer).
    ///
    /// Perspective zoom moves the target distance by a step proportional to
    /// it, clamped to the zoom offsets. Orthographic zoom scales the view
    /// height directly.
    pub fn zoom(&mut self, delta: f64) {
        if self.restricted || delta == 0.0 {
            return;
        }
        let ratio = self.options.camera.zoom_ratio;
        if self.rig.camera.is_perspective() {
            let offset = (delta * self.rig.target.distance * ratio)
                .abs()
                .max(self.min_zoom_offset)
                .min(self.max_zoom_offset);
            let target = &mut self.rig.target;
            target.distance -= delta.signum() * offset;
            let floor = 0.001 * self.rig.scene.scale;
            if target.distance < floor {
                target.distance = floor;
            }
        } else {
            let scale = (1.0 - delta * 0.1 * ratio).max(1e-5);
            let height = self.rig.camera.height() * scale;
            self.rig.camera.set_height(height);
        }
    }

    /// Scale the orthographic view height by `ratio`. Ignored in
    /// perspective.
    pub fn zoom_by(&mut self, ratio: f64) {
        if self.rig.camera.is_perspective() {
            return;
        }
        let height = self.rig.camera.height() * ratio;
        self.rig.camera.set_height(height);
    }

    /// Pan by a drag of `(dx, dy)` pixels, scaled with the target distance.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if self.restricted {
            return;
        }
        let offset = 0.001 * self.rig.target.distance;
        let right = self.rig.camera.right_axis();
        let up = self.rig.camera.up_axis();
        self.rig.target.at += (-dx * right + dy * up) * offset;
    }

    /// Walk by `ratio` scene radii along `direction`, by default the view
    /// direction flattened onto the ground plane.
    pub fn forward(&mut self, ratio: f64, direction: Option<DVec3>) {
        if self.restricted {
            return;
        }
        let dir = direction.unwrap_or_else(|| {
            let mut dir = self.rig.camera.view_direction();
            dir.z = 0.0;
            dir
        });
        let offset = dir * ratio * self.rig.scene.radius;
        self.rig.target.at += offset;
        self.rig.camera.eye += offset;
    }

    // -- Framing --

    /// Frame the scene from the default angle.
    ///
    /// The active animator is stopped and replaced by a fresh normal one.
    /// With `change_current` the current pose jumps to the default pose
    /// instead of animating there.
    pub fn reset(&mut self, change_current: bool, layers: &[Layer]) {
        let fresh = self.fresh_animators();
        let mut previous = mem::replace(&mut self.animators, fresh);
        previous.active_mut().stop(&mut self.rig);

        let scene = &self.rig.scene;
        self.rig.target.at = if scene.clipping.is_enabled() {
            scene.clipping.center()
        } else {
            scene.center()
        };

        let distance = self.view_distance(layers);
        self.rig.target.distance = distance;
        self.init_distance = distance;
        self.max_zoom_offset = distance * 0.025;
        self.min_zoom_offset = distance * 0.0025;
        self.rotate_to(RESET_PHI, RESET_THETA);

        if change_current {
            self.rig.camera.reset();
            self.rig.camera.at = self.rig.target.at;
        }
        log::debug!("camera reset, view distance {distance:.3}");
    }

    /// Distance that fits every visible drawable (or the section box, or
    /// the whole scene) on screen along the target view direction.
    #[must_use]
    pub fn view_distance(&self, layers: &[Layer]) -> f64 {
        let half_fov = self.rig.camera.fov().to_radians() * 0.5;
        let scale1 = 1.0 / half_fov.sin();
        let scale2 = scale1 / half_fov.cos();
        let scale3 = half_fov.tan();
        let ratio = self.options.camera.view_distance_ratio;
        let view_dir = self.target_view_direction();
        let at = self.rig.target.at;

        let mut distance = f64::MIN;
        let visible = layers
            .iter()
            .filter(|layer| layer.visible)
            .flat_map(|layer| &layer.drawables);
        for drawable in visible {
            let center = drawable.bsphere.center;
            let r = drawable.bsphere.radius;
            let along = (center - at).dot(view_dir);
            let off_axis = (at + view_dir * along).distance(center);
            let to_eye = off_axis * scale2 + r * scale1;
            let at_to_eye = along + (to_eye - off_axis * scale3);
            distance = distance.max(r.max(at_to_eye) * ratio);
        }

        let clipping = &self.rig.scene.clipping;
        if clipping.is_enabled() {
            let r = clipping.radius();
            distance = distance.min(r.max(r * scale1) * ratio);
        }
        if distance < 0.0 {
            let r = self.rig.scene.radius;
            distance = r.max(r * scale1) * ratio;
        }
        distance
    }

    /// Turn toward `(phi, theta)`, taking the shortest way around.
    pub fn rotate_to(&mut self, phi: f64, theta: f64) {
        let diff = shortest_arc(theta - self.rig.camera.theta);
        self.rig.target.theta = self.rig.camera.theta + diff;
        self.rig.target.phi = phi;
    }

    /// Center the view on `position`. With a positive `range` the distance
    /// is chosen so a sphere of that radius fills the view; otherwise the
    /// camera moves in, but never further than a fraction of the scene.
    pub fn look_to(&mut self, position: DVec3, range: Option<f64>) {
        self.rig.target.at = position;
        match range.filter(|r| *r > 0.0) {
            Some(range) => {
                let half_fov = self.rig.camera.fov() * PI / 360.0;
                self.rig.target.distance = range / half_fov.sin();
            }
            None => {
                let distance = position.distance(self.rig.camera.eye);
                self.rig.camera.distance = distance;
                let cap =
                    self.options.camera.zoom_ratio * self.rig.scene.radius;
                self.rig.target.distance = cap.min(distance);
            }
        }
    }

    /// Jump the current distance and aim the target distance (defaulting to
    /// the same) and optionally the look-at point.
    pub fn zoom_to(
        &mut self,
        distance: f64,
        target_distance: Option<f64>,
        target_at: Option<DVec3>,
    ) {
        self.rig.camera.distance = distance;
        self.rig.target.distance = target_distance.unwrap_or(distance);
        if let Some(at) = target_at {
            self.rig.target.at = at;
        }
    }

    /// Direction the camera will look once the target pose is reached.
    #[must_use]
    pub fn target_view_direction(&self) -> DVec3 {
        let target = &self.rig.target;
        let dir = -spherical_direction(target.theta, target.phi);
        if self.rig.camera.first_person {
            -dir
        } else {
            dir
        }
    }

    /// Scale the largest zoom step relative to the distance at reset.
    pub fn set_zoom_min_max(&mut self, scale: f64) {
        self.max_zoom_offset = self.init_distance * 0.025 * scale;
    }

    /// Set the field of view animators converge to, clamped to
    /// `[0.1, 179.9]` degrees.
    pub fn set_target_fov(&mut self, fov: f64) {
        self.rig.target.fov = fov.clamp(0.1, 179.9);
    }

    /// Field of view animators converge to.
    #[must_use]
    pub fn target_fov(&self) -> f64 {
        self.rig.target.fov
    }

    // -- Saved views --

    /// Snapshot the target view.
    ///
    /// First-person views are stored as the equivalent third-person angles.
    /// Restoring such a dump on a third-person camera yields a view through
    /// the same look-at point from the opposite side of it, so first-person
    /// dumps are lossy.
    #[must_use]
    pub fn dump(&self) -> CameraDump {
        let camera = &self.rig.camera;
        let target = &self.rig.target;
        let (phi, theta) = if camera.first_person {
            (-target.phi, target.theta - PI)
        } else {
            (target.phi, target.theta)
        };
        let perspective = camera.is_perspective();
        CameraDump {
            fov: perspective.then(|| camera.fov()),
            height: (!perspective).then(|| camera.height()),
            distance: target.distance,
            phi,
            theta,
            at: camera.at.to_array(),
        }
    }

    /// Jump to a saved view.
    pub fn restore(&mut self, dump: &CameraDump) {
        self.rig.restore(dump);
        self.cull.update(&self.rig.camera, &self.rig.scene);
    }

    // -- Modes --

    /// Enter or leave first person. `restricted`, when given, also sets
    /// whether pan, zoom and forward are suppressed.
    pub fn set_first_person(
        &mut self,
        enabled: bool,
        restricted: Option<bool>,
    ) {
        self.rig.set_first_person(enabled);
        if let Some(restricted) = restricted {
            self.restricted = restricted;
        }
    }

    /// Whether pan, zoom and forward are suppressed.
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    /// Suppress or allow pan, zoom and forward.
    pub fn set_restricted(&mut self, restricted: bool) {
        self.restricted = restricted;
    }

    /// Switch projection mode.
    pub fn set_perspective(&mut self, perspective: bool) {
        self.rig.camera.set_perspective(perspective);
    }

    /// Resize the viewport and refresh culling thresholds.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.rig.camera.resize(width, height);
        self.cull.update(&self.rig.camera, &self.rig.scene);
    }

    // -- Animators --

    fn fresh_animators(&self) -> AnimatorSlot {
        AnimatorSlot::new(CameraAnimator::Normal(NormalAnimator::from_options(
            &self.options.animation,
        )))
    }

    /// Make `animator` drive the camera, saving the active one for when it
    /// is unbound.
    pub fn bind_animator(&mut self, animator: CameraAnimator, force: bool) {
        log::debug!(
            "binding {} animator over {}",
            animator.name(),
            self.animators.active().name()
        );
        self.animators.bind(animator, force);
    }

    /// Drop the active animator, restoring the one it displaced.
    pub fn unbind_animator(&mut self) -> CameraAnimator {
        let animator = self.animators.unbind();
        log::debug!("unbound {} animator", animator.name());
        animator
    }

    /// Kind of the animator driving the camera.
    #[must_use]
    pub fn active_animator(&self) -> AnimatorKind {
        self.animators.kind()
    }

    /// Snap the current pose to the target every frame.
    pub fn bind_instant(&mut self) {
        self.bind_animator(CameraAnimator::Instant(InstantAnimator), false);
    }

    /// Start auto-rotating.
    pub fn start_orbit(&mut self) {
        let mut orbit = OrbitAnimator::new(self.options.animation.orbit_step);
        orbit.start(&mut self.rig);
        self.bind_animator(CameraAnimator::Orbit(orbit), false);
    }

    /// Stop auto-rotating. No-op unless orbiting.
    pub fn stop_orbit(&mut self) {
        if let CameraAnimator::Orbit(orbit) = self.animators.active_mut() {
            orbit.stop(&mut self.rig);
            let _ = self.unbind_animator();
        }
    }

    /// Glide toward `eye` looking at `at`, binding a navigator if needed.
    pub fn start_navigate(
        &mut self,
        eye: DVec3,
        at: DVec3,
        angles: Option<(f64, f64)>,
        fov: Option<f64>,
    ) {
        if let CameraAnimator::Navigate(nav) = self.animators.active_mut() {
            nav.start(&mut self.rig, eye, at, angles, fov);
            return;
        }
        let delay = Duration::from_millis(
            self.options.animation.navigate_stop_delay_ms,
        );
        let mut nav = NavigateAnimator::new(delay);
        nav.start(&mut self.rig, eye, at, angles, fov);
        self.bind_animator(CameraAnimator::Navigate(nav), false);
    }

    /// End a glide. Unless `force` is set the stop waits for the camera to
    /// settle; returns whether the navigator was unbound now.
    pub fn stop_navigate(&mut self, force: bool, now: Instant) -> bool {
        let CameraAnimator::Navigate(nav) = self.animators.active_mut() else {
            return false;
        };
        if force {
            nav.force_stop(&mut self.rig);
        } else if !nav.request_stop(&mut self.rig, now) {
            return false;
        }
        let _ = self.unbind_animator();
        true
    }

    /// Fly to a saved view. With `vr` the camera chases the view directly.
    pub fn start_transition(
        &mut self,
        dest: &CameraDump,
        vr: bool,
        now: Instant,
    ) {
        let mut transition =
            TransitionAnimator::from_options(&self.options.animation);
        transition.set_step_duration(self.transition_step);
        transition.start(&mut self.rig, dest, vr, now);
        self.bind_animator(CameraAnimator::Transition(transition), false);
    }

    /// Abandon a saved-view flight where it is. No-op unless flying.
    pub fn stop_transition(&mut self) {
        if let CameraAnimator::Transition(t) = self.animators.active_mut() {
            t.stop(&mut self.rig);
            let _ = self.unbind_animator();
        }
    }

    /// Time per step of subsequent saved-view flights.
    pub fn set_transition_step(&mut self, step: Duration) {
        self.transition_step = step;
    }

    /// Morph the field of view, e.g. when blending into a panorama.
    pub fn start_morphing(
        &mut self,
        angles: Option<(f64, f64)>,
        fov: Option<f64>,
        target_fov: Option<f64>,
    ) {
        let mut morph =
            MorphingAnimator::new(self.options.animation.morph_steps);
        morph.start(&mut self.rig, angles, fov, target_fov);
        self.bind_animator(CameraAnimator::Morphing(morph), false);
    }

    /// Completed fraction of the running morph, `None` when not morphing.
    #[must_use]
    pub fn morphing_progress(&self) -> Option<f64> {
        match self.animators.active() {
            CameraAnimator::Morphing(morph) => Some(morph.progress(&self.rig)),
            _ => None,
        }
    }

    // -- Culling --

    /// Run the cull pipeline on a drawable; see [`Cull::is_culled`].
    pub fn cull(
        &mut self,
        drawable: &Drawable,
        indices: &mut IndexRange,
    ) -> bool {
        self.cull.is_culled(drawable, &self.rig.scene.clipping, indices)
    }

    /// Turn the cull pipeline on or off.
    pub fn set_culling_enabled(&mut self, enabled: bool) {
        self.cull.set_enabled(enabled);
        if enabled {
            self.cull.update(&self.rig.camera, &self.rig.scene);
        }
    }

    /// Turn BIM trimming on or off. Stays off for scenes without BIM
    /// regions.
    pub fn set_bim_culling_enabled(&mut self, enabled: bool) {
        self.cull
            .set_bim_enabled(self.rig.scene.bim_culling_needed && enabled);
        if self.is_bim_culling_enabled() {
            self.cull.update(&self.rig.camera, &self.rig.scene);
        }
    }

    /// Whether BIM trimming runs.
    #[must_use]
    pub fn is_bim_culling_enabled(&self) -> bool {
        self.rig.scene.bim_culling_needed && self.cull.is_bim_enabled()
    }

    /// Start or stop collecting cull statistics.
    pub fn set_culling_profiling(&mut self, profiling: bool) {
        self.cull.set_profiling(profiling);
    }

    /// Select the footprint estimate of the zero-area stage.
    pub fn set_zero_area_mode(&mut self, mode: ZeroAreaMode) {
        self.cull.zero_area_mut().set_mode(mode);
    }

    /// Cull statistics since the last reset.
    #[must_use]
    pub fn cull_stats(&self) -> &CullStats {
        self.cull.stats()
    }

    /// Zero the cull statistics.
    pub fn reset_cull_stats(&mut self) {
        self.cull.reset_stats();
    }

    /// The cull pipeline.
    #[must_use]
    pub fn culler(&self) -> &Cull {
        &self.cull
    }

    // -- Accessors --

    /// Current pose and matrices.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.rig.camera
    }

    /// Mutable base camera, for projection changes.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.rig.camera
    }

    /// Target pose.
    #[must_use]
    pub fn target(&self) -> &TargetPose {
        &self.rig.target
    }

    /// Scene bounds.
    #[must_use]
    pub fn scene(&self) -> &SceneBounds {
        &self.rig.scene
    }

    /// Mutable scene bounds, e.g. to edit the section box.
    pub fn scene_mut(&mut self) -> &mut SceneBounds {
        &mut self.rig.scene
    }

    /// Camera, target and scene together.
    #[must_use]
    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Options the camera was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Take queued notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<CameraEvent> {
        self.rig.camera.drain_events()
    }

    pub(crate) fn emit(&mut self, event: CameraEvent) {
        self.rig.camera.emit(event);
    }
}
