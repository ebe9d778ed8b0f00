//! Mouse, touch and keyboard gestures mapped onto a [`SceneCamera`].

use std::f64::consts::PI;

use glam::DVec3;
use web_time::Instant;

use super::dump::CameraDump;
use super::event::CameraEvent;
use super::scene_camera::SceneCamera;
use crate::animation::AnimatorKind;
use crate::input::{InputEvent, Key, MouseButton, PointerState, TouchCursor};
use crate::options::ManipulatorOptions;
use crate::scene::Layer;

/// Just short of the pole, so top and bottom views keep a defined azimuth.
const NEAR_POLE: f64 = 0.499_99 * PI;

/// Middle-button drags zoom by this much per pixel.
const MIDDLE_ZOOM_PER_PIXEL: f64 = 0.01;

/// Input sensitivities after device pixel ratio scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Speeds {
    mouse_pan: f64,
    mouse_zoom: f64,
    mouse_rotate: f64,
    touch_pan: f64,
    touch_zoom: f64,
    touch_rotate: f64,
    key_rotate: f64,
    key_forward: f64,
}

impl Speeds {
    fn new(options: &ManipulatorOptions, dpr: f64) -> Self {
        Self {
            mouse_pan: options.mouse_pan_speed,
            mouse_zoom: options.mouse_zoom_speed,
            mouse_rotate: options.mouse_rotate_speed,
            touch_pan: options.touch_pan_speed * dpr,
            touch_zoom: options.touch_zoom_speed * dpr.sqrt(),
            touch_rotate: options.touch_rotate_speed * dpr,
            key_rotate: options.key_rotate_speed,
            key_forward: options.key_forward_speed,
        }
    }
}

/// Turns [`InputEvent`]s into camera gestures.
///
/// Dragging with the left button rotates, right pans and middle zooms; the
/// wheel zooms too. One finger rotates, two fingers pan or pinch-zoom. Arrow
/// keys turn and walk.
///
/// Zooming and panning from first person temporarily switch to third
/// person; the mode is put back on the next button change or touch.
#[derive(Debug, Clone)]
pub struct CameraManipulator {
    pointer: PointerState,
    speeds: Speeds,
    device_pixel_ratio: f64,
    pressed: bool,
    saved_first_person: Option<bool>,
    adjusting: bool,
    panorama: bool,
    ortho_view: bool,
}

impl CameraManipulator {
    /// Manipulator with `options` sensitivities. Touch speeds are scaled by
    /// `device_pixel_ratio`.
    #[must_use]
    pub fn new(options: &ManipulatorOptions, device_pixel_ratio: f64) -> Self {
        let device_pixel_ratio = if device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            pointer: PointerState::new(),
            speeds: Speeds::new(options, device_pixel_ratio),
            device_pixel_ratio,
            pressed: false,
            saved_first_person: None,
            adjusting: false,
            panorama: false,
            ortho_view: false,
        }
    }

    /// Apply one input event to `camera`. Returns `true` if the event was
    /// consumed.
    pub fn handle_event(
        &mut self,
        camera: &mut SceneCamera,
        event: &InputEvent,
    ) -> bool {
        match event {
            InputEvent::MouseButton {
                button,
                pressed: true,
            } => {
                self.pointer.press(*button);
                self.restore_first_person(camera);
                if *button == MouseButton::Left {
                    self.exit_transit(camera);
                    self.pressed = true;
                }
                true
            }
            InputEvent::MouseButton {
                button,
                pressed: false,
            } => {
                let _ = self.pointer.release(*button);
                self.restore_first_person(camera);
                if *button == MouseButton::Left {
                    self.pressed = false;
                }
                true
            }
            InputEvent::CursorMoved { x, y } => {
                let (dx, dy) = self.pointer.move_to(*x, *y);
                self.drag(camera, dx, dy);
                true
            }
            InputEvent::Scroll { delta } => {
                self.restore_first_person(camera);
                self.save_first_person(camera, false);
                self.exit_transit(camera);
                camera.zoom(delta * self.speeds.mouse_zoom);
                true
            }
            InputEvent::DoubleClick { world } => {
                self.exit_transit(camera);
                self.focus(camera, *world);
                true
            }
            InputEvent::TouchDoubleTap { world } => {
                if !camera.camera().is_first_person() {
                    self.exit_transit(camera);
                    self.focus(camera, *world);
                }
                true
            }
            InputEvent::TouchMoved { cursors } => {
                self.touch(camera, cursors);
                true
            }
            InputEvent::KeyDown { key } => {
                self.key(camera, *key);
                true
            }
        }
    }

    fn drag(&mut self, camera: &mut SceneCamera, dx: f64, dy: f64) {
        let Some(button) = self.pointer.pressed() else {
            Self::exit_orbit(camera);
            return;
        };
        match button {
            MouseButton::Left => {
                let speed = self.speeds.mouse_rotate;
                if self.adjusting {
                    camera.rotate(-dx * speed, 0.0);
                } else if self.panorama {
                    camera.rotate(-dx * speed, -dy * speed);
                } else {
                    camera.rotate(dx * speed, dy * speed);
                }
            }
            MouseButton::Middle => {
                self.save_first_person(camera, false);
                self.exit_transit(camera);
                let ratio = MIDDLE_ZOOM_PER_PIXEL * self.device_pixel_ratio;
                camera.zoom(dx * ratio);
            }
            MouseButton::Right => {
                self.save_first_person(camera, false);
                self.exit_transit(camera);
                let speed = self.speeds.mouse_pan;
                camera.pan(dx * speed, dy * speed);
            }
        }
        self.leave_ortho_view(camera);
        if self.pressed && self.adjusting {
            camera.emit(CameraEvent::MapPositionRequested);
        }
    }

    fn touch(&mut self, camera: &mut SceneCamera, cursors: &[TouchCursor]) {
        self.exit_transit(camera);
        match cursors {
            [] => {}
            [one] => {
                self.restore_first_person(camera);
                let speed = self.speeds.touch_rotate;
                let sign = if self.panorama { -1.0 } else { 1.0 };
                camera.rotate(sign * one.dx * speed, sign * one.dy * speed);
            }
            [a, b] => {
                self.restore_first_person(camera);
                self.save_first_person(camera, false);
                if a.dx * b.dx + a.dy * b.dy > 0.0 {
                    let speed = self.speeds.touch_pan;
                    camera.pan((a.dx + b.dx) * speed, (a.dy + b.dy) * speed);
                } else {
                    let now = (a.x - b.x).hypot(a.y - b.y);
                    let before = (a.x - a.dx - (b.x - b.dx))
                        .hypot(a.y - a.dy - (b.y - b.dy));
                    let delta = now - before;
                    if delta != 0.0 {
                        camera.zoom(delta.signum() * self.speeds.touch_zoom);
                    }
                }
            }
            many => {
                self.restore_first_person(camera);
                self.save_first_person(camera, false);
                let n = many.len() as f64;
                let dx = many.iter().map(|c| c.dx).sum::<f64>() / n;
                let dy = many.iter().map(|c| c.dy).sum::<f64>() / n;
                let speed = self.speeds.touch_pan;
                camera.pan(dx * speed, dy * speed);
            }
        }
        if !cursors.is_empty() {
            self.leave_ortho_view(camera);
        }
        camera.emit(CameraEvent::MapPositionRequested);
    }

    fn key(&mut self, camera: &mut SceneCamera, key: Key) {
        self.exit_transit(camera);
        self.restore_first_person(camera);
        match key {
            Key::Left | Key::Right => {
                self.save_first_person(camera, true);
                let sign = if key == Key::Right { 1.0 } else { -1.0 };
                camera.rotate(sign * self.speeds.key_rotate, 0.0);
                if self.adjusting {
                    camera.emit(CameraEvent::MapPositionRequested);
                }
            }
            Key::Up | Key::Down => {
                self.save_first_person(camera, false);
                let sign = if key == Key::Up { 1.0 } else { -1.0 };
                camera.forward(sign * self.speeds.key_forward, None);
            }
        }
    }

    /// Close in on a picked point. A miss or a first-person camera leaves
    /// both the view and any canned view untouched.
    fn focus(&mut self, camera: &mut SceneCamera, world: Option<DVec3>) {
        if camera.camera().is_first_person() {
            return;
        }
        if let Some(world) = world {
            camera.look_to(world, None);
            self.leave_ortho_view(camera);
        }
    }

    fn leave_ortho_view(&mut self, camera: &mut SceneCamera) {
        if self.ortho_view {
            self.ortho_view = false;
            camera.emit(CameraEvent::ExitOrthoView);
        }
    }

    /// Remember the first-person mode and switch to `enabled`. Only the
    /// first call before a restore records the mode.
    fn save_first_person(&mut self, camera: &mut SceneCamera, enabled: bool) {
        if self.saved_first_person.is_none() {
            self.saved_first_person = Some(camera.camera().is_first_person());
            camera.set_first_person(enabled, None);
        }
    }

    fn restore_first_person(&mut self, camera: &mut SceneCamera) {
        if let Some(first_person) = self.saved_first_person.take() {
            camera.set_first_person(first_person, None);
        }
    }

    /// Interrupt a saved-view flight or an orbit. Ignored while the camera
    /// is restricted.
    fn exit_transit(&mut self, camera: &mut SceneCamera) {
        if camera.is_restricted() {
            return;
        }
        Self::exit_orbit(camera);
        camera.stop_transition();
    }

    fn exit_orbit(camera: &mut SceneCamera) {
        if camera.active_animator() == AnimatorKind::Orbit {
            camera.stop_orbit();
        }
    }

    // -- Canned views --

    fn canned_view(
        &mut self,
        camera: &mut SceneCamera,
        layers: &[Layer],
        phi: f64,
        theta: f64,
    ) {
        self.saved_first_person = None;
        camera.set_first_person(false, None);
        camera.reset(false, layers);
        camera.rotate_to(phi, theta);
        self.ortho_view = true;
    }

    /// Look straight down.
    pub fn top_view(&mut self, camera: &mut SceneCamera, layers: &[Layer]) {
        self.canned_view(camera, layers, NEAR_POLE, -NEAR_POLE);
    }

    /// Look straight up.
    pub fn bottom_view(&mut self, camera: &mut SceneCamera, layers: &[Layer]) {
        self.canned_view(camera, layers, -NEAR_POLE, -NEAR_POLE);
    }

    /// Look along +X.
    pub fn left_view(&mut self, camera: &mut SceneCamera, layers: &[Layer]) {
        self.canned_view(camera, layers, 0.0, PI);
    }

    /// Look along -X.
    pub fn right_view(&mut self, camera: &mut SceneCamera, layers: &[Layer]) {
        self.canned_view(camera, layers, 0.0, 0.0);
    }

    /// Look along +Y.
    pub fn front_view(&mut self, camera: &mut SceneCamera, layers: &[Layer]) {
        self.canned_view(camera, layers, 0.0, -PI * 0.5);
    }

    /// Look along -Y.
    pub fn back_view(&mut self, camera: &mut SceneCamera, layers: &[Layer]) {
        self.canned_view(camera, layers, 0.0, PI * 0.5);
    }

    /// Perspective overview of the whole scene.
    pub fn world_view(&mut self, camera: &mut SceneCamera, layers: &[Layer]) {
        self.saved_first_person = None;
        camera.set_first_person(false, None);
        camera.set_perspective(true);
        camera.reset(false, layers);
        self.ortho_view = false;
    }

    /// Whether one of the canned axis views is showing.
    #[must_use]
    pub fn is_ortho_view(&self) -> bool {
        self.ortho_view
    }

    /// Leave the canned view, emitting `ExitOrthoView` if one was showing.
    pub fn exit_ortho_view(&mut self, camera: &mut SceneCamera) {
        self.leave_ortho_view(camera);
    }

    /// Fly to a saved viewpoint, lifting any section box first.
    pub fn switch_to_user_view(
        &mut self,
        camera: &mut SceneCamera,
        dump: &CameraDump,
        vr: bool,
        now: Instant,
    ) {
        self.restore_first_person(camera);
        camera.scene_mut().clipping.reset();
        camera.stop_transition();
        camera.start_transition(dump, vr, now);
    }

    // -- Settings --

    /// Mouse pan sensitivity.
    pub fn set_mouse_pan_speed(&mut self, speed: f64) {
        self.speeds.mouse_pan = speed;
    }

    /// Mouse zoom sensitivity. Also scales the largest zoom step.
    pub fn set_mouse_zoom_speed(
        &mut self,
        camera: &mut SceneCamera,
        speed: f64,
    ) {
        self.speeds.mouse_zoom = speed;
        camera.set_zoom_min_max(speed);
    }

    /// Mouse rotation sensitivity.
    pub fn set_mouse_rotate_speed(&mut self, speed: f64) {
        self.speeds.mouse_rotate = speed;
    }

    /// Two-finger pan sensitivity, before device pixel ratio scaling.
    pub fn set_touch_pan_speed(&mut self, speed: f64) {
        self.speeds.touch_pan = speed * self.device_pixel_ratio;
    }

    /// Pinch sensitivity, before device pixel ratio scaling.
    pub fn set_touch_zoom_speed(&mut self, speed: f64) {
        self.speeds.touch_zoom = speed * self.device_pixel_ratio.sqrt();
    }

    /// One-finger rotation sensitivity, before device pixel ratio scaling.
    pub fn set_touch_rotate_speed(&mut self, speed: f64) {
        self.speeds.touch_rotate = speed * self.device_pixel_ratio;
    }

    /// In-app navigation adjusting: left drags only turn, and every move
    /// asks the host to refresh its map marker.
    pub fn set_in_app_navigation_adjusting(&mut self, adjusting: bool) {
        self.adjusting = adjusting;
    }

    /// Panorama mode inverts drags so the image follows the pointer.
    pub fn set_panorama_enabled(&mut self, enabled: bool) {
        self.panorama = enabled;
    }

    /// Drop any first-person mode saved by a gesture, so the next release
    /// keeps whatever mode the host has set on the camera. Call after
    /// [`SceneCamera::set_first_person`].
    pub fn reset_first_person_view(&mut self) {
        self.saved_first_person = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::scene::SceneBounds;
    use crate::util::Aabb;

    fn setup() -> (CameraManipulator, SceneCamera) {
        let scene = SceneBounds::new(Aabb::new(
            DVec3::splat(-10.0),
            DVec3::splat(10.0),
        ));
        let options = Options::default();
        let mut camera = SceneCamera::new(scene, 800, 600, &options);
        camera.reset(true, &[]);
        let _ = camera.drain_events();
        (CameraManipulator::new(&options.manipulator, 1.0), camera)
    }

    fn drag(
        manipulator: &mut CameraManipulator,
        camera: &mut SceneCamera,
        button: MouseButton,
        dx: f64,
        dy: f64,
    ) {
        let _ = manipulator.handle_event(
            camera,
            &InputEvent::CursorMoved { x: 100.0, y: 100.0 },
        );
        let _ = manipulator.handle_event(
            camera,
            &InputEvent::MouseButton {
                button,
                pressed: true,
            },
        );
        let _ = manipulator.handle_event(
            camera,
            &InputEvent::CursorMoved {
                x: 100.0 + dx,
                y: 100.0 + dy,
            },
        );
        let _ = manipulator.handle_event(
            camera,
            &InputEvent::MouseButton {
                button,
                pressed: false,
            },
        );
    }

    #[test]
    fn left_drag_rotates() {
        let (mut manipulator, mut camera) = setup();
        let theta = camera.target().theta;
        drag(&mut manipulator, &mut camera, MouseButton::Left, 10.0, 0.0);
        let expected = theta - 10.0 * 0.45 * 0.006;
        assert!((camera.target().theta - expected).abs() < 1e-12);
    }

    #[test]
    fn panorama_inverts_drag() {
        let (mut manipulator, mut camera) = setup();
        manipulator.set_panorama_enabled(true);
        let theta = camera.target().theta;
        drag(&mut manipulator, &mut camera, MouseButton::Left, 10.0, 0.0);
        assert!(camera.target().theta > theta);
    }

    #[test]
    fn right_drag_pans_and_restores_first_person() {
        let (mut manipulator, mut camera) = setup();
        camera.set_first_person(true, None);
        let at = camera.target().at;
        drag(&mut manipulator, &mut camera, MouseButton::Right, 20.0, 5.0);
        assert_ne!(camera.target().at, at);
        assert!(camera.camera().is_first_person());
    }

    #[test]
    fn wheel_zooms_in() {
        let (mut manipulator, mut camera) = setup();
        let distance = camera.target().distance;
        let _ = manipulator
            .handle_event(&mut camera, &InputEvent::Scroll { delta: 1.0 });
        assert!(camera.target().distance < distance);
    }

    #[test]
    fn left_press_stops_orbit() {
        let (mut manipulator, mut camera) = setup();
        camera.start_orbit();
        let _ = manipulator.handle_event(
            &mut camera,
            &InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: true,
            },
        );
        assert_eq!(camera.active_animator(), AnimatorKind::Normal);
    }

    #[test]
    fn pinch_zooms_and_parallel_swipe_pans() {
        let (mut manipulator, mut camera) = setup();
        let distance = camera.target().distance;
        let spread = vec![
            TouchCursor {
                x: 90.0,
                y: 100.0,
                dx: -10.0,
                dy: 0.0,
            },
            TouchCursor {
                x: 210.0,
                y: 100.0,
                dx: 10.0,
                dy: 0.0,
            },
        ];
        let _ = manipulator.handle_event(
            &mut camera,
            &InputEvent::TouchMoved { cursors: spread },
        );
        assert!(camera.target().distance < distance);

        let at = camera.target().at;
        let swipe = vec![
            TouchCursor {
                x: 110.0,
                y: 100.0,
                dx: 10.0,
                dy: 0.0,
            },
            TouchCursor {
                x: 210.0,
                y: 100.0,
                dx: 10.0,
                dy: 0.0,
            },
        ];
        let _ = manipulator.handle_event(
            &mut camera,
            &InputEvent::TouchMoved { cursors: swipe },
        );
        assert_ne!(camera.target().at, at);
        assert!(camera
            .drain_events()
            .contains(&CameraEvent::MapPositionRequested));
    }

    #[test]
    fn double_click_focuses_picked_point() {
        let (mut manipulator, mut camera) = setup();
        let point = DVec3::new(2.0, 3.0, 1.0);
        let _ = manipulator.handle_event(
            &mut camera,
            &InputEvent::DoubleClick { world: Some(point) },
        );
        assert_eq!(camera.target().at, point);
    }

    #[test]
    fn background_double_click_keeps_canned_view() {
        let (mut manipulator, mut camera) = setup();
        manipulator.top_view(&mut camera, &[]);
        let _ = camera.drain_events();
        let at = camera.target().at;
        let _ = manipulator.handle_event(
            &mut camera,
            &InputEvent::DoubleClick { world: None },
        );
        assert!(manipulator.is_ortho_view());
        assert_eq!(camera.target().at, at);
        assert!(!camera.drain_events().contains(&CameraEvent::ExitOrthoView));

        let point = DVec3::new(1.0, -2.0, 0.5);
        let _ = manipulator.handle_event(
            &mut camera,
            &InputEvent::DoubleClick { world: Some(point) },
        );
        assert!(!manipulator.is_ortho_view());
        assert!(camera.drain_events().contains(&CameraEvent::ExitOrthoView));
    }

    #[test]
    fn first_person_double_tap_is_ignored() {
        let (mut manipulator, mut camera) = setup();
        manipulator.top_view(&mut camera, &[]);
        camera.set_first_person(true, None);
        let _ = camera.drain_events();
        let at = camera.target().at;
        let _ = manipulator.handle_event(
            &mut camera,
            &InputEvent::TouchDoubleTap {
                world: Some(DVec3::ONE),
            },
        );
        assert!(manipulator.is_ortho_view());
        assert_eq!(camera.target().at, at);
        assert!(!camera.drain_events().contains(&CameraEvent::ExitOrthoView));
    }

    #[test]
    fn exit_ortho_view_notifies_once() {
        let (mut manipulator, mut camera) = setup();
        manipulator.exit_ortho_view(&mut camera);
        assert!(camera.drain_events().is_empty());

        manipulator.front_view(&mut camera, &[]);
        let _ = camera.drain_events();
        manipulator.exit_ortho_view(&mut camera);
        assert!(!manipulator.is_ortho_view());
        assert_eq!(camera.drain_events(), vec![CameraEvent::ExitOrthoView]);
    }

    #[test]
    fn reset_first_person_view_keeps_host_mode() {
        let (mut manipulator, mut camera) = setup();
        camera.set_first_person(true, None);
        let _ = manipulator
            .handle_event(&mut camera, &InputEvent::Scroll { delta: 1.0 });
        // Zooming runs in third person until the next release.
        assert!(!camera.camera().is_first_person());

        manipulator.reset_first_person_view();
        let release = InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        };
        let _ = manipulator.handle_event(&mut camera, &release);
        assert!(!camera.camera().is_first_person());
    }

    #[test]
    fn canned_view_exits_on_drag() {
        let (mut manipulator, mut camera) = setup();
        manipulator.top_view(&mut camera, &[]);
        assert!(manipulator.is_ortho_view());
        assert!((camera.target().phi - NEAR_POLE).abs() < 1e-12);

        drag(&mut manipulator, &mut camera, MouseButton::Left, 5.0, 0.0);
        assert!(!manipulator.is_ortho_view());
        assert!(camera.drain_events().contains(&CameraEvent::ExitOrthoView));
    }

    #[test]
    fn arrow_keys_turn_and_walk() {
        let (mut manipulator, mut camera) = setup();
        let theta = camera.target().theta;
        let right = InputEvent::KeyDown { key: Key::Right };
        let _ = manipulator.handle_event(&mut camera, &right);
        // Turning walks in first person.
        assert!(camera.camera().is_first_person());
        let expected = theta + PI - 12.0 * 0.006;
        assert!((camera.target().theta - expected).abs() < 1e-12);

        let at = camera.target().at;
        let _ = manipulator
            .handle_event(&mut camera, &InputEvent::KeyDown { key: Key::Up });
        let moved = camera.target().at - at;
        assert!(moved.dot(camera.camera().view_direction()) > 0.0);
        assert!(moved.z.abs() < 1e-12);
    }

    #[test]
    fn touch_speeds_follow_pixel_ratio() {
        let options = ManipulatorOptions::default();
        let manipulator = CameraManipulator::new(&options, 4.0);
        assert_eq!(
            manipulator.speeds.touch_pan,
            options.touch_pan_speed * 4.0
        );
        assert_eq!(
            manipulator.speeds.touch_zoom,
            options.touch_zoom_speed * 2.0
        );
    }
}
