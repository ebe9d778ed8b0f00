//! Spherical-coordinate camera with GL-style projection.
//!
//! The pose is `(theta, phi, distance)` around the look-at point `at`. In
//! third-person mode the eye orbits `at`; in first-person mode the roles swap
//! and `at` is placed in front of a fixed eye. Both modes share one view
//! basis: `back` points from `at` toward the eye (from the eye away from `at`
//! in first person), `right` and `up` complete a right-handed frame with +Z
//! as world up.
//!
//! Matrices are column-major with OpenGL clip conventions (depth in
//! `[-1, 1]`, camera looking down -Z).

use std::f64::consts::PI;

use glam::{DMat4, DVec3, DVec4};

use super::event::CameraEvent;
use crate::scene::SceneBounds;

/// `|phi|` at or above which the view basis uses the pole construction.
pub const POLE_LIMIT: f64 = 0.499_999 * PI;

/// Tighter pitch clamp used when snapping or restoring a pose.
pub const SNAP_PHI_LIMIT: f64 = 0.499_99 * PI;

/// Degrees to half-angle radians.
const HALF_DEG_TO_RAD: f64 = 0.008_726_65;

/// Largest backbuffer edge accepted by [`Camera::set_viewport`].
pub const MAX_VIEWPORT_EDGE: u32 = 4096;

const DEFAULT_THETA: f64 = PI;
const DEFAULT_DISTANCE: f64 = 15.0;
const DEFAULT_FOV: f64 = 46.0;
const DEFAULT_ZNEAR: f64 = 0.1;
const DEFAULT_ZFAR: f64 = 1000.0;

/// Pixel rectangle rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Left edge.
    pub x: u32,
    /// Bottom edge.
    pub y: u32,
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
}

impl Viewport {
    /// Viewport anchored at the origin.
    #[must_use]
    pub const fn sized(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// Half extents of a clip plane in view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneSize {
    /// Half width.
    pub width: f64,
    /// Half height.
    pub height: f64,
    /// View-space z of the plane (1.0 for orthographic).
    pub z: f64,
}

/// Screen position of a projected point, in CSS pixels from the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Sign of the clip-space w; negative when the point is behind the eye.
    pub w_sign: f64,
}

/// Half line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: DVec3,
    /// Unit direction.
    pub direction: DVec3,
}

/// Normalize, leaving zero-length vectors untouched.
pub(crate) fn normalize_guarded(v: DVec3) -> DVec3 {
    let len = v.length();
    if len > 0.0 {
        v / len
    } else {
        v
    }
}

/// Right-handed look-at view matrix with zero-length guards.
pub(crate) fn look_at(eye: DVec3, at: DVec3, up: DVec3) -> DMat4 {
    let back = normalize_guarded(eye - at);
    let right = normalize_guarded(up.cross(back));
    let up = normalize_guarded(back.cross(right));
    view_from_basis(right, up, back, eye)
}

fn view_from_basis(right: DVec3, up: DVec3, back: DVec3, eye: DVec3) -> DMat4 {
    DMat4::from_cols(
        DVec4::new(right.x, up.x, back.x, 0.0),
        DVec4::new(right.y, up.y, back.y, 0.0),
        DVec4::new(right.z, up.z, back.z, 0.0),
        DVec4::new(-right.dot(eye), -up.dot(eye), -back.dot(eye), 1.0),
    )
}

/// Spherical-coordinate camera.
#[derive(Debug, Clone)]
pub struct Camera {
    pub(crate) at: DVec3,
    pub(crate) eye: DVec3,
    pub(crate) theta: f64,
    pub(crate) phi: f64,
    pub(crate) distance: f64,
    pub(crate) first_person: bool,
    fov: f64,
    inv_tan_fov: f64,
    znear: f64,
    zfar: f64,
    aspect: f64,
    perspective: bool,
    height: f64,
    device_pixel_ratio: f64,
    viewport: Viewport,
    view: DMat4,
    projection: DMat4,
    view_projection: DMat4,
    changed: bool,
    events: Vec<CameraEvent>,
}

impl Camera {
    /// Perspective camera for a `width` x `height` backbuffer.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let height = height.max(1);
        let mut camera = Self {
            at: DVec3::ZERO,
            eye: DVec3::new(DEFAULT_DISTANCE, 0.0, 0.0),
            theta: DEFAULT_THETA,
            phi: 0.0,
            distance: DEFAULT_DISTANCE,
            first_person: false,
            fov: DEFAULT_FOV,
            inv_tan_fov: inv_tan_half_fov(DEFAULT_FOV),
            znear: DEFAULT_ZNEAR,
            zfar: DEFAULT_ZFAR,
            aspect: f64::from(width) / f64::from(height),
            perspective: true,
            height: 1.0,
            device_pixel_ratio: 1.0,
            viewport: Viewport::sized(width, height),
            view: DMat4::IDENTITY,
            projection: DMat4::ZERO,
            view_projection: DMat4::IDENTITY,
            changed: true,
            events: Vec::new(),
        };
        camera.rebuild_projection();
        camera
    }

    /// Rebuild the view matrix from `(theta, phi, distance)`.
    ///
    /// In third person the eye is placed on the sphere around `at`; in first
    /// person `at` is placed `distance` in front of the eye.
    pub fn update(&mut self) {
        let (sx, cx) = self.phi.sin_cos();
        let (sz, cz) = self.theta.sin_cos();

        let mut back = DVec3::new(cx * cz, cx * sz, sx);
        if self.first_person {
            back = -back;
        }

        let right = if self.phi.abs() >= POLE_LIMIT {
            DVec3::new(cz * back.z, sz * back.z, -sz * back.y - cz * back.x)
        } else {
            DVec3::new(-back.y, back.x, 0.0)
        };
        let right = normalize_guarded(right);
        let up = normalize_guarded(DVec3::new(
            -back.z * right.y,
            back.z * right.x,
            back.x * right.y - back.y * right.x,
        ));

        if self.first_person {
            self.at = self.eye - back * self.distance;
        } else {
            self.eye = self.at + back * self.distance;
        }

        self.view = view_from_basis(right, up, back, self.eye);
        self.refresh_view_projection();
    }

    /// Point the camera from `eye` to `at` with +Z up, bypassing the
    /// spherical angles. `distance` follows the new eye-at separation.
    pub fn look_at(&mut self, eye: DVec3, at: DVec3) {
        self.eye = eye;
        self.at = at;
        self.distance = eye.distance(at);
        self.view = look_at(eye, at, DVec3::Z);
        self.refresh_view_projection();
    }

    /// Orthographic camera looking along `light_direction` at the clipped
    /// scene, sized to cover it. Used to render shadow maps.
    pub fn look_from_light(
        &mut self,
        light_direction: DVec3,
        scene: &SceneBounds,
        up: Option<DVec3>,
    ) {
        self.at = scene.clipping.center();
        self.distance = scene.radius;
        self.eye = self.at - light_direction * self.distance;
        self.view = look_at(self.eye, self.at, up.unwrap_or(DVec3::Z));

        let clip_radius = scene.clipping.bounds().diagonal() * 0.5;
        let radius = clip_radius.min(scene.radius) * 1.01;
        self.znear = self.distance - radius * 1.02;
        self.zfar = self.distance + radius * 1.02;
        self.height = radius;
        self.aspect = 1.0;
        self.perspective = false;
        self.projection = DMat4::orthographic_rh_gl(
            -radius, radius, -radius, radius, self.znear, self.zfar,
        );
        self.refresh_view_projection();
        self.changed = true;
    }

    /// Resize the backbuffer. Heights below one pixel are clamped to one.
    pub fn resize(&mut self, width: u32, height: u32) {
        let height = height.max(1);
        self.aspect = f64::from(width) / f64::from(height);
        self.apply_scale_terms();
        self.set_viewport(Viewport::sized(width, height));
        self.refresh_view_projection();
        self.changed = true;
    }

    /// Set the viewport, shrinking it proportionally so neither edge exceeds
    /// [`MAX_VIEWPORT_EDGE`].
    pub fn set_viewport(&mut self, viewport: Viewport) {
        let Viewport {
            mut width,
            mut height,
            ..
        } = viewport;
        if width > MAX_VIEWPORT_EDGE || height > MAX_VIEWPORT_EDGE {
            if width >= height {
                height = (u64::from(height) * u64::from(MAX_VIEWPORT_EDGE)
                    / u64::from(width)) as u32;
                width = MAX_VIEWPORT_EDGE;
            } else {
                width = (u64::from(width) * u64::from(MAX_VIEWPORT_EDGE)
                    / u64::from(height)) as u32;
                height = MAX_VIEWPORT_EDGE;
            }
        }
        self.viewport = Viewport {
            width,
            height,
            ..viewport
        };
    }

    /// Switch between perspective and orthographic projection.
    ///
    /// No-op when the mode is unchanged. Otherwise the mode-specific terms of
    /// the projection matrix are rebuilt and
    /// [`CameraEvent::OrthoViewChanged`] is queued.
    pub fn set_perspective(&mut self, perspective: bool) {
        if self.perspective == perspective {
            return;
        }
        self.perspective = perspective;
        self.rebuild_projection();
        self.emit(CameraEvent::OrthoViewChanged {
            ortho: !perspective,
        });
        self.changed = true;
        log::debug!(
            "camera projection switched to {}",
            if perspective { "perspective" } else { "orthographic" }
        );
    }

    /// Set the vertical field of view in degrees.
    pub fn set_fov(&mut self, fov: f64) {
        if self.fov != fov {
            self.apply_fov(fov);
            self.changed = true;
        }
    }

    /// Set the orthographic half height.
    pub fn set_height(&mut self, height: f64) {
        if self.height != height {
            self.apply_height(height);
            self.changed = true;
        }
    }

    /// Update the near/far planes. Degenerate ranges (non-finite or empty)
    /// keep the previous planes.
    pub fn update_projection(&mut self, znear: f64, zfar: f64) {
        if znear.is_finite() && zfar.is_finite() && znear != zfar {
            self.znear = znear;
            self.zfar = zfar;
        }
        self.apply_depth_terms();
        self.refresh_view_projection();
    }

    /// Enter or leave first-person mode, converting the angles so the view
    /// direction is preserved.
    pub fn set_first_person(&mut self, enabled: bool) {
        if self.first_person != enabled {
            self.theta += PI;
            self.phi = -self.phi;
            self.first_person = enabled;
            self.changed = true;
        }
    }

    /// Back to the default third-person perspective pose.
    pub fn reset(&mut self) {
        let was_ortho = !self.perspective;
        self.first_person = false;
        self.theta = DEFAULT_THETA;
        self.phi = 0.0;
        self.distance = DEFAULT_DISTANCE;
        self.fov = DEFAULT_FOV;
        self.inv_tan_fov = inv_tan_half_fov(DEFAULT_FOV);
        self.perspective = true;
        self.rebuild_projection();
        self.at = DVec3::ZERO;
        self.eye = DVec3::new(-self.distance, 0.0, 0.0);
        if was_ortho {
            self.emit(CameraEvent::OrthoViewChanged { ortho: false });
        }
        self.changed = true;
    }

    /// Sub-pixel projection offset for temporal anti-aliasing, in NDC units.
    pub fn jitter(&mut self, dx: f64, dy: f64) {
        if self.perspective {
            self.projection.z_axis.x = 2.0 * dx;
            self.projection.z_axis.y = 2.0 * dy;
        } else {
            self.projection.w_axis.x -= 2.0 * dx;
            self.projection.w_axis.y -= 2.0 * dy;
        }
    }

    /// World-space point on the plane `depth` in front of the eye under the
    /// CSS-pixel position `(x, y)`. `depth` defaults to the near plane.
    #[must_use]
    pub fn unproject(&self, x: f64, y: f64, depth: Option<f64>) -> DVec3 {
        let x = (x * self.device_pixel_ratio).floor();
        let y = (y * self.device_pixel_ratio).floor();
        let width = f64::from(self.viewport.width.max(1));
        let height = f64::from(self.viewport.height.max(1));
        let z = depth.unwrap_or(self.znear);

        let nx = x / width * 2.0 - 1.0;
        let ny = (height - 1.0 - y) / height * 2.0 - 1.0;

        let (nw, nh) = if self.perspective {
            (z / self.projection.x_axis.x, z / self.projection.y_axis.y)
        } else {
            (1.0 / self.projection.x_axis.x, 1.0 / self.projection.y_axis.y)
        };

        let center = self.eye - self.back_axis() * z;
        center + self.right_axis() * (nx * nw) + self.up_axis() * (ny * nh)
    }

    /// Unproject normalized device coordinates through the inverse
    /// view-projection matrix. `None` when the homogeneous w vanishes.
    #[must_use]
    pub fn unproject_ndc(&self, ndc: DVec3) -> Option<DVec3> {
        let p = self.view_projection.inverse() * ndc.extend(1.0);
        (p.w != 0.0 && p.is_finite()).then(|| p.truncate() / p.w)
    }

    /// Screen position of `position`, optionally transformed by `model`
    /// first. `None` when the point lies on the eye plane.
    #[must_use]
    pub fn project(
        &self,
        position: DVec3,
        model: Option<&DMat4>,
    ) -> Option<ProjectedPoint> {
        let world = model.map_or(position, |m| m.transform_point3(position));
        let clip = self.view_projection * world.extend(1.0);
        if clip.w == 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;

        let vp = &self.viewport;
        let height = f64::from(vp.height);
        let x = (ndc.x + 1.0) * 0.5 * f64::from(vp.width) + f64::from(vp.x);
        let y = (ndc.y + 1.0) * 0.5 * height;

        Some(ProjectedPoint {
            x: x / self.device_pixel_ratio,
            y: (height - 1.0 - y) / self.device_pixel_ratio,
            w_sign: clip.w.signum(),
        })
    }

    /// Ray through the near-plane point under the CSS-pixel position
    /// `(x, y)`. Starts at the eye in perspective, on the near plane in
    /// orthographic.
    #[must_use]
    pub fn shoot_ray(&self, x: f64, y: f64) -> Ray {
        let hit = self.unproject(x, y, None);
        if self.perspective {
            Ray {
                origin: self.eye,
                direction: normalize_guarded(hit - self.eye),
            }
        } else {
            Ray {
                origin: hit,
                direction: normalize_guarded(self.view_direction()),
            }
        }
    }

    /// Half extents of the near plane.
    #[must_use]
    pub fn near_plane_size(&self) -> PlaneSize {
        self.plane_size(self.znear)
    }

    /// Half extents of the far plane.
    #[must_use]
    pub fn far_plane_size(&self) -> PlaneSize {
        self.plane_size(self.zfar)
    }

    fn plane_size(&self, z: f64) -> PlaneSize {
        if self.perspective {
            let height = (self.fov * HALF_DEG_TO_RAD).tan() * z;
            PlaneSize {
                width: height * self.aspect,
                height,
                z: -z,
            }
        } else {
            PlaneSize {
                width: 1.0 / self.projection.x_axis.x,
                height: 1.0 / self.projection.y_axis.y,
                z: 1.0,
            }
        }
    }

    /// Switch to orthographic, sized so the far plane keeps its extent.
    pub fn transform_perspective_to_orthogonal(&mut self) {
        if self.perspective {
            let far = self.far_plane_size();
            self.set_perspective(false);
            self.apply_height(far.height);
            self.changed = true;
        }
    }

    /// Switch back to perspective.
    pub fn transform_orthogonal_to_perspective(&mut self) {
        if !self.perspective {
            self.set_perspective(true);
            self.changed = true;
        }
    }

    // -- Accessors --

    /// Azimuth around +Z in radians.
    #[must_use]
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Elevation in radians.
    #[must_use]
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Eye to look-at distance.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Look-at point.
    #[must_use]
    pub fn at(&self) -> DVec3 {
        self.at
    }

    /// Eye position.
    #[must_use]
    pub fn eye(&self) -> DVec3 {
        self.eye
    }

    /// Vertical field of view in degrees.
    #[must_use]
    pub fn fov(&self) -> f64 {
        self.fov
    }

    /// Near plane distance.
    #[must_use]
    pub fn znear(&self) -> f64 {
        self.znear
    }

    /// Far plane distance.
    #[must_use]
    pub fn zfar(&self) -> f64 {
        self.zfar
    }

    /// Viewport aspect ratio (width / height).
    #[must_use]
    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    /// Orthographic half height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Whether the projection is perspective.
    #[must_use]
    pub fn is_perspective(&self) -> bool {
        self.perspective
    }

    /// Whether the camera is in first-person mode.
    #[must_use]
    pub fn is_first_person(&self) -> bool {
        self.first_person
    }

    /// Current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Physical pixels per CSS pixel.
    #[must_use]
    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Set physical pixels per CSS pixel. Non-positive values are ignored.
    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        if ratio > 0.0 {
            self.device_pixel_ratio = ratio;
        }
    }

    /// World-to-view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> &DMat4 {
        &self.view
    }

    /// View-to-clip matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> &DMat4 {
        &self.projection
    }

    /// World-to-clip matrix.
    #[must_use]
    pub fn view_projection(&self) -> &DMat4 {
        &self.view_projection
    }

    /// Camera x axis in world space.
    #[must_use]
    pub fn right_axis(&self) -> DVec3 {
        self.view.row(0).truncate()
    }

    /// Camera y axis in world space.
    #[must_use]
    pub fn up_axis(&self) -> DVec3 {
        self.view.row(1).truncate()
    }

    /// Camera z axis in world space, pointing away from the view direction.
    #[must_use]
    pub fn back_axis(&self) -> DVec3 {
        self.view.row(2).truncate()
    }

    /// Unit direction the camera looks along.
    #[must_use]
    pub fn view_direction(&self) -> DVec3 {
        -self.back_axis()
    }

    /// Snapshot for the GPU uniform buffer.
    #[must_use]
    pub fn uniform(&self) -> CameraUniform {
        let mut uniform = CameraUniform::new();
        uniform.update(self);
        uniform
    }

    // -- Change tracking --

    /// Flag the camera as changed so the next frame re-renders.
    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Whether anything changed since the last [`Camera::clear_changed`].
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Acknowledge the current state.
    pub fn clear_changed(&mut self) {
        self.changed = false;
    }

    // -- Notifications --

    pub(crate) fn emit(&mut self, event: CameraEvent) {
        self.events.push(event);
    }

    /// Take all queued notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<CameraEvent> {
        std::mem::take(&mut self.events)
    }

    // -- Projection internals --

    /// Set the fov without flagging a change.
    pub(crate) fn apply_fov(&mut self, fov: f64) {
        if self.fov == fov {
            return;
        }
        self.fov = fov;
        self.inv_tan_fov = inv_tan_half_fov(fov);
        if self.perspective {
            self.apply_scale_terms();
        }
    }

    /// Set the ortho height without flagging a change.
    pub(crate) fn apply_height(&mut self, height: f64) {
        if self.height == height {
            return;
        }
        self.height = height;
        if !self.perspective {
            self.apply_scale_terms();
        }
    }

    fn rebuild_projection(&mut self) {
        let (w, last) = if self.perspective { (-1.0, 0.0) } else { (0.0, 1.0) };
        self.projection = DMat4::from_cols(
            DVec4::ZERO,
            DVec4::ZERO,
            DVec4::new(0.0, 0.0, 0.0, w),
            DVec4::new(0.0, 0.0, 0.0, last),
        );
        self.apply_scale_terms();
        self.apply_depth_terms();
        self.refresh_view_projection();
    }

    fn apply_scale_terms(&mut self) {
        if self.perspective {
            self.projection.x_axis.x = self.inv_tan_fov / self.aspect;
            self.projection.y_axis.y = self.inv_tan_fov;
        } else {
            self.projection.x_axis.x = 1.0 / (self.height * self.aspect);
            self.projection.y_axis.y = 1.0 / self.height;
        }
    }

    fn apply_depth_terms(&mut self) {
        let (n, f) = (self.znear, self.zfar);
        let nf = 1.0 / (n - f);
        if self.perspective {
            self.projection.z_axis.z = (f + n) * nf;
            self.projection.w_axis.z = 2.0 * f * n * nf;
        } else {
            self.projection.z_axis.z = 2.0 * nf;
            self.projection.w_axis.z = (n + f) * nf;
        }
    }

    pub(crate) fn refresh_view_projection(&mut self) {
        self.view_projection = self.projection * self.view;
    }
}

fn inv_tan_half_fov(fov: f64) -> f64 {
    1.0 / (fov * HALF_DEG_TO_RAD).tan()
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform block: view matrix, view-projection matrix and eye.
pub struct CameraUniform {
    /// World-to-view matrix.
    pub view: [[f32; 4]; 4],
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Eye position with w = 1 in perspective; negated view direction with
    /// w = 0 in orthographic.
    pub eye: [f32; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a uniform with identity matrices.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view: glam::Mat4::IDENTITY.to_cols_array_2d(),
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            eye: [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Refresh from the camera's current matrices.
    pub fn update(&mut self, camera: &Camera) {
        self.view = camera.view.as_mat4().to_cols_array_2d();
        self.view_proj = camera.view_projection.as_mat4().to_cols_array_2d();
        self.eye = if camera.perspective {
            camera.eye.as_vec3().extend(1.0).to_array()
        } else {
            camera.back_axis().as_vec3().extend(0.0).to_array()
        };
    }
}
