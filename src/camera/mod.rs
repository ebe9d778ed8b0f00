//! Spherical camera for BIM scene viewing.
//!
//! A [`Camera`] holds the current pose and matrices, a [`CameraRig`] pairs
//! it with the target pose animators converge to, and a [`SceneCamera`]
//! drives the rig from gestures, animators and saved views.

/// Base camera, projection and GPU uniform types.
pub mod core;
/// Saved-view snapshots.
pub mod dump;
/// Notifications for the host application.
pub mod event;
/// View frustum extraction and intersection tests.
pub mod frustum;
/// Input-to-gesture mapping.
pub mod manipulator;
/// Current pose, target pose and scene bounds.
pub mod rig;
/// The viewer's animated, culling camera.
pub mod scene_camera;

pub use self::core::{
    Camera, CameraUniform, PlaneSize, ProjectedPoint, Ray, Viewport,
    MAX_VIEWPORT_EDGE, POLE_LIMIT, SNAP_PHI_LIMIT,
};
pub use dump::CameraDump;
pub use event::CameraEvent;
pub use frustum::{Frustum, Plane, FRUSTUM_EDGES};
pub use manipulator::CameraManipulator;
pub use rig::{shortest_arc, spherical_direction, CameraRig, TargetPose};
pub use scene_camera::SceneCamera;
