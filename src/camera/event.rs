/// Notification queued by the camera for the host application.
///
/// Drained with [`Camera::drain_events`](super::Camera::drain_events) or
/// [`SceneCamera::drain_events`](super::SceneCamera::drain_events), usually
/// once per frame after `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraEvent {
    /// The projection switched between perspective and orthographic.
    OrthoViewChanged {
        /// `true` when the camera is now orthographic.
        ortho: bool,
    },
    /// A saved-view transition reached its destination or was abandoned.
    TransitionEnded,
    /// User input left one of the canned axis-aligned views.
    ExitOrthoView,
    /// The camera moved during in-app navigation and the host should refresh
    /// its map marker.
    MapPositionRequested,
}
