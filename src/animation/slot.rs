//! Exclusive binding of one animator to the scene camera.

use std::mem;

use super::{AnimatorKind, CameraAnimator, NormalAnimator};

/// Active animator plus the one it displaced.
///
/// Binding saves the active animator and installs the new one; unbinding
/// restores the saved one. Exactly one animator drives the camera at a
/// time. Re-binding an animator of the kind that is already active only
/// swaps it in place, so the first bind keeps the saved slot.
#[derive(Debug, Clone)]
pub struct AnimatorSlot {
    active: CameraAnimator,
    saved: Option<Box<AnimatorSlot>>,
}

impl Default for AnimatorSlot {
    fn default() -> Self {
        Self::new(CameraAnimator::Normal(NormalAnimator::default()))
    }
}

impl AnimatorSlot {
    /// Slot with `animator` active and nothing saved.
    #[must_use]
    pub fn new(animator: CameraAnimator) -> Self {
        Self {
            active: animator,
            saved: None,
        }
    }

    /// Install `animator`. Unless `force` is set, binding over an active
    /// animator of the same kind replaces it without saving it.
    pub fn bind(&mut self, animator: CameraAnimator, force: bool) {
        let rebind =
            self.saved.is_some() && self.active.kind() == animator.kind();
        if rebind && !force {
            self.active = animator;
            return;
        }
        let displaced = mem::replace(self, Self::new(animator));
        self.saved = Some(Box::new(displaced));
    }

    /// Remove the active animator and restore the one it displaced. With
    /// nothing saved the slot falls back to a default normal animator.
    pub fn unbind(&mut self) -> CameraAnimator {
        let restored = self.saved.take().map_or_else(Self::default, |b| *b);
        mem::replace(self, restored).active
    }

    /// The animator driving the camera.
    #[must_use]
    pub fn active(&self) -> &CameraAnimator {
        &self.active
    }

    /// Mutable access to the animator driving the camera.
    pub fn active_mut(&mut self) -> &mut CameraAnimator {
        &mut self.active
    }

    /// Kind of the active animator.
    #[must_use]
    pub fn kind(&self) -> AnimatorKind {
        self.active.kind()
    }

    /// Whether an unbind would restore a previous animator.
    #[must_use]
    pub fn has_saved(&self) -> bool {
        self.saved.is_some()
    }
}
