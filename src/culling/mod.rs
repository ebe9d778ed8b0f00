//! Per-drawable visibility tests run before submitting draw calls.
//!
//! [`Cull`] chains four testers from cheapest to most involved: section box,
//! frustum, screen footprint, then BIM element trimming. The first three
//! reject whole drawables; the BIM stage may instead shorten the draw range.
//! Camera-dependent state is refreshed once per pose change by
//! [`Cull::update`], so the per-drawable path stays a few dot products.

mod bim;
mod clip;
mod frustum;
mod zero_area;

pub use bim::BimCull;
pub use clip::ClipCull;
pub use frustum::{FrustumCull, FrustumVerdict};
pub use zero_area::{culls_ratio, ZeroAreaCull};

use crate::camera::Camera;
use crate::options::CullingOptions;
use crate::scene::{Clipping, Drawable, IndexRange, SceneBounds};

/// Vertex counts removed by each stage, accumulated while profiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullStats {
    /// Drawables submitted to the pipeline.
    pub drawables_tested: u64,
    /// Vertices outside the section box.
    pub clipped_vertices: u64,
    /// Vertices outside the frustum.
    pub frustum_vertices: u64,
    /// Vertices of drawables too small to see.
    pub zero_area_vertices: u64,
    /// Vertices trimmed or rejected by BIM culling.
    pub bim_vertices: u64,
    /// Frustum planes evaluated.
    pub plane_tests: u64,
}

impl CullStats {
    /// Total vertices culled by all stages.
    #[must_use]
    pub fn culled_vertices(&self) -> u64 {
        self.clipped_vertices
            + self.frustum_vertices
            + self.zero_area_vertices
            + self.bim_vertices
    }
}

/// The cull pipeline.
#[derive(Debug, Clone)]
pub struct Cull {
    clip: ClipCull,
    frustum: FrustumCull,
    zero_area: ZeroAreaCull,
    bim: BimCull,
    enabled: bool,
    profiling: bool,
    stats: CullStats,
}

impl Cull {
    /// Pipeline configured from `options`. Call [`Cull::update`] before the
    /// first test.
    #[must_use]
    pub fn new(options: &CullingOptions) -> Self {
        let mut bim = BimCull::default();
        bim.set_enabled(options.bim);
        Self {
            clip: ClipCull,
            frustum: FrustumCull::default(),
            zero_area: ZeroAreaCull::new(options.zero_area_mode),
            bim,
            enabled: options.enabled,
            profiling: options.profiling,
            stats: CullStats::default(),
        }
    }

    /// Refresh frustum planes, scene containment and pixel thresholds.
    /// Skipped while culling is disabled.
    pub fn update(&mut self, camera: &Camera, scene: &SceneBounds) {
        if !self.enabled {
            return;
        }
        self.frustum.update(camera.view_projection(), Some(&scene.bbox));
        self.zero_area.update(camera);
    }

    /// Run the pipeline on one drawable.
    ///
    /// `indices` starts as the drawable's full range and may be shortened
    /// by the BIM stage. Returns `true` when nothing should be drawn.
    pub fn is_culled(
        &mut self,
        drawable: &Drawable,
        clipping: &Clipping,
        indices: &mut IndexRange,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        if self.profiling {
            return self.is_culled_profiled(drawable, clipping, indices);
        }
        self.clip.is_culled(drawable, clipping)
            || self.frustum.is_culled(drawable)
            || self.zero_area.is_culled(drawable)
            || self.bim.is_culled(drawable, indices)
    }

    fn is_culled_profiled(
        &mut self,
        drawable: &Drawable,
        clipping: &Clipping,
        indices: &mut IndexRange,
    ) -> bool {
        let vertices = u64::from(drawable.vertex_count);
        let stats = &mut self.stats;
        stats.drawables_tested += 1;

        if self.clip.is_culled(drawable, clipping) {
            stats.clipped_vertices += vertices;
            return true;
        }
        let verdict = self.frustum.evaluate(drawable);
        stats.plane_tests += u64::from(verdict.planes_tested);
        if verdict.culled {
            stats.frustum_vertices += vertices;
            return true;
        }
        if self.zero_area.is_culled(drawable) {
            stats.zero_area_vertices += vertices;
            return true;
        }
        if self.bim.is_culled(drawable, indices) {
            stats.bim_vertices += vertices;
            return true;
        }
        stats.bim_vertices += vertices.saturating_sub(u64::from(indices.count));
        false
    }

    /// Whether the pipeline runs at all.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn the whole pipeline on or off. Re-enabling needs an
    /// [`Cull::update`] before the next test.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether BIM trimming runs.
    #[must_use]
    pub fn is_bim_enabled(&self) -> bool {
        self.bim.is_enabled()
    }

    /// Turn BIM trimming on or off.
    pub fn set_bim_enabled(&mut self, enabled: bool) {
        self.bim.set_enabled(enabled);
    }

    /// Start or stop collecting [`CullStats`].
    pub fn set_profiling(&mut self, profiling: bool) {
        self.profiling = profiling;
    }

    /// Statistics collected since the last reset.
    #[must_use]
    pub fn stats(&self) -> &CullStats {
        &self.stats
    }

    /// Zero the statistics, typically once per frame.
    pub fn reset_stats(&mut self) {
        self.stats = CullStats::default();
    }

    /// The frustum stage, for debug overlays.
    #[must_use]
    pub fn frustum(&self) -> &FrustumCull {
        &self.frustum
    }

    /// The footprint stage.
    pub fn zero_area_mut(&mut self) -> &mut ZeroAreaCull {
        &mut self.zero_area
    }
}
