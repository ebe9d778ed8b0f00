use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the zero-area test estimates a drawable's screen footprint.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ZeroAreaMode {
    /// Project the bounding sphere radius. One division per drawable.
    #[default]
    Approximate,
    /// Project the silhouette of the bounding box and measure its area.
    Precise,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Culling", inline)]
#[serde(default)]
/// Which culling stages run and how.
pub struct CullingOptions {
    /// Master switch for the cull pipeline.
    #[schemars(title = "Culling")]
    pub enabled: bool,
    /// Trim BIM drawables to their always-visible index prefix.
    #[schemars(title = "BIM Culling")]
    pub bim: bool,
    /// Count culled vertices per stage.
    #[schemars(title = "Profiling")]
    pub profiling: bool,
    /// Screen footprint estimate used by the zero-area stage.
    #[schemars(title = "Zero-Area Test")]
    pub zero_area_mode: ZeroAreaMode,
}

impl Default for CullingOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            bim: false,
            profiling: false,
            zero_area_mode: ZeroAreaMode::Approximate,
        }
    }
}
