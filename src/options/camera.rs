use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Projection defaults and direct-manipulation tuning for the scene camera.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 1.0, max = 170.0), extend("step" = 1.0))]
    pub fov: f64,
    /// Near clipping plane used until the first scene fit.
    #[schemars(skip)]
    pub znear: f64,
    /// Far clipping plane used until the first scene fit.
    #[schemars(skip)]
    pub zfar: f64,
    /// Radians of rotation per pixel of drag.
    #[schemars(title = "Rotate Speed", range(min = 0.001, max = 0.05), extend("step" = 0.001))]
    pub rotate_speed: f64,
    /// Fraction of the zoom delta applied to the orthographic height.
    #[schemars(title = "Zoom Ratio", range(min = 0.05, max = 1.0), extend("step" = 0.05))]
    pub zoom_ratio: f64,
    /// Largest single zoom step, as a fraction of the target distance.
    #[schemars(skip)]
    pub max_zoom_offset: f64,
    /// Smallest single zoom step, as a fraction of the target distance.
    #[schemars(skip)]
    pub min_zoom_offset: f64,
    /// Slack added when fitting the scene into view.
    #[schemars(title = "View Distance Ratio", range(min = 1.0, max = 2.0), extend("step" = 0.01))]
    pub view_distance_ratio: f64,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fov: 46.0,
            znear: 0.1,
            zfar: 1000.0,
            rotate_speed: 0.006,
            zoom_ratio: 0.35,
            max_zoom_offset: 0.6,
            min_zoom_offset: 0.15,
            view_distance_ratio: 1.05,
        }
    }
}
