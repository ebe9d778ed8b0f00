use serde::{Deserialize, Serialize};

use crate::error::SphericError;

/// Serializable snapshot of a view, as stored in saved viewpoints.
///
/// Angles are always third-person: a first-person camera is converted when
/// dumped and converted back when restored. Exactly one of `fov` and
/// `height` is present, telling perspective and orthographic views apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDump {
    /// Field of view in degrees, for perspective views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov: Option<f64>,
    /// Orthographic half height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Eye to look-at distance.
    pub distance: f64,
    /// Elevation in radians.
    pub phi: f64,
    /// Azimuth in radians.
    pub theta: f64,
    /// Look-at point.
    pub at: [f64; 3],
}

impl CameraDump {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, SphericError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a dump produced by [`CameraDump::to_json`] or by the web
    /// viewer.
    pub fn from_json(json: &str) -> Result<Self, SphericError> {
        let dump: Self = serde_json::from_str(json)?;
        let finite = [dump.distance, dump.phi, dump.theta]
            .into_iter()
            .chain(dump.at)
            .chain(dump.fov)
            .chain(dump.height)
            .all(f64::is_finite);
        if !finite {
            return Err(SphericError::InvalidDump(
                "non-finite camera value".into(),
            ));
        }
        Ok(dump)
    }

    /// Whether the dump describes a perspective view.
    #[must_use]
    pub fn is_perspective(&self) -> bool {
        self.height.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_omits_missing_projection_field() {
        let dump = CameraDump {
            fov: Some(46.0),
            height: None,
            distance: 10.0,
            phi: 0.1,
            theta: 0.2,
            at: [1.0, 2.0, 3.0],
        };
        let json = dump.to_json().unwrap();
        assert!(json.contains("\"fov\""));
        assert!(!json.contains("height"));
        assert_eq!(CameraDump::from_json(&json).unwrap(), dump);
    }

    #[test]
    fn parses_ortho_dump() {
        let dump = CameraDump::from_json(
            r#"{"height":4.5,"distance":3,"phi":0,"theta":1,"at":[0,0,0]}"#,
        )
        .unwrap();
        assert!(!dump.is_perspective());
        assert_eq!(dump.height, Some(4.5));
        assert_eq!(dump.fov, None);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            CameraDump::from_json("{\"distance\": 1}"),
            Err(SphericError::InvalidDump(_))
        ));
    }
}
