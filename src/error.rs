//! Crate-level error types.

use std::fmt;

/// Errors produced by the spheric crate.
///
/// Camera math never fails: out-of-range inputs are clamped. Errors only come
/// from configuration files and saved-view records.
#[derive(Debug)]
pub enum SphericError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// A saved camera view could not be parsed or serialized.
    InvalidDump(String),
}

impl fmt::Display for SphericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::InvalidDump(msg) => {
                write!(f, "invalid camera dump: {msg}")
            }
        }
    }
}

impl std::error::Error for SphericError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SphericError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SphericError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidDump(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_keeps_source() {
        let err = SphericError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing preset",
        ));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("missing preset"));
    }

    #[test]
    fn parse_errors_have_no_source() {
        let err = SphericError::OptionsParse("bad key".to_owned());
        assert!(std::error::Error::source(&err).is_none());
        assert_eq!(err.to_string(), "options parse error: bad key");
    }
}
