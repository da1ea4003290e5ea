// Typed errors with thiserror. Only construction of authored data can fail;
// runtime pointer/scroll input is never an error.

use thiserror::Error;

use crate::types::RegionId;

/// Errors raised while building a hotspot map.
#[derive(Error, Debug)]
pub enum HotspotError {
    #[error("Invalid region '{id}': {reason}")]
    InvalidRegion { id: RegionId, reason: String },

    #[error("Duplicate region id '{0}'")]
    DuplicateRegionId(RegionId),

    #[error("Invalid diagram space {width}x{height}: both axes must be finite and positive")]
    InvalidDiagram { width: f64, height: f64 },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for HotspotError {
    fn from(err: serde_json::Error) -> Self {
        HotspotError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = HotspotError::InvalidRegion {
            id: RegionId::new("pump"),
            reason: "polygon has 2 points, at least 3 required".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("pump"));
        assert!(message.contains("at least 3"));
    }

    #[test]
    fn serde_errors_convert() {
        let err: HotspotError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, HotspotError::Serialization(_)));
    }
}
