use serde::{Deserialize, Serialize};
use std::fmt;

// A catalog entry. The library is compiled in, so entries borrow static text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Disease {
    pub id: &'static str,
    pub name: &'static str,
    pub short: &'static str,
    pub full: &'static str,
    pub image: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureSource {
    Camera,
    Library,
}

impl CaptureSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureSource::Camera => "camera",
            CaptureSource::Library => "photo library",
        }
    }
}

impl fmt::Display for CaptureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Everything the classifier needs to upload one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub uri: String,
    pub file_name: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32, // percent
}

impl Prediction {
    /// Confidence rounded to one decimal place, as shown to the user.
    pub fn confidence_display(&self) -> String {
        format!("{:.1}", self.confidence)
    }

    /// Confidence clamped to the 0-100 range for meter rendering.
    pub fn meter_fill(&self) -> f32 {
        self.confidence.clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PredictionState {
    Idle,
    InProgress,
    Succeeded(Prediction),
    Failed(String),
}

impl PredictionState {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, PredictionState::InProgress)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Classification endpoint is not configured")]
    EndpointNotConfigured,

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Access to the {capability} was denied")]
    PermissionDenied { capability: CaptureSource },

    #[error("Unrecognized response: {0}")]
    UnrecognizedResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(confidence: f32) -> Prediction {
        Prediction {
            label: "Late Blight".to_string(),
            confidence,
        }
    }

    #[test]
    fn meter_fill_clamps_out_of_range_confidence() {
        assert_eq!(prediction(130.4).meter_fill(), 100.0);
        assert_eq!(prediction(-3.0).meter_fill(), 0.0);
        assert_eq!(prediction(89.7).meter_fill(), 89.7);
    }

    #[test]
    fn confidence_display_keeps_one_decimal_place() {
        assert_eq!(prediction(89.7).confidence_display(), "89.7");
        assert_eq!(prediction(96.0).confidence_display(), "96.0");
        assert_eq!(prediction(87.25).confidence_display(), "87.2");
    }

    #[test]
    fn display_shows_the_raw_value_even_when_the_meter_clamps() {
        let over = prediction(130.4);
        assert_eq!(over.confidence_display(), "130.4");
        assert_eq!(over.meter_fill(), 100.0);
    }
}
