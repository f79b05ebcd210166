use crate::types::{CaptureSource, PredictionRequest, Result, ScanError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::debug;

/// Upload name used when the source asset does not carry one.
pub const DEFAULT_FILE_NAME: &str = "image.jpg";

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Asset descriptor handed back by an image picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub uri: String,
    pub file_name: Option<String>,
    pub declared_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Selected(ImageAsset),
    /// The user dismissed the picker without choosing anything.
    Cancelled,
}

/// Device capability for capturing or choosing a photo. A denied permission
/// surfaces as an error; backing out of the picker is not an error.
#[async_trait]
pub trait ImagePicker: Send + Sync {
    async fn pick(&self, source: CaptureSource) -> Result<PickOutcome>;
}

/// Best-effort MIME type from the extension of an image reference. Unknown
/// and missing extensions fall back to JPEG.
pub fn infer_mime_type(uri: &str) -> &'static str {
    let extension = uri.rsplit('.').next().unwrap_or_default();
    match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => DEFAULT_MIME_TYPE,
    }
}

impl From<&ImageAsset> for PredictionRequest {
    fn from(asset: &ImageAsset) -> Self {
        // A type declared by the picker wins over extension inference.
        let mime_type = asset
            .declared_type
            .clone()
            .unwrap_or_else(|| infer_mime_type(&asset.uri).to_string());
        Self {
            uri: asset.uri.clone(),
            file_name: asset
                .file_name
                .clone()
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
            mime_type,
        }
    }
}

impl PredictionRequest {
    /// Rebuilds a request from a bare image reference, as used when the
    /// user re-runs a recent image. No original filename survives there.
    pub fn from_reference(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            mime_type: infer_mime_type(uri).to_string(),
        }
    }
}

/// Picker over local files for headless use. Each library pick serves the
/// next queued path; an exhausted queue reads as a cancellation. Camera
/// capture has no equivalent here, so it reports a denied capability.
pub struct LocalFilePicker {
    queue: Mutex<VecDeque<PathBuf>>,
}

impl LocalFilePicker {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            queue: Mutex::new(paths.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ImagePicker for LocalFilePicker {
    async fn pick(&self, source: CaptureSource) -> Result<PickOutcome> {
        match source {
            CaptureSource::Camera => Err(ScanError::PermissionDenied { capability: source }),
            CaptureSource::Library => {
                let Some(path) = self.queue.lock().await.pop_front() else {
                    debug!("No more queued files, treating pick as cancelled");
                    return Ok(PickOutcome::Cancelled);
                };
                // Surface unreadable paths at acquisition time.
                tokio::fs::metadata(&path).await?;
                Ok(PickOutcome::Selected(ImageAsset {
                    uri: path.to_string_lossy().into_owned(),
                    file_name: path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned()),
                    declared_type: None,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_follows_the_extension() {
        assert_eq!(infer_mime_type("leaf.jpg"), "image/jpeg");
        assert_eq!(infer_mime_type("leaf.JPEG"), "image/jpeg");
        assert_eq!(infer_mime_type("leaf.png"), "image/png");
    }

    #[test]
    fn unknown_or_missing_extension_defaults_to_jpeg() {
        assert_eq!(infer_mime_type("leaf.webp"), "image/jpeg");
        assert_eq!(infer_mime_type("leaf"), "image/jpeg");
    }

    #[test]
    fn request_from_asset_fills_in_the_default_name() {
        let asset = ImageAsset {
            uri: "shots/leaf.png".to_string(),
            file_name: None,
            declared_type: None,
        };
        let request = PredictionRequest::from(&asset);
        assert_eq!(request.file_name, DEFAULT_FILE_NAME);
        assert_eq!(request.mime_type, "image/png");
    }

    #[test]
    fn declared_type_wins_over_extension_inference() {
        let asset = ImageAsset {
            uri: "shots/leaf.dat".to_string(),
            file_name: None,
            declared_type: Some("image/png".to_string()),
        };
        assert_eq!(PredictionRequest::from(&asset).mime_type, "image/png");
    }

    #[test]
    fn request_from_asset_keeps_a_supplied_name() {
        let asset = ImageAsset {
            uri: "shots/leaf.jpg".to_string(),
            file_name: Some("leaf.jpg".to_string()),
            declared_type: None,
        };
        assert_eq!(PredictionRequest::from(&asset).file_name, "leaf.jpg");
    }

    #[test]
    fn recent_reference_requests_use_the_default_name() {
        let request = PredictionRequest::from_reference("shots/archive/leaf.png");
        assert_eq!(request.file_name, DEFAULT_FILE_NAME);
        assert_eq!(request.mime_type, "image/png");
    }
}
