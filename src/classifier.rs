use crate::config::AppConfig;
use crate::types::{Prediction, PredictionRequest, Result, ScanError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Form field name the classification endpoint expects the image under.
const UPLOAD_FIELD: &str = "file";

/// Trait for classification backends that turn an image into a prediction.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Cheap readiness check, run before any work starts. The default is
    /// always ready.
    fn preflight(&self) -> Result<()> {
        Ok(())
    }

    /// Classifies a single image.
    async fn classify(&self, request: &PredictionRequest) -> Result<Prediction>;
}

/// Raw response body shape from the endpoint.
#[derive(Debug, Deserialize)]
struct RawResponse {
    class: Option<String>,
    confidence: Option<String>,
}

/// Maps a response body to a prediction. The endpoint reports confidence as
/// a numeric string; anything unparseable counts as an unrecognized shape.
fn interpret_response(body: &str) -> Result<Prediction> {
    let raw: RawResponse = serde_json::from_str(body)
        .map_err(|e| ScanError::UnrecognizedResponse(format!("invalid JSON: {}", e)))?;

    let label = match raw.class {
        Some(class) if !class.is_empty() => class,
        _ => {
            return Err(ScanError::UnrecognizedResponse(
                "missing classification label".to_string(),
            ))
        }
    };

    let confidence = raw
        .confidence
        .as_deref()
        .unwrap_or_default()
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            ScanError::UnrecognizedResponse(format!(
                "confidence {:?} is not numeric",
                raw.confidence
            ))
        })?;

    Ok(Prediction { label, confidence })
}

/// Classifier backed by the configured remote endpoint.
pub struct HttpClassifier {
    client: Client,
    endpoint: Option<Url>,
}

impl HttpClassifier {
    /// A present but malformed endpoint address fails here; an absent one is
    /// legal until a prediction is actually submitted.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let endpoint = match config.api_url.as_deref() {
            Some(raw) => Some(Url::parse(raw)?),
            None => None,
        };
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    fn name(&self) -> &'static str {
        "http"
    }

    fn preflight(&self) -> Result<()> {
        match self.endpoint {
            Some(_) => Ok(()),
            None => Err(ScanError::EndpointNotConfigured),
        }
    }

    async fn classify(&self, request: &PredictionRequest) -> Result<Prediction> {
        let endpoint = self
            .endpoint
            .as_ref()
            .ok_or(ScanError::EndpointNotConfigured)?;

        debug!("Uploading {} to {}", request.uri, endpoint);
        let bytes = tokio::fs::read(&request.uri).await?;
        let part = Part::bytes(bytes)
            .file_name(request.file_name.clone())
            .mime_str(&request.mime_type)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(endpoint.clone())
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        interpret_response(&body)
    }
}

/// Mapping from reference substrings to canned responses, checked in order
/// with the first match winning. References matching no row fall through to
/// the healthy default.
const MOCK_RESPONSES: &[(&str, &str, &str)] = &[
    ("early-blight", "Early Blight", "92.5"),
    ("late-blight", "Late Blight", "89.7"),
    ("leaf-roll", "Leaf Roll", "95.2"),
    ("septoria", "Septoria Leaf Spot", "87.3"),
    ("psyllid", "Psyllid", "91.8"),
];

const MOCK_DEFAULT: (&str, &str) = ("Healthy", "96.3");

/// Mock classifier for development and testing. Synthesizes the endpoint's
/// wire shape and feeds it through the same interpretation path, so it is a
/// drop-in replacement for the real backend.
pub struct MockClassifier {
    response_delay_ms: u64,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self {
            response_delay_ms: 0,
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.response_delay_ms = delay_ms;
        self
    }

    async fn simulate_processing(&self) {
        if self.response_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.response_delay_ms)).await;
        }
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn classify(&self, request: &PredictionRequest) -> Result<Prediction> {
        self.simulate_processing().await;

        let (label, confidence) = MOCK_RESPONSES
            .iter()
            .find(|(key, _, _)| request.uri.contains(key))
            .map(|(_, label, confidence)| (*label, *confidence))
            .unwrap_or(MOCK_DEFAULT);

        let body = serde_json::json!({ "class": label, "confidence": confidence }).to_string();
        interpret_response(&body)
    }
}

/// Picks the backend for the given configuration.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn Classifier>> {
    if config.mock {
        info!("Using the mock classifier");
        Ok(Arc::new(MockClassifier::new()))
    } else {
        Ok(Arc::new(HttpClassifier::new(config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpret_parses_the_expected_shape() {
        let prediction =
            interpret_response(r#"{"class": "Late Blight", "confidence": "89.7"}"#).unwrap();
        assert_eq!(prediction.label, "Late Blight");
        assert_eq!(prediction.confidence, 89.7);
    }

    #[test]
    fn interpret_rejects_a_missing_or_empty_label() {
        assert!(interpret_response(r#"{"confidence": "89.7"}"#).is_err());
        assert!(interpret_response(r#"{"class": "", "confidence": "89.7"}"#).is_err());
    }

    #[test]
    fn interpret_rejects_non_numeric_confidence() {
        let result = interpret_response(r#"{"class": "Late Blight", "confidence": "high"}"#);
        assert!(matches!(result, Err(ScanError::UnrecognizedResponse(_))));
    }

    #[test]
    fn interpret_rejects_non_finite_confidence() {
        for value in ["NaN", "inf", "-inf"] {
            let body = format!(r#"{{"class": "Late Blight", "confidence": "{value}"}}"#);
            assert!(
                matches!(
                    interpret_response(&body),
                    Err(ScanError::UnrecognizedResponse(_))
                ),
                "{value} must be rejected"
            );
        }
    }

    #[test]
    fn interpret_rejects_bodies_that_are_not_json() {
        assert!(interpret_response("<html>502 Bad Gateway</html>").is_err());
    }

    #[tokio::test]
    async fn mock_matches_known_substrings() {
        let mock = MockClassifier::new();
        let request = PredictionRequest::from_reference("shots/leaf-roll-042.jpg");
        let prediction = mock.classify(&request).await.unwrap();
        assert_eq!(prediction.label, "Leaf Roll");
        assert_eq!(prediction.confidence, 95.2);
    }

    #[tokio::test]
    async fn mock_uses_the_first_matching_row() {
        let mock = MockClassifier::new();
        let request = PredictionRequest::from_reference("early-blight-vs-late-blight.jpg");
        let prediction = mock.classify(&request).await.unwrap();
        assert_eq!(prediction.label, "Early Blight");
    }

    #[tokio::test]
    async fn mock_defaults_to_healthy() {
        let mock = MockClassifier::new();
        let request = PredictionRequest::from_reference("shots/unremarkable.jpg");
        let prediction = mock.classify(&request).await.unwrap();
        assert_eq!(prediction.label, "Healthy");
        assert_eq!(prediction.confidence, 96.3);
    }

    #[test]
    fn every_mock_row_names_a_cataloged_disease() {
        for (key, _, _) in MOCK_RESPONSES {
            assert!(crate::catalog::find(key).is_some(), "no catalog entry for {}", key);
        }
    }
}
