use crate::classifier::Classifier;
use crate::media::{ImagePicker, PickOutcome};
use crate::types::{CaptureSource, PredictionRequest, PredictionState, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Generic user-facing message for any failed classification. The detailed
/// cause only goes to the log.
const FAILURE_MESSAGE: &str = "Failed to predict.";

pub const RECENT_CAPACITY: usize = 5;

/// Bounded most-recent-first list of previously used image references.
#[derive(Debug, Clone, Default)]
pub struct RecentImages {
    entries: Vec<String>,
}

impl RecentImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a reference. Known references are left exactly where they
    /// are; new ones go to the front, evicting the oldest past capacity.
    pub fn push(&mut self, reference: &str) {
        if self.entries.iter().any(|entry| entry == reference) {
            return;
        }
        self.entries.insert(0, reference.to_string());
        self.entries.truncate(RECENT_CAPACITY);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct PipelineInner {
    seq: u64,
    state: PredictionState,
    image: Option<String>,
    recent: RecentImages,
}

/// Orchestrates the round trip from image acquisition to a displayable
/// result state.
///
/// Submissions are tagged with a monotonically increasing sequence number;
/// a response whose tag is no longer current is discarded, so the last
/// submitted request always wins and `clear` cannot be undone by a late
/// response.
pub struct PredictionPipeline {
    classifier: Arc<dyn Classifier>,
    picker: Arc<dyn ImagePicker>,
    inner: RwLock<PipelineInner>,
}

impl PredictionPipeline {
    pub fn new(classifier: Arc<dyn Classifier>, picker: Arc<dyn ImagePicker>) -> Self {
        info!("Prediction pipeline using the {} classifier", classifier.name());
        Self {
            classifier,
            picker,
            inner: RwLock::new(PipelineInner {
                seq: 0,
                state: PredictionState::Idle,
                image: None,
                recent: RecentImages::new(),
            }),
        }
    }

    /// Asks the device capability for an image. A denied capability is an
    /// error; a dismissed picker yields `None` and the pipeline state is
    /// untouched either way.
    pub async fn acquire_image(&self, source: CaptureSource) -> Result<Option<PredictionRequest>> {
        match self.picker.pick(source).await? {
            PickOutcome::Selected(asset) => Ok(Some(PredictionRequest::from(&asset))),
            PickOutcome::Cancelled => {
                debug!("Pick from {} cancelled", source);
                Ok(None)
            }
        }
    }

    /// Acquires an image and, unless the picker was dismissed, submits it.
    pub async fn capture_and_predict(&self, source: CaptureSource) -> Result<PredictionState> {
        match self.acquire_image(source).await? {
            Some(request) => self.submit(request).await,
            None => Ok(self.state().await),
        }
    }

    /// Runs one classification round trip and returns the resulting state.
    ///
    /// A missing endpoint is reported without entering InProgress and
    /// without any network attempt. Classification failures resolve to the
    /// Failed state rather than an error, with a generic message.
    pub async fn submit(&self, request: PredictionRequest) -> Result<PredictionState> {
        self.classifier.preflight()?;

        let seq = {
            let mut inner = self.inner.write().await;
            inner.seq += 1;
            inner.state = PredictionState::InProgress;
            inner.image = Some(request.uri.clone());
            inner.seq
        };
        debug!("Submission #{} for {}", seq, request.uri);

        let outcome = self.classifier.classify(&request).await;

        let mut inner = self.inner.write().await;
        if inner.seq != seq {
            debug!("Discarding stale response for submission #{}", seq);
            return Ok(inner.state.clone());
        }
        match outcome {
            Ok(prediction) => {
                info!(
                    "Submission #{} classified as {} ({}%)",
                    seq,
                    prediction.label,
                    prediction.confidence_display()
                );
                inner.recent.push(&request.uri);
                inner.state = PredictionState::Succeeded(prediction);
            }
            Err(e) => {
                warn!("Submission #{} failed: {}", seq, e);
                inner.state = PredictionState::Failed(FAILURE_MESSAGE.to_string());
            }
        }
        Ok(inner.state.clone())
    }

    /// Re-submits a previously used reference without going back through
    /// the device capability.
    pub async fn select_recent(&self, reference: &str) -> Result<PredictionState> {
        self.submit(PredictionRequest::from_reference(reference)).await
    }

    /// Drops the current image and result. Whatever was in flight becomes
    /// stale and can no longer surface.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.seq += 1;
        inner.state = PredictionState::Idle;
        inner.image = None;
        debug!("Cleared, now at submission #{}", inner.seq);
    }

    pub async fn state(&self) -> PredictionState {
        self.inner.read().await.state.clone()
    }

    pub async fn current_image(&self) -> Option<String> {
        self.inner.read().await.image.clone()
    }

    /// Snapshot of the recent references, most recent first.
    pub async fn recent_images(&self) -> Vec<String> {
        self.inner.read().await.recent.entries().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recents_stay_within_capacity() {
        let mut recent = RecentImages::new();
        for i in 0..8 {
            recent.push(&format!("leaf-{}.jpg", i));
        }
        assert_eq!(recent.entries().len(), RECENT_CAPACITY);
        assert_eq!(recent.entries()[0], "leaf-7.jpg");
        assert_eq!(recent.entries()[RECENT_CAPACITY - 1], "leaf-3.jpg");
    }

    #[test]
    fn duplicate_references_change_nothing() {
        let mut recent = RecentImages::new();
        recent.push("a.jpg");
        recent.push("b.jpg");
        recent.push("a.jpg");
        assert_eq!(recent.entries(), ["b.jpg", "a.jpg"]);
    }

    #[test]
    fn newest_reference_comes_first() {
        let mut recent = RecentImages::new();
        recent.push("first.jpg");
        recent.push("second.jpg");
        assert_eq!(recent.entries(), ["second.jpg", "first.jpg"]);
    }
}
