pub mod types;
pub mod config;
pub mod catalog;
pub mod tips;
pub mod storage;
pub mod bookmarks;
pub mod media;
pub mod classifier;
pub mod pipeline;
pub mod cli;

pub use types::*;
pub use config::AppConfig;
pub use tips::TipRotation;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use bookmarks::BookmarkStore;
pub use media::{ImageAsset, ImagePicker, LocalFilePicker, PickOutcome};
pub use classifier::{Classifier, HttpClassifier, MockClassifier};
pub use pipeline::{PredictionPipeline, RecentImages};
