use crate::catalog;
use crate::storage::KeyValueStore;
use crate::types::Disease;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

const STORAGE_KEY: &str = "bookmarks";

/// The single source of truth for which diseases the user has saved.
///
/// The in-memory list is authoritative. Persistence is write-behind and
/// best-effort: a failed write is logged and the session carries on.
pub struct BookmarkStore {
    storage: Arc<dyn KeyValueStore>,
    ids: RwLock<Vec<String>>,
}

impl BookmarkStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            ids: RwLock::new(Vec::new()),
        }
    }

    /// Loads the persisted list. Missing, unreadable, or corrupt data all
    /// fall back to an empty set so the app always starts.
    pub async fn initialize(&self) {
        let loaded = match self.storage.get(STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => ids,
                Err(e) => {
                    warn!("Discarding corrupt bookmark data: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to load bookmarks: {}", e);
                Vec::new()
            }
        };
        debug!("Loaded {} bookmarks", loaded.len());
        *self.ids.write().await = loaded;
    }

    /// Adds the disease when absent, removes it when present. Returns
    /// whether it is bookmarked afterwards.
    pub async fn toggle(&self, disease: &Disease) -> bool {
        let (bookmarked, snapshot) = {
            let mut ids = self.ids.write().await;
            let bookmarked = if ids.iter().any(|id| id == disease.id) {
                ids.retain(|id| id != disease.id);
                false
            } else {
                ids.push(disease.id.to_string());
                true
            };
            (bookmarked, ids.clone())
        };
        self.persist(&snapshot).await;
        bookmarked
    }

    pub async fn is_bookmarked(&self, id: &str) -> bool {
        self.ids.read().await.iter().any(|b| b == id)
    }

    /// Snapshot of the saved identifiers, oldest first.
    pub async fn bookmarks(&self) -> Vec<String> {
        self.ids.read().await.clone()
    }

    /// Resolves the saved identifiers against the disease library, keeping
    /// bookmark order and skipping identifiers the library no longer knows.
    pub async fn bookmarked_diseases(&self) -> Vec<&'static Disease> {
        self.ids
            .read()
            .await
            .iter()
            .filter_map(|id| catalog::find(id))
            .collect()
    }

    async fn persist(&self, ids: &[String]) {
        let serialized = match serde_json::to_string(ids) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize bookmarks: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(STORAGE_KEY, &serialized).await {
            warn!("Failed to save bookmarks: {}", e);
        }
    }
}
