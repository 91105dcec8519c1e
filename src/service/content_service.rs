use crate::db::ContentStorage;
use crate::error::AlphabyteError;
use crate::types::Content;
use tracing::{debug, info, warn};

/// Create/Get/Update/Delete over content aggregates.
///
/// Cloning is cheap; all clones share one connection pool, so the service can
/// be handed to every request task.
#[derive(Clone)]
pub struct ContentService {
    storage: ContentStorage,
}

impl ContentService {
    pub fn new(storage: ContentStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &ContentStorage {
        &self.storage
    }

    /// Store a new aggregate and echo it back.
    ///
    /// Fails with `Conflict` when the id is taken. Nothing is stored on any
    /// failure.
    pub async fn create(&self, content: Content) -> Result<Content, AlphabyteError> {
        let id = content.id;
        match self.storage.insert_aggregate(&content).await {
            Ok(()) => {
                info!(id, images = content.images.len(), "content created");
                Ok(content)
            }
            Err(e) => {
                warn!(id, error = %e, "create content failed");
                Err(e)
            }
        }
    }

    /// Load the aggregate for `id`, or `NotFound`.
    pub async fn get(&self, id: i64) -> Result<Content, AlphabyteError> {
        let content = self
            .storage
            .fetch_aggregate(id)
            .await
            .inspect_err(|e| warn!(id, error = %e, "get content failed"))?;
        content.ok_or_else(|| {
            debug!(id, "content not found");
            AlphabyteError::NotFound { id }
        })
    }

    /// Replace the stored fields and image set of an existing aggregate.
    ///
    /// Fails with `NotFound`, writing nothing, when `content.id` is absent.
    pub async fn update(&self, content: Content) -> Result<Content, AlphabyteError> {
        let id = content.id;
        let found = self
            .storage
            .replace_aggregate(&content)
            .await
            .inspect_err(|e| warn!(id, error = %e, "update content failed"))?;
        if !found {
            debug!(id, "update skipped; content not found");
            return Err(AlphabyteError::NotFound { id });
        }
        info!(id, images = content.images.len(), "content updated");
        Ok(content)
    }

    /// Remove the aggregate. Deleting an absent id succeeds.
    pub async fn delete(&self, id: i64) -> Result<(), AlphabyteError> {
        let removed = self
            .storage
            .delete_aggregate(id)
            .await
            .inspect_err(|e| warn!(id, error = %e, "delete content failed"))?;
        if removed == 0 {
            debug!(id, "delete was a no-op");
        } else {
            info!(id, "content deleted");
        }
        Ok(())
    }
}
