//! Application state management

use std::sync::Arc;

use crate::config::{Config, StorageProvider};
use crate::convert::{MarkdownConverter, MuPdfConverter};
use crate::documents::DocumentStore;
use crate::storage::{BlobStore, MemoryBlobStore, S3Client};

/// Shared application state
///
/// Built once at startup and handed to every handler; there is no other
/// process-wide state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    documents: DocumentStore,
    converter: Arc<dyn MarkdownConverter>,
}

impl AppState {
    /// Create application state from explicit parts
    pub fn new(
        config: Config,
        blobs: Arc<dyn BlobStore>,
        converter: Arc<dyn MarkdownConverter>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                documents: DocumentStore::new(blobs),
                converter,
            }),
        }
    }

    /// Create application state with the storage backend and MuPDF
    /// converter named by the configuration
    pub async fn from_config(config: Config) -> Self {
        let blobs: Arc<dyn BlobStore> = match config.storage.provider {
            StorageProvider::S3 => Arc::new(S3Client::new(&config.storage).await),
            StorageProvider::Memory => {
                tracing::warn!("Using in-memory storage; documents will not survive a restart");
                Arc::new(MemoryBlobStore::new(config.storage.public_base_url()))
            }
        };

        let converter = Arc::new(MuPdfConverter::new(config.conversion.temp_dir.clone()));

        Self::new(config, blobs, converter)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the document store
    pub fn documents(&self) -> &DocumentStore {
        &self.inner.documents
    }

    /// Get the markdown converter
    pub fn converter(&self) -> &dyn MarkdownConverter {
        self.inner.converter.as_ref()
    }
}
