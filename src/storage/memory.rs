//! In-memory blob store
//!
//! Keeps objects in a sorted map so listings come back in the same
//! lexicographic key order S3 uses.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::StorageError;

use super::types::{public_object_url, ListOptions, ObjectList, ObjectMetadata};
use super::{BlobStore, StorageResult};

/// S3 caps a single list page at 1000 keys
const MAX_KEYS_PER_PAGE: usize = 1000;

#[derive(Debug, Clone)]
struct StoredObject {
    metadata: ObjectMetadata,
    data: Vec<u8>,
}

/// Process-local blob store
#[derive(Clone)]
pub struct MemoryBlobStore {
    objects: Arc<RwLock<BTreeMap<String, StoredObject>>>,
    public_base_url: String,
}

impl MemoryBlobStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            objects: Arc::new(RwLock::new(BTreeMap::new())),
            public_base_url: public_base_url.into(),
        }
    }

    /// Store an object with an explicit creation time
    pub async fn insert_at(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        created_at: DateTime<Utc>,
    ) -> ObjectMetadata {
        let metadata = ObjectMetadata {
            key: key.to_string(),
            size: data.len() as i64,
            last_modified: Some(created_at),
            content_type: Some(content_type.to_string()),
        };

        let mut objects = self.objects.write().await;
        objects.insert(
            key.to_string(),
            StoredObject {
                metadata: metadata.clone(),
                data,
            },
        );

        metadata
    }

    /// Read back an object's body
    pub async fn get_data(&self, key: &str) -> Option<Vec<u8>> {
        let objects = self.objects.read().await;
        objects.get(key).map(|obj| obj.data.clone())
    }

    /// Number of stored objects
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<ObjectMetadata> {
        Ok(self.insert_at(key, data, content_type, Utc::now()).await)
    }

    async fn head_object(&self, key: &str) -> StorageResult<ObjectMetadata> {
        let objects = self.objects.read().await;
        objects
            .get(key)
            .map(|obj| obj.metadata.clone())
            .ok_or_else(|| StorageError::ObjectNotFound(key.to_string()))
    }

    async fn list_objects(&self, options: ListOptions) -> StorageResult<ObjectList> {
        let prefix = options.prefix.unwrap_or_default();
        let max_keys = options
            .max_keys
            .map(|n| n.max(0) as usize)
            .unwrap_or(MAX_KEYS_PER_PAGE)
            .min(MAX_KEYS_PER_PAGE);

        let objects = self.objects.read().await;
        let page: Vec<ObjectMetadata> = objects
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .take(max_keys)
            .map(|(_, obj)| obj.metadata.clone())
            .collect();

        Ok(ObjectList { objects: page })
    }

    fn public_url(&self, key: &str) -> String {
        public_object_url(&self.public_base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryBlobStore {
        MemoryBlobStore::new("http://blobs.test")
    }

    #[tokio::test]
    async fn test_put_and_head() {
        let store = store();
        let stored = store
            .put_object("pdfs/a.pdf", b"%PDF-1.4".to_vec(), "application/pdf")
            .await
            .unwrap();

        assert_eq!(stored.size, 8);
        assert!(stored.last_modified.is_some());

        let head = store.head_object("pdfs/a.pdf").await.unwrap();
        assert_eq!(head, stored);
        assert_eq!(head.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(store.get_data("pdfs/a.pdf").await.unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_missing_object() {
        let store = store();

        let result = store.head_object("markdown/missing.md").await;
        assert!(matches!(result, Err(StorageError::ObjectNotFound(_))));
        assert!(!store.object_exists("markdown/missing.md").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_respects_prefix_and_max_keys() {
        let store = store();
        for key in ["pdfs/a.pdf", "pdfs/b.pdf", "pdfs/c.pdf", "markdown/a.md"] {
            store.put_object(key, vec![1], "application/octet-stream").await.unwrap();
        }

        let all = store
            .list_objects(ListOptions::new().with_prefix("pdfs/"))
            .await
            .unwrap();
        let keys: Vec<_> = all.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["pdfs/a.pdf", "pdfs/b.pdf", "pdfs/c.pdf"]);

        let capped = store
            .list_objects(ListOptions::new().with_prefix("pdfs/").with_max_keys(2))
            .await
            .unwrap();
        let keys: Vec<_> = capped.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["pdfs/a.pdf", "pdfs/b.pdf"]);
    }

    #[tokio::test]
    async fn test_public_url() {
        let store = store();
        assert_eq!(store.public_url("markdown/x.md"), "http://blobs.test/markdown/x.md");
    }
}
