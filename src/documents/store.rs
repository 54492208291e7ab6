//! Document Store
//!
//! Persists the PDF/markdown pair of each document in the blob store and
//! lists complete documents back out of it.

use std::sync::Arc;

use futures::future::try_join_all;

use crate::storage::{BlobStore, ListOptions, ObjectMetadata, StorageResult};

use super::keys::{
    document_id_from_pdf_key, markdown_key, pdf_key, pdf_listing_prefix, MARKDOWN_CONTENT_TYPE,
    PDF_CONTENT_TYPE,
};
use super::types::{Document, DocumentId, ListQuery, StoredBlob};

/// Artifact store over a single bucket
#[derive(Clone)]
pub struct DocumentStore {
    blobs: Arc<dyn BlobStore>,
}

impl DocumentStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Store the original upload at `pdfs/{id}.pdf`
    pub async fn put_pdf(&self, id: &DocumentId, data: Vec<u8>) -> StorageResult<StoredBlob> {
        let key = pdf_key(id);
        let metadata = self.blobs.put_object(&key, data, PDF_CONTENT_TYPE).await?;
        Ok(self.stored_blob(metadata))
    }

    /// Store the converted text at `markdown/{id}.md`
    pub async fn put_markdown(&self, id: &DocumentId, markdown: String) -> StorageResult<StoredBlob> {
        let key = markdown_key(id);
        let metadata = self
            .blobs
            .put_object(&key, markdown.into_bytes(), MARKDOWN_CONTENT_TYPE)
            .await?;
        Ok(self.stored_blob(metadata))
    }

    /// List complete documents, newest first.
    ///
    /// At most `query.limit` PDF blobs are enumerated; any of them without a
    /// markdown counterpart is left out, so fewer documents may come back.
    pub async fn list(&self, query: &ListQuery) -> StorageResult<Vec<Document>> {
        let options = ListOptions::new()
            .with_prefix(pdf_listing_prefix(&query.prefix))
            .with_max_keys(query.limit.get() as i32);

        let listed = self.blobs.list_objects(options).await?;

        let candidates: Vec<(DocumentId, ObjectMetadata)> = listed
            .objects
            .into_iter()
            .filter_map(|obj| match document_id_from_pdf_key(&obj.key) {
                Some(id) => Some((id, obj)),
                None => {
                    tracing::debug!(key = %obj.key, "Skipping unrecognized key under pdfs/");
                    None
                }
            })
            .collect();

        let probes = candidates.iter().map(|(id, _)| {
            let key = markdown_key(id);
            async move { self.blobs.object_exists(&key).await }
        });
        let has_markdown = try_join_all(probes).await?;

        let mut documents: Vec<Document> = candidates
            .into_iter()
            .zip(has_markdown)
            .filter_map(|((id, pdf), complete)| {
                if !complete {
                    tracing::debug!(document_id = %id, "Skipping PDF without markdown");
                    return None;
                }

                Some(Document {
                    document_id: id,
                    pdf_url: self.blobs.public_url(&pdf.key),
                    markdown_url: self.blobs.public_url(&markdown_key(&id)),
                    created_at: pdf.last_modified.unwrap_or_default(),
                    size_bytes: pdf.size,
                })
            })
            .collect();

        // stable, so equal timestamps keep listing order
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        tracing::debug!(
            prefix = %query.prefix,
            limit = query.limit.get(),
            count = documents.len(),
            "Listed documents"
        );

        Ok(documents)
    }

    fn stored_blob(&self, metadata: ObjectMetadata) -> StoredBlob {
        StoredBlob {
            url: self.blobs.public_url(&metadata.key),
            key: metadata.key,
            created_at: metadata.last_modified,
            size_bytes: metadata.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::types::PageLimit;
    use crate::storage::MemoryBlobStore;
    use chrono::{DateTime, Duration, Utc};

    fn setup() -> (MemoryBlobStore, DocumentStore) {
        let blobs = MemoryBlobStore::new("http://blobs.test");
        let store = DocumentStore::new(Arc::new(blobs.clone()));
        (blobs, store)
    }

    async fn insert_document(
        blobs: &MemoryBlobStore,
        id: &DocumentId,
        created_at: DateTime<Utc>,
        with_markdown: bool,
    ) {
        blobs
            .insert_at(&pdf_key(id), vec![0u8; 10], PDF_CONTENT_TYPE, created_at)
            .await;
        if with_markdown {
            blobs
                .insert_at(&markdown_key(id), b"# doc".to_vec(), MARKDOWN_CONTENT_TYPE, created_at)
                .await;
        }
    }

    #[tokio::test]
    async fn test_put_pdf_and_markdown() {
        let (blobs, store) = setup();
        let id = DocumentId::generate();

        let pdf = store.put_pdf(&id, b"%PDF-1.4 body".to_vec()).await.unwrap();
        assert_eq!(pdf.key, pdf_key(&id));
        assert_eq!(pdf.url, format!("http://blobs.test/pdfs/{}.pdf", id));
        assert_eq!(pdf.size_bytes, 13);
        assert!(pdf.created_at.is_some());

        let md = store.put_markdown(&id, "# Title\n".to_string()).await.unwrap();
        assert_eq!(md.url, format!("http://blobs.test/markdown/{}.md", id));

        let head = blobs.head_object(&markdown_key(&id)).await.unwrap();
        assert_eq!(head.content_type.as_deref(), Some(MARKDOWN_CONTENT_TYPE));
        assert_eq!(blobs.get_data(&markdown_key(&id)).await.unwrap(), b"# Title\n");
    }

    #[tokio::test]
    async fn test_list_sorts_newest_first() {
        let (blobs, store) = setup();
        let t1 = Utc::now() - Duration::hours(3);
        let t2 = t1 + Duration::hours(1);
        let t3 = t2 + Duration::hours(1);

        let ids: Vec<_> = (0..3).map(|_| DocumentId::generate()).collect();
        insert_document(&blobs, &ids[0], t1, true).await;
        insert_document(&blobs, &ids[1], t2, true).await;
        insert_document(&blobs, &ids[2], t3, true).await;

        let docs = store.list(&ListQuery::default()).await.unwrap();
        let created: Vec<_> = docs.iter().map(|d| d.created_at).collect();
        assert_eq!(created, vec![t3, t2, t1]);
        assert_eq!(docs[0].document_id, ids[2]);
        assert_eq!(docs[0].size_bytes, 10);
    }

    #[tokio::test]
    async fn test_list_excludes_orphan_pdfs() {
        let (blobs, store) = setup();
        let complete = DocumentId::generate();
        let orphan = DocumentId::generate();
        insert_document(&blobs, &complete, Utc::now(), true).await;
        insert_document(&blobs, &orphan, Utc::now(), false).await;

        let docs = store.list(&ListQuery::default()).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].document_id, complete);
        assert_eq!(docs[0].markdown_url, blobs.public_url(&markdown_key(&complete)));
    }

    #[tokio::test]
    async fn test_list_filters_by_prefix() {
        let (blobs, store) = setup();
        let a: DocumentId = "aaaa0000-0000-4000-8000-000000000001".parse().unwrap();
        let b: DocumentId = "bbbb0000-0000-4000-8000-000000000002".parse().unwrap();
        insert_document(&blobs, &a, Utc::now(), true).await;
        insert_document(&blobs, &b, Utc::now(), true).await;

        let query = ListQuery {
            prefix: "bbbb".to_string(),
            ..Default::default()
        };
        let docs = store.list(&query).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].document_id, b);
    }

    #[tokio::test]
    async fn test_limit_caps_enumerated_pdfs() {
        let (blobs, store) = setup();
        for _ in 0..5 {
            insert_document(&blobs, &DocumentId::generate(), Utc::now(), true).await;
        }

        let query = ListQuery {
            limit: PageLimit::new(3).unwrap(),
            ..Default::default()
        };
        assert_eq!(store.list(&query).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_is_idempotent() {
        let (blobs, store) = setup();
        let now = Utc::now();
        for _ in 0..4 {
            // identical timestamps exercise tie handling
            insert_document(&blobs, &DocumentId::generate(), now, true).await;
        }

        let first = store.list(&ListQuery::default()).await.unwrap();
        let second = store.list(&ListQuery::default()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_foreign_objects_are_ignored() {
        let (blobs, store) = setup();
        blobs
            .insert_at("pdfs/readme.txt", vec![1], "text/plain", Utc::now())
            .await;

        assert!(store.list(&ListQuery::default()).await.unwrap().is_empty());
    }
}
