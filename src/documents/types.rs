//! Document types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Default number of documents returned by a listing
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Largest page a single listing may request
pub const MAX_LIST_LIMIT: u32 = 100;

/// Identifier shared by a document's PDF and markdown blobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A blob written by the store, with store-populated metadata
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlob {
    pub key: String,
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: i64,
}

/// A complete document: PDF blob plus its markdown counterpart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub document_id: DocumentId,
    pub pdf_url: String,
    pub markdown_url: String,
    /// Creation time of the PDF blob
    pub created_at: DateTime<Utc>,
    /// Size of the PDF blob
    pub size_bytes: i64,
}

/// Number of PDF blobs to enumerate, always within `1..=MAX_LIST_LIMIT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimit(u32);

impl PageLimit {
    pub fn new(limit: i64) -> Result<Self, AppError> {
        if (1..=MAX_LIST_LIMIT as i64).contains(&limit) {
            Ok(Self(limit as u32))
        } else {
            Err(AppError::InvalidParameter(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIST_LIMIT, limit
            )))
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        Self(DEFAULT_LIST_LIMIT)
    }
}

/// Validated listing parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Filter on the start of the document identifier
    pub prefix: String,
    pub limit: PageLimit,
}
