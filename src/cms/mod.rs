//! Content API access
//!
//! The rest of the crate talks to the CMS only through [`CmsClient`], so the
//! HTTP implementation can be swapped for an in-memory one in tests.

mod error;
mod prismic;
mod raw;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use error::{CmsError, Result};
pub use prismic::PrismicClient;
pub use raw::{
    DocumentData, RawBanner, RawContentBlock, RawDocument, RawPage, RichTextBlock, SpanMark,
    TextField,
};

/// Opaque handle to the next page of a listing
///
/// Only the content API creates these and only [`CmsClient::get_next`]
/// consumes them. The wrapped value is never inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A source of post documents
#[async_trait]
pub trait CmsClient: Send + Sync {
    /// Fetch the first page of documents of the given type
    async fn get_by_type(&self, doc_type: &str, page_size: usize) -> Result<RawPage>;

    /// Fetch the page a continuation token points at
    async fn get_next(&self, token: &ContinuationToken) -> Result<RawPage>;

    /// Fetch a single document by uid, `None` when it does not exist
    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Option<RawDocument>>;
}

#[async_trait]
impl<C: CmsClient + ?Sized> CmsClient for std::sync::Arc<C> {
    async fn get_by_type(&self, doc_type: &str, page_size: usize) -> Result<RawPage> {
        (**self).get_by_type(doc_type, page_size).await
    }

    async fn get_next(&self, token: &ContinuationToken) -> Result<RawPage> {
        (**self).get_next(token).await
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Option<RawDocument>> {
        (**self).get_by_uid(doc_type, uid).await
    }
}

#[async_trait]
impl<C: CmsClient + ?Sized> CmsClient for &C {
    async fn get_by_type(&self, doc_type: &str, page_size: usize) -> Result<RawPage> {
        (**self).get_by_type(doc_type, page_size).await
    }

    async fn get_next(&self, token: &ContinuationToken) -> Result<RawPage> {
        (**self).get_next(token).await
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Option<RawDocument>> {
        (**self).get_by_uid(doc_type, uid).await
    }
}
