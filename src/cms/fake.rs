//! In-memory content API used by unit tests

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{CmsClient, CmsError, ContinuationToken, RawDocument, RawPage, Result};

/// Serves canned pages and documents, counting every fetch
#[derive(Default)]
pub struct FakeClient {
    first: RawPage,
    pages: HashMap<String, RawPage>,
    documents: HashMap<String, RawDocument>,
    fetches: AtomicUsize,
    fail_next: AtomicBool,
}

impl FakeClient {
    pub fn new(first: RawPage) -> Self {
        Self {
            first,
            ..Default::default()
        }
    }

    /// Register the page returned for `token`
    pub fn with_page(mut self, token: &str, page: RawPage) -> Self {
        self.pages.insert(token.to_string(), page);
        self
    }

    pub fn with_document(mut self, doc: RawDocument) -> Self {
        let uid = doc.uid.clone().unwrap_or_default();
        self.documents.insert(uid, doc);
        self
    }

    /// Make the next fetch fail with a timeout
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn record(&self, url: &str) -> Result<()> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(CmsError::Timeout {
                url: url.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CmsClient for FakeClient {
    async fn get_by_type(&self, _doc_type: &str, _page_size: usize) -> Result<RawPage> {
        self.record("first")?;
        Ok(self.first.clone())
    }

    async fn get_next(&self, token: &ContinuationToken) -> Result<RawPage> {
        self.record(token.as_str())?;
        self.pages
            .get(token.as_str())
            .cloned()
            .ok_or_else(|| CmsError::Status {
                status: 404,
                url: token.to_string(),
            })
    }

    async fn get_by_uid(&self, _doc_type: &str, uid: &str) -> Result<Option<RawDocument>> {
        self.record(uid)?;
        Ok(self.documents.get(uid).cloned())
    }
}

/// A listing document whose text fields are single-run arrays
pub fn listing_doc(uid: &str, title: &str) -> RawDocument {
    serde_json::from_value(json!({
        "uid": uid,
        "first_publication_date": "2021-03-15T19:25:28+0000",
        "data": {
            "title": [{"type": "heading1", "text": title, "spans": []}],
            "subtitle": [{"type": "paragraph", "text": format!("{} subtitle", title), "spans": []}],
            "author": [{"type": "paragraph", "text": "Joseph Oliveira", "spans": []}]
        }
    }))
    .expect("valid listing document")
}

/// A detail document with a banner and one content block
pub fn detail_doc(uid: &str, title: &str) -> RawDocument {
    serde_json::from_value(json!({
        "uid": uid,
        "first_publication_date": "2021-03-25T19:25:28+0000",
        "data": {
            "title": title,
            "subtitle": "Tudo sobre como criar a sua primeira aplicação",
            "author": "Danilo Vieira",
            "banner": {"url": "https://images.prismic.io/banner.png"},
            "content": [{
                "heading": [{"type": "heading2", "text": "Proin et varius", "spans": []}],
                "body": [
                    {
                        "type": "paragraph",
                        "text": "Nullam dolor sapien, vulputate eu diam at",
                        "spans": []
                    }
                ]
            }]
        }
    }))
    .expect("valid detail document")
}

/// A page of listing documents with an optional continuation
pub fn page_of(docs: Vec<RawDocument>, next: Option<&str>) -> RawPage {
    RawPage {
        page: 1,
        results_per_page: docs.len() as u32,
        results: docs,
        next_page: next.map(str::to_string),
        ..Default::default()
    }
}
