//! Incremental loading of the post listing
//!
//! The controller holds the posts shown so far and the continuation token
//! of the next page. [`PaginationController::load_more`] takes `&mut self`,
//! so a second load cannot start while one is still in flight.

use thiserror::Error;

use crate::cms::{CmsClient, CmsError, ContinuationToken};
use crate::content::{NormalizeError, Normalizer, Post, PostPage};

/// Errors raised while loading a listing page
#[derive(Error, Debug)]
pub enum PaginationError {
    #[error("Failed to fetch page: {0}")]
    Fetch(#[from] CmsError),

    #[error("Failed to normalize page: {0}")]
    Normalize(#[from] NormalizeError),
}

impl PaginationError {
    /// Whether the same load may succeed if tried again
    pub fn is_retryable(&self) -> bool {
        match self {
            PaginationError::Fetch(e) => e.is_retryable(),
            PaginationError::Normalize(_) => false,
        }
    }
}

/// Outcome of [`PaginationController::load_more`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    /// A page was fetched and this many posts were appended
    Appended(usize),
    /// No continuation token is held; nothing was fetched
    Exhausted,
}

/// Listing state: visible posts plus the token of the next page
pub struct PaginationController<C> {
    client: C,
    normalizer: Normalizer,
    posts: Vec<Post>,
    continuation_token: Option<ContinuationToken>,
    pages_loaded: usize,
}

impl<C: CmsClient> PaginationController<C> {
    /// Create an empty controller
    pub fn new(client: C, normalizer: Normalizer) -> Self {
        Self {
            client,
            normalizer,
            posts: Vec::new(),
            continuation_token: None,
            pages_loaded: 0,
        }
    }

    /// Fetch the first page of `doc_type` and initialize from it
    pub async fn start(
        client: C,
        normalizer: Normalizer,
        doc_type: &str,
        page_size: usize,
    ) -> Result<Self, PaginationError> {
        let raw = client.get_by_type(doc_type, page_size).await?;
        let page = normalizer.page(raw)?;

        let mut controller = Self::new(client, normalizer);
        controller.initialize(page);
        Ok(controller)
    }

    /// Set the state from the first fetched page
    pub fn initialize(&mut self, page: PostPage) {
        tracing::debug!(
            posts = page.posts.len(),
            has_more = page.continuation_token.is_some(),
            "Initialized listing"
        );
        self.posts = page.posts;
        self.continuation_token = page.continuation_token;
        self.pages_loaded = 1;
    }

    /// Fetch the next page and append its posts
    ///
    /// Does nothing when no continuation token is held. On error the state
    /// is left untouched so the call can be retried.
    pub async fn load_more(&mut self) -> Result<LoadMore, PaginationError> {
        let Some(token) = self.continuation_token.as_ref() else {
            return Ok(LoadMore::Exhausted);
        };

        let raw = self.client.get_next(token).await?;
        let page = self.normalizer.page(raw)?;

        let appended = page.posts.len();
        self.posts.extend(page.posts);
        self.continuation_token = page.continuation_token;
        self.pages_loaded += 1;

        tracing::debug!(
            appended,
            total = self.posts.len(),
            has_more = self.continuation_token.is_some(),
            "Loaded next listing page"
        );

        Ok(LoadMore::Appended(appended))
    }

    /// Keep loading until `max_pages` pages are held or the listing ends
    pub async fn load_pages(&mut self, max_pages: usize) -> Result<usize, PaginationError> {
        while self.pages_loaded < max_pages {
            if self.load_more().await? == LoadMore::Exhausted {
                break;
            }
        }
        Ok(self.pages_loaded)
    }

    /// Whether the load-more trigger should be offered
    pub fn has_more(&self) -> bool {
        self.continuation_token.is_some()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn continuation_token(&self) -> Option<&ContinuationToken> {
        self.continuation_token.as_ref()
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }
}
