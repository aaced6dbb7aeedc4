//! Raw document to view model conversion

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use super::{Banner, ContentBlock, Post, PostPage};
use crate::cms::{ContinuationToken, RawDocument, RawPage, TextField};
use crate::config::SiteConfig;

/// Errors raised while normalizing a document
#[derive(Error, Debug, PartialEq)]
pub enum NormalizeError {
    /// A detail document has no banner url
    #[error("Post {uid:?} has no banner")]
    MissingBanner { uid: Option<String> },

    /// A text field is neither a string nor a run array (strict mode only)
    #[error("Field `{field}` is neither text nor rich text")]
    UnexpectedShape { field: &'static str },
}

/// Converts raw documents into [`Post`] view models
#[derive(Debug, Clone)]
pub struct Normalizer {
    strict: bool,
    require_banner: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(false, true)
    }
}

impl Normalizer {
    /// Create a normalizer
    ///
    /// In strict mode text fields of an unknown shape are rejected instead of
    /// being passed through as their JSON text.
    pub fn new(strict: bool, require_banner: bool) -> Self {
        Self {
            strict,
            require_banner,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.strict_fields, config.require_banner)
    }

    /// Reduce a text field to a plain string
    pub fn resolve_text(
        &self,
        field: &'static str,
        value: &TextField,
    ) -> Result<String, NormalizeError> {
        match value {
            TextField::Runs(runs) => Ok(runs
                .first()
                .map(|run| run.text.clone())
                .unwrap_or_default()),
            TextField::Plain(s) => Ok(s.clone()),
            TextField::Other(Value::Null) => Ok(String::new()),
            TextField::Other(_) if self.strict => Err(NormalizeError::UnexpectedShape { field }),
            TextField::Other(other) => {
                tracing::warn!(field, value = %other, "Passing through unexpected field shape");
                Ok(other.to_string())
            }
        }
    }

    /// Build the listing view of a document
    pub fn list_item(&self, doc: &RawDocument) -> Result<Post, NormalizeError> {
        Ok(Post {
            id: doc.uid.clone(),
            published_at: doc
                .first_publication_date
                .as_deref()
                .and_then(parse_timestamp),
            title: self.resolve_text("title", &doc.data.title)?,
            subtitle: self.resolve_text("subtitle", &doc.data.subtitle)?,
            author: self.resolve_text("author", &doc.data.author)?,
            banner: None,
            content: Vec::new(),
        })
    }

    /// Build the detail view of a document, including banner and sections
    pub fn detail(&self, doc: &RawDocument) -> Result<Post, NormalizeError> {
        let mut post = self.list_item(doc)?;

        let banner_url = doc.data.banner.as_ref().and_then(|b| b.url.clone());
        post.banner = match banner_url {
            Some(url) => Some(Banner { url }),
            None if self.require_banner => {
                return Err(NormalizeError::MissingBanner {
                    uid: doc.uid.clone(),
                })
            }
            None => Some(Banner { url: String::new() }),
        };

        post.content = doc
            .data
            .content
            .iter()
            .map(|block| {
                Ok(ContentBlock {
                    heading: self.resolve_text("heading", &block.heading)?,
                    body: block.body.clone(),
                })
            })
            .collect::<Result<_, NormalizeError>>()?;

        Ok(post)
    }

    /// Normalize a whole listing page, keeping the API's order
    pub fn page(&self, page: RawPage) -> Result<PostPage, NormalizeError> {
        let posts = page
            .results
            .iter()
            .map(|doc| self.list_item(doc))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PostPage {
            posts,
            continuation_token: page.next_page.map(ContinuationToken::new),
        })
    }
}

/// Parse a publication timestamp
///
/// Accepts RFC 3339 as well as the `+0000` offset form the content API emits.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"));

    match parsed {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!(timestamp = raw, error = %e, "Unparseable publication date");
            None
        }
    }
}
