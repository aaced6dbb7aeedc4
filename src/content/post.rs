//! Post view model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cms::{ContinuationToken, RichTextBlock};

/// A blog post, ready to render
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Document uid (absent for unresolved listing entries)
    pub id: Option<String>,

    /// First publication timestamp, formatted only at render time
    pub published_at: Option<DateTime<Utc>>,

    /// Post title
    pub title: String,

    /// Post subtitle
    pub subtitle: String,

    /// Author name
    pub author: String,

    /// Banner image, detail view only
    pub banner: Option<Banner>,

    /// Body sections, detail view only
    pub content: Vec<ContentBlock>,
}

/// Banner image of a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub url: String,
}

/// One section of a post body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Section heading as plain text
    pub heading: String,

    /// Rich-text blocks, kept unflattened for the formatter
    pub body: Vec<RichTextBlock>,
}

/// One fetched listing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostPage {
    pub posts: Vec<Post>,

    /// `None` when no further pages exist
    pub continuation_token: Option<ContinuationToken>,
}
