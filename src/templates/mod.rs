//! Built-in blog templates using Tera template engine
//!
//! All templates are embedded directly in the binary.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{rich_text, Post};
use crate::helpers::{escape_html, format_date_localized, Helpers};

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
    helpers: Helpers,
    site: SiteData,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("post.html", include_str!("blog/post.html")),
            ("loading.html", include_str!("blog/loading.html")),
            ("not_found.html", include_str!("blog/not_found.html")),
        ])?;

        // Dates reach templates as RFC 3339 strings and are formatted here
        tera.register_filter(
            "date_format",
            DateFormatFilter {
                format: config.date_format.clone(),
                locale: config.language.clone(),
                timezone: config.timezone.clone(),
            },
        );

        Ok(Self {
            tera,
            helpers: Helpers::new(config.clone()),
            site: SiteData {
                title: config.title.clone(),
                root: crate::helpers::url_for(config, ""),
                language: config.language.replace('_', "-"),
            },
        })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render the post listing
    ///
    /// The load-more link is only emitted when `next_url` is set, i.e. while
    /// a continuation token is held.
    pub fn render_listing(&self, posts: &[Post], next_url: Option<String>) -> Result<String> {
        let summaries: Vec<PostSummary> = posts.iter().map(|p| self.summary(p)).collect();
        let pagination = PaginationData {
            has_more: next_url.is_some(),
            next_url: next_url.unwrap_or_default(),
        };

        let mut context = self.base_context();
        context.insert("posts", &summaries);
        context.insert("pagination", &pagination);
        self.render("index.html", &context)
    }

    /// Render a post detail page
    pub fn render_post(&self, post: &Post) -> Result<String> {
        let mut context = self.base_context();
        context.insert("post", &self.detail(post));
        self.render("post.html", &context)
    }

    /// Render the transient placeholder shown while content is unavailable
    pub fn render_loading(&self, retry_after_secs: u64) -> Result<String> {
        let mut context = self.base_context();
        context.insert("retry_after", &retry_after_secs);
        self.render("loading.html", &context)
    }

    pub fn render_not_found(&self) -> Result<String> {
        self.render("not_found.html", &self.base_context())
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context
    }

    fn summary(&self, post: &Post) -> PostSummary {
        PostSummary {
            url: post
                .id
                .as_deref()
                .map(|uid| self.helpers.post_url(uid))
                .unwrap_or_else(|| self.helpers.url_for("")),
            uid: post.id.clone(),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            published_at: post.published_at.as_ref().map(DateTime::to_rfc3339),
        }
    }

    fn detail(&self, post: &Post) -> PostDetail {
        PostDetail {
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            published_at: post.published_at.as_ref().map(DateTime::to_rfc3339),
            permalink: post
                .id
                .as_deref()
                .map(|uid| escape_html(&self.helpers.post_permalink(uid)))
                .unwrap_or_default(),
            banner_url: post
                .banner
                .as_ref()
                .map(|b| escape_html(&b.url))
                .unwrap_or_default(),
            reading_time: self.helpers.reading_time(&post.content),
            sections: post
                .content
                .iter()
                .map(|block| SectionData {
                    heading: block.heading.clone(),
                    html: rich_text::as_html(&block.body),
                })
                .collect(),
        }
    }
}

/// Tera filter: format an RFC 3339 timestamp for display
struct DateFormatFilter {
    format: String,
    locale: String,
    timezone: String,
}

impl tera::Filter for DateFormatFilter {
    fn filter(
        &self,
        value: &tera::Value,
        args: &HashMap<String, tera::Value>,
    ) -> tera::Result<tera::Value> {
        let s = tera::try_get_value!("date_format", "value", String, value);
        let format = match args.get("format") {
            Some(val) => tera::try_get_value!("date_format", "format", String, val),
            None => self.format.clone(),
        };

        let date = DateTime::parse_from_rfc3339(&s)
            .map_err(|e| tera::Error::msg(format!("date_format: invalid date {:?}: {}", s, e)))?
            .with_timezone(&Utc);

        Ok(tera::Value::String(format_date_localized(
            &date,
            &format,
            &self.locale,
            &self.timezone,
        )))
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub root: String,
    pub language: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub uid: Option<String>,
    pub url: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub published_at: Option<String>,
    pub permalink: String,
    pub banner_url: String,
    pub reading_time: u32,
    pub sections: Vec<SectionData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub heading: String,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationData {
    pub has_more: bool,
    pub next_url: String,
}
