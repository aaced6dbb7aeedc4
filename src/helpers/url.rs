//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/blog/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/post/hello/") // -> "https://example.com/blog/post/hello/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// URL of a post detail page
///
/// # Examples
/// ```ignore
/// post_url(&config, "como utilizar hooks") // -> "/post/como%20utilizar%20hooks/"
/// ```
pub fn post_url(config: &SiteConfig, uid: &str) -> String {
    url_for(config, &format!("post/{}/", encode_segment(uid)))
}

/// Absolute URL of a post detail page
pub fn post_permalink(config: &SiteConfig, uid: &str) -> String {
    full_url_for(config, &format!("post/{}/", encode_segment(uid)))
}

/// URL of the listing showing the first `pages` pages
pub fn listing_url(config: &SiteConfig, pages: usize) -> String {
    if pages <= 1 {
        url_for(config, "")
    } else {
        format!("{}?pages={}", url_for(config, ""), pages)
    }
}

/// URL of the static listing page holding the first `pages` pages
pub fn listing_page_url(config: &SiteConfig, pages: usize) -> String {
    if pages <= 1 {
        url_for(config, "")
    } else {
        url_for(config, &format!("page/{}/", pages))
    }
}

/// Percent-encode a value for use as one path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}
