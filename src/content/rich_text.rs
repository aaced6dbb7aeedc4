//! Rich text to HTML
//!
//! Renders the block arrays the content API uses for rich-text fields.
//! Span offsets are character offsets into the block text.

use serde_json::Value;

use crate::cms::{RichTextBlock, SpanMark};
use crate::helpers::{escape_html, push_escaped};

/// Render rich-text blocks to HTML
pub fn as_html(blocks: &[RichTextBlock]) -> String {
    let mut html = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let list = match block.kind.as_str() {
            "list-item" => Some("ul"),
            "o-list-item" => Some("ol"),
            _ => None,
        };

        if open_list != list {
            if let Some(tag) = open_list {
                html.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = list {
                html.push_str(&format!("<{}>", tag));
            }
            open_list = list;
        }

        html.push_str(&render_block(block));
    }

    if let Some(tag) = open_list {
        html.push_str(&format!("</{}>", tag));
    }

    html
}

/// Plain text of rich-text blocks, joined with a space
pub fn as_text(blocks: &[RichTextBlock]) -> String {
    blocks
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_block(block: &RichTextBlock) -> String {
    match block.kind.as_str() {
        "paragraph" => format!("<p>{}</p>", render_spans(&block.text, &block.spans)),
        "preformatted" => format!("<pre>{}</pre>", render_spans(&block.text, &block.spans)),
        "list-item" | "o-list-item" => {
            format!("<li>{}</li>", render_spans(&block.text, &block.spans))
        }
        "image" => {
            let url = extra_str(block, &["url"]).map_or("", safe_href);
            let alt = extra_str(block, &["alt"]).unwrap_or_default();
            format!(
                r#"<p class="block-img"><img src="{}" alt="{}"></p>"#,
                escape_html(url),
                escape_html(alt)
            )
        }
        "embed" => {
            let inner = extra_str(block, &["oembed", "html"]).unwrap_or_default();
            format!(r#"<div class="embed">{}</div>"#, inner)
        }
        kind => match heading_level(kind) {
            Some(level) => format!(
                "<h{level}>{}</h{level}>",
                render_spans(&block.text, &block.spans)
            ),
            None => {
                tracing::debug!(kind, "Rendering unknown block type as paragraph");
                format!("<p>{}</p>", render_spans(&block.text, &block.spans))
            }
        },
    }
}

fn heading_level(kind: &str) -> Option<u8> {
    let level: u8 = kind.strip_prefix("heading")?.parse().ok()?;
    (1..=6).contains(&level).then_some(level)
}

/// Follow a path of object keys in the block's extra fields
fn extra_str<'a>(block: &'a RichTextBlock, path: &[&str]) -> Option<&'a str> {
    let (first, rest) = path.split_first()?;
    let mut value = block.extra.get(*first)?;
    for key in rest {
        value = value.get(*key)?;
    }
    value.as_str()
}

fn open_tag(span: &SpanMark) -> String {
    match span.kind.as_str() {
        "strong" => "<strong>".to_string(),
        "em" => "<em>".to_string(),
        "hyperlink" => {
            let url = span
                .data
                .as_ref()
                .and_then(|d| d.get("url"))
                .and_then(Value::as_str)
                .map_or("#", safe_href);
            let external = url.starts_with("http://") || url.starts_with("https://");
            if external {
                format!(
                    r#"<a href="{}" target="_blank" rel="noopener">"#,
                    escape_html(url)
                )
            } else {
                format!(r#"<a href="{}">"#, escape_html(url))
            }
        }
        other => format!(r#"<span class="{}">"#, escape_html(other)),
    }
}

/// Keep http(s), mailto and relative links; anything else becomes `#`
fn safe_href(url: &str) -> &str {
    let url = url.trim();
    let scheme_end = url.find(|c| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(i) if url[i..].starts_with(':') => {
            let scheme = url[..i].to_ascii_lowercase();
            if matches!(scheme.as_str(), "http" | "https" | "mailto") {
                url
            } else {
                "#"
            }
        }
        _ => url,
    }
}

fn close_tag(span: &SpanMark) -> &'static str {
    match span.kind.as_str() {
        "strong" => "</strong>",
        "em" => "</em>",
        "hyperlink" => "</a>",
        _ => "</span>",
    }
}

/// Render text with its formatting spans
///
/// Spans may cross each other; a span that ends while later-opened spans are
/// still active closes them first and reopens the ones that continue.
fn render_spans(text: &str, spans: &[SpanMark]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut spans: Vec<&SpanMark> = spans
        .iter()
        .filter(|s| s.start < s.end && s.start < chars.len())
        .collect();
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut out = String::with_capacity(text.len());
    let mut stack: Vec<&SpanMark> = Vec::new();
    let mut next = 0;

    for (i, c) in chars.iter().enumerate() {
        close_ended(&mut out, &mut stack, i);
        while next < spans.len() && spans[next].start == i {
            out.push_str(&open_tag(spans[next]));
            stack.push(spans[next]);
            next += 1;
        }
        push_escaped(&mut out, *c);
    }

    while let Some(span) = stack.pop() {
        out.push_str(close_tag(span));
    }

    out.replace('\n', "<br />")
}

/// Close every span ending at `pos`, reopening still-active spans above it
fn close_ended<'a>(out: &mut String, stack: &mut Vec<&'a SpanMark>, pos: usize) {
    let Some(depth) = stack.iter().position(|s| s.end <= pos) else {
        return;
    };

    let closed: Vec<&SpanMark> = stack.drain(depth..).collect();
    for span in closed.iter().rev() {
        out.push_str(close_tag(span));
    }
    for span in closed.into_iter().filter(|s| s.end > pos) {
        out.push_str(&open_tag(span));
        stack.push(span);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(value: Value) -> RichTextBlock {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_paragraph_and_heading() {
        let blocks = vec![
            RichTextBlock::heading(2, "Título"),
            RichTextBlock::paragraph("Olá <mundo>"),
        ];
        assert_eq!(as_html(&blocks), "<h2>Título</h2><p>Olá &lt;mundo&gt;</p>");
    }

    #[test]
    fn test_spans() {
        let b = block(json!({
            "type": "paragraph",
            "text": "Leia a documentação agora",
            "spans": [
                {"start": 0, "end": 4, "type": "strong"},
                {"start": 7, "end": 19, "type": "hyperlink", "data": {"url": "https://docs.rs"}}
            ]
        }));
        assert_eq!(
            as_html(&[b]),
            r#"<p><strong>Leia</strong> a <a href="https://docs.rs" target="_blank" rel="noopener">documentação</a> agora</p>"#
        );
    }

    #[test]
    fn test_nested_spans() {
        let b = block(json!({
            "type": "paragraph",
            "text": "abcdef",
            "spans": [
                {"start": 0, "end": 6, "type": "strong"},
                {"start": 2, "end": 4, "type": "em"}
            ]
        }));
        assert_eq!(as_html(&[b]), "<p><strong>ab<em>cd</em>ef</strong></p>");
    }

    #[test]
    fn test_crossing_spans() {
        let b = block(json!({
            "type": "paragraph",
            "text": "abcdef",
            "spans": [
                {"start": 0, "end": 4, "type": "strong"},
                {"start": 2, "end": 6, "type": "em"}
            ]
        }));
        assert_eq!(
            as_html(&[b]),
            "<p><strong>ab<em>cd</em></strong><em>ef</em></p>"
        );
    }

    #[test]
    fn test_span_ending_under_two_open_spans() {
        let b = block(json!({
            "type": "paragraph",
            "text": "abcdefgh",
            "spans": [
                {"start": 0, "end": 3, "type": "strong"},
                {"start": 1, "end": 6, "type": "em"},
                {"start": 2, "end": 8, "type": "label"}
            ]
        }));
        assert_eq!(
            as_html(&[b]),
            concat!(
                r#"<p><strong>a<em>b<span class="label">c</span></em></strong>"#,
                r#"<em><span class="label">def</span></em><span class="label">gh</span></p>"#
            )
        );
    }

    #[test]
    fn test_unsafe_link_schemes() {
        let link = |url: &str| {
            block(json!({
                "type": "paragraph",
                "text": "x",
                "spans": [{"start": 0, "end": 1, "type": "hyperlink", "data": {"url": url}}]
            }))
        };
        assert_eq!(
            as_html(&[link("javascript:alert(1)")]),
            r##"<p><a href="#">x</a></p>"##
        );
        assert_eq!(
            as_html(&[link(" JavaScript:alert(1)")]),
            r##"<p><a href="#">x</a></p>"##
        );
        assert_eq!(
            as_html(&[link("mailto:a@b.com")]),
            r#"<p><a href="mailto:a@b.com">x</a></p>"#
        );
        assert_eq!(
            as_html(&[link("/post/outro/")]),
            r#"<p><a href="/post/outro/">x</a></p>"#
        );
        assert_eq!(safe_href("data:text/html,x"), "#");
        assert_eq!(safe_href("post?a=b:c"), "post?a=b:c");
    }

    #[test]
    fn test_list_grouping() {
        let blocks = vec![
            block(json!({"type": "list-item", "text": "um"})),
            block(json!({"type": "list-item", "text": "dois"})),
            block(json!({"type": "o-list-item", "text": "três"})),
            RichTextBlock::paragraph("fim"),
        ];
        assert_eq!(
            as_html(&blocks),
            "<ul><li>um</li><li>dois</li></ul><ol><li>três</li></ol><p>fim</p>"
        );
    }

    #[test]
    fn test_image_and_embed() {
        let blocks = vec![
            block(json!({"type": "image", "url": "https://img/x.png", "alt": "x \"y\""})),
            block(json!({"type": "embed", "oembed": {"html": "<iframe></iframe>"}})),
        ];
        assert_eq!(
            as_html(&blocks),
            r#"<p class="block-img"><img src="https://img/x.png" alt="x &quot;y&quot;"></p><div class="embed"><iframe></iframe></div>"#
        );
    }

    #[test]
    fn test_line_breaks_and_as_text() {
        let blocks = vec![
            RichTextBlock::paragraph("linha um\nlinha dois"),
            RichTextBlock::paragraph("fim"),
        ];
        assert_eq!(as_html(&blocks[..1]), "<p>linha um<br />linha dois</p>");
        assert_eq!(as_text(&blocks), "linha um\nlinha dois fim");
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("heading3"), Some(3));
        assert_eq!(heading_level("heading9"), None);
        assert_eq!(heading_level("paragraph"), None);
    }
}
