//! Raw document shapes as returned by the content API
//!
//! These types are deliberately loose: text fields may arrive either as a
//! plain string or as a rich-text run array depending on how the field is
//! configured on the CMS side, and unknown keys are kept around.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One block of a rich-text field (paragraph, heading, list item, image...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichTextBlock {
    /// Block type, e.g. `paragraph`, `heading2`, `list-item`
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Plain text of the block
    #[serde(default)]
    pub text: String,

    /// Formatting marks over `text`
    #[serde(default)]
    pub spans: Vec<SpanMark>,

    /// Anything else the CMS attached (image url, embed html, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RichTextBlock {
    /// Create a paragraph block with no formatting
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: "paragraph".to_string(),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a heading block of the given level
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self {
            kind: format!("heading{}", level),
            text: text.into(),
            ..Default::default()
        }
    }
}

/// A formatting mark over a character range of a block's text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanMark {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A textual field that may be a run array, a plain string, or something else
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    Runs(Vec<RichTextBlock>),
    Plain(String),
    Other(Value),
}

impl Default for TextField {
    fn default() -> Self {
        TextField::Other(Value::Null)
    }
}

impl From<&str> for TextField {
    fn from(s: &str) -> Self {
        TextField::Plain(s.to_string())
    }
}

/// Image field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBanner {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// One entry of the `content` group field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawContentBlock {
    #[serde(default)]
    pub heading: TextField,
    #[serde(default)]
    pub body: Vec<RichTextBlock>,
}

/// The `data` record of a post document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentData {
    #[serde(default)]
    pub title: TextField,
    #[serde(default)]
    pub subtitle: TextField,
    #[serde(default)]
    pub author: TextField,
    #[serde(default)]
    pub banner: Option<RawBanner>,
    #[serde(default)]
    pub content: Vec<RawContentBlock>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A document as delivered by the content API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub last_publication_date: Option<String>,
    #[serde(default)]
    pub data: DocumentData,
}

/// One page of a paginated search response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results_per_page: u32,
    #[serde(default)]
    pub total_results_size: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub prev_page: Option<String>,
    #[serde(default)]
    pub results: Vec<RawDocument>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_shapes() {
        let runs: TextField =
            serde_json::from_str(r#"[{"type":"heading1","text":"Hello","spans":[]}]"#).unwrap();
        assert!(matches!(runs, TextField::Runs(ref r) if r[0].text == "Hello"));

        let plain: TextField = serde_json::from_str(r#""Hello""#).unwrap();
        assert_eq!(plain, TextField::Plain("Hello".to_string()));

        let empty: TextField = serde_json::from_str("[]").unwrap();
        assert_eq!(empty, TextField::Runs(Vec::new()));

        let number: TextField = serde_json::from_str("42").unwrap();
        assert_eq!(number, TextField::Other(Value::from(42)));
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "page": 1,
            "results_per_page": 1,
            "total_results_size": 2,
            "total_pages": 2,
            "next_page": "https://repo.cdn.prismic.io/api/v2/documents/search?page=2&pageSize=1",
            "prev_page": null,
            "results": [{
                "id": "YF0xyz",
                "uid": "como-utilizar-hooks",
                "type": "posts",
                "first_publication_date": "2021-03-15T19:25:28+0000",
                "data": {
                    "title": [{"type": "heading1", "text": "Como utilizar Hooks", "spans": []}],
                    "subtitle": "Pensando em sincronização",
                    "author": [{"type": "paragraph", "text": "Joseph Oliveira", "spans": []}],
                    "banner": {"url": "https://images.prismic.io/banner.png", "alt": null},
                    "content": [{
                        "heading": [{"type": "heading2", "text": "Proin et varius", "spans": []}],
                        "body": [{"type": "paragraph", "text": "Nullam dolor sapien", "spans": [
                            {"start": 0, "end": 6, "type": "strong"}
                        ]}]
                    }],
                    "slug_hint": "hooks"
                }
            }]
        }"#;
        let page: RawPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_pages, 2);
        assert!(page.next_page.is_some());

        let doc = &page.results[0];
        assert_eq!(doc.uid.as_deref(), Some("como-utilizar-hooks"));
        assert_eq!(doc.data.subtitle, TextField::from("Pensando em sincronização"));
        assert_eq!(doc.data.content[0].body[0].spans[0].kind, "strong");
        assert!(doc.data.extra.contains_key("slug_hint"));
    }

    #[test]
    fn test_missing_fields_default() {
        let doc: RawDocument = serde_json::from_str(r#"{"uid": "x", "data": {}}"#).unwrap();
        assert_eq!(doc.data.title, TextField::Other(Value::Null));
        assert!(doc.data.banner.is_none());
        assert!(doc.data.content.is_empty());
    }
}
