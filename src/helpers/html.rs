//! HTML helper functions

/// Append one character to `out`, escaping HTML-special characters
pub fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

/// Escape text for use in HTML content or a quoted attribute
///
/// # Examples
/// ```ignore
/// escape_html(r#"<a href="x">"#) // -> "&lt;a href=&quot;x&quot;&gt;"
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        push_escaped(&mut out, c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(
            escape_html("https://images.prismic.io/a.png?w=10"),
            "https://images.prismic.io/a.png?w=10"
        );
    }
}
