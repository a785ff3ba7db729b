use crate::extractor::{document::DocumentHandle, model::normalize_body_text};

/// Subtrees that never contribute to body text.
pub const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "code", "pre"];

/// Normalized `<body>` text with non-content subtrees removed.
pub fn extract_body_text<D: DocumentHandle>(doc: &D) -> String {
    doc.select_first("body")
        .map(|body| normalize_body_text(&doc.text_excluding(body, NON_CONTENT_TAGS)))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::document::HtmlDocument;

    #[test]
    fn test_body_text_strips_non_content() {
        let doc = HtmlDocument::parse(
            r#"<html><head><style>h1{}</style></head><body>
                <h1>Store   EQUIPMENT</h1>
                <script>var tracking = 1;</script>
                <noscript>enable js</noscript>
                <p>Shelving and <b>Checkouts</b></p>
                <pre>raw block</pre><code>let x</code>
            </body></html>"#,
        );
        assert_eq!(
            extract_body_text(&doc),
            "store equipment shelving and checkouts"
        );
    }

    #[test]
    fn test_empty_body() {
        let doc = HtmlDocument::parse("<html><body>  </body></html>");
        assert_eq!(extract_body_text(&doc), "");
    }
}
