use crate::extractor::{
    document::DocumentHandle,
    model::{Header, HeaderLevel, collapse_whitespace},
};

/// Text of the first `<title>`, or empty.
pub fn extract_title<D: DocumentHandle>(doc: &D) -> String {
    doc.select_first("title")
        .map(|el| collapse_whitespace(&doc.text(el)))
        .unwrap_or_default()
}

/// Every h1/h2/h3 in document order.
pub fn extract_headers<D: DocumentHandle>(doc: &D) -> Vec<Header> {
    doc.select_all("h1, h2, h3")
        .into_iter()
        .filter_map(|el| {
            let level = HeaderLevel::from_tag(&doc.tag_name(el))?;
            Some(Header {
                level,
                text: collapse_whitespace(&doc.text(el)),
            })
        })
        .collect()
}

/// `content` of `<meta name="description">`, or empty.
pub fn extract_meta_description<D: DocumentHandle>(doc: &D) -> String {
    doc.select_first(r#"meta[name="description"]"#)
        .and_then(|el| doc.attribute(el, "content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}
