use url::Url;

use crate::extractor::document::DocumentHandle;

/// Same-site links whose href mentions "about", resolved against `base` and
/// deduplicated in first-seen order.
pub fn discover_about_links<D: DocumentHandle>(doc: &D, base: &Url) -> Vec<Url> {
    let mut links: Vec<Url> = Vec::new();

    for anchor in doc.select_all("a[href]") {
        let Some(href) = doc.attribute(anchor, "href") else {
            continue;
        };
        if !href.to_ascii_lowercase().contains("about") {
            continue;
        }
        let Ok(mut resolved) = base.join(href.trim()) else {
            continue;
        };
        resolved.set_fragment(None);

        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        if resolved.host_str() != base.host_str() || resolved == *base {
            continue;
        }
        if !links.contains(&resolved) {
            links.push(resolved);
        }
    }

    links
}
