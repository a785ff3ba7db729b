use std::fs;
use url::Url;

use crate::extractor::{HeaderLevel, extract_html};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

#[test]
fn test_extract_product_page() {
    let url = Url::parse("https://acme.com/product").unwrap();
    let page = extract_html(&fixture("product.html"), &url);
    let signals = &page.signals;

    assert_eq!(signals.url, "https://acme.com/product");
    assert_eq!(
        signals.title,
        "Acme Retail Fixtures | Supermarket Shelving and Checkout Equipment"
    );
    assert!(signals.meta_description.starts_with("Acme designs supermarket equipment"));

    let levels: Vec<HeaderLevel> = signals.headers.iter().map(|h| h.level).collect();
    assert_eq!(levels, vec![HeaderLevel::H1, HeaderLevel::H2, HeaderLevel::H3]);
    assert_eq!(signals.headers[0].text, "Supermarket Equipment Built to Last");

    assert!(signals.body_text.contains("supermarket equipment built to last"));
    assert!(signals.body_text.contains("checkout equipment keeps queues moving."));
    assert!(!signals.body_text.contains("sku-1234"));
    assert!(!signals.body_text.contains("enable javascript"));
    assert!(!signals.body_text.contains("datalayer"));
    assert_eq!(signals.body_text, signals.body_text.to_lowercase());
    assert!(!signals.body_text.contains("  "));

    assert_eq!(signals.structured_data.len(), 1);
    assert_eq!(signals.structured_data[0]["@type"], "Organization");

    let about: Vec<String> = page.about_links.iter().map(|u| u.to_string()).collect();
    assert_eq!(about, vec!["https://acme.com/about"]);
}

#[test]
fn test_broken_structured_data_is_skipped() {
    let url = Url::parse("https://example.com/broken").unwrap();
    let signals = extract_html(&fixture("broken_jsonld.html"), &url).signals;

    assert_eq!(signals.title, "Broken Structured Data");
    assert_eq!(signals.meta_description, "A page whose first JSON-LD block is malformed.");
    assert_eq!(signals.headers.len(), 1);
    assert!(signals.body_text.contains("body text survives"));
    assert_eq!(signals.structured_data.len(), 1);
    assert_eq!(signals.structured_data[0]["@type"], "BreadcrumbList");
}

#[test]
fn test_empty_page_yields_empty_signals() {
    let url = Url::parse("https://example.com/empty").unwrap();
    let page = extract_html(&fixture("empty.html"), &url);

    assert_eq!(page.signals.title, "");
    assert_eq!(page.signals.meta_description, "");
    assert!(page.signals.headers.is_empty());
    assert_eq!(page.signals.body_text, "");
    assert!(page.signals.structured_data.is_empty());
    assert!(page.about_links.is_empty());
}

mod fuzz {
    use super::*;
    use crate::extractor::model::BODY_TEXT_MAX_CHARS;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(
            html in ".*",
            url in "https://[a-z]+\\.com/[a-z]*"
        ) {
            let url = Url::parse(&url).unwrap();
            let page = extract_html(&html, &url);
            prop_assert!(page.signals.body_text.chars().count() <= BODY_TEXT_MAX_CHARS);
            prop_assert!(!page.signals.title.contains("  "));
        }

        #[test]
        fn test_about_links_stay_on_site(path in "[a-z/]{0,20}") {
            let html = format!(r#"<a href="/about{path}">a</a><a href="https://other.com/about">b</a>"#);
            let url = Url::parse("https://acme.com/").unwrap();
            for link in extract_html(&html, &url).about_links {
                prop_assert_eq!(link.host_str(), Some("acme.com"));
            }
        }
    }
}
