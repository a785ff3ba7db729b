#![no_main]

use libfuzzer_sys::fuzz_target;
use url::Url;

use seolens::analysis::density::compute_keyword_density;
use seolens::extractor::extract_html;

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);
    let base = Url::parse("https://example.com/").unwrap();

    // Extraction must never panic, and its output must respect the body bound.
    let page = extract_html(&html, &base);
    assert!(page.signals.body_text.chars().count() <= seolens::extractor::model::BODY_TEXT_MAX_CHARS);
    for link in &page.about_links {
        assert_eq!(link.host_str(), Some("example.com"));
    }

    let keywords: Vec<String> = page
        .signals
        .body_text
        .split_whitespace()
        .take(5)
        .map(str::to_string)
        .collect();
    for entry in compute_keyword_density(&keywords, &page.signals.body_text) {
        assert!((0.0..=100.0).contains(&entry.density_as_percent));
    }
});
