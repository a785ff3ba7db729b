pub mod cleaner;
pub mod document;
pub mod links;
pub mod model;
pub mod reader;
pub mod structured;

#[cfg(test)]
mod tests;

pub use document::{DocumentHandle, HtmlDocument};
pub use model::{ExtractedPage, Header, HeaderLevel, PageSignals};
pub use structured::StructuredDataParseError;

use tracing::warn;
use url::Url;

use crate::fetcher::types::PageResponse;

pub fn extract(resp: &PageResponse) -> ExtractedPage {
    extract_html(&resp.body_utf8, &resp.url_final)
}

pub fn extract_html(html: &str, url: &Url) -> ExtractedPage {
    let doc = HtmlDocument::parse(html);

    let (structured_data, errors) = structured::extract_structured_data(&doc);
    for error in &errors {
        warn!(url = %url, index = error.index, error = %error.message, "skipping unparsable JSON-LD block");
    }

    let signals = PageSignals {
        url: url.to_string(),
        title: reader::extract_title(&doc),
        meta_description: reader::extract_meta_description(&doc),
        headers: reader::extract_headers(&doc),
        body_text: cleaner::extract_body_text(&doc),
        structured_data,
    };

    ExtractedPage {
        signals,
        about_links: links::discover_about_links(&doc, url),
    }
}
