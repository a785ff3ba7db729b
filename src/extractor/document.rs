//! Query capabilities the extractor needs from a parsed HTML document.
//!
//! Signal extraction is written against [`DocumentHandle`] so the HTML library
//! stays swappable; [`HtmlDocument`] is the `scraper`-backed implementation.

use scraper::{ElementRef, Html, Node, Selector};
use tracing::warn;

pub trait DocumentHandle {
    type Element<'a>: Copy
    where
        Self: 'a;

    /// All elements matching a CSS selector, in document order.
    fn select_all<'a>(&'a self, selector: &str) -> Vec<Self::Element<'a>>;

    fn select_first<'a>(&'a self, selector: &str) -> Option<Self::Element<'a>> {
        self.select_all(selector).into_iter().next()
    }

    /// Lower-case tag name, e.g. `h2`.
    fn tag_name<'a>(&'a self, element: Self::Element<'a>) -> String;

    /// Concatenated text of every descendant text node.
    fn text<'a>(&'a self, element: Self::Element<'a>) -> String;

    /// Text of the element with the subtrees of `skip_tags` left out. Text nodes
    /// are separated by a single space.
    fn text_excluding<'a>(&'a self, element: Self::Element<'a>, skip_tags: &[&str]) -> String;

    fn attribute<'a>(&'a self, element: Self::Element<'a>, name: &str) -> Option<String>;
}

pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }
}

impl DocumentHandle for HtmlDocument {
    type Element<'a> = ElementRef<'a>;

    fn select_all<'a>(&'a self, selector: &str) -> Vec<ElementRef<'a>> {
        match Selector::parse(selector) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(e) => {
                warn!(selector, error = %e, "invalid css selector");
                Vec::new()
            }
        }
    }

    fn tag_name<'a>(&'a self, element: ElementRef<'a>) -> String {
        element.value().name().to_ascii_lowercase()
    }

    fn text<'a>(&'a self, element: ElementRef<'a>) -> String {
        element.text().collect()
    }

    fn text_excluding<'a>(&'a self, element: ElementRef<'a>, skip_tags: &[&str]) -> String {
        let mut out = String::new();

        for node in element.descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };

            let skipped = node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != element.id())
                .any(|ancestor| match ancestor.value() {
                    Node::Element(el) => skip_tags
                        .iter()
                        .any(|tag| el.name().eq_ignore_ascii_case(tag)),
                    _ => false,
                });

            if !skipped {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(text);
            }
        }

        out
    }

    fn attribute<'a>(&'a self, element: ElementRef<'a>, name: &str) -> Option<String> {
        element.value().attr(name).map(str::to_string)
    }
}
