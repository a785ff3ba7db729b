//! Charset detection and decoding of fetched bodies.

use bytes::Bytes;
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

use crate::fetcher::types::{Charset, CharsetSource, PageResponse};

/// How far into the body to look for a `<meta>` charset declaration.
const META_SNIFF_BYTES: usize = 4096;

static HEADER_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

/// Matches both `<meta charset=..>` and the http-equiv form, whose `content`
/// attribute carries `charset=..`.
static META_CHARSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s[^>]*?charset\s*=\s*["']?([A-Za-z0-9_\-:.]+)"#).unwrap()
});

pub fn decode_response(
    url_final: Url,
    status: StatusCode,
    body: Bytes,
    content_type: &str,
) -> PageResponse {
    let charset = detect_charset(content_type, &body);
    let (decoded, _, had_errors) = charset.encoding.decode(&body);
    if had_errors {
        warn!(
            url = %url_final,
            charset = charset.name(),
            "Body contained bytes invalid for its charset; replaced them"
        );
    }

    PageResponse {
        url_final,
        status,
        body_utf8: decoded.into_owned(),
        charset,
        fetched_at: Utc::now(),
    }
}

/// Content-Type header first, then a `<meta>` declaration near the top of the
/// body, then statistical detection.
pub fn detect_charset(content_type: &str, body: &[u8]) -> Charset {
    if let Some(encoding) = Encoding::for_bom(body).map(|(encoding, _)| encoding) {
        return Charset::new(encoding, CharsetSource::Bom);
    }
    if let Some(encoding) = label_encoding(&HEADER_CHARSET_REGEX, content_type) {
        return Charset::new(encoding, CharsetSource::Header);
    }

    let head = &body[..body.len().min(META_SNIFF_BYTES)];
    if let Some(encoding) = label_encoding(&META_CHARSET_REGEX, &String::from_utf8_lossy(head)) {
        return Charset::new(encoding, CharsetSource::Meta);
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(head, head.len() == body.len());
    Charset::new(detector.guess(None, true), CharsetSource::Detected)
}

fn label_encoding(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = regex.captures(haystack)?.get(1)?.as_str();
    Encoding::for_label(label.trim().as_bytes())
}
