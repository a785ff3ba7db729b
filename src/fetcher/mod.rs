//! HTML page fetching: one shared reqwest client with timeouts, a redirect
//! cap, a body-size cap and charset-aware decoding.

pub mod client;
pub mod decode;
pub mod errors;
pub mod types;

pub use client::Fetcher;
pub use errors::FetchError;
pub use types::{Charset, CharsetSource, FetchSettings, PageResponse};
