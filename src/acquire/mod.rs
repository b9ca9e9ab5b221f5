//! Getting a raw recipe record out of a web page.
//!
//! Nothing in the conversion core depends on this module; it only produces
//! the `serde_json::Value` that [`crate::PestoConverter`] consumes.

mod fetcher;
mod json_ld;

pub use fetcher::RequestFetcher;
pub use json_ld::JsonLdExtractor;

use crate::config::FetchConfig;
use crate::error::PestoError;
use scraper::Html;
use serde_json::Value;

/// Fetch `url` and extract the first schema.org recipe found in its JSON-LD.
pub async fn fetch_record(url: &str, config: &FetchConfig) -> Result<Value, PestoError> {
    let fetcher = RequestFetcher::new(config)?;
    let html = fetcher.fetch(url).await?;
    let document = Html::parse_document(&html);
    JsonLdExtractor.extract(&document)
}
