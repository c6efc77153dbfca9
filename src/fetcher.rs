use crate::config::CaptureConfig;
use crate::metadata::Metadata;
use crate::naming;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("response body is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}

/// A fetched page on its way through the capture pipeline.
///
/// The parsed document is carried alongside the raw text so the image
/// localizer can rewrite references before the page is persisted.
pub struct PageCapture {
    /// URL as supplied by the caller
    pub url: String,

    /// URL actually requested, after scheme defaulting
    pub normalized_url: String,

    /// Document text to persist
    pub text: String,

    /// Parsed element tree
    pub document: Html,

    /// Metadata extracted at fetch time
    pub metadata: Metadata,
}

/// HTTP fetcher for pages and their embedded assets
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// Build a fetcher from the capture configuration
    pub fn new(config: &CaptureConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch a page and extract its metadata.
    ///
    /// The body is decoded strictly as UTF-8; a non-success HTTP status or a
    /// decode problem fails the whole fetch. `fetch_date` is taken from the
    /// response `Date` header, falling back to the capture-time clock when
    /// the server did not send one.
    pub async fn fetch(&self, url: &str) -> Result<PageCapture, FetchError> {
        let normalized_url = naming::with_scheme(url);
        ::log::debug!("GET {}", normalized_url);

        let response = self
            .client
            .get(&normalized_url)
            .send()
            .await?
            .error_for_status()?;

        let fetch_date = response
            .headers()
            .get(reqwest::header::DATE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
            .unwrap_or_else(|| chrono::Utc::now().to_rfc2822());

        let bytes = response.bytes().await?;
        let text = String::from_utf8(bytes.to_vec())?;

        let document = Html::parse_document(&text);
        let metadata = extract_metadata(&document, fetch_date);
        ::log::debug!(
            "Fetched {} ({} links, {} images)",
            url,
            metadata.links_count,
            metadata.images_count
        );

        Ok(PageCapture {
            url: url.to_string(),
            normalized_url,
            text,
            document,
            metadata,
        })
    }

    /// Fetch raw bytes, used for image downloads
    pub async fn download(&self, url: &Url) -> Result<Vec<u8>, reqwest::Error> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Count anchor and image elements in a parsed document
pub fn extract_metadata(document: &Html, fetch_date: String) -> Metadata {
    let anchors = Selector::parse("a").unwrap();
    let images = Selector::parse("img").unwrap();

    Metadata {
        fetch_date,
        links_count: document.select(&anchors).count(),
        images_count: document.select(&images).count(),
    }
}
