//! Book cover lookup against the Google Books volumes API.
//!
//! Only the first search result is considered. A result without image
//! metadata yields an empty URL; transport, status and decoding failures are
//! returned to the caller untouched.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};

pub const GOOGLE_BOOKS_API_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Resolves a cover thumbnail URL for a book title.
#[async_trait]
pub trait CoverLookup: Send + Sync {
    /// Returns the thumbnail URL, or an empty string if no cover was found.
    async fn cover_url(&self, title: &str) -> Result<String>;
}

#[derive(Debug, Default, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Default, Deserialize)]
struct Volume {
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
struct VolumeInfo {
    #[serde(rename = "imageLinks")]
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Default, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

impl VolumesResponse {
    fn first_thumbnail(self) -> String {
        self.items
            .into_iter()
            .next()
            .and_then(|volume| volume.volume_info.image_links)
            .and_then(|links| links.thumbnail)
            .unwrap_or_default()
    }
}

pub struct GoogleBooksClient {
    client: Client,
    base_url: Url,
}

impl GoogleBooksClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("library-catalog/1.0")
            .build()?;
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("Invalid cover API URL {:?}: {}", base_url, e)))?;
        Ok(Self { client, base_url })
    }

    fn query_url(&self, title: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("q", title);
        url
    }
}

#[async_trait]
impl CoverLookup for GoogleBooksClient {
    async fn cover_url(&self, title: &str) -> Result<String> {
        let response = self
            .client
            .get(self.query_url(title))
            .send()
            .await?
            .error_for_status()?;

        let volumes: VolumesResponse = response.json().await?;
        let thumbnail = volumes.first_thumbnail();
        if thumbnail.is_empty() {
            tracing::debug!("No cover found for {:?}", title);
        }
        Ok(thumbnail)
    }
}

/// Lookup used when covers are switched off; never touches the network.
pub struct DisabledCover;

#[async_trait]
impl CoverLookup for DisabledCover {
    async fn cover_url(&self, _title: &str) -> Result<String> {
        Ok(String::new())
    }
}

/// Always answers with the same URL. Used by tests.
#[cfg(test)]
pub struct FixedCover(pub String);

#[cfg(test)]
#[async_trait]
impl CoverLookup for FixedCover {
    async fn cover_url(&self, _title: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Fails every lookup the way an unreachable API does. Used by tests.
#[cfg(test)]
pub struct FailingCover;

#[cfg(test)]
#[async_trait]
impl CoverLookup for FailingCover {
    async fn cover_url(&self, _title: &str) -> Result<String> {
        // A URL reqwest cannot parse yields a real `reqwest::Error` without I/O
        let err = Client::new().get("not a url").build().unwrap_err();
        Err(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> String {
        serde_json::from_str::<VolumesResponse>(json)
            .unwrap()
            .first_thumbnail()
    }

    #[test]
    fn test_takes_thumbnail_of_first_item() {
        let json = r#"{"items": [
            {"volumeInfo": {"title": "Emma", "imageLinks": {"smallThumbnail": "http://s", "thumbnail": "http://t/1"}}},
            {"volumeInfo": {"imageLinks": {"thumbnail": "http://t/2"}}}
        ]}"#;
        assert_eq!(parse(json), "http://t/1");
    }

    #[test]
    fn test_missing_image_links_is_empty() {
        let json = r#"{"items": [
            {"volumeInfo": {"title": "Emma"}},
            {"volumeInfo": {"imageLinks": {"thumbnail": "http://t/2"}}}
        ]}"#;
        assert_eq!(parse(json), "");
    }

    #[test]
    fn test_no_items_is_empty() {
        assert_eq!(parse(r#"{"kind": "books#volumes", "totalItems": 0}"#), "");
    }

    #[test]
    fn test_title_is_query_encoded() {
        let client = GoogleBooksClient::new(GOOGLE_BOOKS_API_URL, Duration::from_secs(5)).unwrap();
        let url = client.query_url("Pride & Prejudice");
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/books/v1/volumes?q=Pride+%26+Prejudice"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        assert!(matches!(
            GoogleBooksClient::new("not a url", Duration::from_secs(5)),
            Err(AppError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_disabled_lookup_returns_empty() {
        assert_eq!(DisabledCover.cover_url("Emma").await.unwrap(), "");
    }
}
