//! HTTP client for the verse service.
//!
//! Endpoints:
//! - `GET /get-random-verse/{translation}/`
//! - `GET /get-verse/{translation}/{book}/{chapter}/{verse}/`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use tracing::{debug, instrument};
use url::Url;

use super::{FetchedVerse, SourceError, VerseLookup, VerseSource};
use crate::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use crate::user_agent;

/// Verse service client.
///
/// Create once and reuse; the inner reqwest client pools connections.
#[derive(Debug, Clone)]
pub struct BollsClient {
    client: Client,
    base_url: Url,
    host: String,
}

impl BollsClient {
    /// Creates a client for `base_url` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidUrl`] if the base URL is not an absolute
    /// http(s) URL, or [`SourceError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        Self::with_timeouts(base_url, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Same as [`BollsClient::new`].
    #[instrument(level = "debug")]
    pub fn with_timeouts(
        base_url: &str,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, SourceError> {
        let parsed = Url::parse(base_url).map_err(|_| SourceError::invalid_url(base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(SourceError::invalid_url(base_url));
        }
        let host = parsed
            .host_str()
            .ok_or_else(|| SourceError::invalid_url(base_url))?
            .to_ascii_lowercase();

        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .user_agent(user_agent::default_user_agent())
            .gzip(true)
            .build()
            .map_err(|source| SourceError::network(base_url, source))?;

        debug!(%host, connect_timeout_secs, read_timeout_secs, "created verse service client");

        Ok(Self {
            client,
            base_url: parsed,
            host,
        })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `{base}/{segments..}/` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<String, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SourceError::invalid_url(self.base_url.as_str()))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url.into())
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, SourceError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|source| SourceError::network(url, source))
    }

    async fn decode(url: &str, response: reqwest::Response) -> Result<FetchedVerse, SourceError> {
        let body = response
            .text()
            .await
            .map_err(|source| SourceError::network(url, source))?;
        serde_json::from_str(&body).map_err(|error| SourceError::decode(url, error.to_string()))
    }
}

#[async_trait]
impl VerseSource for BollsClient {
    #[instrument(skip(self))]
    async fn random_verse(&self, translation: &str) -> Result<FetchedVerse, SourceError> {
        let url = self.endpoint(&["get-random-verse", translation])?;
        let response = self.get(&url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::http_status(url, status.as_u16()));
        }
        Self::decode(&url, response).await
    }

    #[instrument(skip(self))]
    async fn verse(
        &self,
        translation: &str,
        book: u32,
        chapter: u32,
        verse: u32,
    ) -> Result<VerseLookup, SourceError> {
        let book = book.to_string();
        let chapter = chapter.to_string();
        let verse = verse.to_string();
        let url = self.endpoint(&["get-verse", translation, &book, &chapter, &verse])?;

        let response = self.get(&url).await?;
        let status = response.status();
        if !status.is_success() {
            debug!(%url, status = status.as_u16(), "verse not found");
            return Ok(VerseLookup::NotFound);
        }
        Ok(VerseLookup::Found(Self::decode(&url, response).await?))
    }

    fn host(&self) -> &str {
        &self.host
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_base_urls() {
        assert!(matches!(
            BollsClient::new("not a url"),
            Err(SourceError::InvalidUrl { .. })
        ));
        assert!(matches!(
            BollsClient::new("ftp://bolls.life"),
            Err(SourceError::InvalidUrl { .. })
        ));
        assert!(matches!(
            BollsClient::new("mailto:someone@example.com"),
            Err(SourceError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_host_is_lowercased() {
        let client = BollsClient::new("https://Bolls.LIFE").unwrap();
        assert_eq!(client.host(), "bolls.life");
    }

    #[test]
    fn test_endpoint_builds_trailing_slash_paths() {
        let client = BollsClient::new("https://bolls.life").unwrap();
        assert_eq!(
            client.endpoint(&["get-verse", "KJV", "43", "3", "16"]).unwrap(),
            "https://bolls.life/get-verse/KJV/43/3/16/"
        );
        assert_eq!(
            client.endpoint(&["get-random-verse", "WEB"]).unwrap(),
            "https://bolls.life/get-random-verse/WEB/"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let client = BollsClient::new("http://localhost:8080/api/").unwrap();
        assert_eq!(
            client.endpoint(&["get-random-verse", "WEB"]).unwrap(),
            "http://localhost:8080/api/get-random-verse/WEB/"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = BollsClient::new("https://bolls.life").unwrap();
        let url = client.endpoint(&["get-random-verse", "A/B"]).unwrap();
        assert_eq!(url, "https://bolls.life/get-random-verse/A%2FB/");
    }
}
