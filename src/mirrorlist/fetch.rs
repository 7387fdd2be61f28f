// src/mirrorlist/fetch.rs
// =============================================================================
// Requests the mirror list and turns the response into MirrorLines.
//
// Steps:
// 1. Build `<base url>?<query>` from the FetchConfig
// 2. Send a single GET (no retries, default redirect handling)
// 3. Refuse anything that isn't exactly `Content-Type: text/plain`
// 4. Read the body lazily, line by line, uncommenting the servers
//
// The fetcher holds no state besides the HTTP client and the base URL, so one
// instance can serve any number of requests, including concurrent ones.
//
// Rust concepts:
// - async fn: the request and the body reads are the only waiting points
// - Builder pattern: optional timeout on the reqwest client
// =============================================================================

use futures::stream::{self, Stream};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

use super::config::FetchConfig;
use super::lines::{collect_mirror_lines, split_lines, MirrorLines};
use super::query::build_query;
use crate::error::FetchError;

/// Where Arch Linux publishes its generated mirror list
pub const ARCHLINUX_MIRRORLIST_URL: &str = "https://www.archlinux.org/mirrorlist/";

/// The only content type we accept from the endpoint
const EXPECTED_CONTENT_TYPE: &str = "text/plain";

#[derive(Debug, Clone)]
pub struct MirrorListFetcher {
    client: Client,
    base_url: Url,
}

impl MirrorListFetcher {
    pub fn builder() -> MirrorListFetcherBuilder {
        MirrorListFetcherBuilder::default()
    }

    /// Full request URL for `config`.
    ///
    /// Plain string concatenation: the query is appended verbatim.
    pub fn request_url(&self, config: &FetchConfig) -> String {
        format!("{}?{}", self.base_url, build_query(config))
    }

    /// Fetches and processes the mirror list for `config`.
    ///
    /// A read error in the middle of the body is not an error here: the lines
    /// read so far are returned and `MirrorLines::termination()` says what
    /// happened. Use `MirrorLines::into_complete()` to reject partial lists.
    pub async fn fetch(&self, config: &FetchConfig) -> Result<MirrorLines, FetchError> {
        let url = self.request_url(config);
        log::debug!("Requesting {}", url);

        let response = self.client.get(&url).send().await?;
        log::debug!("HTTP {} from {}", response.status().as_u16(), response.url());

        check_content_type(&response)?;

        let lines = collect_mirror_lines(split_lines(body_chunks(response))).await;
        log::debug!("Read {} line(s)", lines.len());
        Ok(lines)
    }
}

// Configuration for building a MirrorListFetcher
#[derive(Debug, Clone, Default)]
pub struct MirrorListFetcherBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl MirrorListFetcherBuilder {
    /// Use a different endpoint than the official one
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Give up on requests that take longer than this (default: wait forever)
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<MirrorListFetcher, FetchError> {
        let base_url = self
            .base_url
            .as_deref()
            .unwrap_or(ARCHLINUX_MIRRORLIST_URL);
        let parsed = Url::parse(base_url)
            .map_err(|e| FetchError::InvalidBaseUrl(format!("'{}': {}", base_url, e)))?;
        // The query string is appended as `?<query>`, so the base can't carry one
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(FetchError::InvalidBaseUrl(format!(
                "'{}': must not contain a query or fragment",
                base_url
            )));
        }
        let base_url = parsed;

        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(MirrorListFetcher { client, base_url })
    }
}

// Compares the raw header value; `text/plain; charset=utf-8` is rejected too
fn check_content_type(response: &Response) -> Result<(), FetchError> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default();

    if content_type != EXPECTED_CONTENT_TYPE {
        return Err(FetchError::UnexpectedContentType(content_type));
    }
    Ok(())
}

// Body as a stream of chunks, pulled only when the line stream needs more
fn body_chunks(response: Response) -> impl Stream<Item = Result<impl AsRef<[u8]>, reqwest::Error>> {
    stream::unfold(Some(response), |response| async move {
        let mut response = response?;
        match response.chunk().await {
            Ok(Some(chunk)) => Some((Ok(chunk), Some(response))),
            Ok(None) => None,
            // Nothing more will be read after an error
            Err(e) => Some((Err(e), None)),
        }
    })
}
