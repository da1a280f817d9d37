//! HTTP client wrapper for metadata requests.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, trace};

use crate::error::MetadataError;

/// Default timeout for metadata requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default metadata service base URL (link-local address).
pub const DEFAULT_BASE_URL: &str = "http://169.254.169.254";

/// Bearer token every metadata request must carry.
const AUTHORIZATION_VALUE: &str = "Bearer Oracle";

/// HTTP client wrapper for metadata service requests.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    inner: Client,
    base_url: String,
    max_size: Option<usize>,
}

impl MetadataClient {
    /// Create a new metadata client with the specified timeout and base URL.
    pub fn new(timeout: Duration, base_url: &str) -> Result<Self, reqwest::Error> {
        let inner = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_size: None,
        })
    }

    /// Create a new metadata client with the default timeout and base URL.
    pub fn with_default_timeout() -> Result<Self, reqwest::Error> {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_BASE_URL)
    }

    /// Create a new metadata client with a custom base URL (for testing).
    pub fn with_base_url(base_url: &str) -> Result<Self, reqwest::Error> {
        Self::new(DEFAULT_TIMEOUT, base_url)
    }

    /// Set the maximum size accepted for any response body.
    pub fn with_max_size(mut self, max_size: Option<usize>) -> Self {
        self.max_size = max_size;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the response size limit, if any.
    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    /// Build an absolute URL for a service path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue an authorized GET against `url`.
    ///
    /// Any status is returned as-is; only construction and transport
    /// failures are errors here.
    pub async fn get(&self, url: &str) -> Result<Response, MetadataError> {
        let request = self
            .inner
            .get(url)
            .header(AUTHORIZATION, AUTHORIZATION_VALUE)
            .build()
            .map_err(|source| MetadataError::Request {
                url: url.to_string(),
                source,
            })?;

        trace!(%url, "querying metadata service");
        self.inner
            .execute(request)
            .await
            .map_err(|source| MetadataError::Transport {
                url: url.to_string(),
                source,
            })
    }

    /// Issue an authorized GET and require a 200 reply.
    pub async fn get_ok(&self, url: &str) -> Result<Response, MetadataError> {
        let response = self.get(url).await?;
        ensure_ok(url, response)
    }

    /// Query `primary`, falling back once to `fallback` if the primary
    /// replies with anything other than 200.
    ///
    /// A transport failure on the primary is returned immediately.
    pub async fn get_with_fallback(
        &self,
        primary: &str,
        fallback: &str,
    ) -> Result<Response, MetadataError> {
        let response = self.get(primary).await?;
        if response.status() == StatusCode::OK {
            return Ok(response);
        }

        debug!(
            url = %primary,
            status = %response.status(),
            "metadata endpoint unavailable, falling back"
        );
        self.get_ok(fallback).await
    }

    /// Read a response body, honoring the configured size limit.
    pub async fn read_body(&self, url: &str, response: Response) -> Result<Vec<u8>, MetadataError> {
        read_body_limited(url, response, self.max_size).await
    }
}

fn ensure_ok(url: &str, response: Response) -> Result<Response, MetadataError> {
    if response.status() == StatusCode::OK {
        Ok(response)
    } else {
        Err(MetadataError::Status {
            url: url.to_string(),
            status: response.status().to_string(),
        })
    }
}

/// Read response body with an optional size limit.
///
/// If `max_size` is `Some`, this will:
/// 1. Check the `Content-Length` header and fail early if it exceeds the limit
/// 2. Read the body with a pre-allocated capped buffer, aborting immediately if exceeded
pub async fn read_body_limited(
    url: &str,
    response: Response,
    max_size: Option<usize>,
) -> Result<Vec<u8>, MetadataError> {
    let body_error = |source| MetadataError::Body {
        url: url.to_string(),
        source,
    };

    let Some(max_size) = max_size else {
        return Ok(response.bytes().await.map_err(body_error)?.to_vec());
    };

    if let Some(content_length) = response.content_length() {
        if content_length as usize > max_size {
            return Err(MetadataError::TooLarge(content_length as usize, max_size));
        }
    }

    let capacity = response
        .content_length()
        .map(|cl| (cl as usize).min(max_size))
        .unwrap_or(max_size.min(8192));
    let mut body = Vec::with_capacity(capacity);
    let mut total_read = 0usize;

    let mut stream = response;
    while let Some(chunk) = stream.chunk().await.map_err(body_error)? {
        if total_read.saturating_add(chunk.len()) > max_size {
            return Err(MetadataError::TooLarge(
                total_read.saturating_add(chunk.len()),
                max_size,
            ));
        }
        total_read += chunk.len();
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}
