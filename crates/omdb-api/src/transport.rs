//! HTTP transport seam and the reqwest-backed implementation.
#![allow(clippy::future_not_send)]

use anyhow::{Context, Result};
use reqwest::Client;
use url::Url;

use crate::params::RequestOptions;

/// Bytes of the body echoed at trace level.
const BODY_PREVIEW_LEN: usize = 500;

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, undecoded.
    pub body: Vec<u8>,
}

/// Issues a single GET and returns the raw status and body.
///
/// Abstracts the network for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    /// Performs a GET request to `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange cannot complete (connection, DNS,
    /// timeout, or body read failure). Non-200 statuses are not errors here.
    async fn get(&self, url: &Url, options: &RequestOptions) -> Result<RawResponse>;
}

/// Default transport over `reqwest`.
///
/// Idle connections are not kept, so every request is a standalone exchange.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// HTTP client (gzip enabled, no idle pool).
    http_client: Client,
}

impl ReqwestTransport {
    /// Creates a transport sending the given User-Agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the `reqwest::Client` cannot be built.
    pub fn new(user_agent: &str) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .pool_max_idle_per_host(0)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { http_client })
    }
}

impl LocalTransport for ReqwestTransport {
    async fn get(&self, url: &Url, options: &RequestOptions) -> Result<RawResponse> {
        // Error messages must not echo the URL: it carries the access key.
        let response = self
            .http_client
            .get(url.clone())
            .timeout(options.timeout)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status().as_u16();
        // Raw bytes: decoding is left to the JSON parser so invalid UTF-8 is rejected.
        let body = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)?
            .to_vec();

        tracing::debug!(status, body_len = body.len(), "OMDb response received");
        let preview = body.get(..BODY_PREVIEW_LEN).unwrap_or(body.as_slice());
        tracing::trace!(
            body_preview = %String::from_utf8_lossy(preview),
            "OMDb response body preview"
        );

        Ok(RawResponse { status, body })
    }
}
