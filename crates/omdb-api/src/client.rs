//! `OmdbClient` - OMDb API client implementation.

use std::fmt;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::api::LocalOmdbApi;
use crate::error::{OmdbError, OmdbResult};
use crate::params::{RequestOptions, SearchParams, TitleParams};
use crate::response::{DetailResult, SearchResult, normalize};
use crate::transport::{LocalTransport, ReqwestTransport};

/// Default query endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Default poster image endpoint.
pub const DEFAULT_IMG_URL: &str = "https://img.omdbapi.com/";

/// Validation message when a title lookup has no identifying field.
pub const MISSING_IDENTIFIER: &str = "Either title or id must be provided.";

/// Default User-Agent.
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Access key and endpoints. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Access key sent as `apikey`.
    apikey: String,
    /// Query endpoint.
    base_url: Url,
    /// Poster image endpoint.
    img_url: Url,
}

impl ClientConfig {
    /// Creates a config with the default endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if a default endpoint fails to parse.
    pub fn new(apikey: impl Into<String>) -> Result<Self> {
        Ok(Self {
            apikey: apikey.into(),
            base_url: Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?,
            img_url: Url::parse(DEFAULT_IMG_URL).context("invalid default image URL")?,
        })
    }

    /// Returns the access key.
    #[must_use]
    pub fn apikey(&self) -> &str {
        &self.apikey
    }

    /// Returns the query endpoint.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the poster image endpoint.
    #[must_use]
    pub const fn img_url(&self) -> &Url {
        &self.img_url
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("apikey", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("img_url", &self.img_url.as_str())
            .finish()
    }
}

/// OMDb API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClient<T = ReqwestTransport> {
    /// Access key and endpoints.
    config: ClientConfig,
    /// HTTP transport.
    transport: T,
}

/// Builder for `OmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClientBuilder {
    apikey: Option<String>,
    base_url: Option<Url>,
    img_url: Option<Url>,
    user_agent: Option<String>,
}

impl OmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            apikey: None,
            base_url: None,
            img_url: None,
            user_agent: None,
        }
    }

    /// Sets the access key (required).
    #[must_use]
    pub fn apikey(mut self, apikey: impl Into<String>) -> Self {
        self.apikey = Some(apikey.into());
        self
    }

    /// Overrides the query endpoint (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Overrides the poster image endpoint.
    #[must_use]
    pub fn img_url(mut self, url: Url) -> Self {
        self.img_url = Some(url);
        self
    }

    /// Sets the User-Agent (default: `omdb-api/<version>`).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client over the default reqwest transport.
    ///
    /// # Errors
    ///
    /// - `apikey` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OmdbClient> {
        let user_agent = self
            .user_agent
            .clone()
            .unwrap_or_else(|| String::from(DEFAULT_USER_AGENT));
        let transport = ReqwestTransport::new(&user_agent)?;
        self.build_with_transport(transport)
    }

    /// Builds the client over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Returns an error if `apikey` is not set.
    pub fn build_with_transport<T>(self, transport: T) -> Result<OmdbClient<T>> {
        let apikey = self.apikey.context("apikey is required")?;

        let mut config = ClientConfig::new(apikey)?;
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if let Some(url) = self.img_url {
            config.img_url = url;
        }

        Ok(OmdbClient { config, transport })
    }
}

impl OmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OmdbClientBuilder {
        OmdbClientBuilder::new()
    }
}

impl<T> OmdbClient<T> {
    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Builds the poster image URL for an IMDb id. No request is made.
    #[must_use]
    pub fn poster_url(&self, imdb_id: &str) -> Url {
        let mut url = self.config.img_url.clone();
        url.query_pairs_mut()
            .append_pair("apikey", &self.config.apikey)
            .append_pair("i", imdb_id);
        url
    }

    /// Appends query pairs to the query endpoint.
    fn endpoint(&self, query: &[(&'static str, String)]) -> Url {
        let mut url = self.config.base_url.clone();
        url.query_pairs_mut().extend_pairs(query);
        url
    }
}

impl<T: LocalTransport> OmdbClient<T> {
    /// Sends one GET and normalizes the outcome.
    async fn get_json(&self, url: &Url, options: &RequestOptions) -> OmdbResult<Value> {
        tracing::debug!(
            endpoint = %self.config.base_url,
            timeout = ?options.timeout,
            "OMDb API request"
        );
        normalize(self.transport.get(url, options).await)
    }
}

impl<T: LocalTransport> LocalOmdbApi for OmdbClient<T> {
    #[instrument(skip_all)]
    async fn fetch_by_id_or_title(&self, params: &TitleParams) -> OmdbResult<DetailResult> {
        if !params.has_identifier() {
            tracing::debug!("Title lookup without title or id, not sending");
            return Err(OmdbError::validation(MISSING_IDENTIFIER));
        }

        let url = self.endpoint(&params.to_query(&self.config.apikey));
        self.get_json(&url, &params.options)
            .await
            .map(DetailResult::from)
    }

    #[instrument(skip_all)]
    async fn search(&self, params: &SearchParams) -> OmdbResult<SearchResult> {
        let url = self.endpoint(&params.to_query(&self.config.apikey));
        self.get_json(&url, &params.options)
            .await
            .map(SearchResult::from)
    }
}
