//! OMDb request parameter types and query construction.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result type filter (`type` parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// Feature films.
    Movie,
    /// TV series.
    Series,
    /// Single episodes.
    Episode,
}

impl MediaType {
    /// Returns the value sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown media type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown media type: {0:?} (expected movie, series or episode)")]
pub struct ParseMediaTypeError(String);

impl FromStr for MediaType {
    type Err = ParseMediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            "episode" => Ok(Self::Episode),
            _ => Err(ParseMediaTypeError(String::from(s))),
        }
    }
}

/// Transport options recognized by the client.
///
/// Only options listed here are applied to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Whole-request timeout (default: 10s).
    pub timeout: Duration,
}

impl RequestOptions {
    /// Creates options with the default timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters for a single-title lookup (`i` / `t`).
///
/// At least one of `title` or `imdb_id` must be non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleParams {
    /// Title to look up (`t`).
    pub title: Option<String>,
    /// IMDb id, e.g. `tt1285016` (`i`).
    pub imdb_id: Option<String>,
    /// Result type filter.
    pub media_type: Option<MediaType>,
    /// Year of release (`y`).
    pub year: Option<u32>,
    /// Request the long-form plot (`plot=full`).
    pub full_plot: bool,
    /// JSONP callback name.
    pub callback: Option<String>,
    /// API version (`v`).
    pub version: Option<String>,
    /// Transport options.
    pub options: RequestOptions,
}

impl TitleParams {
    /// Looks a title up by IMDb id.
    pub fn by_id(imdb_id: impl Into<String>) -> Self {
        Self {
            imdb_id: Some(imdb_id.into()),
            ..Self::default()
        }
    }

    /// Looks a title up by name.
    pub fn by_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the IMDb id.
    #[must_use]
    pub fn imdb_id(mut self, imdb_id: impl Into<String>) -> Self {
        self.imdb_id = Some(imdb_id.into());
        self
    }

    /// Sets the type filter.
    #[must_use]
    pub const fn media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }

    /// Sets the year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    /// Requests the full plot instead of the short summary.
    #[must_use]
    pub const fn full_plot(mut self, full_plot: bool) -> Self {
        self.full_plot = full_plot;
        self
    }

    /// Sets the JSONP callback name.
    #[must_use]
    pub fn callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the transport options.
    #[must_use]
    pub const fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns `true` if a title or IMDb id is present and non-empty.
    pub(crate) fn has_identifier(&self) -> bool {
        is_present(self.title.as_deref()) || is_present(self.imdb_id.as_deref())
    }

    /// Builds the query pairs, dropping empty values.
    pub(crate) fn to_query(&self, apikey: &str) -> Vec<(&'static str, String)> {
        retain_non_empty([
            ("i", self.imdb_id.clone()),
            ("t", self.title.clone()),
            ("type", self.media_type.map(|t| String::from(t.as_str()))),
            ("y", non_zero(self.year)),
            ("plot", self.full_plot.then(|| String::from("full"))),
            ("r", Some(String::from("json"))),
            ("callback", self.callback.clone()),
            ("v", self.version.clone()),
            ("apikey", Some(String::from(apikey))),
        ])
    }
}

/// Parameters for a keyword search (`s`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search keyword (sent as-is, not validated).
    pub title: String,
    /// Result type filter.
    pub media_type: Option<MediaType>,
    /// Year of release (`y`).
    pub year: Option<u32>,
    /// Result page (default: 1).
    pub page: u32,
    /// JSONP callback name.
    pub callback: Option<String>,
    /// API version (`v`).
    pub version: Option<String>,
    /// Transport options.
    pub options: RequestOptions,
}

impl SearchParams {
    /// Creates search params for the given keyword.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            media_type: None,
            year: None,
            page: 1,
            callback: None,
            version: None,
            options: RequestOptions::new(),
        }
    }

    /// Sets the type filter.
    #[must_use]
    pub const fn media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }

    /// Sets the year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the JSONP callback name.
    #[must_use]
    pub fn callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the transport options.
    #[must_use]
    pub const fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the query pairs, dropping empty values.
    pub(crate) fn to_query(&self, apikey: &str) -> Vec<(&'static str, String)> {
        retain_non_empty([
            ("s", Some(self.title.clone())),
            ("type", self.media_type.map(|t| String::from(t.as_str()))),
            ("y", non_zero(self.year)),
            ("r", Some(String::from("json"))),
            ("page", non_zero(Some(self.page))),
            ("callback", self.callback.clone()),
            ("v", self.version.clone()),
            ("apikey", Some(String::from(apikey))),
        ])
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Zero counts as empty, like an absent value.
fn non_zero(value: Option<u32>) -> Option<String> {
    value.filter(|v| *v != 0).map(|v| v.to_string())
}

/// Keeps pairs whose value is present and non-empty, preserving order.
fn retain_non_empty<const N: usize>(
    pairs: [(&'static str, Option<String>); N],
) -> Vec<(&'static str, String)> {
    pairs
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
        .collect()
}
