//! Client library for the OMDb movie metadata API.
//!
//! Builds query URLs, issues GET requests, and normalizes responses and
//! transport failures into [`OmdbResult`].

mod api;
mod client;
mod error;
mod params;
mod response;
mod transport;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalOmdbApi, OmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_IMG_URL, MISSING_IDENTIFIER, OmdbClient,
    OmdbClientBuilder,
};
pub use error::{ErrorKind, OmdbError, OmdbResult};
pub use params::{
    DEFAULT_TIMEOUT, MediaType, ParseMediaTypeError, RequestOptions, SearchParams, TitleParams,
};
pub use response::{
    DetailResult, INVALID_JSON, SearchResult, UNEXPECTED_HTTP_CODE, UNKNOWN_SERVER_ERROR,
};
pub use transport::{LocalTransport, RawResponse, ReqwestTransport, Transport};
