//! `OmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use crate::error::OmdbResult;
use crate::params::{SearchParams, TitleParams};
use crate::response::{DetailResult, SearchResult};

/// OMDb API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(OmdbApi: Send)]
pub trait LocalOmdbApi {
    /// Fetches a single movie, series, or episode by IMDb id or title.
    ///
    /// # Errors
    ///
    /// - `Validation` if neither title nor IMDb id is given (no request is sent).
    /// - `Transport` if the exchange fails or the status is not 200.
    /// - `Server` if the body is not JSON or the service reports failure.
    async fn fetch_by_id_or_title(&self, params: &TitleParams) -> OmdbResult<DetailResult>;

    /// Searches titles by keyword.
    ///
    /// # Errors
    ///
    /// - `Transport` if the exchange fails or the status is not 200.
    /// - `Server` if the body is not JSON or the service reports failure.
    async fn search(&self, params: &SearchParams) -> OmdbResult<SearchResult>;
}
