//! omdb - command-line front end for the OMDb API.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use omdb_api::{LocalOmdbApi, MediaType, OmdbClient, RequestOptions, SearchParams, TitleParams};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;

use crate::config::{API_KEY_ENV, AppConfig, resolve_apikey, resolve_config_path};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Request timeout in seconds (default: config, then 10).
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Print the poster image URL for an IMDb id (no request is made).
    Poster(PosterArgs),
    /// Look up one title by IMDb id or name.
    Title(TitleArgs),
    /// Search titles by keyword.
    Search(SearchArgs),
}

/// Arguments for the `poster` subcommand.
#[derive(clap::Args)]
struct PosterArgs {
    /// IMDb id (e.g. "tt0499549").
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `title` subcommand.
#[derive(clap::Args)]
struct TitleArgs {
    /// Title to look up (e.g. "Avatar").
    #[arg(long)]
    title: Option<String>,
    /// IMDb id (e.g. "tt0499549").
    #[arg(long)]
    id: Option<String>,
    /// Result type: movie, series or episode.
    #[arg(long = "type")]
    media_type: Option<MediaType>,
    /// Year of release.
    #[arg(long)]
    year: Option<u32>,
    /// Return the full plot instead of the short one.
    #[arg(long)]
    full_plot: bool,
    /// JSONP callback name.
    #[arg(long)]
    callback: Option<String>,
    /// API version.
    #[arg(long)]
    api_version: Option<String>,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search keyword (e.g. "Avatar").
    #[arg(long, required = true)]
    title: String,
    /// Result type: movie, series or episode.
    #[arg(long = "type")]
    media_type: Option<MediaType>,
    /// Year of release.
    #[arg(long)]
    year: Option<u32>,
    /// Result page.
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// JSONP callback name.
    #[arg(long)]
    callback: Option<String>,
    /// API version.
    #[arg(long)]
    api_version: Option<String>,
}

impl TitleArgs {
    /// Converts CLI args into request params.
    fn to_params(&self, options: RequestOptions) -> TitleParams {
        TitleParams {
            title: self.title.clone(),
            imdb_id: self.id.clone(),
            media_type: self.media_type,
            year: self.year,
            full_plot: self.full_plot,
            callback: self.callback.clone(),
            version: self.api_version.clone(),
            options,
        }
    }
}

impl SearchArgs {
    /// Converts CLI args into request params.
    fn to_params(&self, options: RequestOptions) -> SearchParams {
        SearchParams {
            title: self.title.clone(),
            media_type: self.media_type,
            year: self.year,
            page: self.page,
            callback: self.callback.clone(),
            version: self.api_version.clone(),
            options,
        }
    }
}

/// Builds an `OmdbClient` and request options from config, env, and flags.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, no access key is
/// available, or the client fails to build.
#[instrument(skip_all)]
fn build_client(cli: &Cli) -> Result<(OmdbClient, RequestOptions)> {
    let config_path =
        resolve_config_path(cli.dir.as_deref()).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    let apikey = resolve_apikey(
        config.omdb.apikey.as_deref(),
        std::env::var(API_KEY_ENV).ok(),
    )?;

    let mut builder = OmdbClient::builder().apikey(apikey).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(url) = config.omdb.base_url.clone() {
        builder = builder.base_url(url);
    }
    if let Some(url) = config.omdb.img_url.clone() {
        builder = builder.img_url(url);
    }
    let client = builder.build().context("failed to build OMDb client")?;

    let mut options = RequestOptions::new();
    if let Some(timeout) = cli
        .timeout
        .map(Duration::from_secs)
        .or_else(|| config.omdb.timeout())
    {
        options = options.timeout(timeout);
    }

    Ok((client, options))
}

/// Logs a value as pretty-printed JSON.
fn log_json(value: &impl Serialize) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    tracing::info!("{pretty}");
    Ok(())
}

/// Returns a string field of a search summary, or `-`.
fn field_or_dash<'a>(summary: &'a Value, key: &str) -> &'a str {
    summary.get(key).and_then(Value::as_str).unwrap_or("-")
}

/// Runs the `poster` subcommand.
fn run_poster<T>(client: &OmdbClient<T>, args: &PosterArgs) {
    tracing::info!("{}", client.poster_url(&args.id));
}

/// Runs the `title` subcommand.
///
/// # Errors
///
/// Returns an error if the lookup fails (validation, transport, or server).
#[instrument(skip_all)]
async fn run_title(api: &impl LocalOmdbApi, params: &TitleParams) -> Result<()> {
    let detail = api
        .fetch_by_id_or_title(params)
        .await
        .context("OMDb title lookup failed")?;
    log_json(&detail)
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the search fails (transport or server).
#[instrument(skip_all)]
async fn run_search(api: &impl LocalOmdbApi, params: &SearchParams) -> Result<()> {
    let result = api.search(params).await.context("OMDb search failed")?;

    for title in result.titles() {
        let id = field_or_dash(title, "imdbID");
        let year = field_or_dash(title, "Year");
        let kind = field_or_dash(title, "Type");
        let name = field_or_dash(title, "Title");
        tracing::info!("{id}\t{year}\t{kind}\t{name}");
    }
    tracing::info!(
        "Total: {} results",
        result
            .total_results()
            .map_or_else(|| String::from("-"), |n| n.to_string())
    );

    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let (client, options) = build_client(&cli)?;

    match &cli.command {
        Commands::Poster(args) => {
            run_poster(&client, args);
            Ok(())
        }
        Commands::Title(args) => run_title(&client, &args.to_params(options)).await,
        Commands::Search(args) => run_search(&client, &args.to_params(options)).await,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use omdb_api::{DetailResult, OmdbError, OmdbResult, SearchResult};
    use serde_json::json;

    use super::*;

    /// Fake API returning canned results.
    struct FakeApi {
        detail: OmdbResult<DetailResult>,
        search: OmdbResult<SearchResult>,
    }

    impl LocalOmdbApi for FakeApi {
        async fn fetch_by_id_or_title(&self, _params: &TitleParams) -> OmdbResult<DetailResult> {
            self.detail.clone()
        }

        async fn search(&self, _params: &SearchParams) -> OmdbResult<SearchResult> {
            self.search.clone()
        }
    }

    fn fake_ok() -> FakeApi {
        FakeApi {
            detail: Ok(DetailResult::from(json!({"Title": "Avatar", "Response": "True"}))),
            search: Ok(SearchResult::from(json!({
                "Search": [{"Title": "Avatar", "Year": "2009", "imdbID": "tt0499549", "Type": "movie"}],
                "totalResults": "1",
                "Response": "True",
            }))),
        }
    }

    fn fake_err(err: &OmdbError) -> FakeApi {
        FakeApi {
            detail: Err(err.clone()),
            search: Err(err.clone()),
        }
    }

    #[tokio::test]
    async fn test_run_title_ok() {
        // Arrange
        let api = fake_ok();

        // Act
        let result = run_title(&api, &TitleParams::by_title("Avatar")).await;

        // Assert
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_title_propagates_error() {
        // Arrange
        let api = fake_err(&OmdbError::server("Movie not found!"));

        // Act
        let err = run_title(&api, &TitleParams::by_title("x")).await.unwrap_err();

        // Assert
        let text = format!("{err:#}");
        assert!(text.contains("OMDb title lookup failed"));
        assert!(text.contains("Movie not found!"));
    }

    #[tokio::test]
    async fn test_run_search_ok() {
        // Arrange
        let api = fake_ok();

        // Act
        let result = run_search(&api, &SearchParams::new("Avatar")).await;

        // Assert
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_search_propagates_error() {
        // Arrange
        let api = fake_err(&OmdbError::transport("connection refused"));

        // Act
        let err = run_search(&api, &SearchParams::new("Avatar")).await.unwrap_err();

        // Assert
        assert!(format!("{err:#}").contains("connection refused"));
    }

    #[test]
    fn test_title_args_to_params() {
        // Arrange
        let cli = Cli::parse_from([
            "omdb", "title", "--id", "tt0499549", "--type", "series", "--full-plot",
            "--api-version", "1",
        ]);
        let Commands::Title(args) = cli.command else {
            panic!("expected title subcommand");
        };
        let options = RequestOptions::new().timeout(Duration::from_secs(2));

        // Act
        let params = args.to_params(options);

        // Assert
        assert_eq!(params.imdb_id.as_deref(), Some("tt0499549"));
        assert_eq!(params.title, None);
        assert_eq!(params.media_type, Some(MediaType::Series));
        assert!(params.full_plot);
        assert_eq!(params.version.as_deref(), Some("1"));
        assert_eq!(params.options, options);
    }

    #[test]
    fn test_search_args_default_page() {
        // Arrange
        let cli = Cli::parse_from(["omdb", "search", "--title", "Avatar"]);
        let Commands::Search(args) = cli.command else {
            panic!("expected search subcommand");
        };

        // Act
        let params = args.to_params(RequestOptions::default());

        // Assert
        assert_eq!(params.title, "Avatar");
        assert_eq!(params.page, 1);
        assert_eq!(params.media_type, None);
    }

    #[test]
    fn test_field_or_dash() {
        // Arrange
        let summary = json!({"imdbID": "tt0499549", "Year": 2009});

        // Act & Assert
        assert_eq!(field_or_dash(&summary, "imdbID"), "tt0499549");
        assert_eq!(field_or_dash(&summary, "Year"), "-");
        assert_eq!(field_or_dash(&summary, "Title"), "-");
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        // Arrange & Act
        let result = Cli::try_parse_from(["omdb", "--timeout", "0", "poster", "--id", "tt1"]);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_positive_timeout_is_accepted() {
        // Arrange & Act
        let cli = Cli::try_parse_from(["omdb", "--timeout", "5", "poster", "--id", "tt1"]).unwrap();

        // Assert
        assert_eq!(cli.timeout, Some(5));
    }

    #[test]
    fn test_invalid_type_is_rejected() {
        // Arrange & Act
        let result = Cli::try_parse_from(["omdb", "search", "--title", "x", "--type", "game"]);

        // Assert
        assert!(result.is_err());
    }
}
