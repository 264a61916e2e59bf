//! cartelera - TMDB movie browser CLI.

/// Application configuration (TOML).
mod config;

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, TmdbConfig, resolve_config_path, resolve_log_path};
use cartelera_api::tmdb::{
    PopularMoviesParams, SearchMovieParams, TmdbApi, TmdbClient, TmdbMovieListResponse,
    trailer_watch_url,
};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// TMDB v3 API key. Takes precedence over the config file.
    #[arg(long, global = true, env = "TMDB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse popular movies and their trailers in the terminal.
    Browse(BrowseArgs),
    /// Query TMDB API.
    Tmdb(TmdbCommand),
    /// Manage the config file.
    Config(ConfigCommand),
    /// Print shell completions to stdout.
    Completions(CompletionsArgs),
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Response language (default: config value, then "es-ES").
    #[arg(long)]
    language: Option<String>,
}

/// Arguments for the `tmdb` subcommand.
#[derive(clap::Args)]
struct TmdbCommand {
    /// TMDB subcommand to run.
    #[command(subcommand)]
    command: TmdbSubcommands,
}

/// Available TMDB subcommands.
#[derive(Subcommand)]
enum TmdbSubcommands {
    /// List popular movies.
    Popular(TmdbPopularArgs),
    /// List the videos of a movie and its trailer.
    Videos(TmdbVideosArgs),
    /// Search for movies by title.
    Search(TmdbSearchArgs),
}

/// Arguments for the `tmdb popular` subcommand.
#[derive(clap::Args)]
struct TmdbPopularArgs {
    /// Response language (default: config value).
    #[arg(long)]
    language: Option<String>,
    /// Result page (1-based).
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `tmdb videos` subcommand.
#[derive(clap::Args)]
struct TmdbVideosArgs {
    /// TMDB movie ID (e.g. 603).
    #[arg(long, required = true)]
    id: u64,
    /// Response language (default: config value).
    #[arg(long)]
    language: Option<String>,
}

/// Arguments for the `tmdb search` subcommand.
#[derive(clap::Args)]
struct TmdbSearchArgs {
    /// Search query (e.g. "Matrix").
    #[arg(long, required = true)]
    query: String,
    /// Response language (default: config value).
    #[arg(long)]
    language: Option<String>,
    /// Filter by release year.
    #[arg(long)]
    year: Option<u32>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a default config file if none exists.
    Init,
    /// Print the effective config.
    Show,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: clap_complete::Shell,
}

/// Loads the config file selected by `--dir`.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Builds a TMDB client from config and environment.
///
/// The API key comes from `--api-key`/`TMDB_API_KEY` or the config file.
/// `TMDB_API_TOKEN` is used as a Bearer token when no key is available.
///
/// # Errors
///
/// Returns an error if no credential is available or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(tmdb: &TmdbConfig, cli_key: Option<String>) -> Result<TmdbClient> {
    let mut builder = TmdbClient::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));

    if let Some(api_key) = tmdb.resolve_api_key(cli_key) {
        builder = builder.api_key(api_key);
    } else if let Some(api_token) = std::env::var("TMDB_API_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty())
    {
        builder = builder.api_token(api_token);
    } else {
        anyhow::bail!("TMDB API key is required (set TMDB_API_KEY or [tmdb].api_key)");
    }

    if let Some(base_url) = &tmdb.base_url {
        builder = builder.base_url(
            base_url
                .parse()
                .with_context(|| format!("invalid TMDB base_url: {base_url}"))?,
        );
    }

    builder.build().context("failed to build TMDB client")
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(args: BrowseArgs, dir: Option<&PathBuf>, cli_key: Option<String>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config.tmdb, cli_key)?;
    let language = args.language.unwrap_or(config.tmdb.language);

    tracing::info!(%language, "Launching movie browser");
    cartelera_tui::run_browser(Arc::new(client), language)
        .await
        .context("movie browser TUI failed")
}

/// Logs a movie list response as a table.
fn log_movie_list(response: &TmdbMovieListResponse) {
    tracing::info!(
        "Page {} of {} ({} results)",
        response.page,
        response.total_pages,
        response.total_results
    );
    tracing::info!("ID\tYear\tRating\tTitle");
    for movie in &response.results {
        tracing::info!(
            "{}\t{}\t{:.1}\t{}",
            movie.id,
            movie
                .release_year()
                .map_or_else(|| String::from("-"), |y| y.to_string()),
            movie.vote_average,
            movie.title,
        );
    }
}

/// Runs the `tmdb popular` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_popular(
    args: &TmdbPopularArgs,
    dir: Option<&PathBuf>,
    cli_key: Option<String>,
) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config.tmdb, cli_key)?;
    let language = args.language.as_deref().unwrap_or(&config.tmdb.language);

    let params = PopularMoviesParams::new().language(language).page(args.page);
    let response = client
        .popular_movies(&params)
        .await
        .context("TMDB movie/popular request failed")?;

    log_movie_list(&response);
    Ok(())
}

/// Runs the `tmdb videos` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all, fields(movie_id = args.id))]
async fn run_tmdb_videos(
    args: &TmdbVideosArgs,
    dir: Option<&PathBuf>,
    cli_key: Option<String>,
) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config.tmdb, cli_key)?;
    let language = args.language.as_deref().unwrap_or(&config.tmdb.language);

    let response = client
        .movie_videos(args.id, language)
        .await
        .context("TMDB movie videos request failed")?;

    tracing::info!("Type\t\tSite\tKey\t\tName");
    for video in &response.results {
        tracing::info!(
            "{}\t\t{}\t{}\t{}",
            video.video_type,
            video.site,
            video.key,
            video.name,
        );
    }
    match response.first_trailer() {
        Some(trailer) => tracing::info!("Trailer: {}", trailer_watch_url(&trailer.key)),
        None => tracing::info!("No trailer found"),
    }

    Ok(())
}

/// Runs the `tmdb search` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_search(
    args: &TmdbSearchArgs,
    dir: Option<&PathBuf>,
    cli_key: Option<String>,
) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config.tmdb, cli_key)?;
    let language = args.language.as_deref().unwrap_or(&config.tmdb.language);

    let mut params = SearchMovieParams::new(&args.query).language(language);
    if let Some(year) = args.year {
        params = params.year(year);
    }

    let response = client
        .search_movie(&params)
        .await
        .context("TMDB search/movie request failed")?;

    log_movie_list(&response);
    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or written.
fn run_config_init(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    if config_path.exists() {
        tracing::info!("Config already exists: {}", config_path.display());
        return Ok(());
    }

    AppConfig::default()
        .save(&config_path)
        .context("failed to save config")?;
    tracing::info!("Wrote default config to {}", config_path.display());
    Ok(())
}

/// Runs the `config show` subcommand. The API key is masked.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or serialized.
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    let masked = AppConfig {
        tmdb: TmdbConfig {
            api_key: config.tmdb.api_key.as_ref().map(|_| String::from("********")),
            ..config.tmdb
        },
    };
    let content = toml::to_string_pretty(&masked).context("failed to serialize config to TOML")?;

    tracing::info!("# {}\n{}", config_path.display(), content);
    Ok(())
}

/// Chooses where log output goes.
///
/// The browser owns the terminal, so its logs are appended to a file next to
/// the config. Every other command logs to stdout.
fn log_writer(cli: &Cli) -> Result<(BoxMakeWriter, bool)> {
    if !matches!(cli.command, Commands::Browse(_)) {
        return Ok((BoxMakeWriter::new(io::stdout), true));
    }

    let log_path = resolve_log_path(cli.dir.as_ref()).context("failed to resolve log path")?;
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;
    Ok((BoxMakeWriter::new(Arc::new(file)), false))
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (writer, ansi) = log_writer(&cli)?;

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let dir = cli.dir.as_ref();
    let cli_key = cli.api_key.clone();
    match cli.command {
        Commands::Browse(args) => run_browse(args, dir, cli_key).await,
        Commands::Tmdb(tmdb) => match tmdb.command {
            TmdbSubcommands::Popular(args) => run_tmdb_popular(&args, dir, cli_key).await,
            TmdbSubcommands::Videos(args) => run_tmdb_videos(&args, dir, cli_key).await,
            TmdbSubcommands::Search(args) => run_tmdb_search(&args, dir, cli_key).await,
        },
        Commands::Config(cfg) => match cfg.command {
            ConfigSubcommands::Init => run_config_init(dir),
            ConfigSubcommands::Show => run_config_show(dir),
        },
        Commands::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                env!("CARGO_BIN_NAME"),
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
