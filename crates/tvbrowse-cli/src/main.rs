//! tvbrowse - browse and search TVmaze show listings from the terminal.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};
use crate::tui::run_browser;
use tvbrowse_api::tvmaze::{
    Episode, LocalTvmazeApi, Show, ShowWithEmbeds, TvmazeClient, running_shows, shows_by_genre,
    shows_by_multiple_genres, shows_by_type,
};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List one page of the show index.
    Shows(ShowsArgs),
    /// Search shows by name.
    Search(SearchArgs),
    /// Show details with cast and episodes.
    Show(ShowIdArgs),
    /// List all episodes of a show.
    Episodes(ShowIdArgs),
    /// Top-rated shows of a genre.
    Genre(GenreArgs),
    /// Top-rated shows of a type (e.g. "Animation", "Reality").
    Type(TypeArgs),
    /// Top-rated shows that are still running.
    Running(LimitArgs),
    /// Top-rated shows for several genres at once.
    Genres(GenresArgs),
    /// Browse and search shows via TUI.
    Browse,
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Arguments for the `shows` subcommand.
#[derive(clap::Args)]
struct ShowsArgs {
    /// Page of the show index (0-based).
    #[arg(long, default_value_t = 0)]
    page: u32,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "breaking bad").
    #[arg(long, required = true)]
    query: String,
}

/// Arguments for subcommands addressing a single show.
#[derive(clap::Args)]
struct ShowIdArgs {
    /// TVmaze show ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Result limit. Falls back to the config when omitted.
#[derive(clap::Args)]
struct LimitArgs {
    /// Maximum number of shows.
    #[arg(long)]
    limit: Option<usize>,
}

/// Arguments for the `genre` subcommand.
#[derive(clap::Args)]
struct GenreArgs {
    /// Genre name, matched exactly (e.g. "Drama").
    #[arg(long, required = true)]
    genre: String,

    #[command(flatten)]
    limit: LimitArgs,
}

/// Arguments for the `type` subcommand.
#[derive(clap::Args)]
struct TypeArgs {
    /// Show type, matched exactly (e.g. "Scripted").
    #[arg(long = "type", required = true)]
    show_type: String,

    #[command(flatten)]
    limit: LimitArgs,
}

/// Arguments for the `genres` subcommand.
#[derive(clap::Args)]
struct GenresArgs {
    /// Comma-separated genres (e.g. "Drama,Comedy"). Falls back to config genres if omitted.
    #[arg(long, value_delimiter = ',')]
    genres: Option<Vec<String>>,

    #[command(flatten)]
    limit: LimitArgs,
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
    /// Write a config file with default values if none exists.
    Init,
    /// Print the effective configuration.
    Show,
}

/// Loads `config.toml` from `--dir` or the default location and builds a client from it.
fn setup(dir: Option<&PathBuf>) -> Result<(AppConfig, TvmazeClient)> {
    let path = resolve_config_path(dir)?;
    let config = AppConfig::load(&path)?;
    let client = build_client(&config)?;
    Ok((config, client))
}

/// Builds a TVmaze client from the config.
#[instrument(skip_all)]
fn build_client(config: &AppConfig) -> Result<TvmazeClient> {
    let mut builder = TvmazeClient::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(config.api.timeout());
    if let Some(url) = config.api.parsed_base_url()? {
        builder = builder.base_url(url);
    }
    builder.build().context("failed to build TVmaze client")
}

/// Formats a show's rating average, or `-` when it has none.
fn fmt_rating(show: &Show) -> String {
    show.rating_average()
        .map_or_else(|| String::from("-"), |avg| format!("{avg:.1}"))
}

/// Logs a show list, one row per show.
fn log_shows(shows: &[Show]) {
    tracing::info!("ID\tRating\tType\t\tStatus\t\tName");
    for show in shows {
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}",
            show.id,
            fmt_rating(show),
            show.show_type.as_deref().unwrap_or("-"),
            show.status.as_deref().unwrap_or("-"),
            show.name,
        );
    }
}

/// Runs the `shows` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_shows(api: &(impl LocalTvmazeApi + Sync), args: &ShowsArgs) -> Result<Vec<Show>> {
    let shows = api
        .get_shows(args.page)
        .await
        .with_context(|| format!("TVmaze shows?page={} request failed", args.page))?;

    tracing::info!("Page {}: {} shows", args.page, shows.len());
    log_shows(&shows);
    Ok(shows)
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the query is blank or the API request fails.
#[instrument(skip_all)]
async fn run_search(api: &(impl LocalTvmazeApi + Sync), args: &SearchArgs) -> Result<Vec<Show>> {
    let query = args.query.trim();
    ensure!(!query.is_empty(), "search query must not be empty");

    let shows = api
        .search_shows(query)
        .await
        .context("TVmaze search/shows request failed")?;

    tracing::info!("Results for \"{query}\": {}", shows.len());
    log_shows(&shows);
    Ok(shows)
}

/// Runs the `show` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_show(api: &(impl LocalTvmazeApi + Sync), args: &ShowIdArgs) -> Result<ShowWithEmbeds> {
    let detail = api
        .get_show_with_cast(args.id)
        .await
        .with_context(|| format!("TVmaze show {} request failed", args.id))?;
    let show = &detail.show;

    tracing::info!("ID: {}", show.id);
    tracing::info!("Name: {}", show.name);
    tracing::info!("Type: {}", show.show_type.as_deref().unwrap_or("-"));
    tracing::info!("Status: {}", show.status.as_deref().unwrap_or("-"));
    tracing::info!("Premiered: {}", show.premiered.as_deref().unwrap_or("-"));
    tracing::info!(
        "Genres: {}",
        show.genres.as_deref().map_or_else(String::new, |g| g.join(", "))
    );
    tracing::info!("Rating: {}", fmt_rating(show));
    tracing::info!("URL: {}", show.url.as_deref().unwrap_or("-"));
    tracing::info!("--- Cast ({})", detail.embedded.cast.len());
    for credit in &detail.embedded.cast {
        tracing::info!(
            "  {} as {}",
            credit.person.name,
            credit.character.as_ref().map_or("-", |c| c.name.as_str()),
        );
    }
    let seasons: BTreeSet<u32> = detail
        .embedded
        .episodes
        .iter()
        .filter_map(|ep| ep.season)
        .collect();
    tracing::info!(
        "--- Episodes: {} in {} season(s)",
        detail.embedded.episodes.len(),
        seasons.len()
    );
    Ok(detail)
}

/// Runs the `episodes` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_episodes(
    api: &(impl LocalTvmazeApi + Sync),
    args: &ShowIdArgs,
) -> Result<Vec<Episode>> {
    let episodes = api
        .get_episodes_by_show_id(args.id)
        .await
        .with_context(|| format!("TVmaze episodes for show {} request failed", args.id))?;

    tracing::info!("Episodes: {}", episodes.len());
    tracing::info!("Season\tNumber\tAirdate\t\tName");
    for ep in &episodes {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            ep.season.map_or_else(|| String::from("-"), |s| s.to_string()),
            ep.number.map_or_else(|| String::from("-"), |n| n.to_string()),
            ep.airdate.as_deref().unwrap_or("-"),
            ep.name,
        );
    }
    Ok(episodes)
}

/// Runs the `genre` subcommand.
///
/// # Errors
///
/// Returns an error if fetching the show index fails.
#[instrument(skip_all)]
async fn run_genre(
    api: &(impl LocalTvmazeApi + Sync),
    args: &GenreArgs,
    config: &AppConfig,
) -> Result<Vec<Show>> {
    let limit = args.limit.limit.unwrap_or(config.browse.per_genre);
    let shows = shows_by_genre(api, &args.genre, limit).await?;

    tracing::info!("Top {} \"{}\" shows: {}", limit, args.genre, shows.len());
    log_shows(&shows);
    Ok(shows)
}

/// Runs the `type` subcommand.
///
/// # Errors
///
/// Returns an error if fetching the show index fails.
#[instrument(skip_all)]
async fn run_type(
    api: &(impl LocalTvmazeApi + Sync),
    args: &TypeArgs,
    config: &AppConfig,
) -> Result<Vec<Show>> {
    let limit = args.limit.limit.unwrap_or(config.browse.per_genre);
    let shows = shows_by_type(api, &args.show_type, limit).await?;

    tracing::info!("Top {} \"{}\" shows: {}", limit, args.show_type, shows.len());
    log_shows(&shows);
    Ok(shows)
}

/// Runs the `running` subcommand.
///
/// # Errors
///
/// Returns an error if fetching the show index fails.
#[instrument(skip_all)]
async fn run_running(
    api: &(impl LocalTvmazeApi + Sync),
    args: &LimitArgs,
    config: &AppConfig,
) -> Result<Vec<Show>> {
    let limit = args.limit.unwrap_or(config.browse.running_limit);
    let shows = running_shows(api, limit).await?;

    tracing::info!("Top {} running shows: {}", limit, shows.len());
    log_shows(&shows);
    Ok(shows)
}

/// Runs the `genres` subcommand.
///
/// Falls back to `config.toml` genres when `--genres` is not specified.
/// Shelves are printed and returned in the requested order, each genre once.
///
/// # Errors
///
/// Returns an error if fetching the show index fails.
#[instrument(skip_all)]
async fn run_genres(
    api: &(impl LocalTvmazeApi + Sync),
    args: &GenresArgs,
    config: &AppConfig,
) -> Result<Vec<(String, Vec<Show>)>> {
    let genres = args
        .genres
        .clone()
        .unwrap_or_else(|| config.browse.genres.clone());
    let per_genre = args.limit.limit.unwrap_or(config.browse.per_genre);
    let mut shelves = shows_by_multiple_genres(api, &genres, per_genre).await?;

    let mut ordered = Vec::with_capacity(shelves.len());
    for genre in genres {
        let Some(shows) = shelves.remove(&genre) else {
            continue;
        };
        tracing::info!("=== {} ({})", genre, shows.len());
        log_shows(&shows);
        ordered.push((genre, shows));
    }
    Ok(ordered)
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file cannot be written.
#[instrument(skip_all)]
fn run_config_init(dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    if path.exists() {
        tracing::info!("Config already exists: {}", path.display());
        return Ok(());
    }
    AppConfig::default().save(&path)?;
    tracing::info!("Wrote default config to {}", path.display());
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or serialized.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let config = AppConfig::load(&path)?;
    let content = toml::to_string_pretty(&config).context("failed to serialize config to TOML")?;

    tracing::info!("# {}", path.display());
    for line in content.lines() {
        tracing::info!("{line}");
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

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

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Init => run_config_init(dir),
            ConfigSubcommands::Show => run_config_show(dir),
        },
        Commands::Shows(args) => {
            let (_, client) = setup(dir)?;
            run_shows(&client, &args).await.map(drop)
        }
        Commands::Search(args) => {
            let (_, client) = setup(dir)?;
            run_search(&client, &args).await.map(drop)
        }
        Commands::Show(args) => {
            let (_, client) = setup(dir)?;
            run_show(&client, &args).await.map(drop)
        }
        Commands::Episodes(args) => {
            let (_, client) = setup(dir)?;
            run_episodes(&client, &args).await.map(drop)
        }
        Commands::Genre(args) => {
            let (config, client) = setup(dir)?;
            run_genre(&client, &args, &config).await.map(drop)
        }
        Commands::Type(args) => {
            let (config, client) = setup(dir)?;
            run_type(&client, &args, &config).await.map(drop)
        }
        Commands::Running(args) => {
            let (config, client) = setup(dir)?;
            run_running(&client, &args, &config).await.map(drop)
        }
        Commands::Genres(args) => {
            let (config, client) = setup(dir)?;
            run_genres(&client, &args, &config).await.map(drop)
        }
        Commands::Browse => {
            let (config, client) = setup(dir)?;
            run_browser(&client, config.browse.running_limit).await
        }
    }
}
