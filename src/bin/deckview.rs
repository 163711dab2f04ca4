use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use swu_deckview::catalog::{clear_set_files, download_sets};
use swu_deckview::compare::DeckComparison;
use swu_deckview::deck::{RecentDeck, RecentDecks, ResolvedDeck};
use swu_deckview::fetch::is_remote;
use swu_deckview::render::{comparison_page, deck_page};
use swu_deckview::{
    CardCatalog, CardRenderer, ConfigError, DeckClient, DeckLoadError, GroupingEngine,
    HtmlRenderer, HttpFetcher, TextRenderer, ViewerConfig,
};

/// Pause between set downloads, to go easy on the card API.
const DOWNLOAD_PAUSE: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "deckview")]
#[command(about = "View and compare Star Wars: Unlimited decks")]
#[command(after_help = "Environment:\n  LOG_LEVEL   Log level override\n  RUST_LOG    Extra tracing directives")]
struct Cli {
    /// Config file; created with defaults when missing.
    #[arg(long, global = true, default_value = "deckview.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one deck, grouped.
    View {
        /// Deck URL or id.
        deck: String,
        /// set, cost, aspect, type or trait.
        #[arg(long, default_value = "set")]
        sort: String,
        #[arg(long, default_value_t = false)]
        html: bool,
    },
    /// Compare two decks card by card.
    Compare {
        deck_a: String,
        deck_b: String,
        #[arg(long, default_value_t = false)]
        html: bool,
    },
    /// List recently viewed decks.
    Recent {
        /// Forget every recent deck.
        #[arg(long, default_value_t = false, conflicts_with = "remove")]
        clear: bool,
        /// Forget one deck, by URL or id.
        #[arg(long, value_name = "DECK")]
        remove: Option<String>,
    },
    /// Download every configured set into the data directory.
    FetchSets,
    /// Delete downloaded set files and forget recent decks.
    ClearCache,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Deck(#[from] DeckLoadError),
    #[error("failed to set up logging: {0}")]
    Logger(String),
    #[error("fetch-sets needs a local data directory, got {0}")]
    RemoteDataRoot(String),
    #[error("{0} set(s) failed to download")]
    Download(usize),
    #[error("failed to update {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn setup_logger(level: &str) -> Result<(), CliError> {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| level.to_string());
    let directive = |target: &str| {
        format!("{target}={}", level.to_lowercase())
            .parse::<Directive>()
            .map_err(|e| CliError::Logger(e.to_string()))
    };
    let filter = EnvFilter::builder()
        .from_env()
        .map_err(|e| CliError::Logger(e.to_string()))?
        .add_directive(directive("swu_deckview")?)
        .add_directive(directive("deckview")?);
    tracing_subscriber::fmt()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| CliError::Logger(e.to_string()))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ViewerConfig::load_or_create(&cli.config)?;
    setup_logger(&config.log.level)?;

    match cli.command {
        Commands::View { deck, sort, html } => view(&config, &deck, &sort, html).await,
        Commands::Compare {
            deck_a,
            deck_b,
            html,
        } => compare(&config, &deck_a, &deck_b, html).await,
        Commands::Recent { clear, remove } => recent(&config, clear, remove.as_deref()),
        Commands::FetchSets => fetch_sets(&config).await,
        Commands::ClearCache => clear_cache(&config).await,
    }
}

fn catalog(config: &ViewerConfig) -> CardCatalog {
    CardCatalog::new(config.catalog_fetcher(), config.catalog.data_root.clone())
}

async fn view(config: &ViewerConfig, input: &str, sort: &str, html: bool) -> Result<(), CliError> {
    let catalog = catalog(config);
    let client = DeckClient::new(config.deck_fetcher(), config.deck_api.base_url.clone());

    let (failures, deck) = tokio::join!(
        catalog.preload_all(config.set_order().sets()),
        client.load(input)
    );
    if !failures.is_empty() {
        warn!(failed = failures.len(), "some sets are unavailable");
    }
    let deck = deck?;
    let resolved = ResolvedDeck::resolve(&catalog, &deck).await;
    let engine = GroupingEngine::new(config.set_order().clone());

    let renderer: &dyn CardRenderer = if html { &HtmlRenderer } else { &TextRenderer };
    println!("{}", deck_page(renderer, &engine, sort, &resolved));

    let mut history = RecentDecks::load(Path::new(&config.recent.path), config.recent.capacity);
    history.record(RecentDeck::describe(
        config.deck_page(&deck.id),
        &deck,
        resolved.base.as_ref().map(|base| &base.metadata),
    ));
    if let Err(err) = history.save(Path::new(&config.recent.path)) {
        warn!(error = %err, "could not save recent decks");
    }
    Ok(())
}

async fn compare(
    config: &ViewerConfig,
    input_a: &str,
    input_b: &str,
    html: bool,
) -> Result<(), CliError> {
    let catalog = catalog(config);
    let client = DeckClient::new(config.deck_fetcher(), config.deck_api.base_url.clone());

    let (deck_a, deck_b) = tokio::try_join!(client.load(input_a), client.load(input_b))?;
    let (a, b) = tokio::join!(
        ResolvedDeck::resolve(&catalog, &deck_a),
        ResolvedDeck::resolve(&catalog, &deck_b)
    );
    let comparison = DeckComparison::compare(&a.counts(), &b.counts()).sorted(config.set_order());
    let summary = comparison.summary();
    info!(?summary, "compared decks");

    let renderer: &dyn CardRenderer = if html { &HtmlRenderer } else { &TextRenderer };
    println!("{}", comparison_page(renderer, &comparison, &a, &b));
    Ok(())
}

fn recent(config: &ViewerConfig, clear: bool, remove: Option<&str>) -> Result<(), CliError> {
    let path = Path::new(&config.recent.path);
    let mut history = RecentDecks::load(path, config.recent.capacity);
    if clear || remove.is_some() {
        if clear {
            history.clear();
        } else if let Some(deck) = remove {
            if !history.remove(deck) {
                warn!(deck, "not in recent decks");
            }
        }
        return save_recent(&history, path);
    }

    if history.is_empty() {
        println!("No recent decks");
        return Ok(());
    }
    for deck in history.entries() {
        println!("{:<32} {:<12} {}", deck.name, deck.base_aspect, deck.url);
    }
    Ok(())
}

fn save_recent(history: &RecentDecks, path: &Path) -> Result<(), CliError> {
    history.save(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })
}

async fn clear_cache(config: &ViewerConfig) -> Result<(), CliError> {
    let root = &config.catalog.data_root;
    if is_remote(root) {
        info!(root = %root, "remote data root; no set files to clear");
    } else {
        let removed = clear_set_files(config.set_order(), Path::new(root))
            .await
            .map_err(|source| CliError::Io {
                path: root.clone(),
                source,
            })?;
        println!("Removed {removed} set file(s)");
    }
    save_recent(&RecentDecks::new(config.recent.capacity), Path::new(&config.recent.path))?;
    println!("Cleared recent decks");
    Ok(())
}

async fn fetch_sets(config: &ViewerConfig) -> Result<(), CliError> {
    let root = &config.catalog.data_root;
    if is_remote(root) {
        return Err(CliError::RemoteDataRoot(root.clone()));
    }
    let fetcher = HttpFetcher::direct(config.fetch.clone());
    let failures = download_sets(
        &fetcher,
        &config.catalog.card_api,
        config.set_order(),
        Path::new(root),
        DOWNLOAD_PAUSE,
    )
    .await;
    if failures.is_empty() {
        info!(sets = config.set_order().len(), "all sets downloaded");
        Ok(())
    } else {
        Err(CliError::Download(failures.len()))
    }
}
