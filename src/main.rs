use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use pdfline::index::stats::show_stats;
use pdfline::index::{Extractor, Index, IndexBuilder, IndexConfig, IndexStore};
use pdfline::output::{self, print_json_lines, print_outcome};
use pdfline::session::{IndexSource, SearchOutcome, Session, SessionOptions};
use pdfline::shell;
use pdfline::utils::{AppConfig, CorruptCachePolicy};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "PDFLINE_LOG";

#[derive(Parser)]
#[command(name = "pdfline")]
#[command(about = "Search the lines of a PDF through a cached per-line index")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// PDF to search interactively (prompted for when omitted)
    file: Option<PathBuf>,

    /// Cache artifact location
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// Extraction worker threads (0 = all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Rebuild instead of failing when the cache artifact is unreadable
    #[arg(long, global = true)]
    rebuild_on_corrupt: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Build or refresh the cached index without searching
    Index {
        /// PDF to index
        file: PathBuf,

        /// Rebuild even if the document is unchanged
        #[arg(short, long)]
        force: bool,
    },
    /// Run a single search and exit
    Search {
        /// PDF to search
        file: PathBuf,

        /// Search term (words are joined with single spaces)
        #[arg(required = true)]
        query: Vec<String>,

        /// Print one JSON object per match
        #[arg(long)]
        json: bool,
    },
    /// Show what the cache artifact holds
    Stats,
    /// Delete the cache artifact
    Clear,
}

/// Extractor that tells the user before a rebuild starts
struct AnnouncingExtractor {
    extractor: Extractor,
    quiet: bool,
}

impl IndexBuilder for AnnouncingExtractor {
    fn build_index(&self, document: &Path) -> pdfline::Result<Index> {
        if !self.quiet {
            println!("Indexing PDF...");
        }
        self.extractor.build_index(document)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = AppConfig::load()?;
    if let Some(cache) = cli.cache.clone() {
        config.cache_path = cache;
    }
    if let Some(threads) = cli.threads {
        config.worker_threads = threads;
    }
    if cli.rebuild_on_corrupt {
        config.corrupt_cache = CorruptCachePolicy::Rebuild;
    }
    if cli.no_color {
        config.color = false;
    }
    debug!(?config, "configuration");

    let store = IndexStore::new(config.cache_path.clone());

    match cli.command {
        Some(Commands::Index { file, force }) => {
            let session = open_session(&file, &store, &config, force, false)?;
            match session.source() {
                IndexSource::Reused => println!("Index is up to date: {}", store.path().display()),
                IndexSource::Rebuilt => println!(
                    "Indexed {} lines from {} pages into {}",
                    session.index().len(),
                    session.index().page_count(),
                    store.path().display()
                ),
            }
        }
        Some(Commands::Search { file, query, json }) => {
            let session = open_session(&file, &store, &config, false, json)?;
            let query = query.join(" ");
            let outcome = session.search(&query);
            if json {
                // stdout stays a pure JSON stream; the notice goes to stderr
                if outcome == SearchOutcome::NoMatches {
                    eprintln!("{}", output::NO_MATCHES);
                }
                let mut stdout = io::stdout().lock();
                print_json_lines(&mut stdout, outcome.matches())?;
                stdout.flush()?;
            } else {
                print_outcome(&mut output::stdout(config.color), &outcome)?;
            }
        }
        Some(Commands::Stats) => {
            show_stats(&store, &mut io::stdout().lock())?;
        }
        Some(Commands::Clear) => {
            if store.remove()? {
                println!("Removed cache artifact: {}", store.path().display());
            } else {
                println!("No cache artifact at {}", store.path().display());
            }
        }
        None => {
            let mut stdin = io::stdin().lock();
            let file = match cli.file {
                Some(file) => file,
                None => shell::prompt_path(&mut stdin, &mut io::stdout())?
                    .context("No PDF file path given")?,
            };
            let session = open_session(&file, &store, &config, false, false)?;
            shell::run(&session, &mut stdin, &mut output::stdout(config.color))?;
        }
    }

    Ok(())
}

fn open_session(
    file: &Path,
    store: &IndexStore,
    config: &AppConfig,
    force_rebuild: bool,
    quiet: bool,
) -> Result<Session> {
    let builder = AnnouncingExtractor {
        extractor: Extractor::new(IndexConfig {
            worker_threads: config.effective_worker_threads(),
            silent: quiet,
        }),
        quiet,
    };
    let options = SessionOptions {
        force_rebuild,
        corrupt_cache: config.corrupt_cache,
    };

    let session = Session::open(file, store, &builder, options)
        .with_context(|| format!("Failed to open {}", file.display()))?;
    if session.source() == IndexSource::Reused && !quiet {
        println!("Using saved index...");
    }
    Ok(session)
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
