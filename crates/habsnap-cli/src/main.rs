//! Command-line interface for habsnap.

mod crawl;
mod outline;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use habsnap_client::{OpenHabAuth, OpenHabClient, OpenHabConnectionConfig};
use habsnap_core::config;
use habsnap_storage::SnapshotStore;

use crate::crawl::CrawlOptions;

/// habsnap - Snapshot the openHAB semantic model to disk.
#[derive(Parser, Debug)]
#[command(name = "habsnap")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Snapshot directory (defaults to $HABSNAP_OUTPUT_DIR or ./memory/openhab).
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the REST root and all items, then write a fresh snapshot.
    Crawl {
        /// openHAB base URL (defaults to $OPENHAB_BASE_URL).
        #[arg(long)]
        base_url: Option<String>,
        /// API token (defaults to $OPENHAB_API_TOKEN).
        #[arg(long)]
        token: Option<String>,
        /// Ask openHAB to inline group members.
        #[arg(long)]
        recursive: bool,
        /// Do not keep a copy of the raw item payload.
        #[arg(long)]
        no_raw: bool,
        /// Accept invalid TLS certificates.
        #[arg(long)]
        insecure: bool,
    },
    /// Rebuild index.json from a stored raw item file, without network access.
    Build {
        /// Raw item file (defaults to items_raw.json in the snapshot directory).
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Print the stored semantic tree.
    Tree,
    /// Print the URL of an endpoint type from the stored REST root.
    Resolve {
        /// Link type, e.g. "items" or "things".
        link_type: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let output_dir = args.output_dir.unwrap_or_else(config::output_dir);

    match args.command {
        Command::Crawl {
            base_url,
            token,
            recursive,
            no_raw,
            insecure,
        } => {
            let connection = OpenHabConnectionConfig::resolve(base_url, token)?
                .with_recursive(recursive)
                .with_verify_ssl(!insecure);
            run_crawl(connection, output_dir, !no_raw).await
        }
        Command::Build { input } => run_build(output_dir, input),
        Command::Tree => run_tree(output_dir),
        Command::Resolve { link_type } => run_resolve(output_dir, &link_type),
    }
}

/// Logs go to stderr so `tree` and `resolve` output stays pipeable.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "warn,habsnap={0},habsnap_core={0},habsnap_client={0},habsnap_storage={0}",
            level
        ))
    });

    if config::log_json() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run_crawl(connection: OpenHabConnectionConfig, output_dir: PathBuf, write_raw: bool) -> Result<()> {
    tracing::info!(
        base_url = %connection.base_url,
        authenticated = connection.auth != OpenHabAuth::None,
        "Crawling openHAB"
    );

    let client = OpenHabClient::new(connection)?;
    let store = SnapshotStore::open(&output_dir)
        .with_context(|| format!("Failed to open snapshot directory {}", output_dir.display()))?;

    let outcome = crawl::crawl(&client, &store, &CrawlOptions { write_raw }).await?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &crawl::CrawlOutcome) {
    println!("{}", outcome.summary);
    if !outcome.report.is_clean() {
        println!(
            "Not in tree: {} equipment, {} points, {} locations",
            outcome.report.omitted_equipment.len(),
            outcome.report.omitted_points.len(),
            outcome.report.detached_locations.len()
        );
    }
    println!("Wrote index -> {}", outcome.index_path.display());
}

fn run_build(output_dir: PathBuf, input: Option<PathBuf>) -> Result<()> {
    let store = SnapshotStore::open(&output_dir)
        .with_context(|| format!("Failed to open snapshot directory {}", output_dir.display()))?;
    let input = input.unwrap_or_else(|| store.raw_items_path());

    let outcome = crawl::rebuild(&store, &input)?;
    print_outcome(&outcome);
    Ok(())
}

fn run_tree(output_dir: PathBuf) -> Result<()> {
    let store = SnapshotStore::open(&output_dir)?;
    let index = store
        .read_index()
        .context("No index found, run `habsnap crawl` or `habsnap build` first")?;
    print!("{}", outline::render(&index));
    Ok(())
}

fn run_resolve(output_dir: PathBuf, link_type: &str) -> Result<()> {
    let store = SnapshotStore::open(&output_dir)?;
    let root = store
        .read_rest_root()
        .context("No REST root found, run `habsnap crawl` first")?;
    let url = root.require_link(link_type)?;
    println!("{}", url);
    Ok(())
}
