use anyhow::Context;
use clap::{Parser, Subcommand};
use lincsfsd_scraper::DirectoryClient;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lincsfsd-cli")]
#[command(about = "Search the Lincolnshire Family Services Directory from the command line")]
struct Cli {
    /// Pretty-print the JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a directory search and print every result with its details.
    Search {
        /// Search results URL, e.g. `https://lincolnshire.fsd.org.uk/kb5/lincs/fsd/results.action?qt=toddler`
        url: String,
    },
    /// Fetch and print a single service detail page.
    Detail {
        /// Absolute detail page URL.
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = lincsfsd_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = DirectoryClient::from_config(&config)?;

    let output = match cli.command {
        Commands::Search { url } => {
            let records = client
                .search(&url)
                .await
                .with_context(|| format!("directory search failed for {url}"))?;
            tracing::info!(records = records.len(), "search complete");
            to_json(&records, cli.pretty)?
        }
        Commands::Detail { url } => {
            let details = client
                .fetch_detail(&url)
                .await
                .with_context(|| format!("detail fetch failed for {url}"))?;
            to_json(&details, cli.pretty)?
        }
    };

    println!("{output}");
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
