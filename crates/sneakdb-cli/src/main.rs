mod extract;
mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sneakdb_core::Brand;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sneakdb-cli")]
#[command(about = "Extract variants, prices and images from sneaker product pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract a saved product page read from a file or stdin.
    Extract {
        /// Brand template the page follows (nike or adidas).
        #[arg(long)]
        brand: Brand,
        /// Page URL or origin the markup was fetched from.
        #[arg(long)]
        page_url: String,
        /// Read markup from this file instead of stdin.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Fetch product pages and extract each one.
    Scrape {
        /// Product page URLs.
        #[arg(required = true)]
        urls: Vec<String>,
        /// Treat every URL as this brand instead of detecting it.
        #[arg(long)]
        brand: Option<Brand>,
        /// Pages fetched at once (defaults to `SNEAKDB_MAX_CONCURRENT_PAGES`).
        #[arg(long)]
        concurrency: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = sneakdb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, max_price = %config.max_price, "configuration loaded");

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract {
            brand,
            page_url,
            file,
            pretty,
        } => extract::run_extract(&config, brand, &page_url, file.as_deref(), pretty)?,
        Commands::Scrape {
            urls,
            brand,
            concurrency,
        } => scrape::run_scrape(&config, &urls, brand, concurrency).await?,
    }

    Ok(())
}
