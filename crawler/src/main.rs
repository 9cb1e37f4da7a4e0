use anyhow::Result;
use catalog::{DATA_PATH_ENV, DEFAULT_DATA_PATH};
use clap::Parser;
use crawler::{run, CrawlConfig, CrawlPolicy, BASE_URL};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Crawl the free-course listing into one JSON file")]
struct Cli {
    /// Output JSON file path
    #[arg(long, env = DATA_PATH_ENV, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,
    /// Site origin; listing and course links are resolved against it
    #[arg(long, default_value = BASE_URL)]
    base_url: Url,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Cli::parse();
    let config = CrawlConfig { base_url: args.base_url, output: args.data, policy: CrawlPolicy::default() };
    run(&config).await?;
    Ok(())
}
