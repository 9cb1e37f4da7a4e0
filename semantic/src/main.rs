use anyhow::Result;
use catalog::{Course, Embedder, HashEmbedder, SemanticIndex, DATA_PATH_ENV, DEFAULT_DATA_PATH, DEFAULT_TOP_K};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "semantic")]
#[command(about = "Rank courses by embedding similarity to a query", long_about = None)]
struct Cli {
    /// Course data JSON file
    #[arg(long, global = true, env = DATA_PATH_ENV, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,
    /// Embedding backend
    #[arg(long, global = true, value_enum, default_value_t = default_backend())]
    embedder: Backend,
    /// Directory for downloaded model weights
    #[arg(long, global = true)]
    model_cache: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Answer one query and print the ranked courses as JSON
    Search {
        query: String,
        /// Results to print; values above 5 are capped
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// Answer one query per line read from stdin
    Interactive {
        /// Results per query; values above 5 are capped
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    /// Pre-trained all-MiniLM-L6-v2
    Minilm,
    /// Feature hashing over stemmed terms, no model download
    Hash,
}

fn default_backend() -> Backend {
    if cfg!(feature = "fastembed") { Backend::Minilm } else { Backend::Hash }
}

#[derive(Serialize)]
struct Hit<'a> {
    score: f32,
    #[serde(flatten)]
    course: &'a Course,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.embedder {
        Backend::Hash => serve(SemanticIndex::load(HashEmbedder::default(), &cli.data)?, cli.command),
        Backend::Minilm => serve_minilm(&cli),
    }
}

#[cfg(feature = "fastembed")]
fn serve_minilm(cli: &Cli) -> Result<()> {
    let embedder = catalog::FastEmbedder::try_new(cli.model_cache.clone())?;
    serve(SemanticIndex::load(embedder, &cli.data)?, cli.command.clone())
}

#[cfg(not(feature = "fastembed"))]
fn serve_minilm(_cli: &Cli) -> Result<()> {
    anyhow::bail!("built without the `fastembed` feature; use --embedder hash")
}

/// Never more than [`DEFAULT_TOP_K`] results per query.
fn capped_top_k(requested: usize) -> usize {
    if requested > DEFAULT_TOP_K {
        tracing::warn!(requested, max = DEFAULT_TOP_K, "capping top-k");
    }
    requested.min(DEFAULT_TOP_K)
}

fn serve<E: Embedder>(index: SemanticIndex<E>, command: Commands) -> Result<()> {
    tracing::info!(courses = index.len(), "semantic index ready");
    match command {
        Commands::Search { query, top_k } => {
            let hits = index.search_scored(&query, capped_top_k(top_k))?;
            tracing::info!(query = %query, hits = hits.len(), "semantic search");
            let out: Vec<Hit> = hits.iter().map(|h| Hit { score: h.score, course: &h.course }).collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Interactive { top_k } => {
            let top_k = capped_top_k(top_k);
            let mut answered = 0usize;
            let stdin = io::stdin();
            let mut stdout = io::stdout().lock();
            for line in stdin.lock().lines() {
                let line = line?;
                let query = line.trim();
                if query.is_empty() { continue; }
                let hits = index.search_scored(query, top_k)?;
                let out: Vec<Hit> = hits.iter().map(|h| Hit { score: h.score, course: &h.course }).collect();
                writeln!(stdout, "{}", serde_json::to_string(&out)?)?;
                stdout.flush()?;
                answered += 1;
            }
            tracing::info!(queries = answered, "stdin closed");
        }
    }
    Ok(())
}
