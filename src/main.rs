//! `streamscout` CLI - resolve playable streams from the command line

use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use streamscout::{
    HttpFetcher, MediaQuery, ProviderRegistry, ScrapeContext, SourceOutput, SourceProvider,
};

#[derive(Parser)]
#[command(name = "streamscout")]
#[command(about = "Resolve playable video streams for movies and show episodes")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve streams for a movie
    Movie {
        /// Movie title
        #[arg(short, long)]
        title: String,

        /// Release year
        #[arg(short, long)]
        year: u16,

        /// TMDB identifier
        #[arg(long = "tmdb-id")]
        tmdb_id: String,

        /// Use only this provider instead of rank-ordered fallback
        #[arg(short, long)]
        provider: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve streams for one show episode
    Show {
        /// Show title
        #[arg(short, long)]
        title: String,

        /// Release year
        #[arg(short, long)]
        year: u16,

        /// TMDB identifier
        #[arg(long = "tmdb-id")]
        tmdb_id: String,

        /// Season number
        #[arg(short, long)]
        season: u16,

        /// Episode number
        #[arg(short, long)]
        episode: u16,

        /// Use only this provider instead of rank-ordered fallback
        #[arg(short, long)]
        provider: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered providers in rank order
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "streamscout=info",
        _ => "streamscout=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Commands::Movie {
            title,
            year,
            tmdb_id,
            provider,
            json,
        } => {
            let query = MediaQuery::movie(title, year, tmdb_id);
            resolve_and_print(&query, provider.as_deref(), json).await
        }
        Commands::Show {
            title,
            year,
            tmdb_id,
            season,
            episode,
            provider,
            json,
        } => {
            let query = MediaQuery::show(title, year, tmdb_id, season, episode);
            resolve_and_print(&query, provider.as_deref(), json).await
        }
        Commands::Providers => {
            let registry = ProviderRegistry::new();
            for provider in registry.iter() {
                println!("{:<14} {:<14} rank {}", provider.id(), provider.name(), provider.rank());
            }
            Ok(())
        }
    }
}

/// Run the query through one provider, or through all of them in rank order
/// until one succeeds.
async fn resolve_and_print(query: &MediaQuery, provider: Option<&str>, json: bool) -> Result<()> {
    let ctx = ScrapeContext::new(Arc::new(HttpFetcher::new()?));
    let registry = ProviderRegistry::new();

    let output = match provider {
        Some(id) => {
            let provider = registry
                .get(id)
                .ok_or_else(|| anyhow!("unknown provider: {id}"))?;
            provider.scrape(&ctx, query).await?
        }
        None => {
            let mut result = None;
            for provider in registry.iter() {
                match provider.scrape(&ctx, query).await {
                    Ok(output) => {
                        result = Some(output);
                        break;
                    }
                    Err(e) => warn!(provider = provider.id(), "provider failed: {e}"),
                }
            }
            result.ok_or_else(|| anyhow!("no provider could produce a stream for this query"))?
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match output {
        SourceOutput::Files(map) => {
            for (quality, file) in &map {
                println!("{quality:>5}  {}", file.url);
            }
        }
        SourceOutput::Embeds(embeds) => {
            for embed in &embeds {
                println!("{:<14} {}", embed.embed_id, embed.url);
                for (name, value) in &embed.headers {
                    println!("{:<14}   {name}: {value}", "");
                }
            }
        }
    }

    Ok(())
}
