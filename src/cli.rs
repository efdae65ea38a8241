use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether an episode of a show is filler.
    Check(CheckArgs),
    /// Resolve a show title to its full classification record.
    Resolve(ResolveArgs),
    /// Manage the local classification cache.
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Show title as scraped from the player page.
    #[arg(long)]
    pub title: String,

    /// Episode number currently playing.
    #[arg(long, conflicts_with = "episode_title")]
    pub episode: Option<u32>,

    /// Freeform episode heading (e.g. "E3 - The Chase") to take the
    /// episode number from instead of --episode.
    #[arg(long)]
    pub episode_title: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Show title to resolve.
    #[arg(long)]
    pub title: String,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Delete every stored classification record.
    Clear(CacheClearArgs),
}

#[derive(Debug, Args)]
pub struct CacheClearArgs {
    /// Cache directory (default: FILLERSKIP_CACHE_DIR or ~/.cache/fillerskip).
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

impl CacheClearArgs {
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(crate::store::default_cache_dir)
    }
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Catalog site base URL (default: FILLERSKIP_BASE_URL or the
    /// production site).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Cache directory (default: FILLERSKIP_CACHE_DIR or ~/.cache/fillerskip).
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

impl SourceArgs {
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .or_else(|| std::env::var("FILLERSKIP_BASE_URL").ok())
            .unwrap_or_else(|| crate::sources::DEFAULT_BASE_URL.to_owned())
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(crate::store::default_cache_dir)
    }
}
