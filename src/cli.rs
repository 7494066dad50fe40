use clap::{Parser, Subcommand};
use distfetch::humanize::ByteSize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "distfetch")]
#[command(about = "Fetch migration artifacts from IPFS distributions", long_about = None)]
pub struct Cli {
    /// Configuration file (default: $DISTFETCH_CONFIG or config/distfetch.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a resource, trying the mirror and each gateway in order
    Fetch(FetchArgs),
    /// Print the distribution root that fetches would use
    DistPath(DistPathArgs),
}

#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    /// Resource path relative to the distribution root (e.g. go-ipfs/versions)
    pub path: String,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stop reading after this many bytes (e.g. 32MB); defaults to fetch.max_bytes
    #[arg(long)]
    pub max_bytes: Option<ByteSize>,

    /// Distribution root used when IPFS_DIST_PATH is unset
    #[arg(long)]
    pub dist: Option<String>,

    /// Overall deadline in seconds; defaults to fetch.timeout_secs
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct DistPathArgs {
    /// Distribution root used when IPFS_DIST_PATH is unset
    #[arg(long)]
    pub default: Option<String>,
}
