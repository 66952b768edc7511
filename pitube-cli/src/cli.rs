use clap::Parser;
use pitube_engine::manifest::{DEFAULT_LOCAL_MANIFEST, DEFAULT_MANIFEST_URL};
use std::path::PathBuf;
use std::time::Duration;

/// Download every stream listed in a YAML manifest with youtube-dl.
///
/// Download options can be overridden through PITUBE_FORMAT,
/// PITUBE_DESTINATION, PITUBE_ARCHIVE, PITUBE_QUALITY, PITUBE_PLAYLIST_END
/// and PITUBE_BASE_CMD (a `.env` file in the working directory is honored).
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Remote manifest to fetch when no local manifest exists
    #[arg(long, default_value = DEFAULT_MANIFEST_URL)]
    pub manifest_url: String,

    /// Local manifest that replaces the remote one when present
    #[arg(long, default_value = DEFAULT_LOCAL_MANIFEST)]
    pub local_manifest: PathBuf,

    /// Print the commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Stop at the first stream that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Per-stream download timeout in seconds (0 disables it)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Manifest download timeout in seconds (0 disables it)
    #[arg(long, value_name = "SECS")]
    pub fetch_timeout: Option<u64>,

    /// Also write daily-rotated log files into this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn stream_timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    pub fn manifest_timeout(&self) -> Option<Duration> {
        self.fetch_timeout.map(Duration::from_secs)
    }
}
