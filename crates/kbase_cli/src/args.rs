use clap::Parser;

/// Interactive terminal client for the knowledge base.
#[derive(Debug, Parser)]
#[command(name = "kbase", version, about)]
pub struct Args {
    /// Knowledge API base URL (overrides KBASE_API_BASE_URL).
    #[arg(long)]
    pub base_url: Option<String>,

    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Absolute log directory (overrides KBASE_LOG_DIR).
    #[arg(long)]
    pub log_dir: Option<String>,
}
