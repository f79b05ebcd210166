use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tuberscan")]
#[command(about = "Potato leaf disease detection and care companion")]
#[command(version)]
pub struct Cli {
    /// Classification endpoint address (overrides TUBERSCAN_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Use the offline mock classifier instead of the remote endpoint
    #[arg(long, default_value_t = false)]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Classify one or more leaf photos
    Predict(PredictArgs),

    /// List the disease library, optionally filtered
    Explore(ExploreArgs),

    /// Show the full description of one disease
    Show(ShowArgs),

    /// Save a disease for later, or remove it if already saved
    Bookmark(BookmarkArgs),

    /// List saved diseases
    Bookmarks,

    /// Print the care tip of the day
    Tip(TipArgs),
}

#[derive(Parser)]
pub struct PredictArgs {
    /// Photo files to classify
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Parser)]
pub struct ExploreArgs {
    /// Filter by a fragment of the name or summary
    pub query: Option<String>,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Disease identifier, as listed by explore
    pub id: String,
}

#[derive(Parser)]
pub struct BookmarkArgs {
    /// Disease identifier, as listed by explore
    pub id: String,
}

#[derive(Parser)]
pub struct TipArgs {
    /// How many tips to print, cycling through the pool
    #[arg(long, default_value_t = 1)]
    pub count: usize,
}
