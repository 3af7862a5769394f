//! CLI subcommand definitions

use clap::{Args, Subcommand};

/// Main CLI commands
#[derive(Debug, Clone, Subcommand)]
pub(crate) enum Commands {
    /// Generate today's image (default)
    Run(RunArgs),
    /// Show the prompt selected for a day
    Prompt {
        /// Day of year (1-366) instead of today
        #[arg(long, value_name = "N")]
        day: Option<u32>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// List published images from the history file
    History {
        /// Only the most recent N entries
        #[arg(short = 'n', long, value_name = "N")]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Delete run logs older than the retention window
    Rotate,
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct RunArgs {
    /// Print the generator command without running it
    #[arg(long)]
    pub(crate) dry_run: bool,

    /// Day of year (1-366) used for prompt selection instead of today
    #[arg(long, value_name = "N")]
    pub(crate) day: Option<u32>,

    /// Print a JSON summary of the run on stdout
    #[arg(short, long)]
    pub(crate) json: bool,
}
