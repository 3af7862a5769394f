//! CLI argument definitions
//!
//! Global options and how they map onto configuration overrides.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Overrides;
use crate::utils::LogLevel;

use super::commands::{Commands, RunArgs};

#[derive(Debug, Parser)]
#[command(name = "dailyshot")]
#[command(about = "Daily prompt rotation and bookkeeping around an image generator", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Project directory holding the generator, venv and env files
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) project_dir: Option<PathBuf>,

    /// Preferred env file (default: <project>/secrets.env)
    #[arg(long, global = true, value_name = "FILE")]
    pub(crate) env_file: Option<PathBuf>,

    /// Fallback env file (default: <project>/.env)
    #[arg(long, global = true, value_name = "FILE")]
    pub(crate) fallback_env: Option<PathBuf>,

    /// Timezone deciding what "today" is (e.g. "Europe/Berlin", "UTC")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Skip all notification providers
    #[arg(long, global = true)]
    pub(crate) no_notify: bool,

    /// Only print warnings and errors to the console
    #[arg(short, long, global = true)]
    pub(crate) quiet: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    pub(crate) fn overrides(&self) -> Overrides {
        Overrides {
            project_dir: self.project_dir.clone(),
            env_file: self.env_file.clone(),
            fallback_env: self.fallback_env.clone(),
            timezone: self.timezone.clone(),
            no_notify: self.no_notify,
        }
    }

    pub(crate) fn log_level(&self) -> LogLevel {
        LogLevel::from_flags(self.quiet, self.debug)
    }

    /// `run` is the default when no subcommand is given
    pub(crate) fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }
}
