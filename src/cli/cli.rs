use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Scaffold and inspect directory trees from YAML descriptions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// The root directory the structure lives under
    #[clap(long, short, default_value = "./data", global = true)]
    pub root: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the structure described in a config section under the root
    Create {
        /// The YAML config file holding the description
        #[clap(long, short, default_value = "config.yml")]
        config: PathBuf,

        /// The config section holding the description
        #[clap(long, short, default_value = fstruct::config::DEFAULT_SECTION)]
        section: String,

        /// Replace files that already exist
        #[clap(long)]
        overwrite: bool,

        /// Fail on directories that already exist
        #[clap(long)]
        no_exists_ok: bool,
    },
    /// Print the tree currently under the root
    Show,
    /// Print every path under the root matching a glob pattern
    Search { pattern: String },
}
