//! NOTE: Always use singular names for commands and subcommands.
//! For example: `nimbus client s3` instead of `nimbus clients s3`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Enable verbose logging output.
    ///
    /// Overrides `NIMBUS_LOG` and logs at debug level, metadata requests
    /// included.
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Path to the `config.ini` holding explicit credentials.
    ///
    /// Takes precedence over `NIMBUS_CONFIG_PATH` and the file next to the
    /// executable.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub subcommands: TopLevelCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum TopLevelCommand {
    /// Build (or reuse) a client for each service and report how it was
    /// resolved.
    Client {
        /// Service names, e.g. `s3 sqs`.
        #[arg(required = true)]
        services: Vec<String>,
    },
}
