use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "turnote")]
#[command(version, about = "A small REST server for owned notes")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// JSON config file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Address to listen on, e.g. 127.0.0.1:8080
        #[arg(long)]
        bind: Option<String>,

        /// SQLite database file
        #[arg(long)]
        database: Option<PathBuf>,

        /// Log filter used when RUST_LOG is unset
        #[arg(long)]
        log_level: Option<String>,
    },

    /// Show a single note
    Get {
        /// Note ID
        id: i64,

        /// SQLite database file
        #[arg(long, default_value = "turnote.db")]
        database: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the notes of one owner
    List {
        /// Owner user ID
        #[arg(long)]
        owner: i64,

        /// SQLite database file
        #[arg(long, default_value = "turnote.db")]
        database: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a note
    Delete {
        /// Note ID
        id: i64,

        /// SQLite database file
        #[arg(long, default_value = "turnote.db")]
        database: PathBuf,
    },
}
