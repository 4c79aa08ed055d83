//! CLI argument parsing for rfs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rfs")]
#[command(author, version, about = "Run the sandboxed repository tools by hand", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Allowed root directory; repeat for more. The first is the base for relative paths.
    #[arg(short, long = "root", value_name = "DIR")]
    pub roots: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the tool catalog
    Tools,

    /// Print a tool's JSON input schema
    Schema {
        /// Tool name
        #[arg(required = true)]
        tool: String,
    },

    /// Run one tool and print its result
    Call {
        /// Tool name
        #[arg(required = true)]
        tool: String,

        /// JSON input (read from stdin when omitted)
        input: Option<String>,
    },
}
