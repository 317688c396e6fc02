// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Argument definitions.

use std::path::PathBuf;

use canvas_store::NewlineMode;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "canvas")]
#[command(version, about = "Inspect, validate and normalise .canvas documents")]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug). `RUST_LOG` also applies.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Read and write preferences here instead of the platform config dir.
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a document and list integrity warnings
    Check {
        /// Path to the .canvas file
        file: PathBuf,
        /// Treat duplicate ids and dangling edges as errors
        #[arg(long)]
        strict: bool,
    },
    /// Rewrite a document in canonical form
    Fmt {
        /// Path to the .canvas file
        file: PathBuf,
        /// Write here instead of overwriting FILE
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
        /// Single-line output
        #[arg(long)]
        compact: bool,
        /// Keep line breaks inside strings unescaped
        #[arg(long)]
        literal_newlines: bool,
    },
    /// Summarise node kinds, edges and integrity issues
    Stats {
        /// Path to the .canvas file
        file: PathBuf,
    },
    /// List every id with its kind
    Ids {
        /// Path to the .canvas file
        file: PathBuf,
    },
    /// Show preferences, updating any that are given
    Prefs {
        /// Fail loads on duplicate ids or dangling edges
        #[arg(long)]
        strict_references: Option<bool>,
        /// Pretty-print saved documents
        #[arg(long)]
        pretty: Option<bool>,
        /// Newline handling inside strings on save
        #[arg(long, value_enum)]
        newline_mode: Option<NewlineArg>,
        /// Spaces per indent level
        #[arg(long)]
        indent: Option<usize>,
    },
}

/// Command-line spelling of [`NewlineMode`].
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum NewlineArg {
    /// Standard `\n` escapes
    Escaped,
    /// Raw line breaks
    Literal,
}

impl From<NewlineArg> for NewlineMode {
    fn from(arg: NewlineArg) -> Self {
        match arg {
            NewlineArg::Escaped => Self::Escaped,
            NewlineArg::Literal => Self::Literal,
        }
    }
}
