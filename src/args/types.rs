use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::validators::validate;
use crate::utils::path_utils::expand_path;

pub const DEFAULT_CONFIG_PATH: &str = "~/.album-uploader/config.json";
pub const DEFAULT_TOKEN_PATH: &str = "~/.album-uploader/token.json";
pub const DEFAULT_PARALLEL: usize = 4;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Print extra stuff (use -v -v or --verbose --verbose for even more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Service config JSON with the consumer key and secret
    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_CONFIG_PATH,
        value_parser = expand_path,
        global = true
    )]
    pub config: PathBuf,

    /// JSON file holding the OAuth access token and secret
    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_TOKEN_PATH,
        value_parser = expand_path,
        global = true
    )]
    pub token_file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Upload one file to an album
    Upload {
        /// Album key to upload into
        #[arg(short, long, value_name = "KEY")]
        album: String,

        /// File to upload
        file: PathBuf,
    },

    /// Upload every file matched by the given paths or glob patterns
    MultiUpload {
        /// Album key to upload into
        #[arg(short, long, value_name = "KEY")]
        album: String,

        /// How many uploads may run at once
        #[arg(short = 'n', long, default_value_t = DEFAULT_PARALLEL)]
        parallel: usize,

        /// Files or glob patterns, e.g. 'photos/*.jpg'. Patterns that match
        /// nothing or fail to parse are skipped.
        #[arg(required = true, value_name = "PATTERN")]
        patterns: Vec<String>,
    },
}

impl Command {
    #[must_use]
    pub fn album(&self) -> &str {
        match self {
            Command::Upload { album, .. } | Command::MultiUpload { album, .. } => album,
        }
    }
}

impl Args {
    /// Validate the arguments for the selected command, without modifying them
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid for the selected command.
    pub fn validate(&self) -> Result<(), String> {
        validate(self)
    }
}
