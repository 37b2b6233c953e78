// CLI configuration
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

/// tagscan - read audio tags from the command line
#[derive(Parser, Debug)]
#[command(name = "tagscan")]
#[command(about = "Extract ID3v2, ID3v1 and FLAC tags from audio files", long_about = None)]
#[command(version)]
#[command(author = "xwsjjctz <xwsjjctz@icloud.com>")]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub format: OutputFormat,

    /// Quiet mode (only errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show parser diagnostics (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Do not extract embedded cover art
    #[arg(long, global = true)]
    pub no_cover: bool,

    /// Ignore cover art larger than this many bytes
    #[arg(long, value_name = "BYTES", global = true)]
    pub max_cover_bytes: Option<usize>,

    /// Include base64 cover data in JSON output
    #[arg(long, global = true)]
    pub cover_data: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Pretty,
    /// Compact JSON, one document per line
    Json,
    /// Aligned key/value table
    Table,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read metadata from audio file(s)
    Read {
        /// Audio file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Detect the tag container of each file
    Detect {
        /// Audio file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Read every file in a directory matching a pattern
    Batch {
        /// Directory path
        #[arg(short, long)]
        directory: PathBuf,

        /// File pattern (e.g., "*.mp3", "*.flac")
        #[arg(short, long, default_value = "*")]
        pattern: String,
    },

    /// Export cover art
    ExportCover {
        /// Audio file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output directory for the cover image
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show file information and parser diagnostics
    Info {
        /// Audio file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
}

impl Config {
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn extract_options(&self) -> tagscan::ExtractOptions {
        tagscan::ExtractOptions {
            read_picture: !self.no_cover,
            max_picture_bytes: self.max_cover_bytes,
        }
    }
}
