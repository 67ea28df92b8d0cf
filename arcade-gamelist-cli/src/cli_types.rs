//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "arcade-gamelist")]
#[command(
    about = "Build a Batocera gamelist.xml from MAME DAT catalogs and extras",
    long_about = None
)]
pub(crate) struct Cli {
    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Input and output locations. Any path left out falls back to the
/// `[paths]` table of the settings file.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct PathArgs {
    /// A DAT zip, or the directory holding the ROM/CHD/artwork DAT zips
    #[arg(long)]
    pub dat_zip: Option<PathBuf>,

    /// Directory holding snap.zip, flyers.zip and artwork.zip
    #[arg(long)]
    pub extras_dir: Option<PathBuf>,

    /// ROM directory that receives gamelist.xml and media/
    #[arg(long)]
    pub roms_dir: Option<PathBuf>,

    /// Directory for extracted DAT files (default: a fresh temp directory)
    #[arg(long)]
    pub extract_temp: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Convert DAT catalogs and extras into gamelist.xml
    Convert {
        #[command(flatten)]
        paths: PathArgs,

        /// Ignore the existing gamelist.xml instead of merging with it
        #[arg(long)]
        no_merge: bool,

        /// Show what would be extracted and written without touching any files
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Inspect the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the current settings file contents
    Show,

    /// Print the settings file path
    Path,
}
