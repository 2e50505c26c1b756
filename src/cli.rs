//! # Command-Line Interface Module
//!
//! Without a subcommand, `ocrtunes` starts the interactive session.
//!
//! ```bash
//! ocrtunes
//! ocrtunes --accounts ~/ocr/accounts.csv --songs ~/ocr/songs.csv
//! ocrtunes completion bash > ~/.local/share/bash-completion/completions/ocrtunes
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// OCRtunes: accounts, interests and time-boxed random playlists.
#[derive(Parser, Debug)]
#[command(name = "ocrtunes")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Account store (comma-separated text, created if missing)
    #[arg(long, value_name = "FILE", env = "OCRTUNES_ACCOUNTS", value_hint = clap::ValueHint::FilePath)]
    pub accounts: Option<PathBuf>,

    /// Song catalogue: `id,artist,title,length_seconds,genre` per line
    #[arg(long, value_name = "FILE", env = "OCRTUNES_SONGS", value_hint = clap::ValueHint::FilePath)]
    pub songs: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,

    /// Skip the start-up banner
    #[arg(long)]
    pub no_banner: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate shell completions
    ///
    /// Prints a completion script for the given shell to stdout.
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
