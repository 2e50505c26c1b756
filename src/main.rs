//! # OCRtunes
//!
//! Interactive terminal front end. Parses the command line, loads the
//! configuration and runs the main menu until the user cancels out of it.
//!
//! ## Usage
//!
//! ```bash
//! # Start a session with stores in the working directory
//! ocrtunes
//!
//! # Point at other stores
//! ocrtunes --accounts ~/ocr/accounts.csv --songs ~/ocr/songs.csv
//!
//! # Shell completions
//! ocrtunes completion zsh
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::{debug, info};
use ocrtunes::app::{self, App};
use ocrtunes::config::Config;
use ocrtunes::menu::Mode;
use ocrtunes::terminal::Console;
use ocrtunes::{banner, cli, completion};

/// Main entry point.
///
/// # Logging
///
/// `env_logger` writes to stderr and is quiet by default so it does not mix
/// with the menu:
/// - `RUST_LOG=debug ocrtunes` - Enable debug logging
/// - `RUST_LOG=ocrtunes::store=info ocrtunes` - Module-specific logging
/// - `ocrtunes --verbose` - Same as `RUST_LOG=debug` unless `RUST_LOG` is set
fn main() -> Result<()> {
    let args = cli::Args::parse();

    let default_filter = if args.verbose { "debug" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if let Some(cli::Command::Completion { shell }) = args.command {
        let mut cmd = cli::Args::command();
        completion::generate_completions(completion::shell_to_completion_shell(&shell), &mut cmd);
        return Ok(());
    }

    let config = Config::load(args.config.as_deref())?.with_overrides(args.accounts, args.songs);
    info!(
        "Accounts in {}, catalogue in {}",
        config.accounts_path.display(),
        config.songs_path.display()
    );

    if !args.no_banner {
        banner::print_heading();
    }

    let mut console = Console::new()?;
    let mut app = App::new(config);
    let exit = app::main_menu().show(&mut app, &mut console, Mode::Loop);
    debug!("Main menu exited: {exit:?}");

    Ok(())
}
