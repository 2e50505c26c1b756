//! Terminal music companion: user accounts, interests, and random playlists
//! that fit a time budget.
//!
//! Core modules:
//! - [`store`] - Flat comma-separated record store with update-by-key
//! - [`menu`] - Menu engine with visibility predicates and cleanup callbacks
//! - [`playlist`] - Time-boxed random playlist generation
//! - [`session`] - Who is logged in
//! - [`app`] - The actions behind the main menu
//!
//! ### Supporting Modules
//!
//! - [`account`] / [`song`] - Record schemas
//! - [`prompt`] - Validated input prompts
//! - [`terminal`] - Input/output seam (rustyline console, scripted terminal)
//! - [`error`] - Error taxonomy
//! - [`config`] - Configuration file and store locations
//! - [`cli`] / [`completion`] - Command line and shell completions
//! - [`banner`] - Start-up heading
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use ocrtunes::app::{self, App};
//! use ocrtunes::config::Config;
//! use ocrtunes::menu::Mode;
//! use ocrtunes::terminal::Console;
//!
//! let mut app = App::new(Config::load(None)?);
//! let mut console = Console::new()?;
//! app::main_menu().show(&mut app, &mut console, Mode::Loop);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Generating a playlist directly
//!
//! ```
//! use ocrtunes::playlist::{generate, PlaylistRequest};
//! use ocrtunes::song::Song;
//!
//! let catalogue: Vec<Song> = (1..=10)
//!     .map(|id| Song { id, length_seconds: 180, ..Song::default() })
//!     .collect();
//! let request = PlaylistRequest { max_seconds: 600, preferred_genre: None };
//!
//! let playlist = generate(&catalogue, &request);
//! assert!(playlist.total_duration_seconds <= 600);
//! ```
//!
//! ## Error Handling
//!
//! Store and validation errors are typed (see [`error`]); actions return
//! `anyhow::Result` and the menu engine reports their failures. A user
//! interruption ([`error::Interrupted`]) is only ever handled by the menu.
//!
//! ## Logging
//!
//! Uses the `log` facade. The binary installs `env_logger`; set `RUST_LOG`
//! (e.g. `RUST_LOG=ocrtunes::store=debug`) or pass `--verbose`.

pub mod account;
pub mod app;
pub mod banner;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod menu;
pub mod playlist;
pub mod prompt;
pub mod session;
pub mod song;
pub mod store;
pub mod terminal;
