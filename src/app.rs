//! # Application Actions
//!
//! The [`App`] context (configuration, account store, session) and the
//! actions behind the main menu. Every action takes the context and the
//! terminal explicitly; nothing here is global.

use crate::account::{title_case, Account, ARTIST_FIELD, GENRE_FIELD};
use crate::config::Config;
use crate::error::ValidationError;
use crate::menu::{Cleanups, Menu, Mode};
use crate::playlist::{self, PlaylistRequest};
use crate::prompt;
use crate::session::Session;
use crate::song::{self, format_duration};
use crate::store::RecordStore;
use crate::terminal::Terminal;
use anyhow::{anyhow, Context, Result};
use log::{info, warn};

pub const MAIN_MENU_TITLE: &str = "=== OCRtunes Main Menu ===";

/// Everything an action may read or change.
pub struct App {
    pub config: Config,
    pub accounts: RecordStore<Account>,
    pub session: Session,
}

impl App {
    pub fn new(config: Config) -> Self {
        let accounts = RecordStore::new(config.accounts_path.clone());
        Self {
            config,
            accounts,
            session: Session::new(),
        }
    }

    fn current_account(&self) -> Result<&Account> {
        self.session
            .current_user()
            .ok_or_else(|| anyhow!("You need to be logged in to do that"))
    }
}

fn logged_in(app: &App) -> bool {
    app.session.is_logged_in()
}

fn logged_out(app: &App) -> bool {
    !app.session.is_logged_in()
}

/// The top-level menu. Options switch between the logged-out and logged-in sets.
pub fn main_menu() -> Menu<App> {
    let mut menu = Menu::titled(MAIN_MENU_TITLE);
    menu.add_option("Create an account", create_account).visible_when(logged_out);
    menu.add_option("Log in", log_in).visible_when(logged_out);
    menu.add_option("View profile", view_profile).visible_when(logged_in);
    menu.add_option("Generate a playlist", generate_playlist).visible_when(logged_in);
    menu.add_option("Edit interests", edit_interests).visible_when(logged_in);
    menu.add_option("Log out", log_out).visible_when(logged_in);
    menu
}

pub fn create_account(app: &mut App, term: &mut dyn Terminal) -> Result<()> {
    let name = loop {
        let name = prompt::name(term, "Enter your name: ")?;
        if app.accounts.find_by_key(&name)?.is_none() {
            break name;
        }
        term.print(&ValidationError::NameTaken.to_string());
    };
    let birth_date = prompt::date(term, "Enter your date of birth")?;
    let favourite_artist = prompt::text(term, "Enter your favourite artist: ", None)?;
    let favourite_genre = prompt::genre(term, "Enter your favourite genre: ", &app.config.genres)?;

    term.print("Thank you! Creating your account...");
    let account = Account {
        name,
        birth_date,
        favourite_artist,
        favourite_genre,
    };
    app.accounts
        .append(&account)
        .context("Failed to save the new account")?;

    info!("Created account {:?}", account.name);
    term.print("Successfully created account: welcome to OCRtunes!");
    Ok(())
}

pub fn log_in(app: &mut App, term: &mut dyn Terminal) -> Result<()> {
    let default = app.session.last_username().map(str::to_string);
    let prompt_text = match &default {
        Some(name) => format!("Enter your name: ({name}) "),
        None => "Enter your name: ".to_string(),
    };

    let account = loop {
        let username = title_case(&prompt::text(term, &prompt_text, default.as_deref())?);
        match app.accounts.find_by_key(&username)? {
            Some(account) => break account,
            None => term.print("Could not find an account with that name!"),
        }
    };

    term.print(&format!(
        "Successfully logged in to account \"{}\": welcome back to OCRtunes!",
        account.name
    ));
    app.session.log_in(account);
    Ok(())
}

pub fn log_out(app: &mut App, term: &mut dyn Terminal) -> Result<()> {
    prompt::confirm(term, "Press enter to log out...")?;
    app.session.log_out();
    term.print("Successfully logged out!");
    Ok(())
}

pub fn view_profile(app: &mut App, term: &mut dyn Terminal) -> Result<()> {
    let account = app.current_account()?;
    term.print(&account.to_string());
    Ok(())
}

pub fn generate_playlist(app: &mut App, term: &mut dyn Terminal) -> Result<()> {
    let genre = app.current_account()?.favourite_genre.clone();
    let max_seconds = prompt::duration(
        term,
        "How long should the playlist be? (minutes, or minutes:seconds) ",
    )?;

    let catalogue = song::load_catalogue(&app.config.songs_path).context("Failed to load the song catalogue")?;
    let request = PlaylistRequest {
        max_seconds,
        preferred_genre: Some(genre),
    };
    let playlist = playlist::generate(&catalogue, &request);

    if playlist.is_empty() {
        term.print("No songs fit in that amount of time!");
        return Ok(());
    }

    if let Some(genre) = &playlist.preferred_genre {
        term.print(&format!("Your playlist, made for a {genre} fan:"));
    }
    for (position, id) in playlist.song_ids.iter().enumerate() {
        let song = song::find_song(&catalogue, *id)?;
        term.print(&format!("{:>3}. {song}", position + 1));
    }
    let total = u64::try_from(playlist.total_duration_seconds).unwrap_or_default();
    term.print(&format!(
        "{} songs, {} in total.",
        playlist.len(),
        format_duration(total)
    ));
    Ok(())
}

pub fn edit_interests(app: &mut App, term: &mut dyn Terminal) -> Result<()> {
    let mut menu = Menu::new();
    menu.add_option_with_cleanup("Edit favourite artist", edit_artist);
    menu.add_option_with_cleanup("Edit favourite genre", edit_genre);
    menu.show(app, term, Mode::Once);
    Ok(())
}

pub fn edit_artist(app: &mut App, term: &mut dyn Terminal, cleanups: &mut Cleanups<App>) -> Result<()> {
    let account = app.current_account()?.clone();
    cleanups.register(resync_session);

    term.print(&format!(
        "Your favourite artist is currently set to \"{}\"",
        account.favourite_artist
    ));
    let artist = prompt::text(term, "Enter your new favourite artist: ", None)?;
    app.accounts
        .update_field(&account.name, ARTIST_FIELD, &artist)
        .context("Failed to save your favourite artist")?;

    term.print(&format!("Successfully changed your favourite artist to \"{artist}\""));
    Ok(())
}

pub fn edit_genre(app: &mut App, term: &mut dyn Terminal, cleanups: &mut Cleanups<App>) -> Result<()> {
    let account = app.current_account()?.clone();
    cleanups.register(resync_session);

    term.print(&format!(
        "Your favourite genre is currently set to \"{}\"",
        account.favourite_genre
    ));
    let genre = prompt::genre(term, "Enter your new favourite genre: ", &app.config.genres)?;
    app.accounts
        .update_field(&account.name, GENRE_FIELD, &genre)
        .context("Failed to save your favourite genre")?;

    term.print(&format!("Successfully changed your favourite genre to \"{genre}\""));
    Ok(())
}

/// Cleanup: make the logged-in account match what is on disk.
fn resync_session(app: &mut App, term: &mut dyn Terminal) {
    let Some(name) = app.session.current_user().map(|account| account.name.clone()) else {
        return;
    };

    match app.accounts.find_by_key(&name) {
        Ok(Some(account)) => app.session.refresh(account),
        Ok(None) => warn!("Account {name:?} vanished from {}", app.accounts.path().display()),
        Err(err) => term.print(&format!("Could not reload your account: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::ScriptedTerminal;
    use std::fs;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir) -> App {
        App::new(Config {
            accounts_path: dir.path().join("accounts.csv"),
            songs_path: dir.path().join("songs.csv"),
            ..Config::default()
        })
    }

    #[test]
    fn test_main_menu_visibility_follows_session() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let menu = main_menu();

        assert_eq!(menu.visible_labels(&app), ["Create an account", "Log in"]);

        app.session.log_in(Account {
            name: "Alice".to_string(),
            birth_date: "1990-01-01".to_string(),
            favourite_artist: "Bowie".to_string(),
            favourite_genre: "rock".to_string(),
        });
        assert_eq!(
            menu.visible_labels(&app),
            ["View profile", "Generate a playlist", "Edit interests", "Log out"]
        );
    }

    #[test]
    fn test_create_account_rejects_taken_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("accounts.csv"), "Alice,1990-01-01,Bowie,rock\n").unwrap();
        let mut app = app_in(&dir);
        let mut term = ScriptedTerminal::new(["alice", "bob", "1985-05-05", "Queen", "pop"]);

        create_account(&mut app, &mut term).unwrap();

        assert!(term.printed("An account with that name already exists!"));
        assert_eq!(
            fs::read_to_string(dir.path().join("accounts.csv")).unwrap(),
            "Alice,1990-01-01,Bowie,rock\nBob,1985-05-05,Queen,pop\n"
        );
    }

    #[test]
    fn test_log_in_offers_last_username() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("accounts.csv"), "Alice,1990-01-01,Bowie,rock\n").unwrap();
        let mut app = app_in(&dir);
        let mut term = ScriptedTerminal::new(["nobody", "ALICE", "", ""]);

        log_in(&mut app, &mut term).unwrap();
        assert!(term.printed("Could not find an account with that name!"));
        log_out(&mut app, &mut term).unwrap();
        log_in(&mut app, &mut term).unwrap();

        assert_eq!(app.session.current_user().unwrap().name, "Alice");
        assert_eq!(term.prompts().last().unwrap(), "Enter your name: (Alice) ");
    }

    #[test]
    fn test_generate_playlist_without_catalogue_fails() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.session.log_in(Account {
            name: "Alice".to_string(),
            birth_date: "1990-01-01".to_string(),
            favourite_artist: "Bowie".to_string(),
            favourite_genre: "rock".to_string(),
        });
        let mut term = ScriptedTerminal::new(["10"]);

        let err = generate_playlist(&mut app, &mut term).unwrap_err();

        assert!(format!("{err:#}").contains("song catalogue"));
    }
}
