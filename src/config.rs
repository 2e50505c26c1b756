//! # Configuration Module
//!
//! Where the account store and the song catalogue live, and which genres an
//! account may pick.
//!
//! ## Resolution
//!
//! 1. Built-in defaults: `accounts.csv` and `songs.csv` in the working
//!    directory, genres `pop`, `rock`, `hip hop`, `rap`.
//! 2. A TOML file: the one passed with `--config`, or else
//!    `<config dir>/ocrtunes/config.toml` when it exists.
//!    - Linux: `~/.config/ocrtunes/config.toml`
//!    - macOS: `~/Library/Application Support/ocrtunes/config.toml`
//!    - Windows: `%APPDATA%\ocrtunes\config.toml`
//! 3. Command-line overrides for the two store paths.
//!
//! Every key of the file is optional:
//!
//! ```toml
//! accounts_path = "/home/me/.local/share/ocrtunes/accounts.csv"
//! songs_path = "/srv/music/songs.csv"
//! genres = ["pop", "rock", "jazz"]
//! ```

use anyhow::{bail, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_GENRES: [&str; 4] = ["pop", "rock", "hip hop", "rap"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub accounts_path: PathBuf,
    pub songs_path: PathBuf,
    /// Lower-case genre names accepted as a favourite genre.
    pub genres: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accounts_path: PathBuf::from("accounts.csv"),
            songs_path: PathBuf::from("songs.csv"),
            genres: DEFAULT_GENRES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Config {
    /// Load the configuration.
    ///
    /// With `explicit`, that file must exist and parse. Without it, the file in
    /// the platform config directory is used if present, defaults otherwise.
    ///
    /// # Errors
    ///
    /// - The explicit file is missing or unreadable
    /// - A config file is not valid TOML for [`Config`]
    /// - The genre list ends up empty
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|path| path.exists()),
        };

        let config = match path {
            Some(path) => {
                debug!("Reading configuration from {}", path.display());
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::from_toml(&content)
                    .with_context(|| format!("Invalid config file {}", path.display()))?
            }
            None => {
                debug!("No config file found, using defaults");
                Self::default().normalized()?
            }
        };

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.normalized()
    }

    /// Apply command-line path overrides.
    #[must_use]
    pub fn with_overrides(mut self, accounts_path: Option<PathBuf>, songs_path: Option<PathBuf>) -> Self {
        if let Some(path) = accounts_path {
            self.accounts_path = path;
        }
        if let Some(path) = songs_path {
            self.songs_path = path;
        }
        self
    }

    fn normalized(mut self) -> Result<Self> {
        let mut genres: Vec<String> = Vec::with_capacity(self.genres.len());
        for genre in &self.genres {
            let genre = genre.trim().to_lowercase();
            if genre.contains(',') {
                bail!("Genre {genre:?} contains a comma");
            }
            if !genre.is_empty() && !genres.contains(&genre) {
                genres.push(genre);
            }
        }
        if genres.is_empty() {
            bail!("At least one genre must be configured");
        }
        self.genres = genres;
        Ok(self)
    }
}

/// `<config dir>/ocrtunes/config.toml`, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ocrtunes").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.accounts_path, PathBuf::from("accounts.csv"));
        assert_eq!(config.songs_path, PathBuf::from("songs.csv"));
        assert_eq!(config.genres, ["pop", "rock", "hip hop", "rap"]);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::from_toml("songs_path = \"/srv/songs.csv\"").unwrap();
        assert_eq!(config.songs_path, PathBuf::from("/srv/songs.csv"));
        assert_eq!(config.accounts_path, PathBuf::from("accounts.csv"));
    }

    #[test]
    fn test_genres_are_normalized() {
        let config = Config::from_toml("genres = [\" Jazz \", \"jazz\", \"\", \"Hip Hop\"]").unwrap();
        assert_eq!(config.genres, ["jazz", "hip hop"]);
    }

    #[test]
    fn test_empty_genres_rejected() {
        assert!(Config::from_toml("genres = []").is_err());
        assert!(Config::from_toml("genres = [\"a,b\"]").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_explicit_file_is_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "accounts_path = \"users.csv\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.accounts_path, PathBuf::from("users.csv"));
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::default().with_overrides(Some(PathBuf::from("a.csv")), None);
        assert_eq!(config.accounts_path, PathBuf::from("a.csv"));
        assert_eq!(config.songs_path, PathBuf::from("songs.csv"));
    }

    #[test]
    fn test_default_config_path_structure() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("ocrtunes/config.toml"));
        }
    }
}
