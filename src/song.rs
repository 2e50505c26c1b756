//! Song catalogue records: `id,artist,title,length_seconds,genre`.
//!
//! The catalogue is an external, read-only file. A missing catalogue is an
//! error, unlike the account store which is created on demand.

use crate::error::StoreError;
use crate::store::{self, Record};
use std::fmt;
use std::fs;
use std::path::Path;

/// One entry of the song catalogue.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: u32,
    pub artist: String,
    pub title: String,
    pub length_seconds: u32,
    pub genre: String,
}

impl Record for Song {
    const FIELDS: usize = 5;
    const EXACT: bool = true;

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn from_fields(fields: &[String]) -> Result<Self, String> {
        let id = fields[0]
            .trim()
            .parse()
            .map_err(|_| format!("song id {:?} is not a number", fields[0]))?;
        let length_seconds = fields[3]
            .trim()
            .parse()
            .map_err(|_| format!("song length {:?} is not a number of seconds", fields[3]))?;

        Ok(Self {
            id,
            artist: fields[1].clone(),
            title: fields[2].clone(),
            length_seconds,
            genre: fields[4].clone(),
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.artist.clone(),
            self.title.clone(),
            self.length_seconds.to_string(),
            self.genre.clone(),
        ]
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({})",
            self.artist,
            self.title,
            format_duration(u64::from(self.length_seconds))
        )
    }
}

/// Load the whole catalogue. Unlike [`store::load`], a missing file is an error.
pub fn load_catalogue(path: &Path) -> Result<Vec<Song>, StoreError> {
    let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    store::parse_records(path, &content)
}

/// Look a song up by id in an already loaded catalogue.
pub fn find_song(catalogue: &[Song], id: u32) -> Result<&Song, StoreError> {
    catalogue
        .iter()
        .find(|song| song.id == id)
        .ok_or(StoreError::SongNotFound(id))
}

/// `m:ss`, or `h:mm:ss` past an hour.
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
