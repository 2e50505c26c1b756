//! # Playlist Generator
//!
//! Builds a playlist that fits a time budget by sampling the catalogue at
//! random.
//!
//! ## Algorithm
//!
//! Each step draws one song uniformly from the *whole* catalogue (with
//! replacement, so a song may appear more than once). The draw is counted,
//! and generation stops when:
//!
//! - the number of draws reaches the catalogue size, or
//! - the drawn song would push the total past the budget.
//!
//! Otherwise the song is appended and the next draw starts. An over-budget draw
//! ends the playlist; it is not skipped. The loop therefore runs at most
//! `catalogue.len()` times.
//!
//! The preferred genre travels with the request and the result for display
//! only; it does not weight the sampling.

use crate::song::Song;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Parameters of one generation run.
#[derive(Debug, Clone)]
pub struct PlaylistRequest {
    /// Budget in seconds. A budget of zero or less yields an empty playlist.
    pub max_seconds: i64,
    pub preferred_genre: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    /// Chosen song ids, in play order. May contain repeats.
    pub song_ids: Vec<u32>,
    pub total_duration_seconds: i64,
    pub preferred_genre: Option<String>,
}

impl Playlist {
    pub fn is_empty(&self) -> bool {
        self.song_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.song_ids.len()
    }
}

/// Generate a playlist using the thread-local RNG.
pub fn generate(catalogue: &[Song], request: &PlaylistRequest) -> Playlist {
    generate_with_rng(catalogue, request, &mut rand::thread_rng())
}

/// Generate a playlist with an explicit RNG (seed it for reproducible output).
pub fn generate_with_rng<R: Rng + ?Sized>(catalogue: &[Song], request: &PlaylistRequest, rng: &mut R) -> Playlist {
    let mut playlist = Playlist {
        preferred_genre: request.preferred_genre.clone(),
        ..Playlist::default()
    };

    if request.max_seconds <= 0 || catalogue.is_empty() {
        return playlist;
    }

    let mut examined = 0;
    while let Some(candidate) = catalogue.choose(rng) {
        examined += 1;
        if examined == catalogue.len() {
            break;
        }

        let length = i64::from(candidate.length_seconds);
        if playlist.total_duration_seconds + length > request.max_seconds {
            break;
        }

        playlist.song_ids.push(candidate.id);
        playlist.total_duration_seconds += length;
    }

    debug!(
        "Generated playlist of {} songs, {}s of {}s budget after {examined} draws",
        playlist.len(),
        playlist.total_duration_seconds,
        request.max_seconds
    );
    playlist
}
