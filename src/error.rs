//! # Error Taxonomy
//!
//! Typed errors shared by the library. Each kind has a fixed place where it is
//! recovered:
//!
//! - [`ValidationError`] and [`SelectionError`]: inside the prompt that produced
//!   them (re-prompt in place).
//! - [`StoreError`]: escapes to the action boundary, where the menu engine prints
//!   it and aborts that action only.
//! - [`Interrupted`]: travels untouched up to the menu dispatch boundary.

use std::path::PathBuf;
use thiserror::Error;

/// The user cancelled while the program was blocked on input (Ctrl-C / Ctrl-D).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("interrupted by user")]
pub struct Interrupted;

/// Failures of the flat-text record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("malformed record on line {line} of {}: {record:?} ({reason})", path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        record: String,
        reason: String,
    },

    #[error("no record with key {key:?} in {}", path.display())]
    KeyNotFound { path: PathBuf, key: String },

    #[error("record {key:?} has {len} fields, cannot update field {index}")]
    FieldIndex { key: String, index: usize, len: usize },

    #[error("field value {value:?} for {key:?} contains a comma or line break")]
    InvalidField { key: String, value: String },

    #[error("no song with id {0} in the catalogue")]
    SongNotFound(u32),

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why a line of user input was rejected. The `Display` text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter at least one character!")]
    Empty,
    #[error("Your name must be at least one letter!")]
    EmptyName,
    #[error("Commas are not allowed here!")]
    Comma,
    #[error("Please follow the correct format when entering the date!")]
    DateFormat,
    #[error("The provided year is {0} years in the future!")]
    FutureYear(i32),
    #[error("You cannot have a month number greater than 12!")]
    MonthRange,
    #[error("You cannot have a day number greater than 31!")]
    DayRange,
    #[error("That date does not exist!")]
    NoSuchDate,
    #[error("That date is in the future!")]
    FutureDate,
    #[error("That's not a valid genre!")]
    UnknownGenre,
    #[error("Enter a duration as minutes (8.1) or minutes:seconds (2:30)!")]
    DurationFormat,
    #[error("Seconds must be below 60!")]
    SecondsRange,
    #[error("The duration must be longer than zero!")]
    ZeroDuration,
    #[error("An account with that name already exists!")]
    NameTaken,
}

/// Why a menu selection token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Your selection must be a number!")]
    NotANumber,
    #[error("Select a positive number!")]
    Negative,
    #[error("Selection out of bounds: must be at most {max}")]
    OutOfRange { max: usize },
}
