//! # Validated Prompts
//!
//! Each input kind has a pure `parse_*` function and a prompt that keeps
//! asking until the parser accepts the line. Validation failures never leave
//! the prompt; only [`Interrupted`] does.

use crate::account::title_case;
use crate::error::{Interrupted, ValidationError};
use crate::terminal::Terminal;
use chrono::{Datelike, Local, NaiveDate};

/// Ask until `parse` accepts the input, printing each rejection.
pub fn ask<T, F>(term: &mut dyn Terminal, prompt: &str, mut parse: F) -> Result<T, Interrupted>
where
    F: FnMut(&str) -> Result<T, ValidationError>,
{
    loop {
        let raw = term.read_line(prompt)?;
        match parse(&raw) {
            Ok(value) => return Ok(value),
            Err(err) => term.print(&err.to_string()),
        }
    }
}

pub fn name(term: &mut dyn Terminal, prompt: &str) -> Result<String, Interrupted> {
    ask(term, prompt, parse_name)
}

/// Free text, or `default` when the user just presses enter.
pub fn text(term: &mut dyn Terminal, prompt: &str, default: Option<&str>) -> Result<String, Interrupted> {
    ask(term, prompt, |raw| parse_text(raw, default))
}

/// A `YYYY-MM-DD` date, returned in the same ISO form.
pub fn date(term: &mut dyn Terminal, prompt: &str) -> Result<String, Interrupted> {
    let today = Local::now().date_naive();
    let prompt = format!("{prompt}: (YYYY-MM-DD) ");
    ask(term, &prompt, |raw| parse_date(raw, today))
}

pub fn genre(term: &mut dyn Terminal, prompt: &str, genres: &[String]) -> Result<String, Interrupted> {
    loop {
        let raw = term.read_line(prompt)?;
        match parse_genre(&raw, genres) {
            Ok(genre) => return Ok(genre),
            Err(err @ ValidationError::UnknownGenre) => {
                term.print(&err.to_string());
                term.print(&format!("Available genres: {}", genres.join(", ")));
            }
            Err(err) => term.print(&err.to_string()),
        }
    }
}

/// A playlist length in whole seconds.
pub fn duration(term: &mut dyn Terminal, prompt: &str) -> Result<i64, Interrupted> {
    ask(term, prompt, parse_duration)
}

/// Wait for the user to press enter.
pub fn confirm(term: &mut dyn Terminal, prompt: &str) -> Result<(), Interrupted> {
    term.read_line(prompt).map(|_| ())
}

pub fn parse_name(raw: &str) -> Result<String, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if raw.contains(',') {
        return Err(ValidationError::Comma);
    }
    Ok(title_case(raw))
}

pub fn parse_text(raw: &str, default: Option<&str>) -> Result<String, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return match default {
            Some(default) if !default.is_empty() => Ok(default.to_string()),
            _ => Err(ValidationError::Empty),
        };
    }
    if raw.contains(',') {
        return Err(ValidationError::Comma);
    }
    Ok(raw.to_string())
}

/// Accept exactly `YYYY-MM-DD` for a real, non-future calendar date.
pub fn parse_date(raw: &str, today: NaiveDate) -> Result<String, ValidationError> {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_formed {
        return Err(ValidationError::DateFormat);
    }

    let number = |range: std::ops::Range<usize>| -> Result<u32, ValidationError> {
        raw[range].parse().map_err(|_| ValidationError::DateFormat)
    };
    let year = number(0..4)?;
    let month = number(5..7)?;
    let day = number(8..10)?;

    let year = i32::try_from(year).map_err(|_| ValidationError::DateFormat)?;
    if year > today.year() {
        return Err(ValidationError::FutureYear(year - today.year()));
    }
    if month > 12 {
        return Err(ValidationError::MonthRange);
    }
    if day > 31 {
        return Err(ValidationError::DayRange);
    }

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(ValidationError::NoSuchDate)?;
    if date > today {
        return Err(ValidationError::FutureDate);
    }
    Ok(date.format("%Y-%m-%d").to_string())
}

pub fn parse_genre(raw: &str, genres: &[String]) -> Result<String, ValidationError> {
    let genre = parse_text(raw, None)?.to_lowercase();
    if genres.iter().any(|known| *known == genre) {
        Ok(genre)
    } else {
        Err(ValidationError::UnknownGenre)
    }
}

/// Decimal minutes (`"8.1"`) or `minutes:seconds` (`"2:30"`) to seconds.
pub fn parse_duration(raw: &str) -> Result<i64, ValidationError> {
    let raw = raw.trim();

    let seconds = if let Some((minutes, seconds)) = raw.split_once(':') {
        let minutes: i64 = minutes
            .trim()
            .parse()
            .map_err(|_| ValidationError::DurationFormat)?;
        let seconds: i64 = seconds
            .trim()
            .parse()
            .map_err(|_| ValidationError::DurationFormat)?;
        if minutes < 0 || seconds < 0 {
            return Err(ValidationError::DurationFormat);
        }
        if seconds >= 60 {
            return Err(ValidationError::SecondsRange);
        }
        minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or(ValidationError::DurationFormat)?
    } else {
        let minutes: f64 = raw.parse().map_err(|_| ValidationError::DurationFormat)?;
        if !minutes.is_finite() || minutes < 0.0 || minutes > (i64::MAX / 120) as f64 {
            return Err(ValidationError::DurationFormat);
        }
        (minutes * 60.0).round() as i64
    };

    if seconds == 0 {
        return Err(ValidationError::ZeroDuration);
    }
    Ok(seconds)
}
