//! Account records and the name normalization rule.

use crate::store::Record;
use std::fmt;

/// Column of the favourite artist in the account store.
pub const ARTIST_FIELD: usize = 2;
/// Column of the favourite genre in the account store.
pub const GENRE_FIELD: usize = 3;

/// One user account, keyed by its title-cased name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    /// ISO-8601 `YYYY-MM-DD`.
    pub birth_date: String,
    pub favourite_artist: String,
    pub favourite_genre: String,
}

impl Record for Account {
    const FIELDS: usize = 4;
    const EXACT: bool = false;

    fn key(&self) -> String {
        self.name.clone()
    }

    fn from_fields(fields: &[String]) -> Result<Self, String> {
        Ok(Self {
            name: fields[0].clone(),
            birth_date: fields[1].clone(),
            favourite_artist: fields[2].clone(),
            favourite_genre: fields[3].clone(),
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.birth_date.clone(),
            self.favourite_artist.clone(),
            self.favourite_genre.clone(),
        ]
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name:              {}", self.name)?;
        writeln!(f, "Date of birth:     {}", self.birth_date)?;
        writeln!(f, "Favourite artist:  {}", self.favourite_artist)?;
        write!(f, "Favourite genre:   {}", self.favourite_genre)
    }
}

/// Title-case a name: the first letter of every run of letters is upper case,
/// the rest lower case. `"mary-jane o'neil"` becomes `"Mary-Jane O'Neil"`.
#[must_use]
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut previous_is_letter = false;

    for c in raw.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("alice"), "Alice");
        assert_eq!(title_case("ALICE COOPER"), "Alice Cooper");
        assert_eq!(title_case("mary-jane o'neil"), "Mary-Jane O'Neil");
        assert_eq!(title_case("r2d2"), "R2D2");
    }

    #[test]
    fn test_extra_fields_are_tolerated() {
        let fields: Vec<String> = ["Alice", "1990-01-01", "Bowie", "rock", "extra"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let account = Account::from_fields(&fields).unwrap();
        assert_eq!(account.favourite_genre, "rock");
        assert_eq!(account.to_fields().len(), 4);
    }
}
