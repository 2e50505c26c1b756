//! Per-run session: who is logged in, and who was logged in last.
//!
//! Never persisted. Owned by the application context and handed to actions
//! explicitly.

use crate::account::Account;
use log::info;

#[derive(Debug, Default, Clone)]
pub struct Session {
    current_user: Option<Account>,
    last_username: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn current_user(&self) -> Option<&Account> {
        self.current_user.as_ref()
    }

    pub fn current_user_mut(&mut self) -> Option<&mut Account> {
        self.current_user.as_mut()
    }

    /// Name of the account that logged out most recently, offered as the
    /// default at the next login prompt.
    pub fn last_username(&self) -> Option<&str> {
        self.last_username.as_deref()
    }

    pub fn log_in(&mut self, account: Account) {
        info!("Session opened for {:?}", account.name);
        self.current_user = Some(account);
    }

    /// Replace the logged-in account with a fresh copy (e.g. re-read from disk).
    pub fn refresh(&mut self, account: Account) {
        if self.current_user.is_some() {
            self.current_user = Some(account);
        }
    }

    /// Clear the current user, remembering its name. Returns the account that
    /// was logged in, if any.
    pub fn log_out(&mut self) -> Option<Account> {
        let account = self.current_user.take()?;
        info!("Session closed for {:?}", account.name);
        self.last_username = Some(account.name.clone());
        Some(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Account {
        Account {
            name: "Alice".to_string(),
            birth_date: "1990-01-01".to_string(),
            favourite_artist: "Bowie".to_string(),
            favourite_genre: "rock".to_string(),
        }
    }

    #[test]
    fn test_starts_empty() {
        let session = Session::new();
        assert!(!session.is_logged_in());
        assert!(session.last_username().is_none());
    }

    #[test]
    fn test_log_out_remembers_name() {
        let mut session = Session::new();
        session.log_in(alice());

        let previous = session.log_out();

        assert_eq!(previous.map(|a| a.name), Some("Alice".to_string()));
        assert!(!session.is_logged_in());
        assert_eq!(session.last_username(), Some("Alice"));
    }

    #[test]
    fn test_log_out_when_logged_out_is_noop() {
        let mut session = Session::new();
        assert!(session.log_out().is_none());
        assert!(session.last_username().is_none());
    }

    #[test]
    fn test_refresh_only_when_logged_in() {
        let mut session = Session::new();
        session.refresh(alice());
        assert!(!session.is_logged_in());

        session.log_in(alice());
        let mut updated = alice();
        updated.favourite_genre = "pop".to_string();
        session.refresh(updated);
        assert_eq!(session.current_user().unwrap().favourite_genre, "pop");
    }
}
