use std::io::{self, Write};

use diesel::{prelude::*, sqlite::SqliteConnection};
use dotenvy::dotenv;
use pam_api::models::Actor;
use pam_api::orm::{run_pending_migrations, set_foreign_keys};
use regex::Regex;

/// Opens `DATABASE_URL` with foreign keys on and the schema up to date.
pub fn establish_connection() -> Result<SqliteConnection, Box<dyn std::error::Error>> {
    dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let mut conn = SqliteConnection::establish(&database_url)?;
    set_foreign_keys(&mut conn)?;
    run_pending_migrations(&mut conn).map_err(|e| format!("Failed to run migrations: {}", e))?;
    Ok(conn)
}

/// Actor recorded in the change log for CLI edits, named after the
/// current system user.
pub fn cli_actor() -> Actor {
    let username = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "admin".to_string());
    Actor::system(format!("{}@pam-admin", username))
}

/// Search term given to `ls` and `rm`: a regex by default, a plain
/// substring with `-F`.
pub enum SearchTerm {
    Any,
    Fixed(String),
    Pattern(Regex),
}

impl SearchTerm {
    pub fn new(term: Option<String>, fixed_string: bool) -> Result<Self, Box<dyn std::error::Error>> {
        match term {
            None => Ok(SearchTerm::Any),
            Some(term) if fixed_string => Ok(SearchTerm::Fixed(term)),
            Some(term) => {
                let regex = Regex::new(&term)
                    .map_err(|e| format!("Invalid regex pattern '{}': {}", term, e))?;
                Ok(SearchTerm::Pattern(regex))
            }
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            SearchTerm::Any => true,
            SearchTerm::Fixed(term) => text.contains(term.as_str()),
            SearchTerm::Pattern(regex) => regex.is_match(text),
        }
    }

    pub fn filter<T>(&self, items: Vec<T>, key: impl Fn(&T) -> &str) -> Vec<T> {
        items.into_iter().filter(|item| self.is_match(key(item))).collect()
    }
}

/// Asks a yes/no question on stdin. Anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> Result<bool, Box<dyn std::error::Error>> {
    print!("{} [y/N]: ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term_modes() {
        let any = SearchTerm::new(None, false).unwrap();
        assert!(any.is_match("anything"));

        let fixed = SearchTerm::new(Some("a.b".to_string()), true).unwrap();
        assert!(fixed.is_match("xa.by"));
        assert!(!fixed.is_match("axb"));

        let pattern = SearchTerm::new(Some("^Sala [0-9]+$".to_string()), false).unwrap();
        assert!(pattern.is_match("Sala 101"));
        assert!(!pattern.is_match("Sala B"));
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        let err = SearchTerm::new(Some("(".to_string()), false).err().unwrap();
        assert!(err.to_string().starts_with("Invalid regex pattern"));
    }

    #[test]
    fn test_filter_keeps_order() {
        let names = vec!["Ana Lima", "Bruno Dias", "Carla Lima"];
        let term = SearchTerm::new(Some("Lima".to_string()), true).unwrap();
        assert_eq!(term.filter(names, |n| *n), vec!["Ana Lima", "Carla Lima"]);
    }

    #[test]
    fn test_cli_actor_has_no_user_row() {
        let actor = cli_actor();
        assert!(actor.user_id.is_none());
        assert!(actor.username.ends_with("@pam-admin"));
    }
}
