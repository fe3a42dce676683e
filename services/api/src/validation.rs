//! Input validation utilities

use chrono::{Datelike, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Validate username
///
/// "me" is reserved for the `/users/me` endpoint and rejected everywhere,
/// including at signup.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.chars().count() > 150 {
        return Err("Username must be at most 150 characters long".to_string());
    }

    if username.eq_ignore_ascii_case("me") {
        return Err("Username 'me' is reserved".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX.get_or_init(|| {
        Regex::new(r"^[\w.@+-]+$").expect("Failed to compile username regex")
    });

    if !regex.is_match(username) {
        return Err(
            "Username can only contain letters, numbers, and . @ + - _ characters".to_string(),
        );
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate slug for categories and genres
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Err("Slug is required".to_string());
    }

    if slug.len() > 50 {
        return Err("Slug must be at most 50 characters long".to_string());
    }

    static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SLUG_REGEX
        .get_or_init(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("Failed to compile slug regex"));

    if !regex.is_match(slug) {
        return Err("Slug can only contain letters, numbers, hyphens, and underscores".to_string());
    }

    Ok(())
}

/// Validate review score
pub fn validate_score(score: i32) -> Result<(), String> {
    if !(1..=10).contains(&score) {
        return Err("Score must be between 1 and 10".to_string());
    }

    Ok(())
}

/// Validate title release year
pub fn validate_year(year: i32) -> Result<(), String> {
    let current_year = Utc::now().year();
    if year > current_year {
        return Err(format!("Year cannot be later than {current_year}"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a.b@c+d-e_f").is_ok());
        assert!(validate_username("x").is_ok());
    }

    #[test]
    fn rejects_reserved_username_me() {
        assert!(validate_username("me").is_err());
        assert!(validate_username("Me").is_err());
        assert!(validate_username("ME").is_err());
    }

    #[test]
    fn rejects_malformed_usernames() {
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("semi;colon").is_err());
        assert!(validate_username(&"a".repeat(151)).is_err());
    }

    #[test]
    fn username_length_limit_counts_characters_not_bytes() {
        // Cyrillic letters are two bytes each in UTF-8; 150 of them is
        // still a valid 150-character username.
        assert!(validate_username(&"й".repeat(150)).is_ok());
        assert!(validate_username(&"й".repeat(151)).is_err());
    }

    #[test]
    fn validates_email_shape_and_length() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(validate_email(&long).is_err());
    }

    #[test]
    fn validates_slugs() {
        assert!(validate_slug("sci-fi").is_ok());
        assert!(validate_slug("books_2020").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("no spaces").is_err());
        assert!(validate_slug(&"s".repeat(51)).is_err());
    }

    #[test]
    fn score_must_be_between_1_and_10() {
        for score in 1..=10 {
            assert!(validate_score(score).is_ok());
        }
        assert!(validate_score(0).is_err());
        assert!(validate_score(11).is_err());
        assert!(validate_score(-3).is_err());
    }

    #[test]
    fn year_cannot_be_in_the_future() {
        let current_year = Utc::now().year();
        assert!(validate_year(current_year).is_ok());
        assert!(validate_year(1895).is_ok());
        assert!(validate_year(current_year + 1).is_err());
    }
}
