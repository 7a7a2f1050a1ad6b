//! Business rules applied by the use cases before anything is persisted.

use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::domain::Movie;
use crate::error::{AppError, AppResult};

pub const MIN_PASSWORD_LENGTH: usize = 8;

static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+$")
        .expect("YouTube URL pattern compiles")
});

pub fn is_valid_youtube_url(url: &str) -> bool {
    YOUTUBE_URL.is_match(url)
}

pub fn validate_trailer_url(url: &str) -> AppResult<()> {
    if is_valid_youtube_url(url) {
        Ok(())
    } else {
        Err(AppError::validation("trailerUrl must be a valid YouTube URL"))
    }
}

/// Reports every unmet requirement, not just the first.
pub fn validate_password_strength(password: &str) -> AppResult<()> {
    let mut problems = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        problems.push("password must include an uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        problems.push("password must include a lowercase letter".to_string());
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        problems.push("password must include a special character".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(problems))
    }
}

pub fn ensure_owner(movie: &Movie, caller_id: Uuid) -> AppResult<()> {
    if movie.is_owned_by(caller_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_youtube_urls() {
        for url in [
            "https://youtu.be/abc123",
            "www.youtube.com/watch?v=xyz",
            "http://youtube.com/watch?v=xyz",
            "youtu.be/abc",
            "HTTPS://WWW.YOUTUBE.COM/watch?v=XYZ",
            "https://www.YouTube.com/embed/abc",
        ] {
            assert!(is_valid_youtube_url(url), "{url} should be accepted");
            assert!(validate_trailer_url(url).is_ok());
        }
    }

    #[test]
    fn test_rejects_other_urls() {
        for url in [
            "",
            "https://vimeo.com/123",
            "https://youtube.com",
            "https://youtube.com/",
            "https://notyoutube.com/watch?v=xyz",
            "https://youtube.com.evil.io/watch",
            "ftp://youtube.com/watch?v=xyz",
            "https://m.youtube.com/watch?v=xyz",
        ] {
            assert!(!is_valid_youtube_url(url), "{url} should be rejected");
        }
        assert!(matches!(
            validate_trailer_url("https://vimeo.com/123"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_strong_password_passes() {
        assert!(validate_password_strength("Sup3r$ecret").is_ok());
        assert!(validate_password_strength("abcDEF!!").is_ok());
    }

    #[test]
    fn test_weak_passwords_are_rejected() {
        for password in [
            "",
            "Ab!",
            "abcdefg!",
            "ABCDEFG!",
            "Abcdefgh",
            "Abcdefg1",
            "Ab!cdef",
        ] {
            assert!(
                matches!(validate_password_strength(password), Err(AppError::Validation(_))),
                "{password:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_password_problems_are_all_reported() {
        let Err(AppError::Validation(problems)) = validate_password_strength("abc") else {
            panic!("expected a validation error");
        };

        assert_eq!(
            problems,
            vec![
                "password must be at least 8 characters long".to_string(),
                "password must include an uppercase letter".to_string(),
                "password must include a special character".to_string(),
            ]
        );
    }

    #[test]
    fn test_ownership() {
        let owner = Uuid::new_v4();
        let movie = Movie {
            id: Uuid::new_v4(),
            title: "Heat".to_string(),
            description: "A group of professional bank robbers".to_string(),
            poster: "https://example.com/heat.png".to_string(),
            trailer: "https://youtu.be/abc123".to_string(),
            actors: vec!["Al Pacino".to_string()],
            genres: vec!["Crime".to_string()],
            user_id: owner,
        };

        assert!(ensure_owner(&movie, owner).is_ok());
        assert!(matches!(ensure_owner(&movie, Uuid::new_v4()), Err(AppError::Forbidden)));
    }
}
