//! Local input checks run before any request is dispatched.
//!
//! These are fast pre-checks for immediate feedback; the remote service
//! remains the authority and may still reject input that passes here.

use crate::error::{FeedbackError, Result};

pub const TITLE_MIN_CHARS: usize = 5;
pub const DESCRIPTION_MIN_CHARS: usize = 20;
pub const DESCRIPTION_MAX_CHARS: usize = 5000;
pub const COMMENT_MAX_CHARS: usize = 1000;
pub const PASSWORD_MIN_CHARS: usize = 8;

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Validates a new idea's title and description.
pub fn validate_idea(title: &str, description: &str) -> Result<()> {
    let title = title.trim();
    let description = description.trim();

    if title.is_empty() || description.is_empty() {
        return Err(FeedbackError::validation(
            "idea",
            "Please fill in all fields",
        ));
    }

    if char_len(title) < TITLE_MIN_CHARS {
        return Err(FeedbackError::validation(
            "title",
            format!(
                "Title is too short (minimum is {} characters)",
                TITLE_MIN_CHARS
            ),
        ));
    }

    let description_len = char_len(description);
    if description_len < DESCRIPTION_MIN_CHARS {
        return Err(FeedbackError::validation(
            "description",
            format!(
                "Description is too short (minimum is {} characters)",
                DESCRIPTION_MIN_CHARS
            ),
        ));
    }
    if description_len > DESCRIPTION_MAX_CHARS {
        return Err(FeedbackError::validation(
            "description",
            format!(
                "Description is too long (maximum is {} characters)",
                DESCRIPTION_MAX_CHARS
            ),
        ));
    }

    Ok(())
}

/// Trims a comment body and checks it is within 1..=1000 characters.
///
/// Returns the trimmed content that should be submitted.
pub fn normalize_comment(content: &str) -> Result<String> {
    let trimmed = content.trim();

    if trimmed.is_empty() {
        return Err(FeedbackError::validation("content", "Please enter a comment"));
    }
    if char_len(trimmed) > COMMENT_MAX_CHARS {
        return Err(FeedbackError::validation(
            "content",
            format!(
                "Comment is too long (maximum is {} characters)",
                COMMENT_MAX_CHARS
            ),
        ));
    }

    Ok(trimmed.to_string())
}

/// Checks that both credentials were provided.
pub fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(FeedbackError::validation("email", "Email can't be blank"));
    }
    if password.is_empty() {
        return Err(FeedbackError::validation("password", "Password can't be blank"));
    }
    Ok(())
}

/// Checks the minimum password length.
pub fn validate_password(password: &str) -> Result<()> {
    if char_len(password) < PASSWORD_MIN_CHARS {
        return Err(FeedbackError::validation(
            "password",
            format!(
                "Password must be at least {} characters",
                PASSWORD_MIN_CHARS
            ),
        ));
    }
    Ok(())
}

/// Checks that a password confirmation matches.
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Result<()> {
    if password != confirmation {
        return Err(FeedbackError::validation(
            "password_confirmation",
            "Passwords do not match",
        ));
    }
    Ok(())
}
