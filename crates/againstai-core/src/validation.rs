//! Validation of human-entered text.
//!
//! All checks are total, side-effect free, and used identically at every
//! entry point that accepts user-authored text. Lengths are counted in
//! Unicode scalar values, not bytes.

use std::fmt;

use thiserror::Error;

/// Default maximum length of a player's full name.
pub const MAX_NAME_LENGTH: usize = 30;

/// Default maximum length of a scenario or action.
pub const MAX_TEXT_LENGTH: usize = 500;

const TEXT_PUNCTUATION: &[char] = &['.', ',', '-', '!', '?', '_', '(', ')', ':', ';', '"', '\''];

/// The user-authored field being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    /// A player's first and last name.
    Name,
    /// A round premise supplied by the captain.
    Scenario,
    /// A player's response to the scenario.
    Action,
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Scenario => f.write_str("scenario"),
            Self::Action => f.write_str("action"),
        }
    }
}

/// Why a piece of text was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Empty or whitespace-only input.
    #[error("{0} cannot be empty")]
    Empty(TextField),
    /// Input longer than the configured maximum.
    #[error("{field} too long (maximum {max} characters)")]
    TooLong {
        /// The offending field.
        field: TextField,
        /// Maximum length in characters.
        max: usize,
    },
    /// Input contains a character outside the allowed set.
    #[error("{0} contains invalid characters")]
    InvalidCharacters(TextField),
}

impl ValidationError {
    /// The field this error refers to.
    #[must_use]
    pub fn field(&self) -> TextField {
        match self {
            Self::Empty(field) | Self::InvalidCharacters(field) => *field,
            Self::TooLong { field, .. } => *field,
        }
    }

    /// Short machine-stable reason.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Empty(_) => "cannot be empty",
            Self::TooLong { .. } => "too long",
            Self::InvalidCharacters(_) => "invalid characters",
        }
    }
}

/// Latin or Russian Cyrillic letter.
fn is_locale_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || ('а'..='я').contains(&c) || ('А'..='Я').contains(&c) || c == 'ё' || c == 'Ё'
}

fn is_name_char(c: char) -> bool {
    is_locale_letter(c) || c.is_whitespace() || c == '-'
}

fn is_text_char(c: char) -> bool {
    is_locale_letter(c) || c.is_ascii_digit() || c.is_whitespace() || TEXT_PUNCTUATION.contains(&c)
}

fn validate(
    input: &str,
    field: TextField,
    max_chars: usize,
    allowed: fn(char) -> bool,
) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if input.chars().count() > max_chars {
        return Err(ValidationError::TooLong {
            field,
            max: max_chars,
        });
    }
    if !input.chars().all(allowed) {
        return Err(ValidationError::InvalidCharacters(field));
    }
    Ok(())
}

/// Validates a player's full name: letters, spaces and hyphens only.
///
/// # Errors
///
/// Returns the first failed rule in the order empty, length, charset.
pub fn validate_name(input: &str, max_chars: usize) -> Result<(), ValidationError> {
    validate(input, TextField::Name, max_chars, is_name_char)
}

/// Validates a scenario: letters, digits, whitespace and basic punctuation.
///
/// # Errors
///
/// Returns the first failed rule in the order empty, length, charset.
pub fn validate_scenario(input: &str, max_chars: usize) -> Result<(), ValidationError> {
    validate(input, TextField::Scenario, max_chars, is_text_char)
}

/// Validates a player's action with the same rules as a scenario.
///
/// # Errors
///
/// Returns the first failed rule in the order empty, length, charset.
pub fn validate_action(input: &str, max_chars: usize) -> Result<(), ValidationError> {
    validate(input, TextField::Action, max_chars, is_text_char)
}
