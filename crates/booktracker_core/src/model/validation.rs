//! Input validation shared by the service layer.
//!
//! # Invariants
//! - Validation never touches the store.
//! - ISBNs are exactly 13 ASCII digits.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

use super::{AuthorId, BookId};

static ISBN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{13}$").expect("valid isbn regex"));

/// Rejected caller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace only.
    Blank(&'static str),
    /// ISBN is not 13 digits.
    InvalidIsbn(String),
    /// Book is not owned by the author supplied alongside it.
    AuthorMismatch { book_id: BookId, author_id: AuthorId },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank(field) => write!(f, "{field} cannot be blank"),
            Self::InvalidIsbn(value) => {
                write!(f, "isbn must be exactly 13 digits, got `{value}`")
            }
            Self::AuthorMismatch { book_id, author_id } => {
                write!(f, "book {book_id} does not belong to author {author_id}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Rejects empty or whitespace-only values for `field`.
pub fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank(field));
    }
    Ok(())
}

/// Checks ISBN presence and fixed-length digit format.
pub fn validate_isbn(isbn: &str) -> Result<(), ValidationError> {
    require_non_blank("isbn", isbn)?;
    if !ISBN_RE.is_match(isbn) {
        return Err(ValidationError::InvalidIsbn(isbn.to_string()));
    }
    Ok(())
}
