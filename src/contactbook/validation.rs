//! Contact form validation.
//!
//! A contact is accepted for saving when:
//! - the full name is not blank
//! - the job position is not blank
//! - the email is not blank, contains no whitespace and looks like
//!   `local-part@domain.tld`
//!
//! The store never runs these checks; they gate what the list model sends
//! to it.

use crate::model::Contact;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});

/// Validates every field of a contact, reporting the first failure.
///
/// # Examples
/// ```
/// use contactbook::model::Contact;
/// use contactbook::validation::validate_contact;
///
/// let contact = Contact::new("ivan@example.com")
///     .with_full_name("Ivan Sorokolit")
///     .with_job_position("iOS Developer");
/// assert!(validate_contact(&contact).is_ok());
///
/// assert!(validate_contact(&Contact::new("ivan@example.com")).is_err());
/// ```
pub fn validate_contact(contact: &Contact) -> Result<(), ValidationError> {
    if is_blank(contact.full_name.as_deref()) {
        return Err(ValidationError::EmptyFullName);
    }
    if is_blank(contact.job_position.as_deref()) {
        return Err(ValidationError::EmptyJobPosition);
    }
    validate_email(&contact.email)
}

/// Validates an email on its own.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::EmailContainsWhitespace);
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyFullName,
    EmptyJobPosition,
    EmptyEmail,
    EmailContainsWhitespace,
    InvalidEmail(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyFullName => write!(f, "full name cannot be empty"),
            ValidationError::EmptyJobPosition => write!(f, "job position cannot be empty"),
            ValidationError::EmptyEmail => write!(f, "email cannot be empty"),
            ValidationError::EmailContainsWhitespace => {
                write!(f, "email cannot contain spaces")
            }
            ValidationError::InvalidEmail(email) => {
                write!(f, "'{}' is not a valid email address", email)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
