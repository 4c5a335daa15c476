//! Field-level validation shared by the booking, review and contact forms.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Form fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    DateRange,
    Name,
    Email,
    Guests,
    StayPeriod,
    Rating,
    Subject,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("field is required")]
    Required,
    #[error("e-mail address is malformed")]
    InvalidEmail,
    #[error("check-in and check-out dates must both be selected")]
    IncompleteRange,
    #[error("rating must be between 1 and 5")]
    RatingOutOfRange,
    #[error("guest count must be a positive whole number")]
    InvalidGuests,
}

/// Errors keyed by field, iterated in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, ValidationError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first error recorded for a field.
    pub fn insert(&mut self, field: Field, error: ValidationError) {
        self.0.entry(field).or_insert(error);
    }

    pub fn get(&self, field: Field) -> Option<ValidationError> {
        self.0.get(&field).copied()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, ValidationError)> + '_ {
        self.0.iter().map(|(field, error)| (*field, *error))
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn require(&mut self, field: Field, value: &str) {
        if value.trim().is_empty() {
            self.insert(field, ValidationError::Required);
        }
    }

    pub fn require_email(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.insert(Field::Email, ValidationError::Required);
        } else if !is_valid_email(value) {
            self.insert(Field::Email, ValidationError::InvalidEmail);
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field:?}: {error}")?;
            first = false;
        }
        Ok(())
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"))
}

/// Accepts the simple `local@domain.tld` shape used across the site forms.
pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}
