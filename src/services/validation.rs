//! Field rules for incoming payloads
//!
//! A [`ComposedValidator`] runs its rules in order and stops at the first
//! violation.

use validator::ValidateLength;

use crate::{
    error::{AppError, AppResult},
    models::{AuthorInput, BookInput, BorrowInput},
};

/// Longest value accepted for any VARCHAR(255) column
pub const MAX_FIELD_LENGTH: u64 = 255;

pub trait Rule<T>: Send + Sync {
    fn check(&self, value: &T) -> AppResult<()>;
}

/// Rejects a string field longer than `max` characters
pub struct MaxLength<T> {
    field: fn(&T) -> &str,
    max: u64,
    message: fn(&T) -> String,
}

impl<T> MaxLength<T> {
    pub fn new(field: fn(&T) -> &str, message: fn(&T) -> String) -> Self {
        Self {
            field,
            max: MAX_FIELD_LENGTH,
            message,
        }
    }
}

impl<T> Rule<T> for MaxLength<T> {
    fn check(&self, value: &T) -> AppResult<()> {
        if (self.field)(value).validate_length(None, Some(self.max), None) {
            Ok(())
        } else {
            Err(AppError::Validation((self.message)(value)))
        }
    }
}

/// Any check expressible as a predicate
pub struct Check<T> {
    predicate: fn(&T) -> bool,
    message: &'static str,
}

impl<T> Check<T> {
    pub fn new(predicate: fn(&T) -> bool, message: &'static str) -> Self {
        Self { predicate, message }
    }
}

impl<T> Rule<T> for Check<T> {
    fn check(&self, value: &T) -> AppResult<()> {
        if (self.predicate)(value) {
            Ok(())
        } else {
            Err(AppError::Validation(self.message.to_string()))
        }
    }
}

pub struct ComposedValidator<T> {
    rules: Vec<Box<dyn Rule<T>>>,
}

impl<T> Default for ComposedValidator<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T: 'static> ComposedValidator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule: impl Rule<T> + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn validate(&self, value: &T) -> AppResult<()> {
        for rule in &self.rules {
            rule.check(value)?;
        }
        Ok(())
    }
}

fn author_name(a: &AuthorInput) -> &str {
    &a.name
}

fn author_surname(a: &AuthorInput) -> &str {
    &a.surname
}

fn book_title(b: &BookInput) -> &str {
    &b.title
}

fn book_description(b: &BookInput) -> &str {
    &b.description
}

fn reader_name(b: &BorrowInput) -> &str {
    &b.reader_name
}

pub fn author_validator() -> ComposedValidator<AuthorInput> {
    ComposedValidator::new()
        .with(MaxLength::new(author_name, |a: &AuthorInput| {
            format!("Author's name is too long: {}", a.name)
        }))
        .with(MaxLength::new(author_surname, |a: &AuthorInput| {
            format!("Author's surname is too long: {}", a.surname)
        }))
}

pub fn book_validator() -> ComposedValidator<BookInput> {
    ComposedValidator::new()
        .with(MaxLength::new(book_title, |b: &BookInput| {
            format!("Book's title is too long: {}", b.title)
        }))
        .with(MaxLength::new(book_description, |_: &BookInput| {
            "Book's description is too long".to_string()
        }))
        .with(Check::new(
            |b: &BookInput| b.available_copies >= 0,
            "Book's available copies cannot be negative",
        ))
}

pub fn borrow_validator() -> ComposedValidator<BorrowInput> {
    ComposedValidator::new().with(MaxLength::new(reader_name, |b: &BorrowInput| {
        format!("Borrow reader name is too long: {}", b.reader_name)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn author(name: &str, surname: &str) -> AuthorInput {
        AuthorInput {
            name: name.to_string(),
            surname: surname.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
        }
    }

    #[test]
    fn accepts_exactly_255_characters() {
        let name = "a".repeat(255);
        assert!(author_validator().validate(&author(&name, "Doe")).is_ok());
    }

    #[test]
    fn rejects_256_characters() {
        let name = "a".repeat(256);
        let err = author_validator()
            .validate(&author(&name, "Doe"))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.starts_with("Author's name is too long")));
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 255 two-byte characters
        let reader_name = "é".repeat(255);
        let borrow = BorrowInput {
            book_id: 1,
            reader_name,
        };
        assert!(borrow_validator().validate(&borrow).is_ok());
    }

    #[test]
    fn stops_at_first_violation() {
        let long = "x".repeat(300);
        let err = author_validator()
            .validate(&author(&long, &long))
            .unwrap_err();
        // The surname rule never ran
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("name is too long") && !msg.contains("surname")));
    }

    #[test]
    fn book_rules_cover_copies() {
        let book = BookInput {
            title: "X".to_string(),
            description: String::new(),
            author_id: 1,
            available_copies: -1,
        };
        let err = book_validator().validate(&book).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("negative")));
    }

    #[test]
    fn empty_validator_accepts_anything() {
        let validator: ComposedValidator<BorrowInput> = ComposedValidator::new();
        let borrow = BorrowInput {
            book_id: 1,
            reader_name: "z".repeat(1000),
        };
        assert!(validator.validate(&borrow).is_ok());
    }
}
