// SPDX-License-Identifier: Apache-2.0

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

pub const PERSON_NAME_MAX_LEN: usize = 40;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 12;
pub const PHONE_MIN_DIGITS: usize = 7;
pub const PHONE_MAX_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    InvalidFormat(&'static str),
    TooLong(&'static str, usize),
    Mismatch(&'static str),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::InvalidFormat(msg) => f.write_str(msg),
            Self::TooLong(name, max) => write!(f, "{name} exceeds max length {max}"),
            Self::Mismatch(name) => write!(f, "{name} does not match"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Registration form fields, in form order. Keys error maps and the
/// machine-readable `details` payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Password,
    PasswordRepeat,
    NationalId,
    Phone,
}

impl Field {
    pub const ALL: [Self; 7] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Password,
        Self::PasswordRepeat,
        Self::NationalId,
        Self::Phone,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Password => "password",
            Self::PasswordRepeat => "password_repeat",
            Self::NationalId => "national_id",
            Self::Phone => "phone",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn person_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-ZÀ-ÿ\s]+$").expect("person name pattern"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.+-]+@[A-Za-z0-9-]+\.[A-Za-z0-9.-]+$").expect("email pattern")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{7,10}$").expect("phone pattern"))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[non_exhaustive]
pub struct FirstName(String);

impl FirstName {
    /// Letters (including Latin-1 accented ranges) and whitespace only,
    /// at most [`PERSON_NAME_MAX_LEN`] characters. The input is kept
    /// verbatim; it is not trimmed.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::Empty("first name"));
        }
        if !person_name_pattern().is_match(input) {
            return Err(ParseError::InvalidFormat(
                "first name accepts only letters and spaces",
            ));
        }
        if input.chars().count() > PERSON_NAME_MAX_LEN {
            return Err(ParseError::TooLong("first name", PERSON_NAME_MAX_LEN));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[non_exhaustive]
pub struct LastName(String);

impl LastName {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::Empty("last name"));
        }
        if !person_name_pattern().is_match(input) {
            return Err(ParseError::InvalidFormat(
                "last name accepts only letters and spaces",
            ));
        }
        if input.chars().count() > PERSON_NAME_MAX_LEN {
            return Err(ParseError::TooLong("last name", PERSON_NAME_MAX_LEN));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[non_exhaustive]
pub struct Email(String);

impl Email {
    /// Local part, `@`, domain with at least one dot. Matching is
    /// case-sensitive and the address is stored exactly as entered.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::Empty("email"));
        }
        if !email_pattern().is_match(input) {
            return Err(ParseError::InvalidFormat("email format is invalid"));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[non_exhaustive]
pub struct Phone(String);

impl Phone {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::Empty("phone"));
        }
        if !phone_pattern().is_match(input) {
            return Err(ParseError::InvalidFormat(
                "phone must be 7 to 10 digits with no separators",
            ));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A validated, still-cleartext password. Lives only between form
/// validation and hashing; never serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(String);

impl PlainPassword {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::Empty("password"));
        }
        let chars = input.chars().count();
        if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&chars) {
            return Err(ParseError::InvalidFormat(
                "password must be between 6 and 12 characters",
            ));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("PlainPassword(***)")
    }
}

/// The confirmation field is compared verbatim against the password,
/// after its own emptiness check.
pub fn check_password_repeat(password: &str, repeat: &str) -> Result<(), ParseError> {
    if repeat.trim().is_empty() {
        return Err(ParseError::Empty("password confirmation"));
    }
    if repeat != password {
        return Err(ParseError::Mismatch("password confirmation"));
    }
    Ok(())
}
